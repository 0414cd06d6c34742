//! Immutable triangulated surface meshes.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scaling::{Side, Species};

/// Raw mesh buffers as delivered by the data layer: flat vertex positions
/// (`x0 y0 z0 x1 y1 z1 …`) and flat face indices (three per triangle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    /// Flat vertex position buffer.
    pub vertices: Vec<f32>,
    /// Flat triangle index buffer.
    pub faces: Vec<u32>,
}

impl SurfaceMesh {
    /// Number of vertices in the mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Arithmetic mean of all vertex positions, the orbit target for the
    /// camera.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        let count = self.vertex_count();
        if count == 0 {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self
            .vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .sum();
        sum / count as f32
    }
}

/// One hemisphere of one species' brain: an immutable triangulated mesh
/// plus its display name. Owned by the data-fetch collaborator; read-only
/// to the core.
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    species: Species,
    side: Side,
    mesh: SurfaceMesh,
}

impl Surface {
    /// Wrap a mesh for one (species, side) pair.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        species: Species,
        side: Side,
        mesh: SurfaceMesh,
    ) -> Self {
        Self {
            name: name.into(),
            species,
            side,
            mesh,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Species this surface belongs to.
    #[must_use]
    pub const fn species(&self) -> Species {
        self.species
    }

    /// Hemisphere side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Underlying mesh buffers.
    #[must_use]
    pub const fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// Number of vertices; intensity buffers must match this length.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// The `(species, side)` key of this surface.
    #[must_use]
    pub const fn key(&self) -> SurfaceKey {
        SurfaceKey {
            species: self.species,
            side: self.side,
        }
    }
}

/// Identifies one surface within a session or a similarity response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceKey {
    /// Species of the surface.
    pub species: Species,
    /// Hemisphere side of the surface.
    pub side: Side,
}

impl fmt::Display for SurfaceKey {
    /// Formats as the `"{species}_{side}"` wire key used by the
    /// similarity API.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.species, self.side)
    }
}

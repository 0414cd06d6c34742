//! Data-layer seam: query seed, wire types, and the [`FeatureApi`] trait.
//!
//! The backend owns the wire protocol (`?species=&side=&vertex=` query
//! strings); the core only depends on these function signatures. The
//! calls are blocking and run on the query worker thread, never on the
//! event loop. A reference HTTP implementation is available behind the
//! `http` feature.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CrossviewError;
use crate::scaling::{Side, Species};
use crate::surface::{SurfaceKey, SurfaceMesh};

/// The vertex a similarity query is seeded at: one vertex on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    /// Species of the clicked surface.
    pub species: Species,
    /// Side of the clicked surface.
    pub side: Side,
    /// Vertex index within that surface.
    pub vertex: u32,
}

/// Result of one similarity query: a `"{species}_{side}"` keyed map with
/// one value per vertex of the named surface.
///
/// Transient; each query's response replaces the previous one atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityResponse {
    arrays: FxHashMap<String, Vec<f32>>,
}

impl SimilarityResponse {
    /// Wrap a keyed map of similarity arrays.
    #[must_use]
    pub fn new(arrays: FxHashMap<String, Vec<f32>>) -> Self {
        Self { arrays }
    }

    /// Similarity array for one surface, if present.
    #[must_use]
    pub fn values_for(&self, key: SurfaceKey) -> Option<&[f32]> {
        self.arrays.get(&key.to_string()).map(Vec::as_slice)
    }

    /// Whether every value across all arrays is exactly zero.
    ///
    /// The backend encodes "no defined mapping" (midline and boundary
    /// vertices) as an all-zero response rather than an error status.
    #[must_use]
    pub fn is_all_zero(&self) -> bool {
        self.arrays
            .values()
            .all(|values| values.iter().all(|v| *v == 0.0))
    }
}

/// Surface mesh as served by the hemispheres endpoint: nested vertex and
/// face arrays plus a display name.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSurface {
    /// Display name of the surface.
    pub name: String,
    /// Vertex positions, one `[x, y, z]` triple per vertex.
    pub vertices: Vec<[f32; 3]>,
    /// Triangles, one `[a, b, c]` index triple per face.
    pub faces: Vec<[u32; 3]>,
}

impl ApiSurface {
    /// Flatten into the renderer-facing buffer layout.
    #[must_use]
    pub fn into_mesh(self) -> SurfaceMesh {
        SurfaceMesh {
            vertices: self.vertices.into_iter().flatten().collect(),
            faces: self.faces.into_iter().flatten().collect(),
        }
    }
}

/// Blocking data-layer interface.
///
/// Implementations resolve with parsed JSON payloads and fail with
/// [`CrossviewError::Transport`] on any transport or decode problem.
pub trait FeatureApi: Send {
    /// Fetch the surface mesh for one hemisphere.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::Transport`] on fetch or decode failure.
    fn hemisphere(
        &self,
        species: Species,
        side: Side,
    ) -> Result<ApiSurface, CrossviewError>;

    /// Fetch cross-species similarity seeded at one vertex.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::Transport`] on fetch or decode failure.
    fn cross_species_similarity(
        &self,
        seed: Seed,
    ) -> Result<SimilarityResponse, CrossviewError>;

    /// Fetch the neuro-semantic terms associated with one vertex.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::Transport`] on fetch or decode failure.
    fn neuro_terms(&self, seed: Seed) -> Result<Vec<String>, CrossviewError>;
}

#[cfg(feature = "http")]
pub use self::http::HttpFeatureApi;

#[cfg(feature = "http")]
mod http {
    //! Reference [`FeatureApi`] over the backend's REST endpoints.

    use serde::de::DeserializeOwned;

    use super::{ApiSurface, FeatureApi, Seed, SimilarityResponse};
    use crate::error::CrossviewError;
    use crate::scaling::{Side, Species};

    /// HTTP-backed data layer hitting the `/api/v1` REST endpoints.
    pub struct HttpFeatureApi {
        base_url: String,
    }

    impl HttpFeatureApi {
        /// Create a client for the API at `base_url` (e.g.
        /// `http://localhost:8000/api/v1`).
        #[must_use]
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
            }
        }

        fn get_json<T: DeserializeOwned>(
            &self,
            path: &str,
            query: &str,
        ) -> Result<T, CrossviewError> {
            let url = format!("{}{path}?{query}", self.base_url);
            let body = ureq::get(&url)
                .call()
                .map_err(|e| CrossviewError::Transport(e.to_string()))?
                .into_body()
                .read_to_string()
                .map_err(|e| CrossviewError::Transport(e.to_string()))?;
            serde_json::from_str(&body)
                .map_err(|e| CrossviewError::Transport(e.to_string()))
        }
    }

    impl FeatureApi for HttpFeatureApi {
        fn hemisphere(
            &self,
            species: Species,
            side: Side,
        ) -> Result<ApiSurface, CrossviewError> {
            self.get_json(
                "/surfaces/hemispheres",
                &format!("species={species}&side={side}"),
            )
        }

        fn cross_species_similarity(
            &self,
            seed: Seed,
        ) -> Result<SimilarityResponse, CrossviewError> {
            self.get_json(
                "/features/cross_species",
                &format!(
                    "species={}&side={}&vertex={}",
                    seed.species, seed.side, seed.vertex
                ),
            )
        }

        fn neuro_terms(
            &self,
            seed: Seed,
        ) -> Result<Vec<String>, CrossviewError> {
            self.get_json(
                "/features/neuroquery",
                &format!(
                    "species={}&side={}&vertex={}",
                    seed.species, seed.side, seed.vertex
                ),
            )
        }
    }
}

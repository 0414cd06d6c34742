//! Platform-agnostic viewer events.
//!
//! These are fed into [`CompareSession::dispatch`](crate::session::CompareSession::dispatch),
//! which fans them out to the similarity pipeline or the camera sync
//! controller.

/// Stable index of a viewer within the session's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewerId(pub usize);

/// The mesh triangle a gesture intersected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHit {
    /// Vertex indices of the intersected triangle, nearest intersection
    /// first in the host's ray-cast order.
    pub face: [u32; 3],
}

impl MeshHit {
    /// The vertex a pick resolves to: the first corner of the
    /// intersected triangle.
    #[must_use]
    pub const fn picked_vertex(&self) -> u32 {
        self.face[0]
    }
}

/// A gesture or camera-control event on one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Native double-click (desktop). `hit` is `None` when the ray
    /// missed the mesh.
    DoubleClick {
        /// Viewer the gesture landed on.
        viewer: ViewerId,
        /// Intersected triangle, if any.
        hit: Option<MeshHit>,
    },
    /// Raw touch-start (touch devices); two within 500 ms form a
    /// double-click.
    TouchStart {
        /// Viewer the gesture landed on.
        viewer: ViewerId,
        /// Intersected triangle, if any.
        hit: Option<MeshHit>,
    },
    /// The viewer's camera controls changed (drag, inertia).
    CameraMoved {
        /// Viewer whose camera moved.
        viewer: ViewerId,
    },
}

//! Seam to the external mesh/rendering library.
//!
//! The core never talks to a real renderer; it drives whatever implements
//! [`RenderBackend`]. The trait captures exactly the surface the viewer
//! touches on its host library (render size, background alpha, orbit
//! controls, gesture table, vertex-color attribute) so the whole event
//! pipeline is testable against a recording mock.

use glam::Vec3;

/// Position, orbit target and up-vector of one viewer's camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye position in world space.
    pub position: Vec3,
    /// Orbit target.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Which drag gestures the host viewer accepts.
///
/// Viewers stay synchronized in scale, so independent zoom or pan would
/// break the lock-camera contract; the session only ever enables rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gestures {
    /// Single-finger / left-button rotate drag.
    pub rotate: bool,
    /// Pan drag.
    pub pan: bool,
    /// Wheel / pinch zoom.
    pub zoom: bool,
}

impl Gestures {
    /// Rotation only; pan and zoom disabled.
    #[must_use]
    pub const fn rotate_only() -> Self {
        Self {
            rotate: true,
            pan: false,
            zoom: false,
        }
    }
}

/// One renderable viewer instance plus its camera controls.
///
/// Implemented by the host's rendering adapter; mutations are applied
/// immediately, the host redraws on its own loop.
pub trait RenderBackend {
    /// Resize the render target in physical pixels.
    fn set_render_size(&mut self, width: u32, height: u32);

    /// Background alpha (0 = transparent).
    fn set_background_alpha(&mut self, alpha: f32);

    /// Clamp the orbit distance range.
    fn set_distance_limits(&mut self, min: f32, max: f32);

    /// Enable/disable drag gestures.
    fn set_gestures(&mut self, gestures: Gestures);

    /// Recompute the viewport aspect ratio from the container size.
    fn refresh_viewport(&mut self);

    /// Current camera state.
    fn camera_state(&self) -> CameraState;

    /// Move the camera eye, keeping target and up unchanged.
    fn set_camera_position(&mut self, position: Vec3);

    /// Move the orbit target.
    fn set_camera_target(&mut self, target: Vec3);

    /// Replace the per-vertex color attribute (one RGB triple per vertex).
    fn set_vertex_colors(&mut self, colors: &[[f32; 3]]);
}

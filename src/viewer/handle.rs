//! One renderable viewer instance per (species, side) surface.

use glam::Vec3;

use crate::backend::{CameraState, Gestures, RenderBackend};
use crate::colormap::{mesh_colors, ColorMap};
use crate::error::CrossviewError;
use crate::scaling::{Side, Species, SpeciesScale};
use crate::surface::{Surface, SurfaceKey};

/// Orbit distance for a human-scale (factor 1.0) surface, tuned so the
/// whole mesh fits in frame.
pub const BASE_CAMERA_DISTANCE: f32 = 180.0;

/// Closest the orbit controls may approach the target.
const MIN_ORBIT_DISTANCE: f32 = 30.0;
/// Farthest the orbit controls may retreat from the target.
const MAX_ORBIT_DISTANCE: f32 = 300.0;

/// Owns the rendering of one surface and exposes a narrow mutation
/// surface to the rest of the system: camera reset, intensity recolor,
/// and camera position read/write for synchronization.
///
/// Four handles exist per session (human/macaque x left/right); they
/// persist until full teardown.
pub struct ViewerHandle {
    backend: Box<dyn RenderBackend>,
    surface: Surface,
    width: u32,
    height: u32,
    color_limits: [f32; 2],
    color_map: ColorMap,
    intensity: Vec<f32>,
}

impl ViewerHandle {
    /// Attach a surface to a fresh backend instance.
    ///
    /// Does not position the camera; call [`Self::plot`] once the host
    /// container is laid out.
    #[must_use]
    pub fn new(
        backend: Box<dyn RenderBackend>,
        surface: Surface,
        width: u32,
        height: u32,
    ) -> Self {
        let intensity = vec![0.0; surface.vertex_count()];
        Self {
            backend,
            surface,
            width,
            height,
            color_limits: [-1.0, 2.0],
            color_map: ColorMap::Turbo,
            intensity,
        }
    }

    /// Configure the backend and take the initial camera position.
    ///
    /// Restricts input to single-finger/left-button rotation with no
    /// zoom or pan: viewers stay synchronized in scale, and independent
    /// zoom would break the lock-camera contract.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::UnknownSpecies`] when the scale table has no
    /// entry for this surface's species.
    pub fn plot(&mut self, scale: &SpeciesScale) -> Result<(), CrossviewError> {
        self.backend
            .set_distance_limits(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
        self.backend.set_background_alpha(0.0);
        self.backend.set_render_size(self.width, self.height);

        self.reset_camera(scale)?;
        // Prevents a faulty aspect ratio on first load.
        self.backend.refresh_viewport();

        self.backend.set_gestures(Gestures::rotate_only());
        Ok(())
    }

    /// Re-target the orbit on the mesh centroid and place the camera at
    /// `scale_factor(species) * BASE_CAMERA_DISTANCE` along the sagittal
    /// axis, on the outside of the hemisphere (negative x for left,
    /// positive for right).
    ///
    /// The asymmetric, species-scaled placement is why camera sync must
    /// rescale positions rather than copy them verbatim.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::UnknownSpecies`] when the scale table has no
    /// entry for this surface's species.
    pub fn reset_camera(
        &mut self,
        scale: &SpeciesScale,
    ) -> Result<(), CrossviewError> {
        let target = self.surface.mesh().centroid();
        self.backend.set_camera_target(target);

        let distance = scale.scale_factor(self.species())?
            * BASE_CAMERA_DISTANCE;
        let multiplier = match self.side() {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };

        self.backend.set_camera_position(Vec3::new(
            target.x + distance * multiplier,
            target.y,
            target.z,
        ));
        Ok(())
    }

    /// Replace the intensity buffer and push recomputed vertex colors to
    /// the renderer.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::IntensityLength`] when `values` does not match
    /// the surface's vertex count; the previous buffer is kept.
    pub fn set_intensity(
        &mut self,
        values: &[f32],
    ) -> Result<(), CrossviewError> {
        let expected = self.surface.vertex_count();
        if values.len() != expected {
            return Err(CrossviewError::IntensityLength {
                expected,
                got: values.len(),
            });
        }
        self.intensity.clear();
        self.intensity.extend_from_slice(values);
        self.recolor()
    }

    /// Reapply the active colormap to the current intensity buffer.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::InvalidColorLimits`] when the stored limits are
    /// inverted.
    pub fn recolor(&mut self) -> Result<(), CrossviewError> {
        let colors =
            mesh_colors(&self.intensity, self.color_map, self.color_limits)?;
        self.backend.set_vertex_colors(&colors);
        Ok(())
    }

    /// Change the color limits and recolor without refetching.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::InvalidColorLimits`] when `min >= max`; the
    /// previous limits are kept.
    pub fn set_color_limits(
        &mut self,
        limits: [f32; 2],
    ) -> Result<(), CrossviewError> {
        let [min, max] = limits;
        if min >= max {
            return Err(CrossviewError::InvalidColorLimits { min, max });
        }
        self.color_limits = limits;
        self.recolor()
    }

    /// Change the active colormap and recolor.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::InvalidColorLimits`] when the stored limits are
    /// inverted.
    pub fn set_color_map(
        &mut self,
        map: ColorMap,
    ) -> Result<(), CrossviewError> {
        self.color_map = map;
        self.recolor()
    }

    /// Species of the displayed surface.
    #[must_use]
    pub const fn species(&self) -> Species {
        self.surface.species()
    }

    /// Side of the displayed surface.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.surface.side()
    }

    /// The `(species, side)` key of the displayed surface.
    #[must_use]
    pub const fn key(&self) -> SurfaceKey {
        self.surface.key()
    }

    /// The displayed surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Current intensity buffer, one scalar per vertex.
    #[must_use]
    pub fn intensity(&self) -> &[f32] {
        &self.intensity
    }

    /// Current color limits.
    #[must_use]
    pub const fn color_limits(&self) -> [f32; 2] {
        self.color_limits
    }

    /// Current camera state, read by the sync controller on the
    /// triggering viewer.
    #[must_use]
    pub fn camera_state(&self) -> CameraState {
        self.backend.camera_state()
    }

    /// Move this viewer's camera, written by the sync controller on
    /// follower viewers.
    pub fn set_camera_position(&mut self, position: Vec3) {
        self.backend.set_camera_position(position);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::mock::{BackendLog, RecordingBackend};
    use crate::surface::SurfaceMesh;

    fn make_handle(
        species: Species,
        side: Side,
    ) -> (ViewerHandle, Rc<RefCell<BackendLog>>) {
        let (backend, log) = RecordingBackend::new();
        let mesh = SurfaceMesh {
            vertices: vec![0.0, 0.0, 0.0, 6.0, 0.0, 0.0, 0.0, 6.0, 0.0],
            faces: vec![0, 1, 2],
        };
        let surface = Surface::new("test", species, side, mesh);
        let handle =
            ViewerHandle::new(Box::new(backend), surface, 450, 300);
        (handle, log)
    }

    #[test]
    fn reset_camera_scales_distance_by_species() {
        let scale = SpeciesScale::default();

        let (mut human, log) = make_handle(Species::Human, Side::Right);
        human.reset_camera(&scale).unwrap();
        let camera = log.borrow().camera;
        assert_eq!(camera.target, Vec3::new(2.0, 2.0, 0.0));
        assert_eq!(
            camera.position,
            Vec3::new(2.0 + BASE_CAMERA_DISTANCE, 2.0, 0.0)
        );

        let (mut macaque, log) = make_handle(Species::Macaque, Side::Left);
        macaque.reset_camera(&scale).unwrap();
        let camera = log.borrow().camera;
        assert_eq!(
            camera.position,
            Vec3::new(2.0 - 0.45 * BASE_CAMERA_DISTANCE, 2.0, 0.0)
        );
    }

    #[test]
    fn plot_configures_backend() {
        let scale = SpeciesScale::default();
        let (mut handle, log) = make_handle(Species::Human, Side::Left);
        handle.plot(&scale).unwrap();

        let log = log.borrow();
        assert_eq!(log.render_size, Some((450, 300)));
        assert_eq!(log.background_alpha, Some(0.0));
        assert_eq!(log.distance_limits, Some((30.0, 300.0)));
        assert_eq!(log.gestures, Some(Gestures::rotate_only()));
        assert_eq!(log.viewport_refreshes, 1);
    }

    #[test]
    fn set_intensity_rejects_wrong_length() {
        let (mut handle, log) = make_handle(Species::Human, Side::Left);
        let err = handle.set_intensity(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            CrossviewError::IntensityLength { expected: 3, got: 2 }
        ));
        // Previous buffer and renderer colors untouched.
        assert_eq!(handle.intensity(), &[0.0, 0.0, 0.0]);
        assert_eq!(log.borrow().color_updates, 0);
    }

    #[test]
    fn set_intensity_pushes_colors() {
        let (mut handle, log) = make_handle(Species::Human, Side::Left);
        handle.set_intensity(&[0.5, 1.0, -0.5]).unwrap();
        assert_eq!(handle.intensity(), &[0.5, 1.0, -0.5]);
        let log = log.borrow();
        assert_eq!(log.color_updates, 1);
        assert_eq!(log.last_colors.len(), 3);
    }

    #[test]
    fn color_limit_change_recolors_without_new_data() {
        let (mut handle, log) = make_handle(Species::Human, Side::Left);
        handle.set_intensity(&[0.0, 1.0, 2.0]).unwrap();
        let before = log.borrow().last_colors.clone();

        handle.set_color_limits([0.0, 10.0]).unwrap();
        let log = log.borrow();
        assert_eq!(log.color_updates, 2);
        assert_ne!(log.last_colors, before);
    }

    #[test]
    fn inverted_color_limits_keep_previous() {
        let (mut handle, _log) = make_handle(Species::Human, Side::Left);
        assert!(handle.set_color_limits([3.0, 3.0]).is_err());
        assert_eq!(handle.color_limits(), [-1.0, 2.0]);
    }

    #[test]
    fn unknown_species_is_loud() {
        let scale =
            SpeciesScale::new(rustc_hash::FxHashMap::default()).unwrap();
        let (mut handle, _log) = make_handle(Species::Human, Side::Left);
        assert!(matches!(
            handle.reset_camera(&scale),
            Err(CrossviewError::UnknownSpecies(_))
        ));
    }
}

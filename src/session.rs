//! The comparison session: viewer arena, settings funnel, event router.
//!
//! No component owns a central event loop. The host forwards each raw
//! gesture as a [`ViewerEvent`] into [`CompareSession::dispatch`] and
//! calls [`CompareSession::poll`] from its own render loop; everything
//! else — similarity fan-out, camera broadcast, settings application —
//! happens inside those two calls.

use crate::api::{FeatureApi, Seed};
use crate::camera_sync::CameraSyncController;
use crate::colormap::ColorMap;
use crate::error::CrossviewError;
use crate::input::{MeshHit, TapTracker, ViewerEvent, ViewerId};
use crate::notify::Notifier;
use crate::pipeline::SimilarityUpdatePipeline;
use crate::scaling::SpeciesScale;
use crate::settings::ViewerSettings;
use crate::viewer::ViewerHandle;

/// One page session comparing a set of surfaces (four in the standard
/// human/macaque layout).
pub struct CompareSession {
    viewers: Vec<ViewerHandle>,
    scale: SpeciesScale,
    settings: ViewerSettings,
    sync: CameraSyncController,
    pipeline: SimilarityUpdatePipeline,
    tap: TapTracker,
    notifier: Box<dyn Notifier>,
}

impl CompareSession {
    /// Assemble a session over pre-constructed viewer handles.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::UnknownSpecies`] when the scale table misses a
    /// species present in `viewers` (checked here so event paths cannot
    /// fail on lookup), [`CrossviewError::InvalidColorLimits`] for bad
    /// settings, or [`CrossviewError::ThreadSpawn`] if the query worker
    /// cannot start.
    pub fn new(
        viewers: Vec<ViewerHandle>,
        scale: SpeciesScale,
        settings: ViewerSettings,
        api: Box<dyn FeatureApi>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, CrossviewError> {
        scale.ensure_covers(viewers.iter().map(ViewerHandle::species))?;
        settings.validate()?;

        let mut viewers = viewers;
        for viewer in &mut viewers {
            viewer.set_color_limits(settings.color_limits)?;
            viewer.set_color_map(settings.color_map)?;
        }

        Ok(Self {
            sync: CameraSyncController::new(scale.clone()),
            pipeline: SimilarityUpdatePipeline::new(api)?,
            viewers,
            scale,
            settings,
            tap: TapTracker::new(),
            notifier,
        })
    }

    /// Initial placement: configure and frame every viewer.
    ///
    /// # Errors
    ///
    /// Propagates viewer plot failures (scale-table gaps).
    pub fn plot_all(&mut self) -> Result<(), CrossviewError> {
        for viewer in &mut self.viewers {
            viewer.plot(&self.scale)?;
        }
        Ok(())
    }

    /// Route one viewer event.
    ///
    /// Recoverable failures (missed picks) are reported through the
    /// notifier and absorbed here.
    ///
    /// # Errors
    ///
    /// Configuration defects only, e.g. a scale-table gap hit during
    /// camera propagation.
    pub fn dispatch(
        &mut self,
        event: ViewerEvent,
    ) -> Result<(), CrossviewError> {
        match event {
            ViewerEvent::DoubleClick { viewer, hit } => {
                self.begin_similarity(viewer, hit);
                Ok(())
            }
            ViewerEvent::TouchStart { viewer, hit } => {
                if self.tap.tap() {
                    self.begin_similarity(viewer, hit);
                }
                Ok(())
            }
            ViewerEvent::CameraMoved { viewer } => self.sync.propagate(
                &mut self.viewers,
                viewer,
                &self.settings,
            ),
        }
    }

    /// Drain completed fetches and apply them to the viewers.
    ///
    /// The host calls this once per render-loop turn.
    ///
    /// # Errors
    ///
    /// Configuration defects only (malformed similarity response);
    /// recoverable failures go through the notifier.
    pub fn poll(&mut self) -> Result<(), CrossviewError> {
        self.pipeline.poll(&mut self.viewers, self.notifier.as_ref())
    }

    fn begin_similarity(&mut self, viewer: ViewerId, hit: Option<MeshHit>) {
        let Some(handle) = self.viewers.get(viewer.0) else {
            log::warn!("event for unknown viewer {viewer:?}");
            return;
        };
        if let Err(e) =
            self.pipeline.begin(handle.species(), handle.side(), hit)
        {
            self.notifier.error(&e.user_message());
        }
    }

    /// Change the color limits on every viewer (slider path). The
    /// designated settings-writer funnel for the UI layer.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::InvalidColorLimits`] when `min >= max`; neither
    /// the settings nor any viewer change.
    pub fn set_color_limits(
        &mut self,
        limits: [f32; 2],
    ) -> Result<(), CrossviewError> {
        let [min, max] = limits;
        if min >= max {
            return Err(CrossviewError::InvalidColorLimits { min, max });
        }
        self.settings.color_limits = limits;
        for viewer in &mut self.viewers {
            viewer.set_color_limits(limits)?;
        }
        Ok(())
    }

    /// Change the active colormap on every viewer.
    ///
    /// # Errors
    ///
    /// Propagates recolor failures.
    pub fn set_color_map(
        &mut self,
        map: ColorMap,
    ) -> Result<(), CrossviewError> {
        self.settings.color_map = map;
        for viewer in &mut self.viewers {
            viewer.set_color_map(map)?;
        }
        Ok(())
    }

    /// Toggle the camera lock (lock-toggle path).
    pub fn set_camera_lock(&mut self, locked: bool) {
        self.settings.camera_lock = locked;
    }

    /// Current shared settings.
    #[must_use]
    pub const fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// The currently displayed seed triple, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<Seed> {
        self.pipeline.seed()
    }

    /// Latest neuro-semantic terms for the seed vertex.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        self.pipeline.terms()
    }

    /// One viewer by arena id.
    #[must_use]
    pub fn viewer(&self, id: ViewerId) -> Option<&ViewerHandle> {
        self.viewers.get(id.0)
    }

    /// Arena ids of all viewers, in construction order.
    pub fn viewer_ids(&self) -> impl Iterator<Item = ViewerId> {
        (0..self.viewers.len()).map(ViewerId)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use glam::Vec3;
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::api::{ApiSurface, SimilarityResponse};
    use crate::backend::mock::{BackendLog, RecordingBackend};
    use crate::notify::mock::RecordingNotifier;
    use crate::scaling::{Side, Species};
    use crate::surface::{Surface, SurfaceMesh};

    struct FillApi(f32);

    impl FeatureApi for FillApi {
        fn hemisphere(
            &self,
            _species: Species,
            _side: Side,
        ) -> Result<ApiSurface, CrossviewError> {
            Err(CrossviewError::Transport("not scripted".to_owned()))
        }

        fn cross_species_similarity(
            &self,
            _seed: Seed,
        ) -> Result<SimilarityResponse, CrossviewError> {
            let mut arrays = FxHashMap::default();
            for key in
                ["human_left", "human_right", "macaque_left", "macaque_right"]
            {
                let _ = arrays.insert(key.to_owned(), vec![self.0; 3]);
            }
            Ok(SimilarityResponse::new(arrays))
        }

        fn neuro_terms(
            &self,
            _seed: Seed,
        ) -> Result<Vec<String>, CrossviewError> {
            Ok(vec!["auditory".to_owned()])
        }
    }

    fn session_with(
        fill: f32,
    ) -> (
        CompareSession,
        Vec<Rc<RefCell<BackendLog>>>,
        Rc<RefCell<Vec<String>>>,
    ) {
        let mut viewers = Vec::new();
        let mut logs = Vec::new();
        for (species, side) in [
            (Species::Human, Side::Left),
            (Species::Human, Side::Right),
            (Species::Macaque, Side::Left),
            (Species::Macaque, Side::Right),
        ] {
            let (backend, log) = RecordingBackend::new();
            let mesh = SurfaceMesh {
                vertices: vec![0.0; 9],
                faces: vec![0, 1, 2],
            };
            let surface = Surface::new("test", species, side, mesh);
            viewers.push(ViewerHandle::new(
                Box::new(backend),
                surface,
                450,
                300,
            ));
            logs.push(log);
        }
        let (notifier, messages) = RecordingNotifier::new();
        let session = CompareSession::new(
            viewers,
            SpeciesScale::default(),
            ViewerSettings::default(),
            Box::new(FillApi(fill)),
            Box::new(notifier),
        )
        .unwrap();
        (session, logs, messages)
    }

    fn settle(session: &mut CompareSession) {
        for _ in 0..200 {
            session.poll().unwrap();
            if !session.terms().is_empty() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("session did not settle");
    }

    #[test]
    fn double_click_flows_to_all_viewers_and_terms() {
        let (mut session, _logs, messages) = session_with(0.6);
        session
            .dispatch(ViewerEvent::DoubleClick {
                viewer: ViewerId(2),
                hit: Some(MeshHit { face: [4, 5, 6] }),
            })
            .unwrap();
        settle(&mut session);

        let seed = session.seed().unwrap();
        assert_eq!(seed.species, Species::Macaque);
        assert_eq!(seed.side, Side::Left);
        assert_eq!(seed.vertex, 4);
        assert_eq!(session.terms(), &["auditory".to_owned()]);
        for id in session.viewer_ids().collect::<Vec<_>>() {
            assert_eq!(
                session.viewer(id).unwrap().intensity(),
                &[0.6, 0.6, 0.6]
            );
        }
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn missed_double_click_reports_through_notifier() {
        let (mut session, _logs, messages) = session_with(0.6);
        session
            .dispatch(ViewerEvent::DoubleClick {
                viewer: ViewerId(0),
                hit: None,
            })
            .unwrap();
        assert_eq!(
            messages.borrow().as_slice(),
            &["No vertex selected.".to_owned()]
        );
        assert!(session.seed().is_none());
    }

    #[test]
    fn two_quick_taps_form_a_double_click() {
        let (mut session, _logs, _messages) = session_with(0.4);
        let event = ViewerEvent::TouchStart {
            viewer: ViewerId(0),
            hit: Some(MeshHit { face: [1, 2, 3] }),
        };
        session.dispatch(event).unwrap();
        assert!(session.seed().is_none());
        session.dispatch(event).unwrap();
        assert_eq!(session.seed().unwrap().vertex, 1);
    }

    #[test]
    fn camera_event_respects_lock_setting() {
        let (mut session, logs, _messages) = session_with(0.6);
        logs[1].borrow_mut().camera.position = Vec3::new(10.0, 0.0, 0.0);

        session.set_camera_lock(false);
        session
            .dispatch(ViewerEvent::CameraMoved { viewer: ViewerId(1) })
            .unwrap();
        assert_eq!(logs[0].borrow().camera.position, Vec3::ZERO);

        session.set_camera_lock(true);
        session
            .dispatch(ViewerEvent::CameraMoved { viewer: ViewerId(1) })
            .unwrap();
        // human_left is the opposite side of the human_right trigger.
        assert_eq!(
            logs[0].borrow().camera.position,
            Vec3::new(-10.0, 0.0, 0.0)
        );
        // macaque_right is the same side, scaled.
        assert_eq!(
            logs[3].borrow().camera.position,
            Vec3::new(4.5, 0.0, 0.0)
        );
    }

    #[test]
    fn slider_change_updates_settings_and_recolors() {
        let (mut session, logs, _messages) = session_with(0.6);
        let before: Vec<usize> =
            logs.iter().map(|l| l.borrow().color_updates).collect();

        session.set_color_limits([0.0, 5.0]).unwrap();
        assert_eq!(session.settings().color_limits, [0.0, 5.0]);
        for (log, before) in logs.iter().zip(before) {
            assert_eq!(log.borrow().color_updates, before + 1);
        }

        assert!(session.set_color_limits([5.0, 0.0]).is_err());
        assert_eq!(session.settings().color_limits, [0.0, 5.0]);
    }

    #[test]
    fn startup_rejects_scale_table_gaps() {
        let mut factors = FxHashMap::default();
        let _ = factors.insert(Species::Human, 1.0);
        let scale = SpeciesScale::new(factors).unwrap();

        let (backend, _log) = RecordingBackend::new();
        let mesh = SurfaceMesh {
            vertices: vec![0.0; 9],
            faces: vec![0, 1, 2],
        };
        let surface =
            Surface::new("test", Species::Macaque, Side::Left, mesh);
        let viewers =
            vec![ViewerHandle::new(Box::new(backend), surface, 450, 300)];
        let (notifier, _messages) = RecordingNotifier::new();

        assert!(matches!(
            CompareSession::new(
                viewers,
                scale,
                ViewerSettings::default(),
                Box::new(FillApi(0.0)),
                Box::new(notifier),
            ),
            Err(CrossviewError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn plot_all_frames_every_viewer() {
        let (mut session, logs, _messages) = session_with(0.6);
        session.plot_all().unwrap();
        for log in &logs {
            let log = log.borrow();
            assert_eq!(log.render_size, Some((450, 300)));
            assert_eq!(log.viewport_refreshes, 1);
            assert_ne!(log.camera.position, Vec3::ZERO);
        }
    }
}

//! Camera synchronization across viewers.
//!
//! Fires on every camera-control change from any one viewer. Because
//! each viewer's camera sits at a species-scaled, side-mirrored offset
//! (see [`ViewerHandle::reset_camera`](crate::viewer::ViewerHandle::reset_camera)),
//! follower positions are rescaled and mirrored rather than copied
//! verbatim. This is a one-directional broadcast: interleaved control
//! events from two viewers resolve last-write-wins per follower.

use glam::Vec3;

use crate::error::CrossviewError;
use crate::input::ViewerId;
use crate::scaling::{Side, Species, SpeciesScale};
use crate::settings::ViewerSettings;
use crate::viewer::ViewerHandle;

/// Propagates one viewer's live camera position to all others, applying
/// per-viewer scale and mirror corrections, gated by the global camera
/// lock.
pub struct CameraSyncController {
    scale: SpeciesScale,
}

impl CameraSyncController {
    /// Create a controller over the session's scale table.
    #[must_use]
    pub const fn new(scale: SpeciesScale) -> Self {
        Self { scale }
    }

    /// Where a follower's camera belongs, given the triggering viewer's
    /// position.
    ///
    /// The x axis carries the left/right mirror; y and z only rescale.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::UnknownSpecies`] when either species is missing
    /// from the scale table (prevented at startup by session validation).
    pub fn follower_position(
        &self,
        trigger_position: Vec3,
        trigger: (Species, Side),
        follower: (Species, Side),
    ) -> Result<Vec3, CrossviewError> {
        let scale = self.scale.relative_scale(follower.0, trigger.0)?;
        let mirror = follower.1.mirror_sign(trigger.1);
        Ok(Vec3::new(
            trigger_position.x * scale * mirror,
            trigger_position.y * scale,
            trigger_position.z * scale,
        ))
    }

    /// Rewrite every follower's camera from the triggering viewer's.
    ///
    /// No-op when the camera lock is off. The triggering viewer is
    /// excluded: it already reflects the user's live input. Writes are
    /// direct, no animation.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::UnknownSpecies`] on a scale-table gap; no
    /// follower is moved in that case.
    pub fn propagate(
        &self,
        viewers: &mut [ViewerHandle],
        trigger: ViewerId,
        settings: &ViewerSettings,
    ) -> Result<(), CrossviewError> {
        if !settings.camera_lock {
            return Ok(());
        }
        let Some(source) = viewers.get(trigger.0) else {
            return Ok(());
        };
        let position = source.camera_state().position;
        let from = (source.species(), source.side());

        // Resolve every follower position before moving anything, so a
        // lookup failure cannot leave the viewers half-synchronized.
        let mut moves = Vec::with_capacity(viewers.len());
        for (index, viewer) in viewers.iter().enumerate() {
            if index == trigger.0 {
                continue;
            }
            let to = (viewer.species(), viewer.side());
            moves.push((index, self.follower_position(position, from, to)?));
        }
        for (index, new_position) in moves {
            viewers[index].set_camera_position(new_position);
        }
        Ok(())
    }
}

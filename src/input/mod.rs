//! Typed viewer events and gesture timing.
//!
//! The host's rendering library reports raw gestures (double-click,
//! touch-start, camera-control changes) per viewer; they arrive here as
//! explicit [`ViewerEvent`] values and are routed through the session's
//! single dispatch function. Touch taps pass through the [`TapTracker`]
//! state machine, which promotes a second tap within 500 ms to a
//! double-click.

mod event;
mod tap;

pub use event::{MeshHit, ViewerEvent, ViewerId};
pub use tap::TapTracker;

//! Per-surface viewer handles.

mod handle;

pub use handle::{ViewerHandle, BASE_CAMERA_DISTANCE};

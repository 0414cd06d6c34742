// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Core logic for a cross-species brain-surface comparison viewer.
//!
//! Crossview drives a side-by-side comparison of human and macaque
//! cortical meshes: a double-click on any vertex seeds a cross-species
//! similarity query whose result recolors all four viewers, and a drag
//! on any viewer moves every camera in concert under species-scale and
//! hemisphere-mirror corrections.
//!
//! # Key entry points
//!
//! - [`session::CompareSession`] - the viewer arena and event router
//! - [`viewer::ViewerHandle`] - one renderable surface and its camera
//! - [`pipeline::SimilarityUpdatePipeline`] - click → fetch → recolor
//! - [`camera_sync::CameraSyncController`] - the camera-lock broadcast
//! - [`settings::ViewerSettings`] - shared runtime configuration
//!
//! # Architecture
//!
//! The host owns the render loop and the real rendering library; this
//! crate sees the renderer only through the [`backend::RenderBackend`]
//! seam and the data server only through [`api::FeatureApi`]. Raw
//! gestures arrive as typed [`input::ViewerEvent`] values, are routed by
//! the session, and the one asynchronous concern — the similarity and
//! term fetches — runs on a background query worker whose results the
//! host drains once per loop turn via [`session::CompareSession::poll`].

pub mod api;
pub mod backend;
pub mod camera_sync;
pub mod colormap;
pub mod error;
pub mod input;
pub mod notify;
pub mod pipeline;
pub mod scaling;
pub mod session;
pub mod settings;
pub mod surface;
pub mod viewer;

pub use api::{FeatureApi, Seed, SimilarityResponse};
pub use error::CrossviewError;
pub use input::{MeshHit, ViewerEvent, ViewerId};
pub use scaling::{Side, Species, SpeciesScale};
pub use session::CompareSession;
pub use settings::ViewerSettings;
pub use viewer::ViewerHandle;

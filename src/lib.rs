// src/lib.rs
//! Turntable
//!
//! Turns an imported 3D asset, or a pre-authored project, into a standardized
//! turntable product shot: subject/background classification, a rotation pivot,
//! adaptive camera and lighting, texture overrides and a single rotation track,
//! handed to an external renderer.

pub mod animation;
pub mod app;
pub mod classify;
pub mod config;
pub mod error;
pub mod gfx;
pub mod io;
pub mod prelude;
pub mod rig;
pub mod texturing;

// Re-export main types for convenience
pub use app::{PipelineReport, RenderRequest, SceneSummary, TurntableApp};
pub use error::TurntableError;

/// Creates a pipeline with the default configuration
pub fn default() -> TurntableApp {
    TurntableApp::default()
}

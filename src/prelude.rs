//! # Turntable Prelude
//!
//! Commonly used types in one import.
//!
//! ## Usage
//!
//! ```no_run
//! use turntable::prelude::*;
//!
//! fn main() -> Result<(), TurntableError> {
//!     let app = turntable::default();
//!     let mut scene = app.load(std::path::Path::new("card.glb"))?;
//!     let request = RenderRequest {
//!         output: "card.mp4".into(),
//!         ..RenderRequest::default()
//!     };
//!     let report = app.stage(&mut scene, &request)?;
//!     println!("{} frames", report.frames);
//!     Ok(())
//! }
//! ```

// Re-export core application types
pub use crate::app::{PipelineReport, RenderRequest, SceneSummary, TurntableApp};
pub use crate::config::{CliOptions, PipelineConfig};
pub use crate::default;
pub use crate::error::TurntableError;

// Pipeline stages
pub use crate::animation::{AnimationDetector, AnimationPlan, TurntableAnimator};
pub use crate::classify::{Classification, NamingConvention, ObjectClassifier, StudioConvention, TextureTarget};
pub use crate::rig::PivotRig;
pub use crate::texturing::{MaterialTextureResolver, TextureReport};

// Scene and graphics types
pub use crate::gfx::bounds::{BoundsComputer, SceneBounds};
pub use crate::gfx::camera::CameraPlanner;
pub use crate::gfx::lighting::LightingPlanner;
pub use crate::gfx::rendering::{CommandRenderer, RenderJob, Renderer};
pub use crate::gfx::scene::{ObjectId, Scene, SceneObject};
pub use crate::io::{Importer, ImporterRegistry};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};

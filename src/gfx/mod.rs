//! # Scene Graph and Staging
//!
//! The in-memory scene the pipeline edits, and the geometric stages that work
//! on it directly.
//!
//! ## Architecture Overview
//!
//! - **Scene** ([`scene`]) - Objects, hierarchy, keyframe tracks, frame settings
//! - **Resources** ([`resources`]) - Materials with shading graphs, decoded images
//! - **Bounds** ([`bounds`]) - World-space bounding boxes over object sets
//! - **Camera** ([`camera`]) - Camera payload and adaptive placement
//! - **Lighting** ([`lighting`]) - Light payloads and the 3-point rig
//! - **Geometry** ([`geometry`]) - Vertex data and procedural primitives
//! - **Rendering** ([`rendering`]) - The hand-off to an external renderer
//!
//! ## Usage
//!
//! ```no_run
//! use turntable::gfx::{bounds::BoundsComputer, scene::Scene};
//!
//! let scene = Scene::default();
//! let bounds = BoundsComputer::compute(&scene, &scene.mesh_ids());
//! println!("size {}", bounds.size());
//! ```

pub mod bounds;
pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use bounds::{BoundsComputer, SceneBounds};
pub use scene::Scene;

//! # Scene Management Module
//!
//! This module provides the in-memory scene graph every pipeline stage works on:
//! named objects with transforms and parent links, the material and image
//! libraries, frame settings and output settings.
//!
//! ## Key Components
//!
//! - [`Scene`] - The scene container, passed explicitly as `&mut Scene` to each stage
//! - [`SceneObject`] - A named node (mesh, camera, light or empty) with a local transform
//! - [`ObjectId`] - Copyable handle to an object owned by the scene
//! - [`AnimationData`] - Keyframe tracks on transform channels
//!
//! ## World transforms
//!
//! An object's world matrix is `parent_world * parent_inverse * local`. The
//! parent-inverse matrix is what lets [`Scene::set_parent_keep_transform`] move an
//! object under a new parent without moving it in world space.

pub mod animation;
pub mod object;
pub mod scene;

// Re-export main types
pub use animation::{AnimationData, AnimationTrack, Axis, Channel, Interpolation, Keyframe};
pub use object::{
    Constraint, MeshData, ObjectData, ObjectId, ObjectKind, SceneObject, TrackAxis, Transform,
    UpAxis,
};
pub use scene::{Scene, SceneOrigin, SceneStatistics};

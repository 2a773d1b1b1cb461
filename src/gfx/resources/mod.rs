//! Materials and image assets referenced by scene objects

pub mod material;
pub mod texture_resource;

pub use material::{
    Material, MaterialId, MaterialManager, NodeId, NodeLink, ShaderNode, ShaderNodeKind,
    ShadingGraph,
};
pub use texture_resource::{ImageAsset, ImageId, ImageLibrary};

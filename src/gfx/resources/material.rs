//! Material system with node-based shading graphs
//!
//! Provides material definitions and centralized management. Materials are stored
//! in MaterialManager and objects reference them by ID (the material name).
//!
//! Each material owns a small shading graph: named nodes exposing named input and
//! output sockets, plus links from an output socket to an input socket. The node
//! of interest for texturing is the principled surface node and its
//! [`BASE_COLOR`] input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::texture_resource::ImageId;

/// Material ID for referencing materials
pub type MaterialId = String;

/// Index of a node inside a [`ShadingGraph`]
pub type NodeId = usize;

/// Principled surface input driving the diffuse color
pub const BASE_COLOR: &str = "Base Color";
/// Image texture output carrying the sampled color
pub const COLOR: &str = "Color";
/// Material output input receiving the surface shader
pub const SURFACE: &str = "Surface";
/// Principled surface output
pub const BSDF: &str = "BSDF";

/// Node variants understood by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShaderNodeKind {
    PrincipledSurface,
    ImageTexture { image: Option<ImageId> },
    MaterialOutput,
    /// Any other node, kept verbatim by its type name
    Other(String),
}

/// A node in a shading graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderNode {
    pub name: String,
    pub kind: ShaderNodeKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Editor position, kept so renderers can lay the graph out
    pub location: [f32; 2],
}

impl ShaderNode {
    /// Principled surface node with the standard input set
    pub fn principled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ShaderNodeKind::PrincipledSurface,
            inputs: [BASE_COLOR, "Metallic", "Roughness", "Alpha", "Normal"]
                .map(String::from)
                .to_vec(),
            outputs: vec![BSDF.to_string()],
            location: [0.0, 0.0],
        }
    }

    pub fn image_texture(name: &str, location: [f32; 2]) -> Self {
        Self {
            name: name.to_string(),
            kind: ShaderNodeKind::ImageTexture { image: None },
            inputs: vec!["Vector".to_string()],
            outputs: vec![COLOR.to_string(), "Alpha".to_string()],
            location,
        }
    }

    pub fn material_output(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ShaderNodeKind::MaterialOutput,
            inputs: vec![SURFACE.to_string(), "Volume".to_string()],
            outputs: Vec::new(),
            location: [300.0, 0.0],
        }
    }

    pub fn has_input(&self, socket: &str) -> bool {
        self.inputs.iter().any(|input| input == socket)
    }

    pub fn has_output(&self, socket: &str) -> bool {
        self.outputs.iter().any(|output| output == socket)
    }

    pub fn is_principled(&self) -> bool {
        matches!(self.kind, ShaderNodeKind::PrincipledSurface)
    }

    pub fn is_image_texture(&self) -> bool {
        matches!(self.kind, ShaderNodeKind::ImageTexture { .. })
    }

    /// Sets the image of an image texture node; other nodes are left alone
    pub fn set_image(&mut self, image: ImageId) -> bool {
        match &mut self.kind {
            ShaderNodeKind::ImageTexture { image: slot } => {
                *slot = Some(image);
                true
            }
            _ => false,
        }
    }

    pub fn image(&self) -> Option<ImageId> {
        match self.kind {
            ShaderNodeKind::ImageTexture { image } => image,
            _ => None,
        }
    }
}

/// A link from one node's output socket to another node's input socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    pub from_node: NodeId,
    pub from_socket: String,
    pub to_node: NodeId,
    pub to_socket: String,
}

/// Nodes and links of one material
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShadingGraph {
    nodes: Vec<ShaderNode>,
    links: Vec<NodeLink>,
}

impl ShadingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Principled surface wired into a material output
    pub fn principled_default() -> Self {
        let mut graph = Self::new();
        let bsdf = graph.add_node(ShaderNode::principled("Principled BSDF"));
        let output = graph.add_node(ShaderNode::material_output("Material Output"));
        graph.link(bsdf, BSDF, output, SURFACE);
        graph
    }

    pub fn add_node(&mut self, node: ShaderNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Option<&ShaderNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ShaderNode> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> &[ShaderNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[NodeLink] {
        &self.links
    }

    /// First principled surface node, if any
    pub fn find_principled(&self) -> Option<NodeId> {
        self.nodes.iter().position(ShaderNode::is_principled)
    }

    /// The link feeding `socket` on `node`, if connected
    pub fn input_link(&self, node: NodeId, socket: &str) -> Option<&NodeLink> {
        self.links
            .iter()
            .find(|link| link.to_node == node && link.to_socket == socket)
    }

    /// Connects an output to an input. An input accepts a single link, so any
    /// link already feeding it is replaced.
    pub fn link(&mut self, from_node: NodeId, from_socket: &str, to_node: NodeId, to_socket: &str) {
        self.links
            .retain(|link| !(link.to_node == to_node && link.to_socket == to_socket));
        self.links.push(NodeLink {
            from_node,
            from_socket: from_socket.to_string(),
            to_node,
            to_socket: to_socket.to_string(),
        });
    }
}

/// Material definition with PBR properties and its shading graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub graph: ShadingGraph,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("Default", [0.8, 0.8, 0.8, 1.0], 0.0, 0.5)
    }
}

impl Material {
    /// Creates a new material with a principled surface graph
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            graph: ShadingGraph::principled_default(),
        }
    }

    /// Creates a material with a caller-supplied graph
    pub fn with_graph(name: &str, graph: ShadingGraph) -> Self {
        Self {
            graph,
            ..Self::new(name, [0.8, 0.8, 0.8, 1.0], 0.0, 0.5)
        }
    }
}

/// Manages all materials in a scene
///
/// Centralized storage for all materials. Objects reference materials by ID
/// rather than storing material data directly, so one material can be shared
/// by many objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Gets a material by ID
    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets a mutable material by ID
    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Creates a default material under a name not yet in use and returns its ID
    pub fn create_material(&mut self, desired_name: &str) -> MaterialId {
        let mut counter = 0;
        let mut name = desired_name.to_string();
        while self.materials.contains_key(&name) {
            counter += 1;
            name = format!("{}.{:03}", desired_name, counter);
        }

        self.materials.insert(
            name.clone(),
            Material::new(&name, [0.8, 0.8, 0.8, 1.0], 0.0, 0.5),
        );
        name
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }
}

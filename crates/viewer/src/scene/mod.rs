//! Scene graph of a loaded model
//!
//! Nodes, materials and geometries live in arenas and refer to each other by index.
//! Materials are shared by reference between mesh nodes until a node gets its own copy.

pub mod loader;
mod loading;

pub use loading::ModelLoader;

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use shared::ColorValue;
use uuid::Uuid;

/// Index of a node in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Index of a material in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Index of a geometry in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub usize);

/// Surface properties of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub color: ColorValue,
}

impl Material {
    pub fn new(name: impl Into<String>, color: ColorValue) -> Self {
        Self {
            name: Some(name.into()),
            color,
        }
    }

    /// Material without a name (glTF default material)
    pub fn unnamed(color: ColorValue) -> Self {
        Self { name: None, color }
    }
}

/// Triangle geometry in node-local space
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain transform node
    Group,
    /// Skeleton joint
    Bone,
    /// Renderable geometry with a material reference
    Mesh {
        geometry: Option<GeometryId>,
        material: Option<MaterialId>,
    },
}

/// A node of the scene graph with its local transform
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Node {
    fn new(name: String, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }
}

/// Placement of the whole model in the world.
/// Sits above the model root so clips never overwrite it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootPlacement {
    /// Uniform scale
    pub scale: f32,
    /// Rotation around the world Y axis (radians)
    pub rotation_y: f32,
}

impl Default for RootPlacement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_y: 0.0,
        }
    }
}

impl RootPlacement {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            Vec3::ZERO,
        )
    }
}

/// Scene graph of one model
#[derive(Debug, Clone)]
pub struct SceneGraph {
    id: Uuid,
    nodes: Vec<Node>,
    materials: Vec<Material>,
    geometries: Vec<Geometry>,
    pub placement: RootPlacement,
}

impl SceneGraph {
    /// Create a scene with a single root group
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: vec![Node::new(root_name.into(), NodeKind::Group, None)],
            materials: Vec::new(),
            geometries: Vec::new(),
            placement: RootPlacement::default(),
        }
    }

    /// Identity of this scene instance; differs for every loaded scene
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ── Construction ──────────────────────────────────────────

    /// Append a node under `parent`. Parents always precede their children.
    pub fn add_node(&mut self, parent: NodeId, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            tracing::warn!("Unknown parent node {}, attaching to root", parent.0);
            self.root()
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    // ── Lookup ────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    /// All geometries, indexable by [`GeometryId`]
    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// First node (depth-first) with exactly this name
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.depth_first().into_iter().find(|id| self.nodes[id.0].name == name)
    }

    /// Material referenced by a mesh node
    pub fn mesh_material_id(&self, id: NodeId) -> Option<MaterialId> {
        match self.node(id)?.kind {
            NodeKind::Mesh { material, .. } => material,
            NodeKind::Group | NodeKind::Bone => None,
        }
    }

    pub fn mesh_material(&self, id: NodeId) -> Option<&Material> {
        self.material(self.mesh_material_id(id)?)
    }

    /// Number of mesh nodes pointing at a material
    pub fn material_users(&self, id: MaterialId) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Mesh { material: Some(m), .. } if m == id))
            .count()
    }

    // ── Traversal ─────────────────────────────────────────────

    /// All nodes reachable from the root, depth-first, each exactly once
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Mesh nodes in depth-first order
    pub fn mesh_nodes(&self) -> Vec<NodeId> {
        self.depth_first()
            .into_iter()
            .filter(|id| self.nodes[id.0].is_mesh())
            .collect()
    }

    /// World matrices indexed by node index, including the root placement
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let placement = self.placement.matrix();
        let mut world: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let parent = node.parent.map(|p| world[p.0]).unwrap_or(placement);
            world.push(parent * node.local_matrix());
        }
        world
    }

    // ── Mutation ──────────────────────────────────────────────

    /// Copy a material into a new, unshared slot
    pub fn duplicate_material(&mut self, id: MaterialId) -> Option<MaterialId> {
        let copy = self.material(id)?.clone();
        Some(self.add_material(copy))
    }

    /// Put a material into an existing slot. Returns false for unknown ids.
    pub fn replace_material(&mut self, id: MaterialId, material: Material) -> bool {
        match self.materials.get_mut(id.0) {
            Some(slot) => {
                *slot = material;
                true
            }
            None => false,
        }
    }

    /// Point a mesh node at another material. Returns false for non-mesh nodes.
    pub fn assign_material(&mut self, node: NodeId, material: MaterialId) -> bool {
        if material.0 >= self.materials.len() {
            return false;
        }
        match self.nodes.get_mut(node.0).map(|n| &mut n.kind) {
            Some(NodeKind::Mesh { material: slot, .. }) => {
                *slot = Some(material);
                true
            }
            _ => false,
        }
    }

    /// Current Y rotation of the model root (radians)
    pub fn rotation_y(&self) -> f32 {
        self.placement.rotation_y
    }

    /// Spin the model root. The angle stays within one full turn.
    pub fn rotate_y(&mut self, delta: f32) {
        self.placement.rotation_y = (self.placement.rotation_y + delta).rem_euclid(TAU);
    }
}

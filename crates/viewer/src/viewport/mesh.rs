use glam::Mat4;

use crate::scene::{Geometry, GeometryId, NodeKind, SceneGraph};

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z]
#[derive(Clone)]
pub struct MeshData {
    /// 6 floats per vertex: position(3) + normal(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 6
    }

    /// Interleave a scene geometry. Missing normals default to +Y.
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let mut vertices = Vec::with_capacity(geometry.positions.len() * 6);
        for (i, p) in geometry.positions.iter().enumerate() {
            let n = geometry.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            vertices.extend_from_slice(&[p[0], p[1], p[2], n[0], n[1], n[2]]);
        }

        let vertex_count = geometry.positions.len() as u32;
        let indices = geometry
            .indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| i < vertex_count))
            .flatten()
            .copied()
            .collect();

        MeshData { vertices, indices }
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 7
    }
}

// ── Grid ─────────────────────────────────────────────────────

/// Ground grid in the XZ plane with highlighted center lines
pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let center_color = [0.4_f32, 0.4, 0.45, opacity];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 { center_color } else { grid_color };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.0, -extent, color);
        push_line_vert(&mut vertices, f, 0.0, extent, color);
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.0, f, color);
        push_line_vert(&mut vertices, extent, 0.0, f, color);
    }

    LineMeshData { vertices }
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

// ── Scene draw list ──────────────────────────────────────────

/// One mesh node to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryId,
    /// World matrix, root placement included
    pub model: Mat4,
    /// Material color, 0..1 per channel
    pub color: [f32; 3],
}

/// Color used for meshes that reference no material
pub const DEFAULT_MESH_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Draw items for every mesh node with geometry, in depth-first order
pub fn collect_draw_items(scene: &SceneGraph) -> Vec<DrawItem> {
    let world = scene.world_matrices();
    scene
        .mesh_nodes()
        .into_iter()
        .filter_map(|id| {
            let node = scene.node(id)?;
            let NodeKind::Mesh {
                geometry: Some(geometry),
                ..
            } = node.kind
            else {
                return None;
            };
            let color = scene
                .mesh_material(id)
                .map(|m| m.color.to_rgb_f32())
                .unwrap_or(DEFAULT_MESH_COLOR);
            Some(DrawItem {
                geometry,
                model: world[id.0],
                color,
            })
        })
        .collect()
}

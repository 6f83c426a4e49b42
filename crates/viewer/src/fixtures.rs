//! Factory functions for creating test data.
//!
//! Provides ready-made scene graphs, clips and models used in tests and by the
//! JSON command interface when no model file is available.

use glam::{Quat, Vec3};
use shared::ColorValue;

use crate::animation::{AnimationClip, Channel, Interpolation, Keyframes};
use crate::model::LoadedModel;
use crate::scene::{Geometry, Material, NodeId, NodeKind, SceneGraph};

/// Garment meshes in [`character_scene`] (`Object_9` and `Hat`)
pub const GARMENT_MESH_COUNT: usize = 2;

/// Original color of the fabric shared by `Object_9` and `Object_12`
pub const FABRIC_COLOR: ColorValue = ColorValue::rgb(200, 200, 200);

// ── Geometry ─────────────────────────────────────────────────

/// Single triangle in the XY plane
pub fn triangle_geometry() -> Geometry {
    Geometry {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        indices: vec![0, 1, 2],
    }
}

// ── Scene factories ──────────────────────────────────────────

/// Add a mesh node using a fresh triangle geometry
pub fn add_mesh(
    scene: &mut SceneGraph,
    parent: NodeId,
    name: &str,
    material: Option<Material>,
) -> NodeId {
    let geometry = scene.add_geometry(triangle_geometry());
    let material = material.map(|m| scene.add_material(m));
    scene.add_node(
        parent,
        name,
        NodeKind::Mesh {
            geometry: Some(geometry),
            material,
        },
    )
}

/// Scene with one mesh per `(mesh name, material name)` pair, all directly under the root.
pub fn scene_with_meshes(meshes: &[(&str, Option<&str>)]) -> SceneGraph {
    let mut scene = SceneGraph::new("Scene");
    let root = scene.root();
    for (name, material) in meshes {
        let material = material.map(|m| Material::new(m, ColorValue::WHITE));
        add_mesh(&mut scene, root, name, material);
    }
    scene
}

/// A small character rig:
///
/// ```text
/// Scene
/// └── Sketchfab_model
///     ├── Armature
///     │   └── Hips (bone)
///     │       └── Spine (bone)
///     ├── Object_9       Fabric (shared)       garment by mesh name
///     ├── Object_12      Fabric (shared)
///     ├── Hat            PeopleColors_Skin     garment by material name
///     ├── Belt           Metal
///     └── Object_9_trim  no material
/// ```
pub fn character_scene() -> SceneGraph {
    let mut scene = SceneGraph::new("Scene");
    let model = scene.add_node(scene.root(), "Sketchfab_model", NodeKind::Group);

    let armature = scene.add_node(model, "Armature", NodeKind::Group);
    let hips = scene.add_node(armature, "Hips", NodeKind::Bone);
    scene.add_node(hips, "Spine", NodeKind::Bone);

    let fabric = scene.add_material(Material::new("Fabric", FABRIC_COLOR));
    for name in ["Object_9", "Object_12"] {
        let geometry = scene.add_geometry(triangle_geometry());
        scene.add_node(
            model,
            name,
            NodeKind::Mesh {
                geometry: Some(geometry),
                material: Some(fabric),
            },
        );
    }

    let hat = add_mesh(
        &mut scene,
        model,
        "Hat",
        Some(Material::new("PeopleColors_Skin", ColorValue::rgb(240, 200, 170))),
    );
    if let Some(node) = scene.node_mut(hat) {
        node.translation = Vec3::new(0.0, 1.7, 0.0);
    }
    add_mesh(
        &mut scene,
        model,
        "Belt",
        Some(Material::new("Metal", ColorValue::rgb(90, 90, 90))),
    );
    add_mesh(&mut scene, model, "Object_9_trim", None);

    scene
}

// ── Clip factories ───────────────────────────────────────────

/// One-second sway of `target` around Y
pub fn idle_clip(target: NodeId) -> AnimationClip {
    AnimationClip::new(
        "Idle",
        vec![Channel {
            target,
            times: vec![0.0, 0.5, 1.0],
            keyframes: Keyframes::Rotations(vec![
                Quat::IDENTITY,
                Quat::from_rotation_y(0.3),
                Quat::IDENTITY,
            ]),
            interpolation: Interpolation::Linear,
        }],
    )
}

/// Two-second bob of `target` along Y
pub fn wave_clip(target: NodeId) -> AnimationClip {
    AnimationClip::new(
        "Wave",
        vec![Channel {
            target,
            times: vec![0.0, 1.0, 2.0],
            keyframes: Keyframes::Translations(vec![
                Vec3::ZERO,
                Vec3::new(0.0, 0.2, 0.0),
                Vec3::ZERO,
            ]),
            interpolation: Interpolation::Linear,
        }],
    )
}

// ── Models ───────────────────────────────────────────────────

/// [`character_scene`] with `Idle` (first) and `Wave` clips
pub fn character_model() -> LoadedModel {
    let scene = character_scene();
    let hips = scene.find_node("Hips").unwrap_or(scene.root());
    let spine = scene.find_node("Spine").unwrap_or(scene.root());
    let clips = vec![idle_clip(hips), wave_clip(spine)];
    LoadedModel::new(scene, clips)
}

/// [`character_scene`] with an empty clip set
pub fn character_model_without_clips() -> LoadedModel {
    LoadedModel::new(character_scene(), Vec::new())
}

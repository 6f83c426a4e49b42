//! glTF / GLB import into a [`SceneGraph`] plus animation clips

use std::collections::{HashMap, HashSet};
use std::path::Path;

use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use shared::ColorValue;

use super::{Geometry, GeometryId, Material, MaterialId, NodeId, NodeKind, SceneGraph};
use crate::animation::{AnimationClip, Channel, Interpolation, Keyframes};
use crate::model::LoadedModel;

/// Load a `.gltf` or `.glb` file
pub fn load_path(path: &Path) -> Result<LoadedModel, String> {
    let (doc, buffers, _images) =
        gltf::import(path).map_err(|e| format!("Failed to import {}: {e}", path.display()))?;
    let mut model = build_model(&doc, &buffers)?;
    model.source = Some(path.to_path_buf());
    tracing::info!(
        "Loaded {} ({} nodes, {} meshes, {} clips)",
        path.display(),
        model.scene.node_count(),
        model.scene.mesh_nodes().len(),
        model.mixer.clips().len()
    );
    Ok(model)
}

/// Load a glTF document held in memory (buffers must be embedded)
pub fn load_slice(bytes: &[u8]) -> Result<LoadedModel, String> {
    let (doc, buffers, _images) =
        gltf::import_slice(bytes).map_err(|e| format!("Failed to import glTF data: {e}"))?;
    build_model(&doc, &buffers)
}

fn build_model(
    doc: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<LoadedModel, String> {
    let gltf_scene = doc
        .default_scene()
        .or_else(|| doc.scenes().next())
        .ok_or_else(|| "glTF document has no scene".to_string())?;

    let mut joints = HashSet::new();
    for skin in doc.skins() {
        for joint in skin.joints() {
            joints.insert(joint.index());
        }
    }

    let mut builder = SceneBuilder {
        scene: SceneGraph::new(gltf_scene.name().unwrap_or("Scene")),
        buffers,
        joints,
        nodes: HashMap::new(),
        materials: HashMap::new(),
    };
    let root = builder.scene.root();
    for node in gltf_scene.nodes() {
        builder.add_node(root, &node);
    }

    let clips = doc
        .animations()
        .map(|anim| convert_animation(&anim, buffers, &builder.nodes))
        .collect();

    Ok(LoadedModel::new(builder.scene, clips))
}

struct SceneBuilder<'a> {
    scene: SceneGraph,
    buffers: &'a [gltf::buffer::Data],
    /// glTF node indices used as skin joints
    joints: HashSet<usize>,
    /// glTF node index → scene node
    nodes: HashMap<usize, NodeId>,
    /// glTF material index (None = default material) → scene material
    materials: HashMap<Option<usize>, MaterialId>,
}

impl SceneBuilder<'_> {
    fn add_node(&mut self, parent: NodeId, node: &gltf::Node) {
        let name = node
            .name()
            .or_else(|| node.mesh().and_then(|m| m.name()))
            .unwrap_or_default()
            .to_string();

        let id = match node.mesh() {
            Some(mesh) => self.add_mesh(parent, name, &mesh),
            None if self.joints.contains(&node.index()) => {
                self.scene.add_node(parent, name, NodeKind::Bone)
            }
            None => self.scene.add_node(parent, name, NodeKind::Group),
        };

        let (translation, rotation, scale) = node.transform().decomposed();
        if let Some(n) = self.scene.node_mut(id) {
            n.translation = Vec3::from(translation);
            n.rotation = Quat::from_array(rotation).normalize();
            n.scale = Vec3::from(scale);
        }
        self.nodes.insert(node.index(), id);

        for child in node.children() {
            self.add_node(id, &child);
        }
    }

    /// A single-primitive mesh becomes one mesh node; otherwise a group of mesh nodes.
    fn add_mesh(&mut self, parent: NodeId, name: String, mesh: &gltf::Mesh) -> NodeId {
        let primitives: Vec<gltf::Primitive> = mesh
            .primitives()
            .filter(|p| p.mode() == gltf::mesh::Mode::Triangles)
            .collect();

        if let [primitive] = primitives.as_slice() {
            let kind = self.convert_primitive(primitive);
            return self.scene.add_node(parent, name, kind);
        }

        let group = self.scene.add_node(parent, name.clone(), NodeKind::Group);
        for (i, primitive) in primitives.iter().enumerate() {
            let kind = self.convert_primitive(primitive);
            self.scene.add_node(group, format!("{name}_{i}"), kind);
        }
        group
    }

    fn convert_primitive(&mut self, primitive: &gltf::Primitive) -> NodeKind {
        NodeKind::Mesh {
            geometry: self.convert_geometry(primitive),
            material: Some(self.convert_material(&primitive.material())),
        }
    }

    fn convert_geometry(&mut self, primitive: &gltf::Primitive) -> Option<GeometryId> {
        let buffers = self.buffers;
        let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));

        let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
        if positions.is_empty() {
            return None;
        }
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let normals = reader
            .read_normals()
            .map(|it| it.collect::<Vec<_>>())
            .filter(|n| n.len() == positions.len())
            .unwrap_or_else(|| compute_normals(&positions, &indices));

        Some(self.scene.add_geometry(Geometry {
            positions,
            normals,
            indices,
        }))
    }

    fn convert_material(&mut self, material: &gltf::Material) -> MaterialId {
        let key = material.index();
        if let Some(&id) = self.materials.get(&key) {
            return id;
        }
        let [r, g, b, _a] = material.pbr_metallic_roughness().base_color_factor();
        let id = self.scene.add_material(Material {
            name: material.name().filter(|n| !n.is_empty()).map(str::to_string),
            color: ColorValue::from_linear_f32([r, g, b]),
        });
        self.materials.insert(key, id);
        id
    }
}

/// Smooth per-vertex normals from triangle faces
fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from(positions[a]);
        let face = (Vec3::from(positions[b]) - pa).cross(Vec3::from(positions[c]) - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

fn convert_animation(
    anim: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    nodes: &HashMap<usize, NodeId>,
) -> AnimationClip {
    let mut channels = Vec::new();
    for channel in anim.channels() {
        let Some(&target) = nodes.get(&channel.target().node().index()) else {
            continue;
        };
        let reader = channel.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        let Some(outputs) = reader.read_outputs() else {
            continue;
        };

        let keyframes = match outputs {
            ReadOutputs::Translations(it) => Keyframes::Translations(it.map(Vec3::from).collect()),
            ReadOutputs::Rotations(it) => Keyframes::Rotations(
                it.into_f32().map(|q| Quat::from_array(q).normalize()).collect(),
            ),
            ReadOutputs::Scales(it) => Keyframes::Scales(it.map(Vec3::from).collect()),
            ReadOutputs::MorphTargetWeights(_) => continue,
        };

        let (keyframes, interpolation) = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => (keyframes, Interpolation::Step),
            gltf::animation::Interpolation::Linear => (keyframes, Interpolation::Linear),
            // Keep the value of each (in-tangent, value, out-tangent) triple
            gltf::animation::Interpolation::CubicSpline => {
                (spline_values(keyframes), Interpolation::Linear)
            }
        };

        channels.push(Channel {
            target,
            times,
            keyframes,
            interpolation,
        });
    }

    let name = anim
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Animation {}", anim.index()));
    AnimationClip::new(name, channels)
}

fn spline_values(keyframes: Keyframes) -> Keyframes {
    fn middle<T: Copy>(values: Vec<T>) -> Vec<T> {
        values.chunks_exact(3).map(|triple| triple[1]).collect()
    }
    match keyframes {
        Keyframes::Translations(v) => Keyframes::Translations(middle(v)),
        Keyframes::Rotations(v) => Keyframes::Rotations(middle(v)),
        Keyframes::Scales(v) => Keyframes::Scales(middle(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ClipPlayer;

    const RIGGED_CHARACTER: &[u8] = include_bytes!("../../tests/data/rigged_character.gltf");

    #[test]
    fn test_load_embedded_hierarchy() {
        let model = load_slice(RIGGED_CHARACTER).unwrap();
        let scene = &model.scene;

        assert_eq!(scene.node(scene.root()).unwrap().name, "Character");
        let hips = scene.find_node("Hips").unwrap();
        assert_eq!(scene.node(hips).unwrap().kind, NodeKind::Bone);
        assert_eq!(scene.node(hips).unwrap().translation, Vec3::new(0.0, 1.0, 0.0));

        let armature = scene.find_node("Armature").unwrap();
        assert_eq!(scene.node(armature).unwrap().kind, NodeKind::Group);
    }

    #[test]
    fn test_multi_primitive_mesh_is_split() {
        let model = load_slice(RIGGED_CHARACTER).unwrap();
        let scene = &model.scene;

        let hat = scene.find_node("Hat").unwrap();
        assert_eq!(scene.node(hat).unwrap().kind, NodeKind::Group);
        assert_eq!(scene.node(hat).unwrap().children.len(), 2);

        let names: Vec<&str> = scene
            .mesh_nodes()
            .into_iter()
            .map(|id| scene.node(id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["Object_9", "Hat_0", "Hat_1"]);
    }

    #[test]
    fn test_materials_shared_by_index() {
        let model = load_slice(RIGGED_CHARACTER).unwrap();
        let scene = &model.scene;

        let dress = scene.mesh_material(scene.find_node("Object_9").unwrap()).unwrap();
        assert_eq!(dress.name.as_deref(), Some("PeopleColors_Dress"));
        assert_eq!(dress.color, ColorValue::WHITE);

        let metal = scene.mesh_material(scene.find_node("Hat_0").unwrap()).unwrap();
        assert_eq!(metal.name.as_deref(), Some("Metal"));
        assert_eq!(metal.color, ColorValue::BLACK);

        let default = scene.mesh_material(scene.find_node("Hat_1").unwrap()).unwrap();
        assert_eq!(default.name, None);
        assert_eq!(scene.material_count(), 3);
    }

    #[test]
    fn test_geometry_normals_and_indices() {
        let model = load_slice(RIGGED_CHARACTER).unwrap();
        let scene = &model.scene;
        let node = scene.node(scene.find_node("Hat_1").unwrap()).unwrap();
        let NodeKind::Mesh {
            geometry: Some(geometry),
            ..
        } = node.kind
        else {
            panic!("Expected mesh with geometry");
        };
        let geometry = scene.geometry(geometry).unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2]);
        assert_eq!(geometry.triangle_count(), 1);
        // Triangle lies in the XY plane, counter-clockwise
        for n in &geometry.normals {
            assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_animation_clip_converted() {
        let mut model = load_slice(RIGGED_CHARACTER).unwrap();
        assert_eq!(model.mixer.clip_count(), 1);
        assert_eq!(model.driven_clip(), Some("Idle"));
        assert_eq!(model.mixer.clips()[0].duration, 1.0);

        let hips = model.scene.find_node("Hips").unwrap();
        model.mixer.play(0);
        model.advance(0.5);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(model.scene.node(hips).unwrap().rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_load_garbage_fails() {
        assert!(load_slice(b"definitely not gltf").is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_path(Path::new("/nonexistent/model.glb")).err().unwrap();
        assert!(err.contains("/nonexistent/model.glb"));
    }

    #[test]
    fn test_compute_normals_skips_bad_indices() {
        let normals = compute_normals(&[[0.0, 0.0, 0.0]], &[0, 5, 6]);
        assert_eq!(normals, vec![[0.0, 1.0, 0.0]]);
    }
}

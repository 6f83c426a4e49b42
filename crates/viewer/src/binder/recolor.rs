//! Garment re-coloring

use shared::{ColorValue, GARMENT_MATERIAL_MARKER, GARMENT_MESH_MARKER};

use crate::scene::SceneGraph;

/// Whether a mesh belongs to the customizable garment group
pub fn is_garment(mesh_name: &str, material_name: Option<&str>) -> bool {
    mesh_name.to_lowercase().contains(GARMENT_MESH_MARKER)
        || material_name
            .map(|name| name.to_lowercase().contains(GARMENT_MATERIAL_MARKER))
            .unwrap_or(false)
}

/// Give every garment mesh its own copy of its material, colored `color`.
///
/// Visits each mesh node once. Meshes without a material are skipped.
/// A shared material gets a new slot for the copy; an unshared one is
/// overwritten in place, so repeated re-coloring does not grow the scene.
/// Returns the number of meshes patched.
pub fn recolor_garment(scene: &mut SceneGraph, color: ColorValue) -> usize {
    let mut patched = 0;

    for node_id in scene.mesh_nodes() {
        let Some(material_id) = scene.mesh_material_id(node_id) else {
            continue;
        };
        let Some(node) = scene.node(node_id) else {
            continue;
        };
        let material_name = scene.material(material_id).and_then(|m| m.name.as_deref());
        if !is_garment(&node.name, material_name) {
            continue;
        }

        if scene.material_users(material_id) == 1 {
            // Nothing else sees the old material, its slot takes the copy
            let Some(mut copy) = scene.material(material_id).cloned() else {
                continue;
            };
            copy.color = color;
            scene.replace_material(material_id, copy);
        } else {
            let Some(copy) = scene.duplicate_material(material_id) else {
                continue;
            };
            if let Some(material) = scene.material_mut(copy) {
                material.color = color;
            }
            scene.assign_material(node_id, copy);
        }
        patched += 1;
    }

    if patched == 0 {
        tracing::debug!("No garment meshes to color");
    } else {
        tracing::info!("Colored {patched} garment mesh(es) {color}");
    }
    patched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, NodeKind};

    #[test]
    fn test_mesh_name_marker() {
        assert!(is_garment("Object_9_body", Some("Anything")));
        assert!(is_garment("Object_9_body", None));
        assert!(is_garment("OBJECT_9", Some("Metal")));
        assert!(!is_garment("Object_8", None));
    }

    #[test]
    fn test_material_name_marker() {
        assert!(is_garment("hat", Some("PeopleColors_Skin")));
        assert!(is_garment("hat", Some("mat_peoplecolors")));
        assert!(!is_garment("hat", Some("Metal")));
        assert!(!is_garment("hat", None));
    }

    #[test]
    fn test_no_match_is_noop() {
        let mut scene = SceneGraph::new("Scene");
        let mat = scene.add_material(Material::new("Metal", ColorValue::WHITE));
        scene.add_node(
            scene.root(),
            "Belt",
            NodeKind::Mesh {
                geometry: None,
                material: Some(mat),
            },
        );
        assert_eq!(recolor_garment(&mut scene, ColorValue::rgb(255, 0, 0)), 0);
        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.material(mat).unwrap().color, ColorValue::WHITE);
    }

    #[test]
    fn test_mesh_without_material_is_skipped() {
        let mut scene = SceneGraph::new("Scene");
        let bare = scene.add_node(
            scene.root(),
            "Object_9",
            NodeKind::Mesh {
                geometry: None,
                material: None,
            },
        );
        assert_eq!(recolor_garment(&mut scene, ColorValue::BLACK), 0);
        assert_eq!(scene.mesh_material_id(bare), None);
    }

    #[test]
    fn test_shared_material_is_not_mutated() {
        let mut scene = SceneGraph::new("Scene");
        let shared = scene.add_material(Material::new("Fabric", ColorValue::WHITE));
        let dress = scene.add_node(
            scene.root(),
            "Object_9",
            NodeKind::Mesh {
                geometry: None,
                material: Some(shared),
            },
        );
        let sleeve = scene.add_node(
            scene.root(),
            "Sleeve",
            NodeKind::Mesh {
                geometry: None,
                material: Some(shared),
            },
        );

        let red = ColorValue::rgb(255, 0, 0);
        assert_eq!(recolor_garment(&mut scene, red), 1);

        assert_eq!(scene.mesh_material(dress).unwrap().color, red);
        assert_eq!(scene.mesh_material(dress).unwrap().name.as_deref(), Some("Fabric"));
        assert_eq!(scene.mesh_material_id(sleeve), Some(shared));
        assert_eq!(scene.material(shared).unwrap().color, ColorValue::WHITE);
    }

    #[test]
    fn test_repeated_recolor_reuses_slots() {
        let mut scene = SceneGraph::new("Scene");
        let shared = scene.add_material(Material::new("Fabric", ColorValue::WHITE));
        let skin = scene.add_material(Material::new("PeopleColors_Skin", ColorValue::WHITE));
        let dress = scene.add_node(
            scene.root(),
            "Object_9",
            NodeKind::Mesh {
                geometry: None,
                material: Some(shared),
            },
        );
        scene.add_node(
            scene.root(),
            "Sleeve",
            NodeKind::Mesh {
                geometry: None,
                material: Some(shared),
            },
        );
        let hat = scene.add_node(
            scene.root(),
            "Hat",
            NodeKind::Mesh {
                geometry: None,
                material: Some(skin),
            },
        );

        recolor_garment(&mut scene, ColorValue::BLACK);
        assert_eq!(scene.material_count(), 3);
        assert_eq!(scene.mesh_material_id(hat), Some(skin));
        let dress_material = scene.mesh_material_id(dress);

        for i in 0..1000u32 {
            let color = ColorValue::rgb((i % 256) as u8, (i / 256) as u8, 7);
            assert_eq!(recolor_garment(&mut scene, color), 2);
            assert_eq!(scene.mesh_material(dress).unwrap().color, color);
            assert_eq!(scene.mesh_material(hat).unwrap().color, color);
        }
        assert_eq!(scene.material_count(), 3);
        assert_eq!(scene.mesh_material_id(dress), dress_material);
        assert_eq!(scene.material(shared).unwrap().color, ColorValue::WHITE);
    }
}

//! Integration tests for TestHarness.
//!
//! Drives the viewer headlessly: color commits, garment selection and the
//! animate / rotate mode machine.

use model_viewer_lib::binder::recolor_garment;
use model_viewer_lib::fixtures::*;
use model_viewer_lib::harness::TestHarness;
use shared::{ColorValue, PlaybackMode, ROTATION_STEP};

const RED: ColorValue = ColorValue::rgb(255, 0, 0);

fn assert_rotation(h: &TestHarness, expected: f32) {
    let actual = h.rotation_y();
    assert!(
        (actual - expected).abs() < 1e-4,
        "rotation {actual} != {expected}"
    );
}

// ── Commit isolation ─────────────────────────────────────────

#[test]
fn test_edits_never_reach_committed_color() {
    let mut h = TestHarness::new();
    for hex in ["#ff0000", "#00ff00", "#123456", "#000000"] {
        h.edit_color_str(hex).unwrap();
        assert_eq!(h.committed_color(), ColorValue::WHITE);
        assert_eq!(h.mesh_color("Object_9"), Some(ColorValue::WHITE));
    }

    h.apply_color();
    assert_eq!(h.committed_color(), ColorValue::BLACK);
    assert_eq!(h.committed_color(), h.pending_color());
}

#[test]
fn test_apply_takes_pending_at_call_time() {
    let mut h = TestHarness::new();
    h.edit_color(RED);
    h.apply_color();
    h.edit_color(ColorValue::rgb(0, 0, 255));

    assert_eq!(h.committed_color(), RED);
    assert_eq!(h.mesh_color("Object_9"), Some(RED));
}

// ── Re-color idempotence ─────────────────────────────────────

#[test]
fn test_recolor_twice_gives_same_colors() {
    let mut model = character_model();
    recolor_garment(&mut model.scene, RED);
    let first: Vec<_> = ["Object_9", "Hat", "Object_12", "Belt"]
        .iter()
        .map(|n| {
            let id = model.scene.find_node(n).unwrap();
            model.scene.mesh_material(id).unwrap().color
        })
        .collect();

    recolor_garment(&mut model.scene, RED);
    let second: Vec<_> = ["Object_9", "Hat", "Object_12", "Belt"]
        .iter()
        .map(|n| {
            let id = model.scene.find_node(n).unwrap();
            model.scene.mesh_material(id).unwrap().color
        })
        .collect();

    assert_eq!(first, second);
    assert_eq!(first, vec![RED, RED, FABRIC_COLOR, ColorValue::rgb(90, 90, 90)]);
}

#[test]
fn test_reapplying_same_color_does_not_duplicate() {
    let mut h = TestHarness::new();
    h.edit_color(RED);
    assert_eq!(h.apply_color().recolored, Some(GARMENT_MESH_COUNT));
    let materials = h.material_count();

    assert_eq!(h.apply_color().recolored, None);
    assert_eq!(h.material_count(), materials);
    assert_eq!(h.mesh_color("Hat"), Some(RED));
}

#[test]
fn test_many_applies_keep_material_count_bounded() {
    let mut h = TestHarness::new();
    h.edit_color(RED);
    h.apply_color();
    let materials = h.material_count();

    for i in 0..1000u32 {
        let color = ColorValue::rgb((i % 256) as u8, (i / 256) as u8, 200);
        h.edit_color(color);
        assert_eq!(h.apply_color().recolored, Some(GARMENT_MESH_COUNT));
        assert_eq!(h.mesh_color("Hat"), Some(color));
    }
    assert_eq!(h.material_count(), materials);
    assert_eq!(h.mesh_color("Object_12"), Some(FABRIC_COLOR));
}

#[test]
fn test_shared_material_is_not_leaked() {
    let mut h = TestHarness::new();
    h.edit_color(RED);
    h.apply_color();

    // Object_12 shares Object_9's original material
    assert_eq!(h.mesh_color("Object_9"), Some(RED));
    assert_eq!(h.mesh_color("Object_12"), Some(FABRIC_COLOR));
}

// ── Selection rule ───────────────────────────────────────────

#[test]
fn test_selection_rule() {
    let mut scene = scene_with_meshes(&[
        ("Object_9_body", Some("Anything")),
        ("hat", Some("PeopleColors_Skin")),
        ("hat_metal", Some("Metal")),
        ("OBJECT_9", None),
    ]);
    let patched = recolor_garment(&mut scene, RED);
    assert_eq!(patched, 2);

    let color = |name: &str| {
        let id = scene.find_node(name).unwrap();
        scene.mesh_material(id).map(|m| m.color)
    };
    assert_eq!(color("Object_9_body"), Some(RED));
    assert_eq!(color("hat"), Some(RED));
    assert_eq!(color("hat_metal"), Some(ColorValue::WHITE));
    assert_eq!(color("OBJECT_9"), None);
}

#[test]
fn test_no_garment_is_silent() {
    let mut h = TestHarness::unloaded();
    h.load(model_viewer_lib::model::LoadedModel::new(
        scene_with_meshes(&[("Body", Some("Skin"))]),
        Vec::new(),
    ));
    h.edit_color(RED);
    assert_eq!(h.apply_color().recolored, Some(0));
    assert_eq!(h.mesh_color("Body"), Some(ColorValue::WHITE));
}

// ── Mode machine ─────────────────────────────────────────────

#[test]
fn test_modes_are_mutually_exclusive() {
    let mut h = TestHarness::new();
    let intents = [true, true, false, true, false, false, true];
    for rotate in intents {
        if rotate {
            h.enable_rotation();
        } else {
            h.disable_rotation();
        }
        let rotating = h.mode() == Some(PlaybackMode::Rotating);
        assert_eq!(rotating, rotate);
        assert_ne!(rotating, h.clip_playing());
    }
}

#[test]
fn test_ticks_while_animating_do_not_rotate() {
    let mut h = TestHarness::new();
    assert_eq!(h.tick(500), 0);
    assert_rotation(&h, 0.0);
}

#[test]
fn test_ticks_while_rotating_accumulate() {
    let mut h = TestHarness::new();
    h.enable_rotation();
    assert_eq!(h.tick(250), 250);
    assert_rotation(&h, 250.0 * ROTATION_STEP);

    // Rotation is kept, not reset, when animation resumes
    h.disable_rotation();
    h.tick(10);
    assert_rotation(&h, 250.0 * ROTATION_STEP);

    h.enable_rotation();
    h.tick(5);
    assert_rotation(&h, 255.0 * ROTATION_STEP);
}

#[test]
fn test_rotation_survives_long_sessions() {
    let mut h = TestHarness::unloaded();
    let mut model = character_model();
    model.scene.placement.rotation_y = 262_144.0;
    h.load(model);
    h.enable_rotation();

    h.tick(1);
    let start = h.rotation_y();
    assert_eq!(h.tick(100), 100);
    let advanced = (h.rotation_y() - start).rem_euclid(std::f32::consts::TAU);
    assert!((advanced - 100.0 * ROTATION_STEP).abs() < 1e-3, "advanced {advanced}");
}

#[test]
fn test_rotation_starts_from_rest_pose() {
    let mut h = TestHarness::new();
    h.advance(0.37);
    let hips_rotation = |h: &TestHarness| {
        let scene = &h.controller.model().unwrap().scene;
        scene.node(scene.find_node("Hips").unwrap()).unwrap().rotation
    };
    assert_ne!(hips_rotation(&h), glam::Quat::IDENTITY);

    h.enable_rotation();
    assert_eq!(hips_rotation(&h), glam::Quat::IDENTITY);
}

#[test]
fn test_resume_restarts_clip_from_zero() {
    let mut h = TestHarness::new();
    h.advance(0.4);
    h.enable_rotation();
    h.disable_rotation();

    let model = h.controller.model().unwrap();
    assert_eq!(model.mixer.time(0), Some(0.0));
    assert!(h.clip_playing());
}

#[test]
fn test_model_without_clips_still_rotates() {
    let mut h = TestHarness::unloaded();
    h.load(character_model_without_clips());
    assert!(!h.clip_playing());
    h.enable_rotation();
    assert_eq!(h.tick(3), 3);
    h.disable_rotation();
    assert_eq!(h.tick(3), 0);
}

// ── Loading and lifecycle ────────────────────────────────────

#[test]
fn test_intents_before_load_apply_on_load() {
    let mut h = TestHarness::unloaded();
    h.edit_color(RED);
    h.apply_color();
    h.enable_rotation();
    assert_eq!(h.tick(3), 0);

    let outcome = h.load(character_model());
    assert_eq!(outcome.recolored, Some(GARMENT_MESH_COUNT));
    assert_eq!(outcome.transition, Some(PlaybackMode::Rotating));
    assert_eq!(h.mesh_color("Object_9"), Some(RED));
    assert!(!h.clip_playing());
}

#[test]
fn test_new_model_gets_current_color_and_mode() {
    let mut h = TestHarness::new();
    h.edit_color(RED);
    h.apply_color();
    h.enable_rotation();
    h.tick(7);

    h.load(character_model());
    assert_eq!(h.mesh_color("Hat"), Some(RED));
    assert_eq!(h.mode(), Some(PlaybackMode::Rotating));
    assert_rotation(&h, 0.0);
    h.tick(1);
    assert_rotation(&h, ROTATION_STEP);
}

#[test]
fn test_unmount_stops_everything() {
    let mut h = TestHarness::new();
    h.enable_rotation();
    assert!(h.unmount().is_some());

    assert_eq!(h.tick(10), 0);
    h.edit_color(RED);
    assert!(h.apply_color().is_empty());
    assert_eq!(h.snapshot().mode, None);
    assert!(!h.snapshot().model_loaded);
}

// ── End to end ───────────────────────────────────────────────

#[test]
fn test_customize_scenario() {
    let mut h = TestHarness::new();
    assert_eq!(h.pending_color(), ColorValue::WHITE);
    assert_eq!(h.committed_color(), ColorValue::WHITE);
    assert!(h.clip_playing());
    assert_rotation(&h, 0.0);

    h.edit_color_str("#ff0000").unwrap();
    assert_eq!(h.committed_color(), ColorValue::WHITE);
    assert_ne!(h.mesh_color("Object_9"), Some(RED));

    h.apply_color();
    assert_eq!(h.mesh_color("Object_9"), Some(RED));
    assert_eq!(h.mesh_color("Hat"), Some(RED));
    assert_eq!(h.mesh_color("Belt"), Some(ColorValue::rgb(90, 90, 90)));

    h.enable_rotation();
    assert!(!h.clip_playing());
    h.tick(1);
    assert_rotation(&h, ROTATION_STEP);

    h.disable_rotation();
    assert!(h.clip_playing());
    h.tick(20);
    assert_rotation(&h, ROTATION_STEP);
}

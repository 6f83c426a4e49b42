//! Keyframe animation clips targeting scene nodes

mod mixer;

pub use mixer::{AnimationMixer, ClipPlayer};

use glam::{Quat, Vec3};

use crate::scene::{NodeId, SceneGraph};

/// How values between two keys are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
}

/// Keyed values of one animated property
#[derive(Debug, Clone)]
pub enum Keyframes {
    Translations(Vec<Vec3>),
    Rotations(Vec<Quat>),
    Scales(Vec<Vec3>),
}

impl Keyframes {
    pub fn len(&self) -> usize {
        match self {
            Keyframes::Translations(v) | Keyframes::Scales(v) => v.len(),
            Keyframes::Rotations(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One animated property of one node
#[derive(Debug, Clone)]
pub struct Channel {
    pub target: NodeId,
    pub times: Vec<f32>,
    pub keyframes: Keyframes,
    pub interpolation: Interpolation,
}

impl Channel {
    /// Write the value at `time` into the target node. Mismatched key counts are skipped.
    fn apply(&self, time: f32, scene: &mut SceneGraph) {
        if self.times.is_empty() || self.times.len() != self.keyframes.len() {
            return;
        }
        let (i0, i1, f) = key_span(&self.times, time);
        let f = match self.interpolation {
            Interpolation::Step => 0.0,
            Interpolation::Linear => f,
        };
        let Some(node) = scene.node_mut(self.target) else {
            return;
        };
        match &self.keyframes {
            Keyframes::Translations(v) => node.translation = v[i0].lerp(v[i1], f),
            Keyframes::Rotations(v) => node.rotation = v[i0].slerp(v[i1], f).normalize(),
            Keyframes::Scales(v) => node.scale = v[i0].lerp(v[i1], f),
        }
    }
}

/// Surrounding key indices and the blend factor between them
fn key_span(times: &[f32], time: f32) -> (usize, usize, f32) {
    let last = times.len() - 1;
    if time <= times[0] {
        return (0, 0, 0.0);
    }
    if time >= times[last] {
        return (last, last, 0.0);
    }
    let i1 = times.partition_point(|&t| t <= time);
    let i0 = i1 - 1;
    let span = times[i1] - times[i0];
    let f = if span > f32::EPSILON {
        (time - times[i0]) / span
    } else {
        0.0
    };
    (i0, i1, f)
}

/// A named, time-based animation
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds (time of the latest key)
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
        }
    }

    /// Pose the scene at `time` seconds
    pub fn apply(&self, time: f32, scene: &mut SceneGraph) {
        for channel in &self.channels {
            channel.apply(time, scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    fn scene_with_bone() -> (SceneGraph, NodeId) {
        let mut scene = SceneGraph::new("Scene");
        let bone = scene.add_node(scene.root(), "Hips", NodeKind::Bone);
        (scene, bone)
    }

    fn slide(target: NodeId, interpolation: Interpolation) -> AnimationClip {
        AnimationClip::new(
            "Slide",
            vec![Channel {
                target,
                times: vec![0.0, 1.0, 2.0],
                keyframes: Keyframes::Translations(vec![
                    Vec3::ZERO,
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(1.0, 2.0, 0.0),
                ]),
                interpolation,
            }],
        )
    }

    #[test]
    fn test_duration_is_latest_key() {
        let (_, bone) = scene_with_bone();
        assert_eq!(slide(bone, Interpolation::Linear).duration, 2.0);
        assert_eq!(AnimationClip::new("Empty", vec![]).duration, 0.0);
    }

    #[test]
    fn test_linear_sampling() {
        let (mut scene, bone) = scene_with_bone();
        let clip = slide(bone, Interpolation::Linear);

        clip.apply(0.5, &mut scene);
        let t = scene.node(bone).unwrap().translation;
        assert!((t - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);

        clip.apply(1.5, &mut scene);
        let t = scene.node(bone).unwrap().translation;
        assert!((t - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_step_sampling_holds_previous_key() {
        let (mut scene, bone) = scene_with_bone();
        let clip = slide(bone, Interpolation::Step);
        clip.apply(0.9, &mut scene);
        assert_eq!(scene.node(bone).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn test_sampling_clamps_outside_range() {
        let (mut scene, bone) = scene_with_bone();
        let clip = slide(bone, Interpolation::Linear);
        clip.apply(-1.0, &mut scene);
        assert_eq!(scene.node(bone).unwrap().translation, Vec3::ZERO);
        clip.apply(10.0, &mut scene);
        assert_eq!(scene.node(bone).unwrap().translation, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_rotation_slerp_midpoint() {
        let (mut scene, bone) = scene_with_bone();
        let clip = AnimationClip::new(
            "Turn",
            vec![Channel {
                target: bone,
                times: vec![0.0, 1.0],
                keyframes: Keyframes::Rotations(vec![
                    Quat::IDENTITY,
                    Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                ]),
                interpolation: Interpolation::Linear,
            }],
        );
        clip.apply(0.5, &mut scene);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(scene.node(bone).unwrap().rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_mismatched_channel_is_ignored() {
        let (mut scene, bone) = scene_with_bone();
        let clip = AnimationClip::new(
            "Broken",
            vec![Channel {
                target: bone,
                times: vec![0.0, 1.0],
                keyframes: Keyframes::Scales(vec![Vec3::splat(2.0)]),
                interpolation: Interpolation::Linear,
            }],
        );
        clip.apply(0.5, &mut scene);
        assert_eq!(scene.node(bone).unwrap().scale, Vec3::ONE);
    }
}

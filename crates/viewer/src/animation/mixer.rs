use glam::{Quat, Vec3};

use super::AnimationClip;
use crate::scene::{NodeId, SceneGraph};

/// Playback control over an ordered set of clips.
///
/// Out-of-range indices are ignored by every operation.
pub trait ClipPlayer {
    fn clip_count(&self) -> usize;
    fn clip_name(&self, index: usize) -> Option<&str>;
    /// Rewind a clip to its start
    fn reset(&mut self, index: usize);
    fn play(&mut self, index: usize);
    /// Deactivate a clip and rewind it. The nodes it animated go back to
    /// their rest pose.
    fn stop(&mut self, index: usize);
    fn is_playing(&self, index: usize) -> bool;

    fn clip_index(&self, name: &str) -> Option<usize> {
        (0..self.clip_count()).find(|&i| self.clip_name(i) == Some(name))
    }
}

#[derive(Debug, Clone, Default)]
struct ClipAction {
    time: f32,
    playing: bool,
    /// Stopped since its targets were last put back at rest
    needs_rest: bool,
}

/// Local transform of a clip target before any clip touched it
#[derive(Debug, Clone, Copy)]
struct RestPose {
    node: NodeId,
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

/// Clip player that poses the scene graph directly.
/// Playing clips loop forever.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<ClipAction>,
    rest: Vec<RestPose>,
}

impl AnimationMixer {
    /// Player for `clips`, taking the current pose of `scene` as the rest pose
    pub fn new(clips: Vec<AnimationClip>, scene: &SceneGraph) -> Self {
        let actions = vec![ClipAction::default(); clips.len()];
        let mut rest: Vec<RestPose> = Vec::new();
        for channel in clips.iter().flat_map(|c| &c.channels) {
            if rest.iter().any(|r| r.node == channel.target) {
                continue;
            }
            if let Some(node) = scene.node(channel.target) {
                rest.push(RestPose {
                    node: channel.target,
                    translation: node.translation,
                    rotation: node.rotation,
                    scale: node.scale,
                });
            }
        }
        Self {
            clips,
            actions,
            rest,
        }
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Playhead of a clip in seconds
    pub fn time(&self, index: usize) -> Option<f32> {
        self.actions.get(index).map(|a| a.time)
    }

    /// Put the targets of every clip stopped since the last call back at rest
    pub fn restore_stopped(&mut self, scene: &mut SceneGraph) {
        for (clip, action) in self.clips.iter().zip(self.actions.iter_mut()) {
            if !std::mem::take(&mut action.needs_rest) {
                continue;
            }
            for channel in &clip.channels {
                let Some(pose) = self.rest.iter().find(|r| r.node == channel.target) else {
                    continue;
                };
                if let Some(node) = scene.node_mut(pose.node) {
                    node.translation = pose.translation;
                    node.rotation = pose.rotation;
                    node.scale = pose.scale;
                }
            }
            tracing::trace!("Clip {} back at rest pose", clip.name);
        }
    }

    /// Move every playing clip forward by `dt` seconds and pose the scene
    pub fn advance(&mut self, dt: f32, scene: &mut SceneGraph) {
        self.restore_stopped(scene);
        for (clip, action) in self.clips.iter().zip(self.actions.iter_mut()) {
            if !action.playing {
                continue;
            }
            action.time += dt.max(0.0);
            if clip.duration > 0.0 {
                action.time = action.time.rem_euclid(clip.duration);
            }
            clip.apply(action.time, scene);
        }
    }
}

impl ClipPlayer for AnimationMixer {
    fn clip_count(&self) -> usize {
        self.clips.len()
    }

    fn clip_name(&self, index: usize) -> Option<&str> {
        self.clips.get(index).map(|c| c.name.as_str())
    }

    fn reset(&mut self, index: usize) {
        if let Some(action) = self.actions.get_mut(index) {
            action.time = 0.0;
        }
    }

    fn play(&mut self, index: usize) {
        if let Some(action) = self.actions.get_mut(index) {
            action.playing = true;
            action.needs_rest = false;
        }
    }

    fn stop(&mut self, index: usize) {
        if let Some(action) = self.actions.get_mut(index) {
            action.playing = false;
            action.time = 0.0;
            action.needs_rest = true;
        }
    }

    fn is_playing(&self, index: usize) -> bool {
        self.actions.get(index).is_some_and(|a| a.playing)
    }
}

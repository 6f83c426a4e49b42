//! A loaded model: its scene graph plus the clip player driving it

use std::path::PathBuf;

use crate::animation::{AnimationClip, AnimationMixer, ClipPlayer};
use crate::scene::SceneGraph;

pub struct LoadedModel {
    pub scene: SceneGraph,
    pub mixer: AnimationMixer,
    /// File the model came from, if any
    pub source: Option<PathBuf>,
}

impl LoadedModel {
    pub fn new(scene: SceneGraph, clips: Vec<AnimationClip>) -> Self {
        let mixer = AnimationMixer::new(clips, &scene);
        Self {
            scene,
            mixer,
            source: None,
        }
    }

    /// File name for display, falling back to the root node name
    pub fn label(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .or_else(|| self.scene.node(self.scene.root()).map(|n| n.name.clone()))
            .unwrap_or_default()
    }

    /// Advance playing clips and pose the scene
    pub fn advance(&mut self, dt: f32) {
        self.mixer.advance(dt, &mut self.scene);
    }

    /// Name of the clip the viewer drives (always the first one)
    pub fn driven_clip(&self) -> Option<&str> {
        self.mixer.clip_name(0)
    }
}

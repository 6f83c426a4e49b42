//! Headless test harness for driving the viewer without a window.

use shared::{ColorValue, PlaybackMode, ViewerSnapshot};

use crate::animation::ClipPlayer;
use crate::binder::{SyncOutcome, DRIVEN_CLIP};
use crate::controller::ViewerController;
use crate::fixtures;
use crate::model::LoadedModel;
use crate::scene::loader;

/// Headless harness: a mounted controller plus inspection helpers
pub struct TestHarness {
    pub controller: ViewerController,
}

impl TestHarness {
    /// Harness with the fixture character already loaded
    pub fn new() -> Self {
        let mut h = Self::unloaded();
        h.load(fixtures::character_model());
        h
    }

    /// Harness whose model has not finished loading
    pub fn unloaded() -> Self {
        Self {
            controller: ViewerController::new(),
        }
    }

    // ── Loading ───────────────────────────────────────────────

    pub fn load(&mut self, model: LoadedModel) -> SyncOutcome {
        self.controller.attach_model(model)
    }

    /// Load a glTF document from memory
    pub fn load_gltf_slice(&mut self, bytes: &[u8]) -> Result<SyncOutcome, String> {
        let model = loader::load_slice(bytes)?;
        Ok(self.load(model))
    }

    // ── User intents ──────────────────────────────────────────

    pub fn edit_color(&mut self, color: ColorValue) {
        self.controller.edit_color(color);
    }

    /// Edit with a textual color (`#rrggbb`, `rgb(...)`, name)
    pub fn edit_color_str(&mut self, color: &str) -> Result<(), String> {
        self.edit_color(color.parse()?);
        Ok(())
    }

    pub fn apply_color(&mut self) -> SyncOutcome {
        self.controller.apply_color()
    }

    pub fn enable_rotation(&mut self) -> SyncOutcome {
        self.controller.enable_rotation()
    }

    pub fn disable_rotation(&mut self) -> SyncOutcome {
        self.controller.disable_rotation()
    }

    // ── Frame clock ───────────────────────────────────────────

    /// Run `count` frame ticks; returns how many rotated the model
    pub fn tick(&mut self, count: u32) -> u32 {
        (0..count).filter(|_| self.controller.tick()).count() as u32
    }

    pub fn advance(&mut self, seconds: f32) {
        self.controller.advance_animation(seconds);
    }

    pub fn unmount(&mut self) -> Option<LoadedModel> {
        self.controller.unmount()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn snapshot(&self) -> ViewerSnapshot {
        self.controller.snapshot()
    }

    pub fn mode(&self) -> Option<PlaybackMode> {
        self.controller.mode()
    }

    pub fn pending_color(&self) -> ColorValue {
        self.controller.state().pending_color()
    }

    pub fn committed_color(&self) -> ColorValue {
        self.controller.state().committed_color()
    }

    /// Root Y rotation, 0 without a model
    pub fn rotation_y(&self) -> f32 {
        self.controller
            .model()
            .map_or(0.0, |m| m.scene.rotation_y())
    }

    pub fn clip_playing(&self) -> bool {
        self.controller
            .model()
            .is_some_and(|m| m.mixer.is_playing(DRIVEN_CLIP))
    }

    /// Color of the material on the first mesh named `name`
    pub fn mesh_color(&self, name: &str) -> Option<ColorValue> {
        let scene = &self.controller.model()?.scene;
        scene.mesh_material(scene.find_node(name)?).map(|m| m.color)
    }

    pub fn material_count(&self) -> usize {
        self.controller
            .model()
            .map_or(0, |m| m.scene.material_count())
    }

    pub fn mesh_count(&self) -> usize {
        self.controller
            .model()
            .map_or(0, |m| m.scene.mesh_nodes().len())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

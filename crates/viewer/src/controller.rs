//! Viewer controller: owns the viewer state and drives the model binder
//!
//! Every user intent mutates [`ViewerState`] and then re-syncs the binder, which decides
//! whether anything in the scene has to change.

use shared::{ColorValue, PlaybackMode, ViewerSnapshot};

use crate::animation::ClipPlayer;
use crate::binder::{BinderProps, ModelBinder, SyncOutcome, DRIVEN_CLIP};
use crate::model::LoadedModel;
use crate::state::ViewerState;

pub struct ViewerController {
    state: ViewerState,
    binder: ModelBinder,
    model: Option<LoadedModel>,
}

impl ViewerController {
    /// Mount with default state and no model
    pub fn new() -> Self {
        Self {
            state: ViewerState::default(),
            binder: ModelBinder::new(),
            model: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn binder(&self) -> &ModelBinder {
        &self.binder
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.binder.is_mounted()
    }

    // ── User intents ──────────────────────────────────────────

    pub fn edit_color(&mut self, color: ColorValue) {
        if !self.is_mounted() {
            return;
        }
        self.state.edit_color(color);
    }

    pub fn apply_color(&mut self) -> SyncOutcome {
        if !self.is_mounted() {
            return SyncOutcome::default();
        }
        self.state.apply_color();
        self.sync()
    }

    pub fn enable_rotation(&mut self) -> SyncOutcome {
        if !self.is_mounted() {
            return SyncOutcome::default();
        }
        self.state.enable_rotation();
        self.sync()
    }

    pub fn disable_rotation(&mut self) -> SyncOutcome {
        if !self.is_mounted() {
            return SyncOutcome::default();
        }
        self.state.disable_rotation();
        self.sync()
    }

    // ── External events ───────────────────────────────────────

    /// Model finished loading. Replaces any previous model.
    pub fn attach_model(&mut self, model: LoadedModel) -> SyncOutcome {
        if !self.is_mounted() {
            tracing::debug!("Ignoring model {} loaded after unmount", model.label());
            return SyncOutcome::default();
        }
        tracing::info!("Model ready: {}", model.label());
        self.model = Some(model);
        self.sync()
    }

    /// One frame-clock tick. Returns whether the root rotated.
    pub fn tick(&mut self) -> bool {
        self.binder.tick(self.model.as_mut())
    }

    /// Advance clip playback by `dt` seconds
    pub fn advance_animation(&mut self, dt: f32) {
        if !self.is_mounted() {
            return;
        }
        if let Some(model) = self.model.as_mut() {
            model.advance(dt);
        }
    }

    /// Everything one rendered frame does: one tick, then clip playback
    pub fn frame(&mut self, dt: f32) {
        self.tick();
        self.advance_animation(dt);
    }

    /// Stop all effects and hand back the model
    pub fn unmount(&mut self) -> Option<LoadedModel> {
        self.binder.unmount();
        self.model.take()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn mode(&self) -> Option<PlaybackMode> {
        self.binder.mode()
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            pending_color: self.state.pending_color(),
            committed_color: self.state.committed_color(),
            rotating: self.state.rotating(),
            mode: self.mode(),
            model_loaded: self.model.is_some(),
            root_rotation_y: self.model.as_ref().map_or(0.0, |m| m.scene.rotation_y()),
            driven_clip: self
                .model
                .as_ref()
                .and_then(|m| m.driven_clip())
                .map(str::to_string),
            clip_playing: self
                .model
                .as_ref()
                .is_some_and(|m| m.mixer.is_playing(DRIVEN_CLIP)),
        }
    }

    fn sync(&mut self) -> SyncOutcome {
        let props = BinderProps {
            color: self.state.committed_color(),
            rotating: self.state.rotating(),
        };
        self.binder.sync(&props, self.model.as_mut())
    }
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new()
    }
}

//! Model binder: applies the viewer's committed color and rotation flag to a loaded model
//!
//! Effects run only when their inputs change, and never before a model is present.

mod recolor;

pub use recolor::{is_garment, recolor_garment};

use shared::{ColorValue, PlaybackMode, ROTATION_STEP};
use uuid::Uuid;

use crate::animation::ClipPlayer;
use crate::model::LoadedModel;

/// Index of the clip the binder drives
pub const DRIVEN_CLIP: usize = 0;

/// Values the binder follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderProps {
    pub color: ColorValue,
    pub rotating: bool,
}

/// What a [`ModelBinder::sync`] call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Number of meshes patched, when a re-color ran
    pub recolored: Option<usize>,
    /// Mode entered, when a transition ran
    pub transition: Option<PlaybackMode>,
}

impl SyncOutcome {
    pub fn is_empty(&self) -> bool {
        self.recolored.is_none() && self.transition.is_none()
    }
}

pub struct ModelBinder {
    /// Scene and color of the last re-color
    applied_color: Option<(Uuid, ColorValue)>,
    /// Scene and mode of the last transition
    applied_mode: Option<(Uuid, PlaybackMode)>,
    mounted: bool,
}

impl ModelBinder {
    pub fn new() -> Self {
        Self {
            applied_color: None,
            applied_mode: None,
            mounted: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Mode currently applied to the model, `None` until a model is bound
    pub fn mode(&self) -> Option<PlaybackMode> {
        self.applied_mode.map(|(_, mode)| mode)
    }

    /// Color currently applied to the garment, `None` until a model is bound
    pub fn applied_color(&self) -> Option<ColorValue> {
        self.applied_color.map(|(_, color)| color)
    }

    /// Bring the model in line with `props`.
    ///
    /// Re-colors when the color or the scene changed; enters the mode matching the
    /// rotation flag when the flag or the scene changed. Without a model nothing happens
    /// and the effects run once a model is passed in.
    pub fn sync(&mut self, props: &BinderProps, model: Option<&mut LoadedModel>) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        if !self.mounted {
            return outcome;
        }
        let Some(model) = model else {
            tracing::trace!("Model not loaded yet, deferring sync");
            return outcome;
        };
        let scene_id = model.scene.id();

        if self.applied_color != Some((scene_id, props.color)) {
            outcome.recolored = Some(recolor_garment(&mut model.scene, props.color));
            self.applied_color = Some((scene_id, props.color));
        }

        let mode = PlaybackMode::from_rotating(props.rotating);
        if self.applied_mode != Some((scene_id, mode)) {
            enter_mode(mode, &mut model.mixer);
            model.mixer.restore_stopped(&mut model.scene);
            self.applied_mode = Some((scene_id, mode));
            outcome.transition = Some(mode);
        }

        outcome
    }

    /// One frame-clock tick. Spins the root while rotating; otherwise does nothing.
    /// Returns whether the model moved.
    pub fn tick(&self, model: Option<&mut LoadedModel>) -> bool {
        if !self.mounted {
            return false;
        }
        match (self.applied_mode, model) {
            (Some((scene_id, PlaybackMode::Rotating)), Some(model))
                if model.scene.id() == scene_id =>
            {
                model.scene.rotate_y(ROTATION_STEP);
                true
            }
            _ => false,
        }
    }

    /// Stop all further effects and forget the bound scene
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.applied_color = None;
        self.applied_mode = None;
    }
}

impl Default for ModelBinder {
    fn default() -> Self {
        Self::new()
    }
}

fn enter_mode<P: ClipPlayer + ?Sized>(mode: PlaybackMode, player: &mut P) {
    if player.clip_count() <= DRIVEN_CLIP {
        tracing::debug!("No clip to drive, {mode:?} only affects rotation");
        return;
    }
    match mode {
        PlaybackMode::Animating => {
            player.reset(DRIVEN_CLIP);
            player.play(DRIVEN_CLIP);
        }
        PlaybackMode::Rotating => player.stop(DRIVEN_CLIP),
    }
    tracing::debug!(
        "Entered {mode:?} (clip {})",
        player.clip_name(DRIVEN_CLIP).unwrap_or_default()
    );
}

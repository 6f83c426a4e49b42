pub mod settings;

use shared::ColorValue;

pub use settings::{ModelSettings, UiSettings, ViewerSettings, ViewportSettings};

/// User-owned viewer state: color being edited, color applied, and rotation flag
#[derive(Debug, Clone)]
pub struct ViewerState {
    pending_color: ColorValue,
    committed_color: ColorValue,
    rotating: bool,
    /// Monotonically increasing counter, bumped on every mutation
    version: u64,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            pending_color: ColorValue::WHITE,
            committed_color: ColorValue::WHITE,
            rotating: false,
            version: 0,
        }
    }
}

impl ViewerState {
    pub fn pending_color(&self) -> ColorValue {
        self.pending_color
    }

    pub fn committed_color(&self) -> ColorValue {
        self.committed_color
    }

    pub fn rotating(&self) -> bool {
        self.rotating
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Change the color being edited. The committed color is untouched.
    pub fn edit_color(&mut self, color: ColorValue) {
        self.pending_color = color;
        self.version += 1;
    }

    /// Commit the edited color
    pub fn apply_color(&mut self) {
        self.committed_color = self.pending_color;
        self.version += 1;
    }

    /// Returns true when the flag actually changed
    pub fn set_rotating(&mut self, rotating: bool) -> bool {
        if self.rotating == rotating {
            return false;
        }
        self.rotating = rotating;
        self.version += 1;
        true
    }

    pub fn enable_rotation(&mut self) -> bool {
        self.set_rotating(true)
    }

    pub fn disable_rotation(&mut self) -> bool {
        self.set_rotating(false)
    }
}

// Library crate: exposes the viewer core for integration tests and the JSON command interface.
// GUI-specific modules (app, ui, viewport rendering) remain in the binary crate.

pub mod animation;
pub mod binder;
pub mod command;
pub mod controller;
pub mod fixtures;
pub mod harness;
pub mod i18n;
pub mod model;
pub mod scene;
pub mod state;

/// CPU-side mesh preparation shared by the renderer and tests.
/// The GL renderer and camera stay in the binary crate.
pub mod viewport {
    pub mod mesh;
}

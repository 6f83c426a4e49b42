//! Keyboard shortcut handling

use eframe::egui;

use crate::controller::ViewerController;

/// Enter applies the edited color, R starts rotation, M resumes the clip
pub fn handle_keyboard(ctx: &egui::Context, controller: &mut ViewerController) {
    // Don't handle shortcuts when a widget (color picker field) has focus
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (apply, rotate, animate) = ctx.input(|i| {
        let plain = !i.modifiers.command && !i.modifiers.alt;
        (
            i.key_pressed(egui::Key::Enter),
            plain && i.key_pressed(egui::Key::R),
            plain && i.key_pressed(egui::Key::M),
        )
    });

    if apply {
        controller.apply_color();
    }
    if rotate {
        controller.enable_rotation();
    }
    if animate {
        controller.disable_rotation();
    }
}

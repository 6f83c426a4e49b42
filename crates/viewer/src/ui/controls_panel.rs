//! "Customize Model" panel: color picker plus OK / Rotate / Move

use egui::Context;
use shared::ColorValue;

use crate::controller::ViewerController;
use crate::i18n::t;

pub fn show(ctx: &Context, controller: &mut ViewerController) {
    egui::Window::new(t("panel.title"))
        .id(egui::Id::new("customize_panel"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            let state = controller.state();
            let mut rgb = state.pending_color().to_array();
            let unapplied = state.pending_color() != state.committed_color();

            ui.horizontal(|ui| {
                ui.label(t("panel.pick_color"));
                if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                    controller.edit_color(ColorValue::rgb(rgb[0], rgb[1], rgb[2]));
                }
                if unapplied {
                    ui.weak(t("panel.pending"));
                }
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button(t("panel.ok")).clicked() {
                    controller.apply_color();
                }
                let rotating = controller.state().rotating();
                if ui.selectable_label(rotating, t("panel.rotate")).clicked() {
                    controller.enable_rotation();
                }
                if ui.selectable_label(!rotating, t("panel.move")).clicked() {
                    controller.disable_rotation();
                }
            });
        });
}

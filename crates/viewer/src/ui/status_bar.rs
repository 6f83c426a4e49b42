use egui::Ui;
use shared::PlaybackMode;

use crate::app::LoadStatus;
use crate::controller::ViewerController;
use crate::i18n::t;

pub fn show(ui: &mut Ui, controller: &ViewerController, load_status: &LoadStatus) {
    ui.horizontal(|ui| {
        match load_status {
            LoadStatus::Loading(path) => {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 200, 100),
                    format!("{} {}", t("status.loading"), path.display()),
                );
                ui.separator();
            }
            LoadStatus::Failed(e) => {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 100, 100),
                    format!("{}: {e}", t("status.load_failed")),
                );
                ui.separator();
            }
            LoadStatus::Idle => {}
        }

        let Some(model) = controller.model() else {
            ui.weak(t("status.no_model"));
            return;
        };
        ui.label(model.label());
        ui.separator();

        let snapshot = controller.snapshot();
        let mode = match snapshot.mode {
            Some(PlaybackMode::Rotating) => t("status.rotating"),
            _ => t("status.animating"),
        };
        ui.label(mode);
        ui.separator();

        let clip = snapshot
            .driven_clip
            .unwrap_or_else(|| t("status.no_clip").to_string());
        ui.weak(format!("{}: {clip}", t("status.clip")));
        ui.separator();

        let committed = snapshot.committed_color;
        let [r, g, b] = committed.to_array();
        ui.label(format!("{}:", t("status.color")));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter()
            .rect_filled(rect, 2.0, egui::Color32::from_rgb(r, g, b));
        ui.monospace(committed.to_hex());
    });
}

//! Application menu bar

use std::path::PathBuf;

use eframe::egui;

use crate::i18n::{lang, set_lang, t, Lang};
use crate::state::ViewerSettings;
use crate::viewport::ViewportPanel;

/// Menu actions that need the loader
pub enum MenuAction {
    Open(PathBuf),
    Reload,
}

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, can_reload: bool) -> Option<MenuAction> {
    let mut action = None;
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.open")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.open_title"))
                .add_filter("glTF", &["gltf", "glb"])
                .pick_file()
            {
                action = Some(MenuAction::Open(path));
            }
        }
        if ui
            .add_enabled(can_reload, egui::Button::new(t("menu.reload")))
            .clicked()
        {
            action = Some(MenuAction::Reload);
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            ui.close_menu();
        }
    });
    action
}

/// Show the view menu. Returns true when settings changed.
pub fn view_menu(
    ui: &mut egui::Ui,
    settings: &mut ViewerSettings,
    viewport: &mut ViewportPanel,
) -> bool {
    let mut changed = false;
    ui.menu_button(t("menu.view"), |ui| {
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        changed |= ui
            .checkbox(&mut settings.viewport.grid_visible, t("menu.grid"))
            .changed();
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, label) in [(Lang::En, "English"), (Lang::Ru, "Русский")] {
                if ui.selectable_label(lang() == l, label).clicked() {
                    set_lang(l);
                    settings.ui.language = l;
                    changed = true;
                    ui.close_menu();
                }
            }
        });
    });
    changed
}

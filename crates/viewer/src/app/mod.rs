//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::path::PathBuf;

use eframe::egui;

use crate::controller::ViewerController;
use crate::i18n::set_lang;
use crate::scene::ModelLoader;
use crate::state::ViewerSettings;
use crate::ui::{controls_panel, status_bar};
use crate::viewport::ViewportPanel;
use menus::MenuAction;

/// Progress of the model file behind the viewer
pub enum LoadStatus {
    Idle,
    Loading(PathBuf),
    Failed(String),
}

/// Main application
pub struct ViewerApp {
    controller: ViewerController,
    loader: Option<ModelLoader>,
    viewport: ViewportPanel,
    settings: ViewerSettings,
    load_status: LoadStatus,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, model_path: Option<PathBuf>) -> Self {
        let settings = ViewerSettings::load();
        set_lang(settings.ui.language);
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let mut viewport = ViewportPanel::new();
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let (loader, load_status) = match ModelLoader::new() {
            Ok(loader) => (Some(loader), LoadStatus::Idle),
            Err(e) => {
                tracing::error!("{e}");
                (None, LoadStatus::Failed(e))
            }
        };

        let last_font_size = settings.ui.font_size;
        // CLI argument takes priority over the configured model
        let path = model_path.unwrap_or_else(|| settings.model.path.clone());

        let mut app = Self {
            controller: ViewerController::new(),
            loader,
            viewport,
            settings,
            load_status,
            last_font_size,
        };
        app.request_load(path);
        app
    }

    fn request_load(&mut self, path: PathBuf) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        tracing::info!("Loading model {}", path.display());
        loader.request(path.clone());
        self.load_status = LoadStatus::Loading(path);
    }

    fn poll_loader(&mut self) {
        let Some(result) = self.loader.as_mut().and_then(ModelLoader::poll) else {
            return;
        };
        match result {
            Ok(mut model) => {
                model.scene.placement.scale = self.settings.model.scale;
                self.load_status = LoadStatus::Idle;
                self.controller.attach_model(model);
            }
            Err(e) => {
                tracing::error!("{e}");
                self.load_status = LoadStatus::Failed(e);
            }
        }
    }

    fn handle_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Open(path) => {
                self.settings.model.path = path.clone();
                self.settings.save();
                self.request_load(path);
            }
            MenuAction::Reload => {
                let source = self.controller.model().and_then(|m| m.source.clone());
                if let Some(path) = source {
                    self.request_load(path);
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.settings.ui.font_size);
            self.last_font_size = self.settings.ui.font_size;
        }

        self.poll_loader();
        keyboard::handle_keyboard(ctx, &mut self.controller);

        // ── Frame clock ───────────────────────────────────────
        let dt = ctx.input(|i| i.stable_dt);
        self.controller.frame(dt);

        // ── Menu bar ──────────────────────────────────────────
        let mut action = None;
        let mut settings_changed = false;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                let can_reload = self
                    .controller
                    .model()
                    .is_some_and(|m| m.source.is_some());
                action = menus::file_menu(ui, can_reload);
                settings_changed =
                    menus::view_menu(ui, &mut self.settings, &mut self.viewport);
            });
        });
        if let Some(action) = action {
            self.handle_menu_action(action);
        }
        if settings_changed {
            self.settings.save();
        }

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.controller, &self.load_status);
            });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let scene = self.controller.model().map(|m| &m.scene);
                self.viewport.show(ui, scene, &self.settings.viewport);
            });

        // ── Customize panel (floats over the viewport) ───────
        controls_panel::show(ctx, &mut self.controller);

        // Rotation and clips advance every frame
        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.controller.unmount();
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}

//! 3D viewport panel with OpenGL rendering

mod camera;
mod gl_renderer;
pub use model_viewer_lib::viewport::mesh;

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::i18n::t;
use crate::state::ViewportSettings;
use camera::ArcBallCamera;
use gl_renderer::{GlRenderer, RenderParams, SceneMeshes};
use mesh::MeshData;
use model_viewer_lib::scene::SceneGraph;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// CPU geometry of the displayed scene, rebuilt when the scene changes
    scene_meshes: Option<Arc<SceneMeshes>>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            gl_renderer: None,
            scene_meshes: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("Failed to initialize GL renderer: {e}"),
        }
    }

    /// Release GPU resources
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera = ArcBallCamera::new();
    }

    pub fn show(&mut self, ui: &mut Ui, scene: Option<&SceneGraph>, settings: &ViewportSettings) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Camera controls ─────────────────────────────
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.camera.pan(delta.x * 0.01, delta.y * 0.01);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.01);
            }
        }

        self.rebuild_meshes_if_needed(scene);

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render_gl(ui, rect, scene, settings);
        self.draw_overlays(ui, rect, scene.is_some());
    }

    fn rebuild_meshes_if_needed(&mut self, scene: Option<&SceneGraph>) {
        let current = self.scene_meshes.as_ref().map(|m| m.scene_id);
        match scene {
            Some(scene) if current != Some(scene.id()) => {
                let meshes = scene
                    .geometries()
                    .iter()
                    .map(MeshData::from_geometry)
                    .collect();
                self.scene_meshes = Some(Arc::new(SceneMeshes {
                    scene_id: scene.id(),
                    meshes,
                }));
            }
            Some(_) => {}
            None => self.scene_meshes = None,
        }
    }

    fn render_gl(
        &self,
        ui: &mut Ui,
        rect: egui::Rect,
        scene: Option<&SceneGraph>,
        settings: &ViewportSettings,
    ) {
        let Some(gl_renderer) = &self.gl_renderer else {
            ui.painter().rect_filled(
                rect,
                0.0,
                egui::Color32::from_rgb(
                    settings.background_color[0],
                    settings.background_color[1],
                    settings.background_color[2],
                ),
            );
            return;
        };

        let renderer = gl_renderer.clone();
        let camera = self.camera;
        let scene_meshes = self.scene_meshes.clone();
        let items = scene.map(mesh::collect_draw_items).unwrap_or_default();
        let settings = settings.clone();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();
                let clip = info.clip_rect_in_pixels();
                let params = RenderParams {
                    viewport: [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ],
                    grid_visible: settings.grid_visible,
                    bg_color: settings.background_color,
                    ambient: settings.ambient,
                    light_position: settings.light_position,
                };

                if let Ok(mut r) = renderer.lock() {
                    r.sync_scene(gl, scene_meshes.as_deref());
                    r.paint(gl, &camera, &items, &params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, has_model: bool) {
        if has_model {
            return;
        }
        ui.painter_at(rect).text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            t("status.no_model"),
            egui::FontId::proportional(14.0),
            egui::Color32::from_rgb(100, 100, 110),
        );
    }
}

mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::i18n`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use model_viewer_lib::controller;
pub use model_viewer_lib::i18n;
pub use model_viewer_lib::scene;
pub use model_viewer_lib::state;

use std::path::PathBuf;

use app::ViewerApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "model_viewer=info,model_viewer_lib=info".into()),
        )
        .init();

    // Parse --model <path> argument
    let model_path = parse_model_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Model Viewer")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "model-viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, model_path)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_model_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--model" {
            match args.get(i + 1) {
                Some(path) => return Some(PathBuf::from(path)),
                None => tracing::error!("--model requires a path"),
            }
            break;
        }
        i += 1;
    }
    None
}

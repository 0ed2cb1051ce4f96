mod app;
mod color;
mod data;
mod render;
mod scene;
mod state;
mod ui;

use anyhow::Result;
use app::RustyRasterApp;
use eframe::egui;
use scene::SceneConfig;
use state::ViewerState;

fn main() -> Result<()> {
    env_logger::init();

    // Headless part of the demo: synthesize, extract, persist, report.
    let scene = scene::run(SceneConfig::default(), &mut std::io::stdout())?;

    // Then show the signature interactively, like the saved figure.
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let state = ViewerState::new(scene);
    eframe::run_native(
        "Rusty Raster – Spectral Signature",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the saved png.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RustyRasterApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))?;

    Ok(())
}

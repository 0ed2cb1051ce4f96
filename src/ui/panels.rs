use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new("Rusty Raster").strong());
        ui.separator();

        ui.label(format!(
            "{} bands, {}x{} raster",
            state.scene.registry.len(),
            state.scene.config.rows,
            state.scene.config.cols
        ));

        ui.separator();

        if ui
            .selectable_label(state.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            state.minmax_scaling = !state.minmax_scaling;
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – scene metadata and statistics
// ---------------------------------------------------------------------------

/// Render the left scene panel.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    ui.heading("Scene");
    ui.separator();

    let scene = &state.scene;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("CRS: {}", scene.config.geo.crs));
            ui.label(format!(
                "Pixel (row={}, col={})",
                scene.spectrum.row, scene.spectrum.col
            ));
            ui.label(format!("lon={:.5}, lat={:.5}", scene.lon, scene.lat));
            ui.label(format!("NDVI: {:.4}", scene.ndvi));
            ui.separator();

            ui.strong("Band statistics");
            for stats in &scene.statistics {
                let [r, g, b] = state.band_colors.rgb_for(&stats.band);
                ui.monospace(
                    RichText::new(stats.to_string()).color(egui::Color32::from_rgb(r, g, b)),
                );
            }
            ui.separator();

            // Thumbnail of the figure written earlier in the run.
            if scene.config.plot_path.exists() {
                ui.strong("Saved figure");
                let uri = format!("file://{}", scene.config.plot_path.display());
                ui.add(
                    egui::Image::new(uri)
                        .max_width(ui.available_width())
                        .rounding(4.0),
                );
            }
        });
}

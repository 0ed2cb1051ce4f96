use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Signature plot (central panel)
// ---------------------------------------------------------------------------

/// Render the spectral signature in the central panel.
pub fn signature_plot(ui: &mut Ui, state: &ViewerState) {
    let spectrum = &state.scene.spectrum;

    let y_values: Vec<f64> = if state.minmax_scaling {
        let min = spectrum
            .samples()
            .iter()
            .map(|s| s.reflectance)
            .fold(f64::INFINITY, f64::min);
        let max = spectrum
            .samples()
            .iter()
            .map(|s| s.reflectance)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        if range.abs() < f64::EPSILON {
            vec![0.0; spectrum.len()]
        } else {
            spectrum
                .samples()
                .iter()
                .map(|s| (s.reflectance - min) / range)
                .collect()
        }
    } else {
        spectrum.samples().iter().map(|s| s.reflectance).collect()
    };

    Plot::new("signature_plot")
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Reflectance")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line_points: PlotPoints = spectrum
                .samples()
                .iter()
                .zip(&y_values)
                .map(|(s, &y)| [s.wavelength_nm as f64, y])
                .collect();
            plot_ui.line(
                Line::new(line_points)
                    .name("signature")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );

            // One marker series per band so the legend names the channels.
            for (sample, &y) in spectrum.samples().iter().zip(&y_values) {
                let [r, g, b] = state.band_colors.rgb_for(&sample.band);
                plot_ui.points(
                    Points::new(vec![[sample.wavelength_nm as f64, y]])
                        .name(&sample.band)
                        .color(Color32::from_rgb(r, g, b))
                        .shape(MarkerShape::Circle)
                        .radius(5.0),
                );
            }
        });
}

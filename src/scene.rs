use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ndarray::Array3;

use crate::data::analysis::{band_statistics, ndvi};
use crate::data::geo::GeoTransform;
use crate::data::model::{Band, BandRegistry, BandStatistics, PixelSpectrum};
use crate::data::persist::save_spectrum_csv;
use crate::data::synth::{synthesize_cube, SceneRng, SynthesisParams};
use crate::render::render_spectrum_png;

// ---------------------------------------------------------------------------
// SceneConfig – every knob of the demo scene in one immutable value
// ---------------------------------------------------------------------------

/// Full description of the synthetic scene.
///
/// Passed by value into [`Scene::build`] and never mutated afterwards;
/// there is no module-level state, no CLI parsing and no environment
/// lookup. `Default` carries the fixed Landsat-like constants of the demo.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub bands: Vec<Band>,
    /// One base reflectance per band, registry order.
    pub base_reflectance: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
    pub row_gradient_step: f64,
    pub col_gradient_step: f64,
    pub noise_sigma: f64,
    pub seed: u64,
    pub geo: GeoTransform,
    /// Pixel whose signature is extracted.
    pub target_row: usize,
    pub target_col: usize,
    pub csv_path: PathBuf,
    pub plot_path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            bands: vec![
                Band::new("Blue", 490),
                Band::new("Green", 560),
                Band::new("Red", 665),
                Band::new("NIR", 865),
                Band::new("SWIR1", 1610),
                Band::new("SWIR2", 2200),
            ],
            base_reflectance: vec![0.12, 0.18, 0.22, 0.46, 0.31, 0.27],
            rows: 3,
            cols: 3,
            row_gradient_step: 0.01,
            col_gradient_step: 0.005,
            noise_sigma: 0.002,
            seed: 42,
            geo: GeoTransform::new(-59.0, 15.0, 0.01, 0.01, "EPSG:4326"),
            target_row: 1,
            target_col: 2,
            csv_path: PathBuf::from("data/synthetic_pixel_spectrum.csv"),
            plot_path: PathBuf::from("spectral_signature.png"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scene – the fully computed demo scene
// ---------------------------------------------------------------------------

/// Everything the pipeline derives from a [`SceneConfig`], computed once.
pub struct Scene {
    pub config: SceneConfig,
    pub registry: BandRegistry,
    pub cube: Array3<f64>,
    pub spectrum: PixelSpectrum,
    /// Geographic coordinate of the target pixel's center.
    pub lon: f64,
    pub lat: f64,
    pub ndvi: f64,
    pub statistics: Vec<BandStatistics>,
}

impl Scene {
    /// Run the computational pipeline: synthesize the cube, extract the
    /// target pixel's spectrum, georeference it, derive NDVI and per-band
    /// statistics. No file I/O happens here.
    pub fn build(config: SceneConfig) -> Result<Self> {
        let registry = BandRegistry::new(config.bands.clone()).context("building band registry")?;

        let params = SynthesisParams {
            base_reflectance: config.base_reflectance.clone(),
            rows: config.rows,
            cols: config.cols,
            row_gradient_step: config.row_gradient_step,
            col_gradient_step: config.col_gradient_step,
            noise_sigma: config.noise_sigma,
        };
        let mut rng = SceneRng::seeded(config.seed);
        let cube = synthesize_cube(&params, &mut rng);

        let spectrum = PixelSpectrum::extract(&cube, &registry, config.target_row, config.target_col)
            .context("extracting pixel spectrum")?;
        let (lon, lat) = config
            .geo
            .rowcol_to_xy(config.target_row, config.target_col, true);
        let index = ndvi(&spectrum).context("computing NDVI")?;
        let statistics = band_statistics(&cube, &registry).context("computing band statistics")?;

        log::info!(
            "built scene: {} bands, {}x{} pixels, seed {}",
            registry.len(),
            config.rows,
            config.cols,
            config.seed
        );

        Ok(Scene {
            config,
            registry,
            cube,
            spectrum,
            lon,
            lat,
            ndvi: index,
            statistics,
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline run + console report
// ---------------------------------------------------------------------------

/// Build the scene, persist the spectrum CSV and the signature plot, and
/// stream the human-readable report to `out` (stdout in the binary).
///
/// Output files are written unconditionally; any write failure aborts the
/// run.
pub fn run(config: SceneConfig, out: &mut impl Write) -> Result<Scene> {
    let scene = Scene::build(config)?;

    writeln!(
        out,
        "Raster shape (bands, rows, cols): ({}, {}, {})",
        scene.registry.len(),
        scene.config.rows,
        scene.config.cols
    )?;
    writeln!(out)?;
    writeln!(out, "CRS: {}", scene.config.geo.crs)?;
    writeln!(
        out,
        "Pixel (row={}, col={}) center coordinate: lon={:.5}, lat={:.5}",
        scene.spectrum.row, scene.spectrum.col, scene.lon, scene.lat
    )?;
    writeln!(out)?;
    write!(out, "{}", format_spectrum_table(&scene.spectrum))?;

    save_spectrum_csv(&scene.config.csv_path, &scene.spectrum)?;
    writeln!(out)?;
    writeln!(
        out,
        "Spectral data saved to: {}",
        scene.config.csv_path.display()
    )?;

    render_spectrum_png(&scene.spectrum, &scene.config.plot_path)?;
    writeln!(
        out,
        "Spectral signature plot saved to: {}",
        scene.config.plot_path.display()
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "NDVI at (row={}, col={}): {:.4}",
        scene.spectrum.row, scene.spectrum.col, scene.ndvi
    )?;

    writeln!(out)?;
    writeln!(out, "--- Raster Band Statistics ---")?;
    for stats in &scene.statistics {
        writeln!(out, "{stats}")?;
    }

    Ok(scene)
}

/// Fixed-width table of the spectrum, right-aligned like a dataframe dump,
/// no index column.
pub fn format_spectrum_table(spectrum: &PixelSpectrum) -> String {
    let headers = ["Band", "Wavelength_nm", "Reflectance"];
    let rows: Vec<[String; 3]> = spectrum
        .samples()
        .iter()
        .map(|s| {
            [
                s.band.clone(),
                s.wavelength_nm.to_string(),
                format!("{:.6}", s.reflectance),
            ]
        })
        .collect();

    let mut widths = [headers[0].len(), headers[1].len(), headers[2].len()];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut table = String::new();
    let format_row = |cells: [&str; 3]| {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(&format!("{cell:>width$}"));
        }
        line.push('\n');
        line
    };
    table.push_str(&format_row(headers));
    for row in &rows {
        table.push_str(&format_row([&row[0], &row[1], &row[2]]));
    }
    table
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::data::analysis::normalized_difference;

    #[test]
    fn default_scene_has_the_contract_shape() {
        let scene = Scene::build(SceneConfig::default()).unwrap();
        assert_eq!(scene.cube.shape(), &[6, 3, 3]);
        assert_eq!(scene.spectrum.len(), 6);
        assert!(scene
            .spectrum
            .samples()
            .windows(2)
            .all(|w| w[0].wavelength_nm < w[1].wavelength_nm));
    }

    #[test]
    fn scene_is_deterministic_for_a_seed() {
        let a = Scene::build(SceneConfig::default()).unwrap();
        let b = Scene::build(SceneConfig::default()).unwrap();
        assert_eq!(a.cube, b.cube);
        assert_eq!(a.ndvi.to_bits(), b.ndvi.to_bits());
    }

    #[test]
    fn ndvi_matches_the_extracted_values() {
        let scene = Scene::build(SceneConfig::default()).unwrap();
        let nir = scene.spectrum.reflectance_of("NIR").unwrap();
        let red = scene.spectrum.reflectance_of("Red").unwrap();
        assert_relative_eq!(scene.ndvi, normalized_difference(nir, red), max_relative = 1e-12);
        // Gradient at (1, 2) adds 0.02 to both bands; noise stays tiny.
        assert_relative_eq!(scene.ndvi, (0.46 - 0.22) / (0.46 + 0.22 + 2.0 * 0.02), epsilon = 0.05);
    }

    #[test]
    fn statistics_are_consistent_and_in_range() {
        let scene = Scene::build(SceneConfig::default()).unwrap();
        assert_eq!(scene.statistics.len(), 6);
        for stats in &scene.statistics {
            assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            assert!(stats.min >= 0.0);
            assert!(stats.max <= 1.0);
        }
        // Registry declaration order, not wavelength order.
        assert_eq!(scene.statistics[0].band, "Blue");
        assert_eq!(scene.statistics[3].band, "NIR");
    }

    #[test]
    fn pixel_center_coordinate_matches_the_transform() {
        let scene = Scene::build(SceneConfig::default()).unwrap();
        assert_relative_eq!(scene.lon, -58.975, epsilon = 1e-5);
        assert_relative_eq!(scene.lat, 14.985, epsilon = 1e-5);
    }

    #[test]
    fn run_writes_artifacts_and_report() {
        let dir = tempdir().unwrap();
        let config = SceneConfig {
            csv_path: dir.path().join("spectrum.csv"),
            plot_path: dir.path().join("signature.png"),
            ..SceneConfig::default()
        };

        let mut report = Vec::new();
        let scene = run(config, &mut report).unwrap();

        assert!(scene.config.csv_path.exists());
        assert!(scene.config.plot_path.exists());

        let text = String::from_utf8(report).unwrap();
        assert!(text.contains("Raster shape (bands, rows, cols): (6, 3, 3)"));
        assert!(text.contains("CRS: EPSG:4326"));
        assert!(text.contains("lon=-58.97500, lat=14.98500"));
        assert!(text.contains("NDVI at (row=1, col=2):"));
        assert!(text.contains("--- Raster Band Statistics ---"));
        assert!(text.contains("Blue    : min="));
    }

    #[test]
    fn spectrum_table_is_aligned_and_headed() {
        let scene = Scene::build(SceneConfig::default()).unwrap();
        let table = format_spectrum_table(&scene.spectrum);
        let mut lines = table.lines();
        let header = lines.next().unwrap();
        assert!(header.ends_with("Reflectance"));
        assert!(header.contains("Wavelength_nm"));
        assert_eq!(lines.count(), 6);
    }
}

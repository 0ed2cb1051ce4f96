use ndarray::{Array3, Axis};
use thiserror::Error;

use super::model::{BandRegistry, BandStatistics, ModelError, PixelSpectrum};

// ---------------------------------------------------------------------------
// Vegetation index
// ---------------------------------------------------------------------------

/// Band names the vegetation index is defined over.
pub const NIR_BAND: &str = "NIR";
pub const RED_BAND: &str = "Red";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The registry guarantees both index bands, so hitting this means a
    /// caller broke that invariant. Treated as fatal by the pipeline.
    #[error("band '{0}' missing from spectrum")]
    MissingBand(String),
}

/// Normalized difference of two reflectance values: `(a - b) / (a + b)`.
///
/// The denominator is not checked; `a + b == 0` yields NaN or an infinity
/// per IEEE-754 float semantics.
pub fn normalized_difference(a: f64, b: f64) -> f64 {
    (a - b) / (a + b)
}

/// NDVI from the NIR and Red samples of an extracted spectrum.
pub fn ndvi(spectrum: &PixelSpectrum) -> Result<f64, AnalysisError> {
    let nir = spectrum
        .reflectance_of(NIR_BAND)
        .ok_or_else(|| AnalysisError::MissingBand(NIR_BAND.into()))?;
    let red = spectrum
        .reflectance_of(RED_BAND)
        .ok_or_else(|| AnalysisError::MissingBand(RED_BAND.into()))?;
    Ok(normalized_difference(nir, red))
}

// ---------------------------------------------------------------------------
// Per-band statistics
// ---------------------------------------------------------------------------

/// Min / max / mean of every band over all rows and columns, reported in
/// registry declaration order (not wavelength order).
pub fn band_statistics(
    cube: &Array3<f64>,
    registry: &BandRegistry,
) -> Result<Vec<BandStatistics>, ModelError> {
    if cube.shape()[0] != registry.len() {
        return Err(ModelError::BandAxisMismatch {
            registry: registry.len(),
            cube: cube.shape()[0],
        });
    }

    let stats = registry
        .iter()
        .zip(cube.axis_iter(Axis(0)))
        .map(|(band, plane)| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut sum = 0.0;
            for &v in plane.iter() {
                min = min.min(v);
                max = max.max(v);
                sum += v;
            }
            BandStatistics {
                band: band.name.clone(),
                min,
                max,
                mean: sum / plane.len() as f64,
            }
        })
        .collect();

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array3;

    use super::*;
    use crate::data::model::{Band, SpectralSample};

    fn spectrum_with(nir: f64, red: f64) -> PixelSpectrum {
        PixelSpectrum::from_samples(
            0,
            0,
            vec![
                SpectralSample {
                    band: "Red".into(),
                    wavelength_nm: 665,
                    reflectance: red,
                },
                SpectralSample {
                    band: "NIR".into(),
                    wavelength_nm: 865,
                    reflectance: nir,
                },
            ],
        )
    }

    #[test]
    fn ndvi_matches_the_formula() {
        let value = ndvi(&spectrum_with(0.5, 0.25)).unwrap();
        assert_relative_eq!(value, 0.25 / 0.75, max_relative = 1e-12);
    }

    #[test]
    fn ndvi_missing_band_is_an_error() {
        let spectrum = PixelSpectrum::from_samples(
            0,
            0,
            vec![SpectralSample {
                band: "Red".into(),
                wavelength_nm: 665,
                reflectance: 0.2,
            }],
        );
        let err = ndvi(&spectrum).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingBand(name) if name == "NIR"));
    }

    #[test]
    fn ndvi_zero_denominator_is_not_a_number() {
        let value = ndvi(&spectrum_with(0.0, 0.0)).unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn statistics_per_band_in_registry_order() {
        let registry = BandRegistry::new(vec![Band::new("NIR", 865), Band::new("Blue", 490)]).unwrap();
        let mut cube = Array3::<f64>::zeros((2, 2, 2));
        // NIR plane: 0.4, 0.5, 0.6, 0.7 – Blue plane: all 0.1
        cube[[0, 0, 0]] = 0.4;
        cube[[0, 0, 1]] = 0.5;
        cube[[0, 1, 0]] = 0.6;
        cube[[0, 1, 1]] = 0.7;
        for row in 0..2 {
            for col in 0..2 {
                cube[[1, row, col]] = 0.1;
            }
        }

        let stats = band_statistics(&cube, &registry).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].band, "NIR");
        assert_relative_eq!(stats[0].min, 0.4, epsilon = 1e-12);
        assert_relative_eq!(stats[0].max, 0.7, epsilon = 1e-12);
        assert_relative_eq!(stats[0].mean, 0.55, epsilon = 1e-12);
        assert_eq!(stats[1].band, "Blue");
        assert_relative_eq!(stats[1].mean, 0.1, epsilon = 1e-12);
        for s in &stats {
            assert!(s.min <= s.mean && s.mean <= s.max);
        }
    }

    #[test]
    fn statistics_reject_band_axis_mismatch() {
        let registry = BandRegistry::new(vec![Band::new("NIR", 865)]).unwrap();
        let cube = Array3::<f64>::zeros((2, 2, 2));
        assert!(band_statistics(&cube, &registry).is_err());
    }
}

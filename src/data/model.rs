use std::fmt;

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Band – one sensor channel
// ---------------------------------------------------------------------------

/// A multispectral sensor channel: a name and a center wavelength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub name: String,
    pub wavelength_nm: u32,
}

impl Band {
    pub fn new(name: impl Into<String>, wavelength_nm: u32) -> Self {
        Band {
            name: name.into(),
            wavelength_nm,
        }
    }
}

// ---------------------------------------------------------------------------
// BandRegistry – the validated, ordered set of channels
// ---------------------------------------------------------------------------

/// Errors raised when a data model invariant is violated.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("band registry must not be empty")]
    EmptyRegistry,
    #[error("duplicate band name '{0}' in registry")]
    DuplicateBandName(String),
    #[error("duplicate center wavelength {0} nm in registry")]
    DuplicateWavelength(u32),
    #[error("raster has {cube} bands but the registry declares {registry}")]
    BandAxisMismatch { registry: usize, cube: usize },
    #[error("pixel (row={row}, col={col}) outside raster of {rows}x{cols}")]
    PixelOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Ordered band set, in sensor-channel order (NOT wavelength order).
///
/// Construction validates what every downstream stage assumes: at least one
/// band, unique names, unique wavelengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandRegistry {
    bands: Vec<Band>,
}

impl BandRegistry {
    pub fn new(bands: Vec<Band>) -> Result<Self, ModelError> {
        if bands.is_empty() {
            return Err(ModelError::EmptyRegistry);
        }
        for (i, band) in bands.iter().enumerate() {
            for earlier in &bands[..i] {
                if earlier.name == band.name {
                    return Err(ModelError::DuplicateBandName(band.name.clone()));
                }
                if earlier.wavelength_nm == band.wavelength_nm {
                    return Err(ModelError::DuplicateWavelength(band.wavelength_nm));
                }
            }
        }
        Ok(BandRegistry { bands })
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Band> {
        self.bands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|b| b.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// PixelSpectrum – one pixel's signature, sorted by wavelength
// ---------------------------------------------------------------------------

/// One row of the persisted spectrum table.
///
/// Field renames pin the CSV header to `Band,Wavelength_nm,Reflectance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralSample {
    #[serde(rename = "Band")]
    pub band: String,
    #[serde(rename = "Wavelength_nm")]
    pub wavelength_nm: u32,
    #[serde(rename = "Reflectance")]
    pub reflectance: f64,
}

/// The spectral signature of a single raster pixel.
///
/// Samples are kept strictly ascending by wavelength, which generally
/// differs from the registry's sensor-channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSpectrum {
    pub row: usize,
    pub col: usize,
    samples: Vec<SpectralSample>,
}

impl PixelSpectrum {
    /// Slice `cube` at (row, col) across the band axis and pair the values
    /// with the registry metadata.
    pub fn extract(
        cube: &Array3<f64>,
        registry: &BandRegistry,
        row: usize,
        col: usize,
    ) -> Result<Self, ModelError> {
        let shape = cube.shape();
        if shape[0] != registry.len() {
            return Err(ModelError::BandAxisMismatch {
                registry: registry.len(),
                cube: shape[0],
            });
        }
        if row >= shape[1] || col >= shape[2] {
            return Err(ModelError::PixelOutOfBounds {
                row,
                col,
                rows: shape[1],
                cols: shape[2],
            });
        }

        let samples = registry
            .iter()
            .enumerate()
            .map(|(b, band)| SpectralSample {
                band: band.name.clone(),
                wavelength_nm: band.wavelength_nm,
                reflectance: cube[[b, row, col]],
            })
            .collect();

        Ok(Self::from_samples(row, col, samples))
    }

    /// Build a spectrum from already-paired samples (e.g. re-loaded CSV
    /// rows), restoring the wavelength ordering invariant.
    pub fn from_samples(row: usize, col: usize, mut samples: Vec<SpectralSample>) -> Self {
        samples.sort_by_key(|s| s.wavelength_nm);
        PixelSpectrum { row, col, samples }
    }

    pub fn samples(&self) -> &[SpectralSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Reflectance of the sample whose band name matches exactly.
    pub fn reflectance_of(&self, band: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.band == band)
            .map(|s| s.reflectance)
    }
}

// ---------------------------------------------------------------------------
// BandStatistics – per-band spatial summary
// ---------------------------------------------------------------------------

/// Min / max / mean of one band over the full spatial extent.
#[derive(Debug, Clone, PartialEq)]
pub struct BandStatistics {
    pub band: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl fmt::Display for BandStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8}: min={:.4}, max={:.4}, mean={:.4}",
            self.band, self.min, self.max, self.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn registry() -> BandRegistry {
        BandRegistry::new(vec![
            Band::new("Blue", 490),
            Band::new("Red", 665),
            Band::new("NIR", 865),
        ])
        .unwrap()
    }

    #[test]
    fn registry_rejects_duplicate_names() {
        let result = BandRegistry::new(vec![Band::new("Red", 665), Band::new("Red", 700)]);
        assert!(matches!(result, Err(ModelError::DuplicateBandName(_))));
    }

    #[test]
    fn registry_rejects_duplicate_wavelengths() {
        let result = BandRegistry::new(vec![Band::new("Red", 665), Band::new("RedEdge", 665)]);
        assert!(matches!(result, Err(ModelError::DuplicateWavelength(665))));
    }

    #[test]
    fn registry_rejects_empty() {
        assert!(matches!(
            BandRegistry::new(Vec::new()),
            Err(ModelError::EmptyRegistry)
        ));
    }

    #[test]
    fn extract_sorts_by_wavelength() {
        // Registry deliberately out of wavelength order.
        let reg = BandRegistry::new(vec![
            Band::new("NIR", 865),
            Band::new("Blue", 490),
            Band::new("Red", 665),
        ])
        .unwrap();
        let mut cube = Array3::<f64>::zeros((3, 2, 2));
        cube[[0, 1, 1]] = 0.46;
        cube[[1, 1, 1]] = 0.12;
        cube[[2, 1, 1]] = 0.22;

        let spectrum = PixelSpectrum::extract(&cube, &reg, 1, 1).unwrap();
        let wavelengths: Vec<u32> = spectrum.samples().iter().map(|s| s.wavelength_nm).collect();
        assert_eq!(wavelengths, vec![490, 665, 865]);
        assert!(wavelengths.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(spectrum.len(), 3);
        assert_eq!(spectrum.reflectance_of("NIR"), Some(0.46));
    }

    #[test]
    fn extract_checks_band_axis() {
        let cube = Array3::<f64>::zeros((2, 2, 2));
        let result = PixelSpectrum::extract(&cube, &registry(), 0, 0);
        assert!(matches!(result, Err(ModelError::BandAxisMismatch { .. })));
    }

    #[test]
    fn extract_checks_pixel_bounds() {
        let cube = Array3::<f64>::zeros((3, 2, 2));
        let result = PixelSpectrum::extract(&cube, &registry(), 2, 0);
        assert!(matches!(result, Err(ModelError::PixelOutOfBounds { .. })));
    }

    #[test]
    fn statistics_display_is_aligned() {
        let stats = BandStatistics {
            band: "Blue".into(),
            min: 0.1201,
            max: 0.1503,
            mean: 0.1352,
        };
        assert_eq!(
            stats.to_string(),
            "Blue    : min=0.1201, max=0.1503, mean=0.1352"
        );
    }
}

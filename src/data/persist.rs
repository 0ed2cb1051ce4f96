use std::path::Path;

use anyhow::{Context, Result};

use super::model::{PixelSpectrum, SpectralSample};

// ---------------------------------------------------------------------------
// Tabular persistence for pixel spectra
// ---------------------------------------------------------------------------

/// Write the spectrum as `Band,Wavelength_nm,Reflectance` rows, one per
/// band, in ascending-wavelength order and without an index column.
///
/// Reflectance keeps full float precision (shortest round-trip form). The
/// writer is flushed before success is reported and closed on every exit
/// path. There is no overwrite protection; a missing parent directory or a
/// permission problem propagates as a fatal error.
pub fn save_spectrum_csv(path: &Path, spectrum: &PixelSpectrum) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating spectrum CSV at {}", path.display()))?;

    for sample in spectrum.samples() {
        writer
            .serialize(sample)
            .with_context(|| format!("writing row for band '{}'", sample.band))?;
    }
    writer.flush().context("flushing spectrum CSV")?;

    log::info!(
        "saved {} spectrum rows to {}",
        spectrum.len(),
        path.display()
    );
    Ok(())
}

/// Re-load a spectrum table written by [`save_spectrum_csv`].
///
/// The pixel location is not part of the table schema, so the caller
/// supplies it. Rows are re-sorted by wavelength on ingest.
pub fn load_spectrum_csv(path: &Path, row: usize, col: usize) -> Result<PixelSpectrum> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening spectrum CSV at {}", path.display()))?;

    let mut samples = Vec::new();
    for (row_no, record) in reader.deserialize::<SpectralSample>().enumerate() {
        let sample = record.with_context(|| format!("CSV row {row_no}"))?;
        samples.push(sample);
    }

    log::debug!("loaded {} spectrum rows from {}", samples.len(), path.display());
    Ok(PixelSpectrum::from_samples(row, col, samples))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    use super::*;

    fn spectrum() -> PixelSpectrum {
        PixelSpectrum::from_samples(
            1,
            2,
            vec![
                SpectralSample {
                    band: "NIR".into(),
                    wavelength_nm: 865,
                    reflectance: 0.4782103915,
                },
                SpectralSample {
                    band: "Blue".into(),
                    wavelength_nm: 490,
                    reflectance: 0.1403319801,
                },
                SpectralSample {
                    band: "Red".into(),
                    wavelength_nm: 665,
                    reflectance: 0.2417777003,
                },
            ],
        )
    }

    #[test]
    fn round_trip_preserves_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spectrum.csv");
        let original = spectrum();

        save_spectrum_csv(&path, &original).unwrap();
        let reloaded = load_spectrum_csv(&path, 1, 2).unwrap();

        assert_eq!(reloaded.len(), original.len());
        for (a, b) in original.samples().iter().zip(reloaded.samples()) {
            assert_eq!(a.band, b.band);
            assert_eq!(a.wavelength_nm, b.wavelength_nm);
            assert_relative_eq!(a.reflectance, b.reflectance, epsilon = 1e-12);
        }
    }

    #[test]
    fn header_and_row_order_match_the_contract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spectrum.csv");
        save_spectrum_csv(&path, &spectrum()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Band,Wavelength_nm,Reflectance"));
        // Ascending wavelength, not sensor-channel order.
        let first_band: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(first_band[0], "Blue");
        assert_eq!(first_band[1], "490");
    }

    #[test]
    fn missing_parent_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("spectrum.csv");
        assert!(save_spectrum_csv(&path, &spectrum()).is_err());
    }
}

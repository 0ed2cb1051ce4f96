/// Data layer: core types, synthesis, georeferencing, analysis, persistence.
///
/// Architecture:
/// ```text
///  SynthesisParams + SceneRng
///        │
///        ▼
///   ┌──────────┐
///   │  synth    │  build (band, row, col) cube, clip to [0, 1]
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ PixelSpectrum  │  slice one pixel, sort by wavelength
///   └───────────────┘
///        │
///        ├──────────► persist   CSV out / back in
///        ▼
///   ┌──────────┐
///   │ analysis  │  NDVI + per-band min/max/mean
///   └──────────┘
/// ```
/// `geo` maps pixel indices to geographic coordinates alongside.

pub mod analysis;
pub mod geo;
pub mod model;
pub mod persist;
pub mod synth;

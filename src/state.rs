use crate::color::BandColors;
use crate::scene::Scene;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct ViewerState {
    /// The computed scene being displayed.
    pub scene: Scene,

    /// Stable per-band marker colours.
    pub band_colors: BandColors,

    /// Rescale the signature into [0, 1] before plotting.
    pub minmax_scaling: bool,
}

impl ViewerState {
    pub fn new(scene: Scene) -> Self {
        let band_colors = BandColors::new(scene.registry.names());
        ViewerState {
            scene,
            band_colors,
            minmax_scaling: false,
        }
    }
}

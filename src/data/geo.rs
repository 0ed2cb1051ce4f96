use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GeoTransform – affine pixel → geographic mapping
// ---------------------------------------------------------------------------

/// Affine georeference for a north-up raster.
///
/// `origin_x`/`origin_y` locate the upper-left corner; latitude decreases
/// as the row index grows, so `y_res` is kept positive and subtracted.
/// The CRS label is carried as metadata only, no projection math happens
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub x_res: f64,
    pub y_res: f64,
    pub crs: String,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, x_res: f64, y_res: f64, crs: impl Into<String>) -> Self {
        GeoTransform {
            origin_x,
            origin_y,
            x_res,
            y_res,
            crs: crs.into(),
        }
    }

    /// Map integer pixel indices to (lon, lat).
    ///
    /// With `center` set the coordinate names the pixel center (half-pixel
    /// shift), otherwise its upper-left corner. Indices are not checked
    /// against any raster extent; that is the caller's contract.
    pub fn rowcol_to_xy(&self, row: usize, col: usize, center: bool) -> (f64, f64) {
        if center {
            let lon = self.origin_x + (col as f64 + 0.5) * self.x_res;
            let lat = self.origin_y - (row as f64 + 0.5) * self.y_res;
            (lon, lat)
        } else {
            let lon = self.origin_x + col as f64 * self.x_res;
            let lat = self.origin_y - row as f64 * self.y_res;
            (lon, lat)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn transform() -> GeoTransform {
        GeoTransform::new(-59.0, 15.0, 0.01, 0.01, "EPSG:4326")
    }

    #[test]
    fn pixel_center_coordinate() {
        let (lon, lat) = transform().rowcol_to_xy(1, 2, true);
        assert_relative_eq!(lon, -58.975, epsilon = 1e-5);
        assert_relative_eq!(lat, 14.985, epsilon = 1e-5);
    }

    #[test]
    fn pixel_corner_coordinate() {
        let (lon, lat) = transform().rowcol_to_xy(1, 2, false);
        assert_relative_eq!(lon, -58.98, epsilon = 1e-5);
        assert_relative_eq!(lat, 14.99, epsilon = 1e-5);
    }

    #[test]
    fn origin_corner_maps_to_origin() {
        let (lon, lat) = transform().rowcol_to_xy(0, 0, false);
        assert_relative_eq!(lon, -59.0, epsilon = 1e-12);
        assert_relative_eq!(lat, 15.0, epsilon = 1e-12);
    }
}

use ndarray::Array3;

// ---------------------------------------------------------------------------
// SceneRng – explicit deterministic randomness
// ---------------------------------------------------------------------------

/// Minimal deterministic PRNG (xoshiro256**).
///
/// The generator state is passed explicitly to every consumer, so the same
/// seed reproduces bit-identical scenes and tests can inject their own.
pub struct SceneRng {
    state: [u64; 4],
}

impl SceneRng {
    pub fn seeded(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SceneRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution.
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Cube synthesis
// ---------------------------------------------------------------------------

/// Shape and signal model of a synthetic reflectance cube.
///
/// `base_reflectance` carries one entry per band, in registry order.
#[derive(Debug, Clone)]
pub struct SynthesisParams {
    pub base_reflectance: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
    pub row_gradient_step: f64,
    pub col_gradient_step: f64,
    pub noise_sigma: f64,
}

/// Build the (band, row, col) reflectance cube.
///
/// Each element is base + spatial gradient + Gaussian noise; the finished
/// cube is clipped into [0, 1]. Clipping is silent normalization, nothing
/// is counted or logged.
pub fn synthesize_cube(params: &SynthesisParams, rng: &mut SceneRng) -> Array3<f64> {
    let mut cube = Array3::<f64>::zeros((params.base_reflectance.len(), params.rows, params.cols));

    for (b, &base) in params.base_reflectance.iter().enumerate() {
        for row in 0..params.rows {
            for col in 0..params.cols {
                let gradient =
                    row as f64 * params.row_gradient_step + col as f64 * params.col_gradient_step;
                cube[[b, row, col]] = base + gradient + rng.gauss(0.0, params.noise_sigma);
            }
        }
    }

    cube.mapv_inplace(|v| v.clamp(0.0, 1.0));

    log::debug!(
        "synthesized cube of shape ({}, {}, {})",
        params.base_reflectance.len(),
        params.rows,
        params.cols
    );
    cube
}

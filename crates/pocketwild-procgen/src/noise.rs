//! Seeded 2D value noise.
//!
//! Lattice values come from an integer hash of (x, y, seed); samples between
//! lattice points are smoothstep-interpolated. Output is in [0, 1).

/// Hash a lattice point to [0, 1).
pub fn lattice(x: i64, y: i64, seed: u64) -> f64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    h ^= (x as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = h.rotate_left(31);
    h ^= (y as u64).wrapping_mul(0x94D0_49BB_1331_11EB);
    // splitmix64 finalizer
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 31;
    (h >> 11) as f64 / (1u64 << 53) as f64
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Smoothed value noise over the infinite plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueNoise {
    seed: u64,
}

impl ValueNoise {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Sample at a continuous coordinate.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = smoothstep(x - x0);
        let ty = smoothstep(y - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let v00 = lattice(ix, iy, self.seed);
        let v10 = lattice(ix + 1, iy, self.seed);
        let v01 = lattice(ix, iy + 1, self.seed);
        let v11 = lattice(ix + 1, iy + 1, self.seed);

        let top = v00 + (v10 - v00) * tx;
        let bottom = v01 + (v11 - v01) * tx;
        top + (bottom - top) * ty
    }
}

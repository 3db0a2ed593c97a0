//! Gradient noise for terrain generation.
//!
//! Provides a seed-based 2D gradient noise field with a fractal sum (fBm)
//! helper. Each field owns its permutation table, so two fields built from
//! the same seed always agree and never share hidden RNG state.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Diagonal gradient vectors, indexed by the low 2 bits of a hashed lookup.
const GRAD2: [[f64; 2]; 4] = [[1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]];

/// Improved Perlin fade function: 6t^5 - 15t^4 + 10t^3.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation.
#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the selected gradient with a corner offset.
#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let g = &GRAD2[(hash & 3) as usize];
    g[0] * x + g[1] * y
}

/// Seed-based 2D gradient noise field.
#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    perm: [u8; 512],
}

impl NoiseField {
    /// Build the field's permutation table by shuffling `0..=255` with the seed.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        // Duplicated so `perm[a + 1]` never needs wrapping.
        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);
        Self { seed, perm }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 2D gradient noise at (x, y). Returns a value in [-1, 1].
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;

        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        let d00 = grad(self.perm[a], xf, yf);
        let d10 = grad(self.perm[b], xf - 1.0, yf);
        let d01 = grad(self.perm[a + 1], xf, yf - 1.0);
        let d11 = grad(self.perm[b + 1], xf - 1.0, yf - 1.0);

        lerp(v, lerp(u, d00, d10), lerp(u, d01, d11))
    }

    /// Fractal sum of `octaves` noise samples.
    ///
    /// Frequency doubles and amplitude halves every octave; the sum is divided
    /// by the total amplitude so the result stays in [-1, 1].
    pub fn fbm(&self, x: f64, y: f64, frequency: f64, amplitude: f64, octaves: u32) -> f64 {
        let mut value = 0.0;
        let mut max_amplitude = 0.0;
        let mut frequency = frequency;
        let mut amplitude = amplitude;

        for _ in 0..octaves {
            value += self.noise(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            frequency *= 2.0;
            amplitude /= 2.0;
        }

        if max_amplitude == 0.0 {
            return 0.0;
        }
        value / max_amplitude
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

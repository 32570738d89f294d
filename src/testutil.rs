//! Deterministic fixtures for unit tests.

use std::f64::consts::PI;

use crate::data::model::LightCurvePoint;

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Jittered sampling times: `i * step` plus up to half a step of jitter.
pub fn jittered_times(rng: &mut SimpleRng, n: usize, step: f64) -> Vec<f64> {
    (0..n)
        .map(|i| i as f64 * step + rng.next_f64() * step * 0.5)
        .collect()
}

/// Noise-free sinusoidal variable star sampled at `times`.
pub fn sinusoid(times: &[f64], base: f64, amplitude: f64, period: f64) -> Vec<LightCurvePoint> {
    times
        .iter()
        .map(|&t| LightCurvePoint::new(t, base + amplitude * (2.0 * PI * t / period).sin(), 0.02))
        .collect()
}

/// Gaussian white noise around `base` sampled at `times`.
pub fn white_noise(
    rng: &mut SimpleRng,
    times: &[f64],
    base: f64,
    std_dev: f64,
) -> Vec<LightCurvePoint> {
    times
        .iter()
        .map(|&t| LightCurvePoint::new(t, rng.gauss(base, std_dev), 0.02))
        .collect()
}

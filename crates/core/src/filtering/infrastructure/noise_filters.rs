use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::color::clamp_channel;
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

/// Amplitude of the watercolor wash, in channel units (±10).
const WATERCOLOR_SPREAD: f64 = 20.0;

/// Adds one uniform offset per pixel to all three color channels.
///
/// A fresh `StdRng` is seeded on every `apply`, so the same seed always
/// produces the same grain on the same buffer.
fn add_uniform_noise(buffer: &mut PixelBuffer, seed: u64, spread: f64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for px in buffer.data_mut().chunks_exact_mut(CHANNELS) {
        let noise = (rng.gen::<f64>() - 0.5) * spread;
        for c in &mut px[..3] {
            *c = clamp_channel(*c as f64 + noise);
        }
    }
}

/// Film grain: offsets in `±amount`, `amount` in `[0, 100]`.
pub struct FilmGrain {
    amount: f64,
    seed: u64,
}

impl FilmGrain {
    pub fn new(amount: f64, seed: u64) -> Self {
        Self {
            amount: amount.clamp(0.0, 100.0),
            seed,
        }
    }
}

impl PixelFilter for FilmGrain {
    fn name(&self) -> &str {
        "film-grain"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        if self.amount == 0.0 {
            return;
        }
        add_uniform_noise(buffer, self.seed, self.amount * 2.0);
    }
}

/// Soft ±10 wash that mimics pigment unevenness.
pub struct Watercolor {
    seed: u64,
}

impl Watercolor {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl PixelFilter for Watercolor {
    fn name(&self) -> &str {
        "watercolor"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        add_uniform_noise(buffer, self.seed, WATERCOLOR_SPREAD);
    }
}

//! Deterministic per-vertex colors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// RGBA color, channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VertexColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl VertexColor {
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Generator for the color stream. Same seed, same sequence.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Draw one opaque color per position, in position order.
pub fn generate_colors<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<VertexColor> {
    (0..count)
        .map(|_| {
            let r = round2(rng.random::<f64>());
            let g = round2(rng.random::<f64>());
            let b = round2(rng.random::<f64>());
            VertexColor::opaque(r, g, b)
        })
        .collect()
}

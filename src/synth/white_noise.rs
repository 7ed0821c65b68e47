use rand::Rng;

use super::params::white_noise::GAIN;

pub(crate) fn render<R: Rng + ?Sized>(rng: &mut R, frames: usize) -> Vec<f32> {
    (0..frames).map(|_| rng.gen_range(-1.0f32..1.0) * GAIN).collect()
}

//! Bubbles: rising-pitch bursts over an underwater rumble

use rand::Rng;

use super::params::bubble::*;
use super::shape::{fade_edges, NoiseBed, partial, Bursts};

pub(crate) fn render<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32, frames: usize) -> Vec<f32> {
    let sr = sample_rate as f32;
    let mut bubbles = Bursts::new(BUBBLES);
    let mut small = Bursts::new(SMALL_BUBBLES);
    let mut bed = NoiseBed::new(NOISE_TERMS, NOISE_POWER);
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let t = i as f32 / sr;

        let mut sample = bed.next(rng) * NOISE_GAIN;
        sample += bubbles.step(rng, sr);
        sample += small.step(rng, sr);
        sample += UNDERWATER.iter().map(|p| partial(p, t)).sum::<f32>();

        out.push(sample * MASTER_GAIN);
    }

    fade_edges(&mut out, (FADE_SECS * sample_rate as f64) as usize);
    out
}

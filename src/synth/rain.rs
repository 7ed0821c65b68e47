//! Rain: a dark noise bed with raindrop and puddle-splash impulses

use rand::Rng;

use super::params::rain::*;
use super::shape::{fade_edges, NoiseBed, Bursts};

pub(crate) fn render<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32, frames: usize) -> Vec<f32> {
    let sr = sample_rate as f32;
    let mut drops = Bursts::new(DROPS);
    let mut splashes = Bursts::new(SPLASHES);
    let mut bed = NoiseBed::new(NOISE_TERMS, NOISE_POWER);
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let t = i as f32 / sr;

        let mut sample = bed.next(rng) * NOISE_GAIN;
        sample += drops.step(rng, sr);
        sample += splashes.step(rng, sr);

        let intensity = INTENSITY_BASE
            + INTENSITY_DEPTH * (INTENSITY_RATES.0 * t).sin() * (INTENSITY_RATES.1 * t).sin();
        out.push(sample * intensity * MASTER_GAIN);
    }

    fade_edges(&mut out, (FADE_SECS * sample_rate as f64) as usize);
    out
}

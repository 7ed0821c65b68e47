//! Flowing water: pink-ish noise, turbulent low partials and sparse droplets

use rand::Rng;

use super::params::water::*;
use super::shape::{fade_edges, NoiseBed, partial, Bursts};

pub(crate) fn render<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32, frames: usize) -> Vec<f32> {
    let sr = sample_rate as f32;
    let mut droplets = Bursts::new(DROPLETS);
    let mut bed = NoiseBed::new(NOISE_TERMS, NOISE_POWER);
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let t = i as f32 / sr;

        let mut sample = bed.next(rng) * NOISE_GAIN;
        sample += PARTIALS.iter().map(|p| partial(p, t)).sum::<f32>();
        sample += droplets.step(rng, sr);

        let swell = 1.0 + SWELL_DEPTH * (SWELL_RATES.0 * t).sin() * (SWELL_RATES.1 * t).sin();
        out.push(sample * swell * MASTER_GAIN);
    }

    fade_edges(&mut out, (FADE_SECS * sample_rate as f64) as usize);
    out
}

//! Birdsong: two gated, warbling voices over a near-silent forest bed

use core::f32::consts::TAU;

use rand::Rng;

use super::params::birds::*;
use super::params::{BirdParams, ChirpEnvelope};
use super::shape::{fade_edges, NoiseBed, Bursts};

/// A bird voice with its own running oscillator phase.
struct Bird {
    params: BirdParams,
    phase: f32,
}

impl Bird {
    fn new(params: BirdParams) -> Self {
        Self { params, phase: 0.0 }
    }

    #[inline]
    fn is_singing(&self, t: f32) -> bool {
        let p = &self.params;
        (p.gate_rate * t + p.gate_offset).sin() > p.gate_threshold
    }

    #[inline]
    fn envelope(&self, t: f32) -> f32 {
        match self.params.envelope {
            ChirpEnvelope::Sine { rate } => 0.5 + 0.5 * (rate * t).sin(),
            ChirpEnvelope::Sawtooth { rate_hz, sharpness } => (-sharpness * (rate_hz * t).fract()).exp(),
        }
    }

    #[inline]
    fn next(&mut self, t: f32, sample_rate: f32) -> f32 {
        if !self.is_singing(t) {
            return 0.0;
        }

        let p = &self.params;
        let freq = p.base_hz
            + p.warble.iter().map(|&(depth, rate)| depth * (rate * t).sin()).sum::<f32>();
        let sample = self.phase.sin() * self.envelope(t) * p.amplitude;
        self.phase = (self.phase + TAU * freq / sample_rate).rem_euclid(TAU);
        if p.half_wave {
            sample.max(0.0)
        } else {
            sample
        }
    }
}

pub(crate) fn render<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32, frames: usize) -> Vec<f32> {
    let sr = sample_rate as f32;
    let mut high = Bird::new(HIGH);
    let mut low = Bird::new(LOW);
    let mut distant = Bursts::new(DISTANT);
    let mut bed = NoiseBed::new(NOISE_TERMS, NOISE_POWER);
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let t = i as f32 / sr;

        let mut sample = bed.next(rng) * NOISE_GAIN;
        sample += high.next(t, sr);
        sample += low.next(t, sr);
        sample += distant.step(rng, sr);

        out.push(sample * MASTER_GAIN);
    }

    // Seams at 8 s are hard to hear, but fade anyway for shorter loops.
    fade_edges(&mut out, (FADE_SECS * sample_rate as f64) as usize);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_open_inside_the_default_loop() {
        let high = Bird::new(HIGH);
        let low = Bird::new(LOW);

        // sin(0.3t) > 0.7 between ~2.6 s and ~7.9 s
        assert!(!high.is_singing(1.0));
        assert!(high.is_singing(5.0));
        // sin(0.23t + 1.5) > 0.8 only near the start
        assert!(low.is_singing(0.5));
        assert!(!low.is_singing(6.0));
    }

    #[test]
    fn silent_bird_does_not_advance() {
        let mut high = Bird::new(HIGH);
        assert_eq!(high.next(0.0, 48_000.0), 0.0);
        assert_eq!(high.phase, 0.0);
    }

    #[test]
    fn high_bird_keeps_only_positive_half() {
        let mut high = Bird::new(HIGH);
        let mut low = Bird::new(LOW);
        let sr = 48_000.0;
        // High gate is open around 2.7 s, low gate around 0.5 s
        let (mut high_neg, mut high_pos, mut low_neg) = (0, 0, 0);
        for i in 0..4_800 {
            let dt = i as f32 / sr;
            let h = high.next(2.7 + dt, sr);
            high_neg += (h < 0.0) as usize;
            high_pos += (h > 0.0) as usize;
            low_neg += (low.next(0.5 + dt, sr) < 0.0) as usize;
        }
        assert_eq!(high_neg, 0);
        assert!(high_pos > 1_000);
        assert!(low_neg > 0);
    }

    #[test]
    fn sawtooth_envelope_restarts_every_period() {
        let low = Bird::new(LOW);
        let start = low.envelope(0.0);
        let late = low.envelope(0.49);
        let restarted = low.envelope(0.5);
        assert!((start - 1.0).abs() < 1e-6);
        assert!(late < 0.3);
        assert!(restarted > 0.99);
    }
}

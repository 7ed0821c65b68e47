//! Building blocks shared by the synthesizers

use core::f32::consts::TAU;

use rand::Rng;

use super::params::{BurstParams, Partial};

/// Low-biased noise: `terms` rows of uniform noise in `[-1, 1)`, the k-th row
/// scaled by `1 / k^power` and redrawn every `2^(terms - k)` samples.
///
/// The heavily weighted rows change slowest, so the energy leans toward low
/// frequencies. The output is bounded by `sum(1 / k^power)`.
pub(crate) struct NoiseBed {
    rows: Vec<f32>,
    power: i32,
    counter: u32,
}

impl NoiseBed {
    pub fn new(terms: u32, power: i32) -> Self {
        Self {
            rows: vec![0.0; terms as usize],
            power,
            counter: 0,
        }
    }

    #[inline]
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        let counter = self.counter;
        let power = self.power;
        let slowest = self.rows.len().saturating_sub(1);
        for (k, row) in self.rows.iter_mut().enumerate() {
            if counter % (1u32 << (slowest - k)) == 0 {
                *row = rng.gen_range(-1.0f32..1.0) / ((k + 1) as f32).powi(power);
            }
        }
        self.counter = counter.wrapping_add(1);
        self.rows.iter().sum()
    }
}

/// Evaluate a phase-modulated partial at time `t` seconds.
#[inline]
pub(crate) fn partial(p: &Partial, t: f32) -> f32 {
    (TAU * p.freq_hz * t + p.mod_depth * (p.mod_rate * t).sin()).sin() * p.amplitude
}

#[inline]
fn lerp_range<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    lo + (hi - lo) * rng.gen::<f32>()
}

/// A single sounding burst.
struct Burst {
    phase: f32,
    freq_hz: f32,
    rise: f32,
    amplitude: f32,
    decay_per_sec: f32,
    age: u32,
    len: u32,
}

impl Burst {
    #[inline]
    fn next(&mut self, sample_rate: f32) -> Option<f32> {
        if self.age >= self.len {
            return None;
        }

        let progress = self.age as f32 / self.len as f32;
        let envelope = (-self.decay_per_sec * self.age as f32 / sample_rate).exp();
        let sample = self.phase.sin() * self.amplitude * envelope;

        let freq = self.freq_hz * (1.0 + (self.rise - 1.0) * progress);
        self.phase = (self.phase + TAU * freq / sample_rate).rem_euclid(TAU);
        self.age += 1;

        Some(sample)
    }
}

/// A family of randomly triggered bursts with a polyphony cap.
///
/// The cap bounds the summed output to `max_active * amplitude`.
pub(crate) struct Bursts {
    params: BurstParams,
    active: Vec<Burst>,
}

impl Bursts {
    pub fn new(params: BurstParams) -> Self {
        Self {
            params,
            active: Vec::with_capacity(params.max_active),
        }
    }

    /// Possibly trigger a new burst, then return the sum of all sounding bursts.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, sample_rate: f32) -> f32 {
        let p = &self.params;
        if self.active.len() < p.max_active && rng.gen::<f32>() < p.probability {
            let lifetime = lerp_range(rng, p.lifetime_secs);
            self.active.push(Burst {
                phase: 0.0,
                freq_hz: lerp_range(rng, p.freq_hz),
                rise: p.rise,
                amplitude: p.amplitude,
                decay_per_sec: p.decay_per_sec,
                age: 0,
                len: ((lifetime * sample_rate) as u32).max(1),
            });
        }

        let mut sum = 0.0;
        self.active.retain_mut(|burst| match burst.next(sample_rate) {
            Some(s) => {
                sum += s;
                true
            }
            None => false,
        });
        sum
    }

    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.active.len()
    }
}

/// Ramp both ends of the buffer linearly so the first and last samples are
/// exactly zero and the loop seam cannot click.
///
/// Fades longer than half the buffer are shortened to half the buffer.
pub(crate) fn fade_edges(samples: &mut [f32], fade_len: usize) {
    let n = samples.len();
    if n == 0 {
        return;
    }
    let fade = fade_len.min(n / 2).max(1);

    for (i, s) in samples.iter_mut().enumerate() {
        let edge = i.min(n - 1 - i);
        if edge < fade {
            *s *= edge as f32 / fade as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn noise_bed_stays_within_harmonic_bound() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut bed = NoiseBed::new(8, 1);
        let bound: f32 = (1..=8).map(|j| 1.0 / j as f32).sum();
        for _ in 0..10_000 {
            assert!(bed.next(&mut rng).abs() <= bound + 1e-5);
        }
    }

    #[test]
    fn noise_bed_leans_low() {
        // Mean squared first difference over variance is ~2 for white noise.
        let mut rng = SmallRng::seed_from_u64(11);
        let mut bed = NoiseBed::new(8, 1);
        let samples: Vec<f32> = (0..50_000).map(|_| bed.next(&mut rng)).collect();
        let energy: f32 = samples.iter().map(|s| s * s).sum();
        let diff: f32 = samples.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        assert!(diff / energy < 1.5);
    }

    #[test]
    fn bursts_respect_polyphony_cap() {
        let mut rng = SmallRng::seed_from_u64(1);
        let params = BurstParams {
            probability: 1.0,
            freq_hz: (100.0, 200.0),
            lifetime_secs: (1.0, 1.0),
            decay_per_sec: 0.0,
            amplitude: 0.25,
            rise: 1.0,
            max_active: 3,
        };
        let mut bursts = Bursts::new(params);
        for _ in 0..1000 {
            let s = bursts.step(&mut rng, 1000.0);
            assert!(s.abs() <= 0.75 + 1e-6);
            assert!(bursts.active() <= 3);
        }
    }

    #[test]
    fn bursts_expire_after_their_lifetime() {
        let mut rng = SmallRng::seed_from_u64(2);
        let params = BurstParams {
            probability: 1.0,
            freq_hz: (50.0, 50.0),
            lifetime_secs: (0.01, 0.01),
            decay_per_sec: 10.0,
            amplitude: 0.5,
            rise: 1.5,
            max_active: 1,
        };
        let mut bursts = Bursts::new(params);
        bursts.step(&mut rng, 1000.0);
        assert_eq!(bursts.active(), 1);

        // Lifetime is 10 samples; it must have been replaced at least once by now.
        let mut saw_restart = false;
        for _ in 0..20 {
            bursts.step(&mut rng, 1000.0);
            if bursts.active.first().map(|b| b.age) == Some(1) {
                saw_restart = true;
            }
        }
        assert!(saw_restart);
    }

    #[test]
    fn fade_zeroes_both_ends() {
        let mut samples = vec![1.0f32; 100];
        fade_edges(&mut samples, 10);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[99], 0.0);
        assert_eq!(samples[50], 1.0);
        assert!((samples[5] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fade_longer_than_buffer_is_clamped() {
        let mut samples = vec![1.0f32; 9];
        fade_edges(&mut samples, 1_000);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[8], 0.0);
        assert!(samples[4] > 0.0);
    }
}

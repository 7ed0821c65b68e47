//! Procedural synthesis of every sound class.
//!
//! Each class renders a mono, loopable [`SampleBuffer`] of exactly
//! `round(sample_rate * duration)` samples from nothing but a random source:
//!
//! | class         | ingredients                                                  | seam fade |
//! |---------------|--------------------------------------------------------------|-----------|
//! | `water`       | low-biased noise, turbulent 120/180/240 Hz partials, droplets | 0.1 s     |
//! | `rain`        | darker noise bed, raindrops, puddle splashes                  | 0.2 s     |
//! | `birds`       | faint bed, two gated warbling birds, distant calls            | 0.1 s     |
//! | `bubble`      | rumble bed, rising-pitch bubbles, small bubbles, 60/90 Hz     | 0.1 s     |
//! | `white-noise` | uniform noise                                                 | none      |
//! | `warning`     | 800/1200 Hz beeps, 600-1000 Hz siren, half-sine pulsing       | none      |
//!
//! Every impulsive layer has a polyphony cap, so the peak level of each class
//! is bounded by construction and stays inside `[-1, 1]`.
//!
//! Tuning constants live in [`params`].

pub mod params;
mod shape;
mod water;
mod rain;
mod birds;
mod bubble;
mod white_noise;
mod alarm;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::buffer::SampleBuffer;
use crate::sound::SoundClass;

/// Loop length used when a class is synthesized for playback.
pub fn default_duration(class: SoundClass) -> f64 {
    match class {
        SoundClass::Water => params::water::DURATION_SECS,
        SoundClass::Rain => params::rain::DURATION_SECS,
        SoundClass::Birds => params::birds::DURATION_SECS,
        SoundClass::Bubble => params::bubble::DURATION_SECS,
        SoundClass::WhiteNoise => params::white_noise::DURATION_SECS,
        SoundClass::Warning => params::alarm::DURATION_SECS,
    }
}

/// Synthesize `duration_secs` of `class` at `sample_rate`, seeded from OS entropy.
pub fn synthesize(class: SoundClass, sample_rate: u32, duration_secs: f64) -> SampleBuffer {
    let mut rng = SmallRng::from_entropy();
    synthesize_with(class, sample_rate, duration_secs, &mut rng)
}

/// Synthesize one default-length loop of `class`.
pub fn synthesize_loop(class: SoundClass, sample_rate: u32) -> SampleBuffer {
    synthesize(class, sample_rate, default_duration(class))
}

/// Synthesize with a caller-supplied random source.
///
/// With a seeded generator the output is reproducible.
pub fn synthesize_with<R: Rng + ?Sized>(
    class: SoundClass,
    sample_rate: u32,
    duration_secs: f64,
    rng: &mut R,
) -> SampleBuffer {
    let sample_rate = sample_rate.max(1);
    let frames = SampleBuffer::frames_for(sample_rate, duration_secs);

    let samples = match class {
        SoundClass::Water => water::render(rng, sample_rate, frames),
        SoundClass::Rain => rain::render(rng, sample_rate, frames),
        SoundClass::Birds => birds::render(rng, sample_rate, frames),
        SoundClass::Bubble => bubble::render(rng, sample_rate, frames),
        SoundClass::WhiteNoise => white_noise::render(rng, frames),
        SoundClass::Warning => alarm::render(sample_rate, frames),
    };

    SampleBuffer::new(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    fn seeded(class: SoundClass, sample_rate: u32, secs: f64, seed: u64) -> SampleBuffer {
        let mut rng = SmallRng::seed_from_u64(seed);
        synthesize_with(class, sample_rate, secs, &mut rng)
    }

    /// Power of `freq` in `samples` via the Goertzel recurrence.
    fn goertzel(samples: &[f32], sample_rate: u32, freq: f32) -> f32 {
        let coeff = 2.0 * (TAU * freq / sample_rate as f32).cos();
        let (mut s1, mut s2) = (0.0f32, 0.0f32);
        for &x in samples {
            let s0 = x + coeff * s1 - s2;
            s2 = s1;
            s1 = s0;
        }
        (s1 * s1 + s2 * s2 - coeff * s1 * s2) / samples.len() as f32
    }

    /// Mean squared first difference over mean square. ~2 for white noise,
    /// small for signals dominated by low frequencies.
    fn roughness(samples: &[f32]) -> f32 {
        let energy: f32 = samples.iter().map(|s| s * s).sum();
        let diff: f32 = samples.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        diff / energy
    }

    #[test]
    fn every_class_has_exact_length_and_bounded_amplitude() {
        let cases: [(u32, f64); 5] = [(48_000, 1.0), (44_100, 0.5), (22_050, 2.3), (8_000, 0.2), (3, 1.5)];
        for class in SoundClass::ALL {
            for (i, &(rate, secs)) in cases.iter().enumerate() {
                let buf = seeded(class, rate, secs, i as u64);
                let expected = (rate as f64 * secs).round() as usize;
                assert_eq!(buf.len(), expected, "{} at {} Hz for {} s", class, rate, secs);
                assert_eq!(buf.sample_rate(), rate);
                assert!(buf.peak() <= 1.05, "{} peaked at {}", class, buf.peak());
            }
        }
    }

    #[test]
    fn default_loops_stay_in_range() {
        for class in SoundClass::ALL {
            let buf = seeded(class, 48_000, default_duration(class), 42);
            assert!(buf.peak() <= 1.0, "{} peaked at {}", class, buf.peak());
            assert!((buf.duration_secs() - default_duration(class)).abs() < 1e-9);
        }
    }

    #[test]
    fn every_class_makes_sound() {
        for class in SoundClass::ALL {
            let buf = seeded(class, 48_000, default_duration(class), 3);
            assert!(buf.rms() > 1e-3, "{} is silent", class);
        }
    }

    #[test]
    fn faded_classes_start_and_end_at_zero() {
        for class in [SoundClass::Water, SoundClass::Rain, SoundClass::Bubble, SoundClass::Birds] {
            for secs in [0.2, 0.25, 1.0, 4.0] {
                let buf = seeded(class, 44_100, secs, 9);
                let s = buf.samples();
                assert!(s[0].abs() < 1e-3, "{} starts at {}", class, s[0]);
                assert!(s[s.len() - 1].abs() < 1e-3, "{} ends at {}", class, s[s.len() - 1]);
            }
        }
    }

    #[test]
    fn seam_is_continuous_for_faded_classes() {
        for class in [SoundClass::Water, SoundClass::Rain, SoundClass::Bubble] {
            let buf = seeded(class, 48_000, default_duration(class), 5);
            let s = buf.samples();
            let jump = (s[0] - s[s.len() - 1]).abs();
            let near_start = s[..8].iter().fold(0.0f32, |m, x| m.max(x.abs()));
            assert!(jump < 1e-3);
            assert!(near_start < 0.01);
        }
    }

    #[test]
    fn white_noise_is_centered() {
        let buf = seeded(SoundClass::WhiteNoise, 48_000, 4.0, 1);
        let mean: f64 = buf.samples().iter().map(|&s| s as f64).sum::<f64>() / buf.len() as f64;
        assert!(mean.abs() < 0.005, "mean {}", mean);
        assert!(buf.peak() <= params::white_noise::GAIN);
    }

    #[test]
    fn independent_calls_differ() {
        let a = synthesize(SoundClass::WhiteNoise, 8_000, 1.0);
        let b = synthesize(SoundClass::WhiteNoise, 8_000, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_synthesis_is_reproducible() {
        let a = seeded(SoundClass::Rain, 8_000, 1.0, 77);
        let b = seeded(SoundClass::Rain, 8_000, 1.0, 77);
        assert_eq!(a, b);
    }

    #[test]
    fn ambience_beds_lean_low_compared_to_white_noise() {
        let white = roughness(seeded(SoundClass::WhiteNoise, 48_000, 2.0, 4).samples());
        assert!(white > 1.8);
        for class in [SoundClass::Water, SoundClass::Rain, SoundClass::Bubble] {
            let r = roughness(seeded(class, 48_000, 2.0, 4).samples());
            assert!(r < white * 0.5, "{} roughness {} vs white {}", class, r, white);
        }
    }

    #[test]
    fn water_has_energy_at_its_partials() {
        let buf = seeded(SoundClass::Water, 48_000, 4.0, 8);
        let at_partial = goertzel(buf.samples(), 48_000, 120.0);
        let off_band = goertzel(buf.samples(), 48_000, 5_000.0);
        assert!(at_partial > off_band * 10.0, "{} vs {}", at_partial, off_band);
    }

    #[test]
    fn alarm_energy_sits_in_its_tone_band() {
        let buf = seeded(SoundClass::Warning, 48_000, 2.0, 0);
        let beep = goertzel(buf.samples(), 48_000, 800.0);
        let harmony = goertzel(buf.samples(), 48_000, 1_200.0);
        let outside = goertzel(buf.samples(), 48_000, 4_000.0);
        assert!(beep > outside * 100.0);
        assert!(harmony > outside * 100.0);
    }

    #[test]
    fn alarm_is_louder_than_the_soundscapes() {
        let alarm = seeded(SoundClass::Warning, 48_000, 2.0, 0);
        for class in [SoundClass::Water, SoundClass::Rain, SoundClass::Birds, SoundClass::Bubble] {
            let rms = seeded(class, 48_000, default_duration(class), 6).rms();
            assert!(alarm.rms() > rms, "{} rms {} >= alarm {}", class, rms, alarm.rms());
        }
        // Flat noise carries more average power, but never reaches the alarm's peaks.
        assert!(alarm.peak() > 2.0 * params::white_noise::GAIN);
    }
}

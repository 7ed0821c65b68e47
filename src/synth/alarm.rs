//! Alarm: gated two-tone beeps over a sweeping siren, pulsed in loudness

use core::f32::consts::{PI, TAU};

use super::params::alarm::*;

pub(crate) fn render(sample_rate: u32, frames: usize) -> Vec<f32> {
    let sr = sample_rate as f32;
    let center = 0.5 * (SIREN_LOW_HZ + SIREN_HIGH_HZ);
    let half_span = 0.5 * (SIREN_HIGH_HZ - SIREN_LOW_HZ);
    let mut siren_phase = 0.0f32;
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let t = i as f32 / sr;
        let mut sample = 0.0;

        if beep_on(t) {
            sample += BEEP_TONES
                .iter()
                .map(|&(freq, amp)| (TAU * freq * t).sin() * amp)
                .sum::<f32>();
        }

        let siren_hz = center + half_span * (SIREN_SWEEP_RATE * t).sin();
        sample += siren_phase.sin() * SIREN_AMPLITUDE;
        siren_phase = (siren_phase + TAU * siren_hz / sr).rem_euclid(TAU);

        out.push(sample * pulse(t) * MASTER_GAIN);
    }

    out
}

#[inline]
fn beep_on(t: f32) -> bool {
    ((t / BEEP_SLOT_SECS) as u32) % 2 == 0
}

/// Repeating half-sine loudness envelope in `[0, 1]`.
#[inline]
fn pulse(t: f32) -> f32 {
    (PI * (t * PULSES_PER_SEC).fract()).sin()
}

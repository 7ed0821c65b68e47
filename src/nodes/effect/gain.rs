//! Gain/volume control effect

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};

/// Messages to control gain
#[derive(Clone, Copy, Debug)]
pub enum GainMessage {
    /// Set the gain multiplier (1.0 = unity, 0.0 = silence, 2.0 = alarm level)
    SetGain(f32),
}

/// The shared volume stage every voice passes through.
///
/// Gain is a plain linear multiplier and is deliberately not clamped: the
/// caller owns the valid range.
pub struct Gain {
    gain: f32,
    /// Smoothing to prevent clicks on rapid gain changes
    smoothed_gain: f32,
    /// Smoothing coefficient (0.0 = instant, 1.0 = no change)
    smooth_coeff: f32,
}

impl Gain {
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            smoothed_gain: gain,
            smooth_coeff: 0.995, // ~4ms at 48kHz
        }
    }

    /// Set the smoothing time constant in milliseconds
    pub fn with_smoothing_ms(mut self, ms: f32, sample_rate: u32) -> Self {
        let samples = (ms / 1000.0) * sample_rate as f32;
        self.smooth_coeff = if samples > 0.0 { (-1.0 / samples).exp() } else { 0.0 };
        self
    }

    /// Disable smoothing for instant gain changes
    pub fn without_smoothing(mut self) -> Self {
        self.smooth_coeff = 0.0;
        self
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl AudioNode for Gain {
    type Message = GainMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = GainMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                GainMessage::SetGain(g) => self.gain = g,
            }
        }

        let Some(out) = outputs.first_mut() else {
            return;
        };

        let Some(input) = inputs.first().and_then(|i| i.buffers().first()) else {
            out.silence();
            return;
        };

        let target = self.gain;
        let coeff = self.smooth_coeff;
        let mut gain = self.smoothed_gain;

        for (out_sample, &in_sample) in out.iter_mut().zip(input.iter()) {
            gain = target + coeff * (gain - target);
            *out_sample = in_sample * gain;
        }

        self.smoothed_gain = gain;
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }
}

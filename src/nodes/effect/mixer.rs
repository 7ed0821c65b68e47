//! Mixer effect - sums the voices together

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};

/// Sums every connected input into one mono output with equal weight.
///
/// Multi-channel inputs contribute their first channel.
pub struct Mixer;

impl AudioNode for Mixer {
    type Message = ();

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = Self::Message>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        let Some(out) = outputs.first_mut() else {
            return;
        };
        out.silence();

        for in_buf in inputs.iter().filter_map(|input| input.buffers().first()) {
            for (out_sample, in_sample) in out.iter_mut().zip(in_buf.iter()) {
                *out_sample += *in_sample;
            }
        }
    }

    fn num_inputs(&self) -> usize {
        // Accept any number of inputs
        usize::MAX
    }

    fn num_outputs(&self) -> usize {
        1
    }
}

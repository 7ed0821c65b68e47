//! Ring buffer sink for capture and offline rendering

use dasp_graph::{Buffer, Input};
use rtrb::Producer;

use crate::node::{AudioNode, ProcessContext};

/// A sink that pushes audio into an rtrb ring buffer
///
/// Stands in for the device output when the graph is rendered without
/// hardware: tests, offline rendering, level metering on another thread.
pub struct RtrbSink {
    producer: Producer<f32>,
    channels: usize,
}

impl RtrbSink {
    /// Create a sink that writes interleaved samples to the given producer
    pub fn new(producer: Producer<f32>, channels: usize) -> Self {
        Self {
            producer,
            channels: channels.max(1),
        }
    }

    /// Create a sink for mono audio
    pub fn mono(producer: Producer<f32>) -> Self {
        Self::new(producer, 1)
    }
}

impl AudioNode for RtrbSink {
    type Message = (); // No control messages

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        _outputs: &mut [Buffer],
    ) {
        let Some(buffers) = inputs.first().map(|i| i.buffers()) else {
            return;
        };
        let Some(first) = buffers.first() else {
            return;
        };

        let buffer_len = first.len();

        // Skip the block rather than write part of it
        if self.producer.slots() < buffer_len * self.channels {
            return;
        }

        // Interleave channels
        for i in 0..buffer_len {
            for ch in 0..self.channels {
                let src_ch = ch.min(buffers.len() - 1);
                let _ = self.producer.push(buffers[src_ch][i]);
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 0 }
}

//! Core node trait and context types.

use dasp_graph::{Buffer, Input};

/// Information available during audio processing.
///
/// Passed to every [`AudioNode::process`] call. Contains the graph's sample rate
/// and the buffer size (always 64 samples, the dasp_graph block length).
#[derive(Clone, Copy, Debug)]
pub struct ProcessContext {
    /// Sample rate of the graph in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of samples per buffer
    pub buffer_size: usize,
}

/// Unique identifier for a node within a graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

/// The trait every node in the playback graph implements.
///
/// Nodes are one of:
/// - **Sources**: loop players holding a [`SampleBuffer`](crate::SampleBuffer)
/// - **Effects**: the voice mixer and the shared gain
/// - **Sinks**: the device output or a capture ring buffer
///
/// Parameters never travel through shared state. Each node declares a
/// message type and drains pending messages at the start of `process()`.
pub trait AudioNode: Send + 'static {
    /// Message type for parameter updates (use `()` if none needed).
    type Message: Send + 'static;

    /// Process one block of audio.
    ///
    /// 1. Drain and handle all pending messages
    /// 2. Read from `inputs` (if any)
    /// 3. Write to `outputs`
    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = Self::Message>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    );

    /// Number of audio input channels (0 for sources).
    fn num_inputs(&self) -> usize { 0 }

    /// Number of audio output channels.
    fn num_outputs(&self) -> usize { 1 }
}

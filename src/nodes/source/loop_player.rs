//! Looping voice source

use dasp_graph::{Buffer, Input};

use crate::buffer::SampleBuffer;
use crate::node::{AudioNode, ProcessContext};

/// Messages to control a voice
#[derive(Debug)]
pub enum VoiceMessage {
    /// Take ownership of a buffer and loop it from the start
    Load(SampleBuffer),
    /// Stop and drop the current buffer
    Unload,
}

/// Loops one [`SampleBuffer`] forever, or outputs silence when empty.
///
/// The buffer is owned by the node while it plays and dropped on
/// [`VoiceMessage::Unload`] or when a new buffer replaces it.
pub struct LoopPlayer {
    buffer: Option<SampleBuffer>,
    position: usize,
}

impl LoopPlayer {
    pub fn new() -> Self {
        Self {
            buffer: None,
            position: 0,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.buffer.is_some()
    }

    fn handle(&mut self, msg: VoiceMessage) {
        match msg {
            VoiceMessage::Load(buffer) => {
                self.buffer = (!buffer.is_empty()).then_some(buffer);
                self.position = 0;
            }
            VoiceMessage::Unload => {
                self.buffer = None;
                self.position = 0;
            }
        }
    }
}

impl Default for LoopPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioNode for LoopPlayer {
    type Message = VoiceMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = VoiceMessage>,
        _inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            self.handle(msg);
        }

        let Some((first, rest)) = outputs.split_first_mut() else {
            return;
        };

        match &self.buffer {
            Some(buffer) => {
                let samples = buffer.samples();
                for out in first.iter_mut() {
                    *out = samples[self.position];
                    self.position += 1;
                    if self.position >= samples.len() {
                        self.position = 0;
                    }
                }
            }
            None => first.silence(),
        }

        for buffer in rest.iter_mut() {
            buffer.copy_from_slice(first);
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 0 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ProcessContext {
        ProcessContext { sample_rate: 8, buffer_size: Buffer::LEN }
    }

    fn run(player: &mut LoopPlayer, messages: Vec<VoiceMessage>) -> Buffer {
        let mut out = [Buffer::default()];
        player.process(&ctx(), messages.into_iter(), &[], &mut out);
        let [buf] = out;
        buf
    }

    #[test]
    fn empty_player_is_silent() {
        let mut player = LoopPlayer::new();
        let out = run(&mut player, vec![]);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn loaded_buffer_wraps_around() {
        let mut player = LoopPlayer::new();
        let buffer = SampleBuffer::new(vec![1.0, 2.0, 3.0], 8);
        let out = run(&mut player, vec![VoiceMessage::Load(buffer)]);
        assert_eq!(&out[..7], &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);

        // Continues where the previous block stopped: 64 % 3 == 1
        let next = run(&mut player, vec![]);
        assert_eq!(next[0], 2.0);
    }

    #[test]
    fn unload_drops_the_buffer() {
        let mut player = LoopPlayer::new();
        run(&mut player, vec![VoiceMessage::Load(SampleBuffer::new(vec![0.5; 10], 8))]);
        assert!(player.is_loaded());
        let out = run(&mut player, vec![VoiceMessage::Unload]);
        assert!(!player.is_loaded());
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_buffer_is_treated_as_unloaded() {
        let mut player = LoopPlayer::new();
        run(&mut player, vec![VoiceMessage::Load(SampleBuffer::new(Vec::new(), 8))]);
        assert!(!player.is_loaded());
    }
}

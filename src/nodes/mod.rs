//! Nodes of the playback graph.
//!
//! ## Sources ([`source`])
//! - [`LoopPlayer`] - loops a [`SampleBuffer`](crate::SampleBuffer); one per voice
//!
//! ## Effects ([`effect`])
//! - [`Mixer`] - sums the voices
//! - [`Gain`] - the shared volume control, smoothed to avoid zipper noise
//!
//! ## Sinks ([`sink`])
//! - [`CpalSink`] - system audio device (requires `cpal_sink` feature)
//! - [`RtrbSink`] - ring buffer, for capture and offline rendering
//!
//! Parameter changes travel as messages: [`VoiceMessage`] and [`GainMessage`].
//! The mixer and the sinks take `()`.

pub mod source;
pub mod effect;
pub mod sink;

pub use source::{LoopPlayer, VoiceMessage};
pub use effect::{Gain, GainMessage, Mixer};
pub use sink::RtrbSink;

#[cfg(feature = "cpal_sink")]
pub use sink::CpalSink;

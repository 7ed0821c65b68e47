//! Error types.
//!
//! Every error here is recoverable: audio failures leave the player idle,
//! fetch failures fall back to synthesis, settings failures fall back to
//! defaults.

use std::io;

use thiserror::Error;

use crate::engine::Voice;
use crate::sound::SoundClass;

/// Failure to bring up or drive the audio output.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
    #[error("audio output thread exited before the stream started")]
    StreamThread,
    #[error("{0:?} voice is not accepting commands, try again")]
    VoiceBusy(Voice),
}

/// Failure to obtain a pre-recorded asset. Never surfaced to the user.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no recorded asset for {0}")]
    Missing(SoundClass),
    #[error("failed to read asset: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "vorbis_src")]
    #[error("failed to decode asset: {0}")]
    Decode(#[from] lewton::VorbisError),
    #[error("asset decoded to zero samples")]
    Empty,
}

/// Failure to persist settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings store: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),
}

//! Soundmask - procedural ambient-sound masking player
//!
//! Design principles:
//! - Every soundscape is synthesized from scratch; recorded assets are optional
//! - One owned [`AudioEngine`] per session, created lazily and torn down explicitly
//! - Graph nodes receive parameters via message ring buffers, not shared state
//! - At most one voice (ambience or alarm) is audible at any time
//! - Nothing that goes wrong at runtime is fatal: the worst outcome is silence

mod node;
mod graph;
#[cfg(feature = "cpal_sink")]
mod device;
mod engine;
mod error;
mod buffer;
mod sound;
pub mod nodes;
pub mod synth;
pub mod resolver;
pub mod timer;
pub mod player;
pub mod settings;

pub use node::{AudioNode, ProcessContext, NodeId};
#[cfg(feature = "cpal_sink")]
pub use device::CpalDevice;
pub use engine::{AudioEngine, Handle, Voice};
pub use error::{AudioError, FetchError, SettingsError};
pub use buffer::SampleBuffer;
pub use sound::{SoundClass, ParseSoundClassError};
pub use player::{Player, Output, Confirm, VoiceState};
#[cfg(feature = "cpal_sink")]
pub use player::DefaultOutput;
pub use resolver::{Resolver, Fetch, AssetDir, NoAssets};
pub use settings::{Settings, SettingsStore, FileStore, MemoryStore};
pub use timer::{Countdown, Tick, TickClock};

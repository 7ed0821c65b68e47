//! The owned audio engine: one graph, two voices, one gain

use crate::buffer::SampleBuffer;
use crate::graph::AudioGraph;
use crate::node::AudioNode;
use crate::nodes::{Gain, GainMessage, LoopPlayer, Mixer, VoiceMessage};

#[cfg(feature = "cpal_sink")]
use crate::device::CpalDevice;
use crate::error::AudioError;

/// Control messages in flight per node before [`Handle::send`] starts refusing.
const QUEUE_SIZE: usize = 64;

/// Gain smoothing time constant.
const GAIN_SMOOTHING_MS: f32 = 5.0;

/// A handle for sending messages to a node in the engine's graph.
///
/// Messages are buffered in a lock-free ring buffer and processed at the start
/// of the next audio block. If the buffer is full, [`Handle::send`] returns
/// `Err(msg)` with the message that couldn't be sent.
pub struct Handle<M: Send + 'static> {
    sender: rtrb::Producer<M>,
}

impl<M: Send + 'static> Handle<M> {
    pub fn send(&mut self, msg: M) -> Result<(), M> {
        self.sender.push(msg).map_err(|rtrb::PushError::Full(m)| m)
    }
}

/// The two playback voices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Voice {
    Ambience,
    Alarm,
}

/// The audio engine for one session.
///
/// Built once with a fixed topology:
///
/// ```text
/// ambience LoopPlayer ─┐
///                      ├─> Mixer ─> Gain ─> sink
/// alarm    LoopPlayer ─┘
/// ```
///
/// The engine does not run on its own. The host calls [`process`](Self::process)
/// repeatedly, paced to real time, and each call renders one 64-sample block
/// into the sink. When the sink is a [`CpalSink`](crate::nodes::CpalSink) the
/// device stream consumes those blocks on its own thread.
///
/// ```no_run
/// use std::time::{Duration, Instant};
/// # use soundmask::AudioEngine;
/// let mut engine = AudioEngine::default_output()?;
///
/// let start = Instant::now();
/// let rate = engine.sample_rate() as f64;
/// let mut blocks = 0u64;
///
/// loop {
///     // Stay a few blocks ahead to prevent underruns
///     let target = (start.elapsed().as_secs_f64() * rate / 64.0) as u64 + 4;
///     while blocks < target {
///         engine.process();
///         blocks += 1;
///     }
///     std::thread::sleep(Duration::from_micros(500));
/// }
/// # Ok::<(), soundmask::AudioError>(())
/// ```
pub struct AudioEngine {
    graph: AudioGraph,
    ambience: Handle<VoiceMessage>,
    alarm: Handle<VoiceMessage>,
    gain: Handle<GainMessage>,
    blocks_processed: u64,
}

impl AudioEngine {
    /// Build the engine around an output sink running at `sample_rate`.
    pub fn with_output<S: AudioNode<Message = ()>>(sample_rate: u32, sink: S) -> Self {
        let mut graph = AudioGraph::new(sample_rate);

        let ambience = graph.add(LoopPlayer::new(), QUEUE_SIZE);
        let alarm = graph.add(LoopPlayer::new(), QUEUE_SIZE);
        let mixer = graph.add(Mixer, 1);
        let gain = graph.add(
            Gain::new(1.0).with_smoothing_ms(GAIN_SMOOTHING_MS, sample_rate),
            QUEUE_SIZE,
        );
        let sink = graph.add(sink, 1);

        graph.connect(ambience.id, mixer.id);
        graph.connect(alarm.id, mixer.id);
        graph.connect(mixer.id, gain.id);
        graph.connect(gain.id, sink.id);
        graph.set_terminal(sink.id);

        tracing::info!(sample_rate, "audio engine initialized");

        Self {
            graph,
            ambience: Handle { sender: ambience.sender },
            alarm: Handle { sender: alarm.sender },
            gain: Handle { sender: gain.sender },
            blocks_processed: 0,
        }
    }

    /// Build the engine on the system's default output device.
    #[cfg(feature = "cpal_sink")]
    pub fn default_output() -> Result<Self, AudioError> {
        let device = CpalDevice::default_output()?;
        let sink = device.create_sink()?;
        tracing::debug!(device = device.name(), channels = device.channels(), "opened output device");
        Ok(Self::with_output(device.sample_rate(), sink))
    }

    pub fn sample_rate(&self) -> u32 {
        self.graph.sample_rate()
    }

    /// Number of blocks rendered since the engine was built.
    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    /// Render one block (64 samples) into the sink.
    pub fn process(&mut self) {
        self.graph.process();
        self.blocks_processed += 1;
    }

    /// Set the shared gain. Not range-checked.
    pub fn set_gain(&mut self, gain: f32) {
        if self.gain.send(GainMessage::SetGain(gain)).is_err() {
            tracing::warn!(gain, "gain queue full, change dropped");
        }
    }

    /// Loop `buffer` on `voice`, replacing whatever it played before.
    ///
    /// Fails without effect when the voice's control queue is full.
    pub fn load(&mut self, voice: Voice, buffer: SampleBuffer) -> Result<(), AudioError> {
        self.voice(voice)
            .send(VoiceMessage::Load(buffer))
            .map_err(|_| AudioError::VoiceBusy(voice))
    }

    /// Silence `voice` and drop its buffer.
    ///
    /// Fails without effect when the voice's control queue is full.
    pub fn unload(&mut self, voice: Voice) -> Result<(), AudioError> {
        self.voice(voice)
            .send(VoiceMessage::Unload)
            .map_err(|_| AudioError::VoiceBusy(voice))
    }

    fn voice(&mut self, voice: Voice) -> &mut Handle<VoiceMessage> {
        match voice {
            Voice::Ambience => &mut self.ambience,
            Voice::Alarm => &mut self.alarm,
        }
    }

    /// Release the graph and the output it feeds.
    pub fn teardown(self) {
        tracing::info!(blocks = self.blocks_processed, "audio engine torn down");
        drop(self);
    }
}

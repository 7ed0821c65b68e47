//! The playback state machine
//!
//! A [`Player`] owns everything a session needs: the lazily created
//! [`AudioEngine`], the [`Resolver`] that supplies buffers, and the auto-stop
//! [`Countdown`]. It drives two voices, ambience and alarm, of which at most
//! one is ever playing.
//!
//! The player is single-threaded and never blocks except inside
//! [`Confirm::confirm`]. The host calls [`Player::process`] to render audio
//! and [`Player::tick`] once per second to run the timer.

use crate::engine::{AudioEngine, Voice};
use crate::error::AudioError;
use crate::resolver::{Fetch, NoAssets, Resolver};
use crate::settings::Settings;
use crate::sound::SoundClass;
use crate::timer::{Countdown, Tick};

/// Gain forced while the alarm plays.
pub const ALARM_GAIN: f32 = 2.0;

/// Question asked before the alarm starts.
pub const WARNING_PROMPT: &str = "Play the warning sound?\n\n\
    It is very loud. Use it only in an emergency and mind the people around you.";

const STATUS_PLAYING: &str = "Playing...";
const STATUS_WARNING: &str = "Warning sound playing";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    Playing,
}

/// Opens the audio output on first use.
pub trait Output {
    fn open(&mut self) -> Result<AudioEngine, AudioError>;
}

impl<F> Output for F
where
    F: FnMut() -> Result<AudioEngine, AudioError>,
{
    fn open(&mut self) -> Result<AudioEngine, AudioError> {
        self()
    }
}

/// The system's default output device.
#[cfg(feature = "cpal_sink")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultOutput;

#[cfg(feature = "cpal_sink")]
impl Output for DefaultOutput {
    fn open(&mut self) -> Result<AudioEngine, AudioError> {
        AudioEngine::default_output()
    }
}

/// A blocking yes/no question put to the user.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

pub struct Player<O: Output, F: Fetch = NoAssets> {
    output: O,
    engine: Option<AudioEngine>,
    resolver: Resolver<F>,
    countdown: Countdown,

    ambience: VoiceState,
    alarm: VoiceState,

    /// Last user volume as a linear gain.
    volume: f32,
    sound: SoundClass,
    timer_secs: u32,
    status: String,
}

impl<O: Output> Player<O, NoAssets> {
    /// A player that synthesizes every sound.
    pub fn new(output: O) -> Self {
        Self::with_resolver(output, Resolver::synthesized())
    }
}

impl<O: Output, F: Fetch> Player<O, F> {
    pub fn with_resolver(output: O, resolver: Resolver<F>) -> Self {
        let defaults = Settings::default();
        Self {
            output,
            engine: None,
            resolver,
            countdown: Countdown::new(),
            ambience: VoiceState::Idle,
            alarm: VoiceState::Idle,
            volume: defaults.gain(),
            sound: defaults.sound_type,
            timer_secs: defaults.timer,
            status: String::new(),
        }
    }

    /// Take volume, sound and timer from persisted settings.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.gain();
        self.sound = settings.sound_type;
        self.timer_secs = settings.timer;
    }

    /// Play `class` on the ambience voice at `volume`.
    ///
    /// Stops the alarm first. If the audio output cannot be opened the error
    /// is returned, the status line says so, and nothing else changes. The
    /// warning sound is not an ambience sound and is ignored.
    pub fn start(&mut self, class: SoundClass, volume: f32) -> Result<(), AudioError> {
        if !class.is_ambience() {
            tracing::warn!(%class, "not an ambience sound");
            return Ok(());
        }
        let sample_rate = self.ensure_engine()?;

        if self.alarm == VoiceState::Playing {
            self.release_alarm()?;
        }

        let buffer = self.resolver.resolve(class, sample_rate);
        tracing::info!(%class, volume, secs = buffer.duration_secs(), "starting ambience");
        if let Some(engine) = self.engine.as_mut() {
            engine.load(Voice::Ambience, buffer)?;
            engine.set_gain(volume);
        }

        self.sound = class;
        self.volume = volume;
        self.ambience = VoiceState::Playing;
        self.countdown.start(self.timer_secs);
        self.status = STATUS_PLAYING.to_owned();
        Ok(())
    }

    /// Stop the ambience voice and the timer. Does nothing when idle.
    ///
    /// If the voice does not accept the stop, ambience keeps playing and the
    /// timer keeps running.
    pub fn stop(&mut self) {
        if self.ambience == VoiceState::Idle {
            self.countdown.cancel();
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            if let Err(err) = engine.unload(Voice::Ambience) {
                tracing::warn!(%err, "ambience not stopped");
                return;
            }
        }
        self.countdown.cancel();
        self.ambience = VoiceState::Idle;
        self.status.clear();
        tracing::info!("ambience stopped");
    }

    /// Play/stop switch.
    pub fn toggle(&mut self) -> Result<(), AudioError> {
        match self.ambience {
            VoiceState::Playing => {
                self.stop();
                Ok(())
            }
            VoiceState::Idle => self.start(self.sound, self.volume),
        }
    }

    /// Change the user volume. Not range-checked.
    ///
    /// While the alarm plays the new value is remembered and applied once the
    /// alarm stops.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if self.alarm == VoiceState::Playing {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_gain(volume);
        }
    }

    /// Select the ambience sound; restarts playback if ambience is playing.
    ///
    /// `warning` is not an ambience sound and is ignored.
    pub fn select_sound(&mut self, class: SoundClass) -> Result<(), AudioError> {
        if !class.is_ambience() {
            tracing::warn!(%class, "not an ambience sound");
            return Ok(());
        }
        self.sound = class;
        if self.ambience == VoiceState::Playing {
            self.stop();
            self.start(class, self.volume)?;
        }
        Ok(())
    }

    /// Duration armed by the next [`start`](Self::start). `0` disables the timer.
    pub fn set_timer(&mut self, seconds: u32) {
        self.timer_secs = seconds;
    }

    /// Toggle the alarm.
    ///
    /// A playing alarm is stopped. Otherwise the user is asked first; on
    /// decline nothing changes, on accept the ambience stops and the alarm
    /// loops at [`ALARM_GAIN`].
    pub fn play_warning(&mut self, confirm: &mut impl Confirm) -> Result<(), AudioError> {
        if self.alarm == VoiceState::Playing {
            self.stop_warning();
            return Ok(());
        }
        if !confirm.confirm(WARNING_PROMPT) {
            tracing::debug!("warning declined");
            return Ok(());
        }

        let sample_rate = self.ensure_engine()?;
        self.stop();
        if self.ambience == VoiceState::Playing {
            return Err(AudioError::VoiceBusy(Voice::Ambience));
        }

        let buffer = self.resolver.resolve(SoundClass::Warning, sample_rate);
        if let Some(engine) = self.engine.as_mut() {
            engine.load(Voice::Alarm, buffer)?;
            engine.set_gain(ALARM_GAIN);
        }
        self.alarm = VoiceState::Playing;
        self.status = STATUS_WARNING.to_owned();
        tracing::info!("warning sound started");
        Ok(())
    }

    /// Stop the alarm and restore the user volume. Does nothing when idle.
    pub fn stop_warning(&mut self) {
        if self.alarm == VoiceState::Idle {
            return;
        }
        match self.release_alarm() {
            Ok(()) => self.status.clear(),
            Err(err) => tracing::warn!(%err, "warning sound not stopped"),
        }
    }

    fn release_alarm(&mut self) -> Result<(), AudioError> {
        if let Some(engine) = self.engine.as_mut() {
            engine.unload(Voice::Alarm)?;
            engine.set_gain(self.volume);
        }
        self.alarm = VoiceState::Idle;
        tracing::info!("warning sound stopped");
        Ok(())
    }

    /// Advance the timer by one second, stopping ambience when it runs out.
    pub fn tick(&mut self) -> Tick {
        let tick = self.countdown.tick();
        if tick == Tick::Expired {
            tracing::info!("timer expired");
            self.stop();
            if self.ambience == VoiceState::Playing {
                // Try again next second
                self.countdown.start(1);
            }
        }
        tick
    }

    /// The session lost focus: silence both voices.
    pub fn suspend(&mut self) {
        self.stop();
        self.stop_warning();
    }

    /// Silence both voices and release the audio output.
    pub fn shutdown(&mut self) {
        self.suspend();
        if let Some(engine) = self.engine.take() {
            engine.teardown();
        }
    }

    /// Render one audio block, if the output is open.
    pub fn process(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.process();
        }
    }

    /// Open the output if needed and return its sample rate.
    fn ensure_engine(&mut self) -> Result<u32, AudioError> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => self.output.open().map_err(|err| {
                tracing::warn!(%err, "failed to open audio output");
                self.status = format!("Failed to play audio: {err}");
                err
            })?,
        };
        Ok(self.engine.insert(engine).sample_rate())
    }

    /// Status line: playing indicator, last failure, or empty.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn ambience_state(&self) -> VoiceState {
        self.ambience
    }

    pub fn alarm_state(&self) -> VoiceState {
        self.alarm
    }

    pub fn is_playing(&self) -> bool {
        self.ambience == VoiceState::Playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn sound(&self) -> SoundClass {
        self.sound
    }

    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    /// Seconds left on the countdown, `None` when it is hidden.
    pub fn remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    /// The engine, once the output has been opened.
    pub fn engine(&self) -> Option<&AudioEngine> {
        self.engine.as_ref()
    }
}

use rtrb::{Consumer, Producer, RingBuffer};

use soundmask::nodes::RtrbSink;
use soundmask::player::ALARM_GAIN;
use soundmask::synth;
use soundmask::{AudioEngine, AudioError, Output, Player, SoundClass, Tick, VoiceState};

const RATE: u32 = 8_000;

/// Hands out one capture-backed engine; the test keeps the consumer.
struct Capture {
    producer: Option<Producer<f32>>,
}

impl Output for Capture {
    fn open(&mut self) -> Result<AudioEngine, AudioError> {
        let producer = self.producer.take().ok_or(AudioError::NoDevice)?;
        Ok(AudioEngine::with_output(RATE, RtrbSink::mono(producer)))
    }
}

struct NoDevice;

impl Output for NoDevice {
    fn open(&mut self) -> Result<AudioEngine, AudioError> {
        Err(AudioError::NoDevice)
    }
}

fn capture_player() -> (Player<Capture>, Consumer<f32>) {
    let (producer, consumer) = RingBuffer::new(1 << 16);
    (Player::new(Capture { producer: Some(producer) }), consumer)
}

fn accept(_: &str) -> bool {
    true
}

fn decline(_: &str) -> bool {
    false
}

fn render(player: &mut Player<Capture>, out: &mut Consumer<f32>, blocks: usize) -> Vec<f32> {
    for _ in 0..blocks {
        player.process();
    }
    core::iter::from_fn(|| out.pop().ok()).collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt()
}

#[test]
fn ambience_reaches_the_output() {
    let (mut player, mut out) = capture_player();
    player.start(SoundClass::WhiteNoise, 1.0).unwrap();
    let samples = render(&mut player, &mut out, 100);
    assert_eq!(samples.len(), 6_400);
    assert!(rms(&samples) > 0.05);
    assert!(samples.iter().all(|s| s.abs() <= 1.05));

    player.stop();
    render(&mut player, &mut out, 1);
    let silent = render(&mut player, &mut out, 10);
    assert!(silent.iter().all(|&s| s == 0.0));
}

#[test]
fn volume_scales_the_output() {
    let (mut player, mut out) = capture_player();
    player.start(SoundClass::WhiteNoise, 1.0).unwrap();
    let loud = rms(&render(&mut player, &mut out, 100));

    player.set_volume(0.25);
    render(&mut player, &mut out, 20);
    let quiet = rms(&render(&mut player, &mut out, 100));
    assert!(quiet < loud * 0.4, "loud {loud} quiet {quiet}");
}

#[test]
fn alarm_silences_ambience() {
    let (mut player, mut out) = capture_player();
    player.start(SoundClass::Water, 0.75).unwrap();
    player.play_warning(&mut accept).unwrap();

    assert_eq!(player.ambience_state(), VoiceState::Idle);
    assert_eq!(player.alarm_state(), VoiceState::Playing);
    assert_eq!(player.remaining(), None);
    let samples = render(&mut player, &mut out, 200);
    assert!(rms(&samples) > 0.1);

    // Starting ambience in turn stops the alarm
    player.toggle().unwrap();
    assert_eq!(player.ambience_state(), VoiceState::Playing);
    assert_eq!(player.alarm_state(), VoiceState::Idle);
}

#[test]
fn warning_toggles_off_without_asking() {
    let (mut player, _out) = capture_player();
    player.play_warning(&mut accept).unwrap();
    let mut asked = false;
    player
        .play_warning(&mut |_: &str| {
            asked = true;
            true
        })
        .unwrap();
    assert!(!asked);
    assert_eq!(player.alarm_state(), VoiceState::Idle);
    assert_eq!(player.volume(), 0.75);
}

#[test]
fn declined_prompt_changes_nothing() {
    let (mut player, _out) = capture_player();
    player.set_timer(60);
    player.start(SoundClass::Birds, 0.5).unwrap();
    player.tick();

    player.play_warning(&mut decline).unwrap();
    assert_eq!(player.ambience_state(), VoiceState::Playing);
    assert_eq!(player.alarm_state(), VoiceState::Idle);
    assert_eq!(player.remaining(), Some(59));
    assert_eq!(player.sound(), SoundClass::Birds);
    assert_eq!(player.volume(), 0.5);
}

#[test]
fn timer_stops_ambience_exactly_once() {
    let (mut player, _out) = capture_player();
    player.set_timer(5);
    player.toggle().unwrap();

    let ticks: Vec<Tick> = (0..5).map(|_| player.tick()).collect();
    assert_eq!(
        ticks,
        [Tick::Running(4), Tick::Running(3), Tick::Running(2), Tick::Running(1), Tick::Expired]
    );
    assert!(!player.is_playing());
    assert_eq!(player.remaining(), None);

    for _ in 0..10 {
        assert_eq!(player.tick(), Tick::Idle);
    }
}

#[test]
fn manual_stop_cancels_timer() {
    let (mut player, _out) = capture_player();
    player.set_timer(10);
    player.toggle().unwrap();
    player.tick();
    player.stop();
    assert_eq!(player.tick(), Tick::Idle);
}

#[test]
fn zero_timer_never_ticks() {
    let (mut player, _out) = capture_player();
    player.set_timer(0);
    player.toggle().unwrap();
    assert_eq!(player.remaining(), None);
    assert_eq!(player.tick(), Tick::Idle);
    assert!(player.is_playing());
}

#[test]
fn stop_is_idempotent() {
    let (mut player, _out) = capture_player();
    player.stop();
    player.toggle().unwrap();
    player.stop();
    player.stop();
    assert_eq!(player.ambience_state(), VoiceState::Idle);
    assert_eq!(player.status(), "");
}

#[test]
fn changing_sound_restarts_playback() {
    let (mut player, _out) = capture_player();
    player.set_timer(30);
    player.toggle().unwrap();
    player.tick();
    player.select_sound(SoundClass::Rain).unwrap();
    assert!(player.is_playing());
    assert_eq!(player.sound(), SoundClass::Rain);
    assert_eq!(player.remaining(), Some(30));
}

#[test]
fn missing_device_keeps_player_idle() {
    let mut player = Player::new(NoDevice);
    let err = player.toggle().unwrap_err();
    assert!(matches!(err, AudioError::NoDevice));
    assert_eq!(player.ambience_state(), VoiceState::Idle);
    assert!(player.engine().is_none());
    assert!(!player.status().is_empty());

    assert!(player.play_warning(&mut accept).is_err());
    assert_eq!(player.alarm_state(), VoiceState::Idle);
}

#[test]
fn suspend_and_shutdown_silence_everything() {
    let (mut player, mut out) = capture_player();
    player.play_warning(&mut accept).unwrap();
    player.suspend();
    assert_eq!(player.alarm_state(), VoiceState::Idle);
    render(&mut player, &mut out, 1);
    assert!(render(&mut player, &mut out, 4).iter().all(|&s| s == 0.0));

    player.toggle().unwrap();
    player.shutdown();
    assert!(!player.is_playing());
    assert!(player.engine().is_none());
}

#[test]
fn alarm_class_cannot_start_as_ambience() {
    let (mut player, _out) = capture_player();
    player.start(SoundClass::Warning, 1.0).unwrap();
    assert_eq!(player.ambience_state(), VoiceState::Idle);
    assert_eq!(player.alarm_state(), VoiceState::Idle);
    assert_eq!(player.sound(), SoundClass::Water);
    assert_eq!(player.volume(), 0.75);
    assert!(player.engine().is_none());
}

#[test]
fn alarm_plays_at_double_gain_then_volume_returns() {
    let (mut player, mut out) = capture_player();
    player.play_warning(&mut accept).unwrap();

    // Let the gain settle, then measure one full alarm loop
    render(&mut player, &mut out, 10);
    let alarm = rms(&render(&mut player, &mut out, 250));
    let expected = synth::synthesize_loop(SoundClass::Warning, RATE).rms() * ALARM_GAIN;
    assert!((alarm - expected).abs() < expected * 0.02, "alarm {alarm} expected {expected}");

    player.stop_warning();
    player.start(SoundClass::WhiteNoise, 0.5).unwrap();
    render(&mut player, &mut out, 10);
    let noise = rms(&render(&mut player, &mut out, 250));
    let full = synth::synthesize_loop(SoundClass::WhiteNoise, RATE).rms();
    assert!((noise - full * 0.5).abs() < full * 0.05, "noise {noise} full {full}");
}

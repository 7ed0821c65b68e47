//! Per-class synthesis constants.
//!
//! These are tuned by ear. Keep them here as named values and change them
//! deliberately; nothing derives them from an acoustic model.
//!
//! Frequencies ending in `_HZ` are cycles per second. Slow modulation and
//! gating rates are angular (radians per second) and are applied as
//! `sin(rate * t)`.

/// A randomly triggered, exponentially decaying sine burst.
#[derive(Clone, Copy, Debug)]
pub struct BurstParams {
    /// Chance that a new burst starts on any given sample.
    pub probability: f32,
    /// Start frequency, drawn uniformly from `[lo, hi)`.
    pub freq_hz: (f32, f32),
    /// Lifetime, drawn uniformly from `[lo, hi)`.
    pub lifetime_secs: (f32, f32),
    /// Envelope is `exp(-decay_per_sec * age)`.
    pub decay_per_sec: f32,
    pub amplitude: f32,
    /// Frequency multiplier reached at the end of the lifetime (1.0 = steady).
    pub rise: f32,
    /// Bursts sounding at once. New triggers are ignored while saturated.
    pub max_active: usize,
}

/// A steady sine whose phase wobbles with a slow secondary sine.
#[derive(Clone, Copy, Debug)]
pub struct Partial {
    pub freq_hz: f32,
    pub amplitude: f32,
    pub mod_rate: f32,
    pub mod_depth: f32,
}

/// Shape of a bird's per-chirp amplitude envelope.
#[derive(Clone, Copy, Debug)]
pub enum ChirpEnvelope {
    /// `0.5 + 0.5 * sin(rate * t)`
    Sine { rate: f32 },
    /// `exp(-sharpness * fract(rate_hz * t))`, a decaying sawtooth
    Sawtooth { rate_hz: f32, sharpness: f32 },
}

/// One intermittent, warbling bird voice.
#[derive(Clone, Copy, Debug)]
pub struct BirdParams {
    /// The bird sings only while `sin(gate_rate * t + gate_offset) > gate_threshold`.
    pub gate_rate: f32,
    pub gate_offset: f32,
    pub gate_threshold: f32,
    pub base_hz: f32,
    /// `(depth_hz, rate)` pairs added to `base_hz` as `depth_hz * sin(rate * t)`.
    pub warble: &'static [(f32, f32)],
    pub envelope: ChirpEnvelope,
    pub amplitude: f32,
    /// Keep only the positive half of the waveform, for a buzzier chirp.
    pub half_wave: bool,
}

pub mod water {
    use super::{BurstParams, Partial};

    pub const DURATION_SECS: f64 = 4.0;

    pub const NOISE_TERMS: u32 = 8;
    pub const NOISE_POWER: i32 = 1;
    pub const NOISE_GAIN: f32 = 0.15;

    pub const PARTIALS: [Partial; 3] = [
        Partial { freq_hz: 120.0, amplitude: 0.08, mod_rate: 3.0, mod_depth: 0.5 },
        Partial { freq_hz: 180.0, amplitude: 0.06, mod_rate: 2.3, mod_depth: 0.7 },
        Partial { freq_hz: 240.0, amplitude: 0.04, mod_rate: 1.8, mod_depth: 0.3 },
    ];

    pub const DROPLETS: BurstParams = BurstParams {
        probability: 0.002,
        freq_hz: (800.0, 2000.0),
        lifetime_secs: (0.1, 0.1),
        decay_per_sec: 20.0,
        amplitude: 0.03,
        rise: 1.0,
        max_active: 8,
    };

    /// Swell is `1 + SWELL_DEPTH * sin(r0 * t) * sin(r1 * t)`.
    pub const SWELL_DEPTH: f32 = 0.3;
    pub const SWELL_RATES: (f32, f32) = (0.5, 1.3);

    pub const FADE_SECS: f64 = 0.1;
    pub const MASTER_GAIN: f32 = 0.7;
}

pub mod rain {
    use super::BurstParams;

    pub const DURATION_SECS: f64 = 5.0;

    pub const NOISE_TERMS: u32 = 6;
    pub const NOISE_POWER: i32 = 2;
    pub const NOISE_GAIN: f32 = 0.12;

    pub const DROPS: BurstParams = BurstParams {
        probability: 0.008,
        freq_hz: (300.0, 900.0),
        lifetime_secs: (0.02, 0.07),
        decay_per_sec: 30.0,
        amplitude: 0.04,
        rise: 1.0,
        max_active: 12,
    };

    pub const SPLASHES: BurstParams = BurstParams {
        probability: 0.003,
        freq_hz: (150.0, 450.0),
        lifetime_secs: (0.2, 0.2),
        decay_per_sec: 15.0,
        amplitude: 0.02,
        rise: 1.0,
        max_active: 8,
    };

    /// Intensity is `BASE + DEPTH * sin(r0 * t) * sin(r1 * t)`.
    pub const INTENSITY_BASE: f32 = 0.8;
    pub const INTENSITY_DEPTH: f32 = 0.2;
    pub const INTENSITY_RATES: (f32, f32) = (0.3, 0.7);

    pub const FADE_SECS: f64 = 0.2;
    pub const MASTER_GAIN: f32 = 0.6;
}

pub mod birds {
    use super::{BirdParams, BurstParams, ChirpEnvelope};

    pub const DURATION_SECS: f64 = 8.0;

    pub const NOISE_TERMS: u32 = 4;
    pub const NOISE_POWER: i32 = 3;
    pub const NOISE_GAIN: f32 = 0.03;

    /// High, fluttering songbird.
    pub const HIGH: BirdParams = BirdParams {
        gate_rate: 0.3,
        gate_offset: 0.0,
        gate_threshold: 0.7,
        base_hz: 1000.0,
        warble: &[(400.0, 12.0), (100.0, 25.0)],
        envelope: ChirpEnvelope::Sine { rate: 3.0 },
        amplitude: 0.06,
        half_wave: true,
    };

    /// Lower call with sharply decaying repeated chirps.
    pub const LOW: BirdParams = BirdParams {
        gate_rate: 0.23,
        gate_offset: 1.5,
        gate_threshold: 0.8,
        base_hz: 600.0,
        warble: &[(200.0, 8.0)],
        envelope: ChirpEnvelope::Sawtooth { rate_hz: 2.0, sharpness: 3.0 },
        amplitude: 0.04,
        half_wave: false,
    };

    pub const DISTANT: BurstParams = BurstParams {
        probability: 0.0005,
        freq_hz: (400.0, 700.0),
        lifetime_secs: (2.0, 2.0),
        decay_per_sec: 2.0,
        amplitude: 0.02,
        rise: 1.0,
        max_active: 4,
    };

    pub const FADE_SECS: f64 = 0.1;
    pub const MASTER_GAIN: f32 = 0.8;
}

pub mod bubble {
    use super::{BurstParams, Partial};

    pub const DURATION_SECS: f64 = 3.0;

    pub const NOISE_TERMS: u32 = 4;
    pub const NOISE_POWER: i32 = 3;
    pub const NOISE_GAIN: f32 = 0.08;

    pub const BUBBLES: BurstParams = BurstParams {
        probability: 0.01,
        freq_hz: (200.0, 1000.0),
        lifetime_secs: (0.1, 0.4),
        decay_per_sec: 8.0,
        amplitude: 0.15,
        rise: 1.5,
        max_active: 6,
    };

    pub const SMALL_BUBBLES: BurstParams = BurstParams {
        probability: 0.005,
        freq_hz: (600.0, 1800.0),
        lifetime_secs: (0.1, 0.1),
        decay_per_sec: 20.0,
        amplitude: 0.05,
        rise: 1.0,
        max_active: 4,
    };

    pub const UNDERWATER: [Partial; 2] = [
        Partial { freq_hz: 60.0, amplitude: 0.03, mod_rate: 2.0, mod_depth: 0.3 },
        Partial { freq_hz: 90.0, amplitude: 0.02, mod_rate: 1.5, mod_depth: 0.4 },
    ];

    pub const FADE_SECS: f64 = 0.1;
    pub const MASTER_GAIN: f32 = 0.7;
}

pub mod white_noise {
    pub const DURATION_SECS: f64 = 2.0;
    pub const GAIN: f32 = 0.3;
}

pub mod alarm {
    pub const DURATION_SECS: f64 = 2.0;

    /// The beep is on during even slots and off during odd ones.
    pub const BEEP_SLOT_SECS: f32 = 0.25;
    /// `(freq_hz, amplitude)` tones summed while the beep is on.
    pub const BEEP_TONES: [(f32, f32); 2] = [(800.0, 0.3), (1200.0, 0.2)];

    pub const SIREN_LOW_HZ: f32 = 600.0;
    pub const SIREN_HIGH_HZ: f32 = 1000.0;
    pub const SIREN_SWEEP_RATE: f32 = 6.0;
    pub const SIREN_AMPLITUDE: f32 = 0.2;

    /// Half-sine loudness pulses per second.
    pub const PULSES_PER_SEC: f32 = 2.0;

    pub const MASTER_GAIN: f32 = 1.0;
}

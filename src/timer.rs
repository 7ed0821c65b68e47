//! Auto-stop countdown

use std::time::{Duration, Instant};

/// Result of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No countdown is armed.
    Idle,
    /// Still counting; seconds left.
    Running(u32),
    /// The countdown just reached zero and disarmed itself.
    Expired,
}

/// A whole-second countdown that fires once.
///
/// The owner drives it with [`tick`](Self::tick), once per elapsed second.
/// Reaching zero yields [`Tick::Expired`] exactly once; after that, and after
/// [`cancel`](Self::cancel), every tick is [`Tick::Idle`].
#[derive(Clone, Debug, Default)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the countdown. Zero seconds means no countdown at all.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = (seconds > 0).then_some(seconds);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Seconds left, or `None` when the display should be hidden.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn tick(&mut self) -> Tick {
        match self.remaining {
            None => Tick::Idle,
            Some(left) if left <= 1 => {
                self.remaining = None;
                Tick::Expired
            }
            Some(left) => {
                self.remaining = Some(left - 1);
                Tick::Running(left - 1)
            }
        }
    }
}

/// Turns wall-clock time into whole-second ticks.
///
/// Polled from the host loop; returns how many full seconds have passed since
/// the previous poll, carrying the remainder forward so no time is lost.
#[derive(Clone, Debug)]
pub struct TickClock {
    last: Instant,
    period: Duration,
}

impl TickClock {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            last: Instant::now(),
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Restart counting from now, discarding any partial second.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn poll(&mut self) -> u32 {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last);
        let ticks = (elapsed.as_nanos() / self.period.as_nanos()) as u32;
        self.last += self.period * ticks;
        ticks
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

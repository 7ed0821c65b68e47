//! Mono sample buffers exchanged between synthesis, resolution and playback

/// A fixed-length run of mono `f32` samples at a known sample rate.
///
/// Immutable once produced. A buffer is moved into the voice that plays it
/// and dropped when that voice stops.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Number of samples needed to cover `duration_secs` at `sample_rate`.
    #[inline]
    pub fn frames_for(sample_rate: u32, duration_secs: f64) -> usize {
        (sample_rate as f64 * duration_secs).round().max(0.0) as usize
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Root-mean-square level.
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum / self.samples.len() as f64).sqrt() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_round_to_nearest() {
        assert_eq!(SampleBuffer::frames_for(48_000, 4.0), 192_000);
        assert_eq!(SampleBuffer::frames_for(44_100, 0.00001), 0);
        assert_eq!(SampleBuffer::frames_for(3, 0.5), 2);
    }

    #[test]
    fn levels() {
        let buf = SampleBuffer::new(vec![0.5, -1.0, 0.5, 0.0], 4);
        assert_eq!(buf.peak(), 1.0);
        assert!((buf.rms() - (1.5f32 / 4.0).sqrt()).abs() < 1e-6);
        assert_eq!(buf.duration_secs(), 1.0);
    }
}

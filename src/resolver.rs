//! Sound source resolution: recorded asset first, synthesis otherwise
//!
//! [`Resolver::resolve`] never fails. Whatever goes wrong while locating or
//! decoding an asset is logged at debug level and replaced by a freshly
//! synthesized loop of the same class.

use std::path::{Path, PathBuf};

use crate::buffer::SampleBuffer;
use crate::error::FetchError;
use crate::sound::SoundClass;
use crate::synth;

/// Source of pre-recorded buffers.
pub trait Fetch {
    /// Produce a mono buffer of `class` at `sample_rate`.
    fn fetch(&self, class: SoundClass, sample_rate: u32) -> Result<SampleBuffer, FetchError>;
}

/// No recorded assets at all; everything is synthesized.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl Fetch for NoAssets {
    fn fetch(&self, class: SoundClass, _sample_rate: u32) -> Result<SampleBuffer, FetchError> {
        Err(FetchError::Missing(class))
    }
}

/// Ogg Vorbis recordings in a directory, one file per class.
///
/// `water` is read from `<dir>/water.ogg`, and so on. White noise has no
/// recording and is always synthesized.
#[derive(Clone, Debug)]
pub struct AssetDir {
    dir: PathBuf,
}

impl AssetDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the recording for `class`, if the class has one.
    pub fn path_for(&self, class: SoundClass) -> Option<PathBuf> {
        match class {
            SoundClass::WhiteNoise => None,
            _ => Some(self.dir.join(format!("{}.ogg", class.id()))),
        }
    }
}

#[cfg(feature = "vorbis_src")]
impl Fetch for AssetDir {
    fn fetch(&self, class: SoundClass, sample_rate: u32) -> Result<SampleBuffer, FetchError> {
        let path = self.path_for(class).ok_or(FetchError::Missing(class))?;
        let (samples, source_rate) = decode_ogg(&path)?;
        if samples.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(SampleBuffer::new(resample_linear(&samples, source_rate, sample_rate), sample_rate))
    }
}

#[cfg(not(feature = "vorbis_src"))]
impl Fetch for AssetDir {
    fn fetch(&self, class: SoundClass, _sample_rate: u32) -> Result<SampleBuffer, FetchError> {
        Err(FetchError::Missing(class))
    }
}

/// Decode a whole Ogg Vorbis file to mono, returning samples and their rate.
#[cfg(feature = "vorbis_src")]
fn decode_ogg(path: &Path) -> Result<(Vec<f32>, u32), FetchError> {
    use lewton::inside_ogg::OggStreamReader;

    let file = std::fs::File::open(path)?;
    let mut reader = OggStreamReader::new(std::io::BufReader::new(file))?;
    let channels = usize::from(reader.ident_hdr.audio_channels).max(1);
    let rate = reader.ident_hdr.audio_sample_rate;

    let mut mono = Vec::new();
    while let Some(packet) = reader.read_dec_packet_itl()? {
        // Downmix interleaved frames by averaging
        mono.extend(packet.chunks_exact(channels).map(|frame| {
            frame.iter().map(|&s| s as f32 / 32768.0).sum::<f32>() / channels as f32
        }));
    }
    Ok((mono, rate))
}

/// Linear-interpolation resampler. Adequate for ambient loops.
pub(crate) fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || samples.is_empty() {
        return samples.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let frames = (samples.len() as f64 / ratio).round().max(1.0) as usize;
    let last = samples.len() - 1;

    (0..frames)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = (pos as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            samples[idx] + (samples[next] - samples[idx]) * frac
        })
        .collect()
}

/// Resolves a sound class to a playable buffer.
pub struct Resolver<F = NoAssets> {
    fetch: F,
}

impl Resolver<NoAssets> {
    /// A resolver that always synthesizes.
    pub fn synthesized() -> Self {
        Self { fetch: NoAssets }
    }
}

impl Default for Resolver<NoAssets> {
    fn default() -> Self {
        Self::synthesized()
    }
}

impl<F: Fetch> Resolver<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    /// Return a recorded buffer if one can be had, a synthesized loop otherwise.
    pub fn resolve(&self, class: SoundClass, sample_rate: u32) -> SampleBuffer {
        self.fetch.fetch(class, sample_rate).unwrap_or_else(|err| {
            tracing::debug!(%class, %err, "using synthesized sound");
            synth::synthesize_loop(class, sample_rate)
        })
    }
}

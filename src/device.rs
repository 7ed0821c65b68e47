//! CPAL device discovery and sink creation.
//!
//! # Example
//!
//! ```no_run
//! use soundmask::{AudioEngine, CpalDevice};
//!
//! for device in CpalDevice::list_outputs() {
//!     println!("{} ({} Hz, {} ch)", device.name(), device.sample_rate(), device.channels());
//! }
//!
//! let device = CpalDevice::default_output()?;
//! let engine = AudioEngine::with_output(device.sample_rate(), device.create_sink()?);
//! # Ok::<(), soundmask::AudioError>(())
//! ```

use cpal::traits::{DeviceTrait, HostTrait};

use crate::error::AudioError;
use crate::nodes::CpalSink;

/// A discovered audio output device.
pub struct CpalDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,

    name: String,
    sample_rate: u32,
    channels: u16,
}

impl CpalDevice {
    /// Get the system's default output device.
    pub fn default_output() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device.default_output_config()?;
        Ok(Self::from_parts(device, config))
    }

    /// List all available audio output devices.
    ///
    /// Devices whose default configuration cannot be queried are skipped.
    pub fn list_outputs() -> Vec<Self> {
        let host = cpal::default_host();
        host.output_devices()
            .map(|devices| {
                devices
                    .filter_map(|device| {
                        let config = device.default_output_config().ok()?;
                        Some(Self::from_parts(device, config))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn from_parts(device: cpal::Device, config: cpal::SupportedStreamConfig) -> Self {
        let name = device.name().unwrap_or_else(|_| "Unknown".into());
        Self {
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
            name,
            device,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Open a stream on this device and return the sink node feeding it.
    pub fn create_sink(&self) -> Result<CpalSink, AudioError> {
        CpalSink::new(&self.device, &self.config)
    }
}

//! CPAL audio output sink

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, SupportedStreamConfig};
use dasp_graph::{Buffer, Input};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::AudioError;
use crate::node::{AudioNode, ProcessContext};

/// A sink that outputs audio to a CPAL device
///
/// The CPAL stream lives on its own thread; this node feeds samples into a
/// ring buffer that the stream consumes. Dropping the sink stops the stream.
pub struct CpalSink {
    buffer: Producer<f32>,
    channels: usize,
    stream_thread: Option<StreamThread>,
}

struct StreamThread {
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CpalSink {
    /// Open an output stream on `device` and wait until it is playing.
    pub fn new(device: &cpal::Device, config: &SupportedStreamConfig) -> Result<Self, AudioError> {
        let channels = config.channels() as usize;
        let sample_format = config.sample_format();
        let stream_config = config.config();
        let sample_rate = stream_config.sample_rate.0;

        // Ring buffer sized for ~100ms of audio to handle scheduling jitter
        let buffer_samples = ((sample_rate as f32 * 0.1) as usize) * channels;
        let buffer_size = buffer_samples.next_power_of_two().max(8192);
        let (producer, consumer) = RingBuffer::<f32>::new(buffer_size);

        let shutdown = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);

        // cpal streams are not Send everywhere; build and keep it on one thread
        let device = device.clone();
        let stop = shutdown.clone();
        let handle = std::thread::spawn(move || {
            let stream = match build_stream(&device, sample_format, &stream_config, consumer)
                .and_then(|stream| stream.play().map(|_| stream).map_err(AudioError::from))
            {
                Ok(stream) => stream,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));

            while !stop.load(Ordering::Acquire) {
                std::thread::park();
            }
            drop(stream);
        });

        ready_rx.recv().map_err(|_| AudioError::StreamThread)??;
        tracing::debug!(sample_rate, channels, ?sample_format, "output stream started");

        Ok(Self {
            buffer: producer,
            channels,
            stream_thread: Some(StreamThread { shutdown, handle }),
        })
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        if let Some(thread) = self.stream_thread.take() {
            thread.shutdown.store(true, Ordering::Release);
            thread.handle.thread().unpark();
            let _ = thread.handle.join();
            tracing::debug!("output stream stopped");
        }
    }
}

fn build_stream(
    device: &cpal::Device,
    sample_format: SampleFormat,
    stream_config: &cpal::StreamConfig,
    consumer: Consumer<f32>,
) -> Result<cpal::Stream, AudioError> {
    match sample_format {
        SampleFormat::F32 => build_typed::<f32>(device, stream_config, consumer),
        SampleFormat::I16 => build_typed::<i16>(device, stream_config, consumer),
        SampleFormat::U16 => build_typed::<u16>(device, stream_config, consumer),
        other => Err(AudioError::UnsupportedFormat(other)),
    }
}

fn build_typed<T>(
    device: &cpal::Device,
    stream_config: &cpal::StreamConfig,
    mut consumer: Consumer<f32>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let stream = device.build_output_stream(
        stream_config,
        move |data: &mut [T], _| {
            // Underruns play silence
            for sample in data.iter_mut() {
                let s = consumer.pop().unwrap_or(0.0);
                *sample = T::from_sample(s.clamp(-1.0, 1.0));
            }
        },
        |err| tracing::warn!(%err, "output stream error"),
        None,
    )?;
    Ok(stream)
}

impl AudioNode for CpalSink {
    type Message = (); // No control messages

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        _outputs: &mut [Buffer],
    ) {
        let Some(buffers) = inputs.first().map(|i| i.buffers()) else {
            return;
        };
        let Some(first) = buffers.first() else {
            return;
        };

        let buffer_len = first.len();

        // Generating faster than the device consumes: drop the block rather than write part of it
        if self.buffer.slots() < buffer_len * self.channels {
            return;
        }

        // Interleave, duplicating mono to every device channel
        for i in 0..buffer_len {
            for ch in 0..self.channels {
                let src_ch = ch.min(buffers.len() - 1);
                let _ = self.buffer.push(buffers[src_ch][i]);
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 0 }
}

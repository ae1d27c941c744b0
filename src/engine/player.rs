//! Real-time audio output using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, error, info};

use super::backend::AudioBackend;
use super::graph::{lock_graph, SharedGraph};
use crate::error::EngineError;

/// Output on a cpal device
pub struct CpalBackend {
    device_name: Option<String>,
    stream: Option<Stream>,
}

impl CpalBackend {
    /// Use the default output device, or the device called `device_name`
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            stream: None,
        }
    }

    fn find_device(&self) -> Result<Device, EngineError> {
        let host = cpal::default_host();
        match &self.device_name {
            None => host.default_output_device().ok_or(EngineError::NoOutputDevice),
            Some(wanted) => host
                .output_devices()
                .map_err(EngineError::platform)?
                .find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
                .ok_or_else(|| EngineError::DeviceNotFound(wanted.clone())),
        }
    }

    fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
        device: &Device,
        config: &StreamConfig,
        graph: SharedGraph,
    ) -> Result<Stream, EngineError> {
        let channels = config.channels as usize;

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut g) = graph.try_lock() {
                        for frame in data.chunks_mut(channels) {
                            let sample = T::from_sample(g.process() as f32);
                            for channel_sample in frame.iter_mut() {
                                *channel_sample = sample;
                            }
                        }
                    } else {
                        // Control plane holds the graph, fill with silence
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                    }
                },
                |err| {
                    error!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(EngineError::platform)
    }
}

impl AudioBackend for CpalBackend {
    fn open(&mut self, graph: SharedGraph) -> Result<(), EngineError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let device = self.find_device()?;
        let config = device.default_output_config().map_err(EngineError::platform)?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        lock_graph(&graph).set_sample_rate(stream_config.sample_rate.0 as f64);

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &stream_config, graph)?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &stream_config, graph)?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &stream_config, graph)?,
            other => return Err(EngineError::UnsupportedSampleFormat(format!("{:?}", other))),
        };

        stream.play().map_err(EngineError::platform)?;
        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = stream_config.sample_rate.0,
            channels = stream_config.channels,
            "audio output opened"
        );
        self.stream = Some(stream);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        match &self.stream {
            Some(stream) => stream.play().map_err(EngineError::platform),
            None => Err(EngineError::PlatformAudioUnavailable(
                "output not open".to_string(),
            )),
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                debug!("pause on close failed: {}", e);
            }
        }
    }

    fn name(&self) -> &str {
        "cpal"
    }
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device()
        .and_then(|d| d.name().ok())
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}

//! WAV file recorder
//!
//! Captures the output of an offline-rendered engine.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::backend::OfflineRenderer;

/// Mono 32-bit float WAV writer
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    block_size: usize,
    samples_written: u64,
}

impl Recorder {
    /// Create a recorder writing to `path`, pulling `block_size` frames at a time
    pub fn new(path: &Path, sample_rate: u32, block_size: usize) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            block_size: block_size.max(1),
            samples_written: 0,
        })
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    /// Write a buffer of samples
    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.samples_written += buffer.len() as u64;
        Ok(())
    }

    /// Render `seconds` of audio from `renderer` into the file.
    ///
    /// Silence is written while the renderer has nothing to play, so the
    /// file length always matches the requested duration.
    pub fn capture(&mut self, renderer: &OfflineRenderer, seconds: f64) -> Result<()> {
        let mut remaining = (seconds.max(0.0) * self.sample_rate as f64).round() as usize;
        let mut block = vec![0.0f32; self.block_size];

        while remaining > 0 {
            let n = remaining.min(block.len());
            renderer.render(&mut block[..n]);
            self.write_buffer(&block[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

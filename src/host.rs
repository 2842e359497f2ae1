//! Seams to the host audio environment
//!
//! The DSP core never decodes or plays audio itself. A host supplies an
//! [`AudioDecoder`] to turn encoded bytes into a [`SampleBuffer`] and a
//! [`PlaybackSink`] that consumes buffers together with live playback
//! parameters. [`crate::audio::decode::SymphoniaDecoder`] and
//! [`WavFileSink`] are the implementations shipped with the crate.

use std::path::{Path, PathBuf};

use crate::audio::buffer::SampleBuffer;
use crate::encode::wav;
use crate::error::{AudioLabError, Result};
use crate::synth::distortion;

/// Turns encoded audio bytes into a sample buffer
pub trait AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer>;
}

/// Consumes a buffer for playback or rendering
pub trait PlaybackSink {
    fn render(&mut self, buffer: &SampleBuffer, params: &PlaybackParams) -> Result<()>;
}

/// Live playback controls handed to a sink alongside the buffer
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackParams {
    /// Playback speed multiplier
    pub rate: f32,
    /// Output gain (0.0-1.0)
    pub gain: f32,
    /// Low-pass cutoff in Hz
    pub lowpass_hz: f32,
    /// High-pass cutoff in Hz
    pub highpass_hz: f32,
    /// Wave-shaper distortion amount
    pub distortion: i32,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            gain: 0.7,
            lowpass_hz: 20000.0,
            highpass_hz: 0.0,
            distortion: 0,
        }
    }
}

impl PlaybackParams {
    /// Wave-shaper curve for the current distortion amount, rebuilt on
    /// every call.
    pub fn distortion_curve(&self) -> Vec<f32> {
        distortion::make_curve(self.distortion)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(AudioLabError::InvalidArgument(format!(
                "playback rate must be positive, got {}",
                self.rate
            )));
        }
        if !(self.gain.is_finite() && self.gain >= 0.0) {
            return Err(AudioLabError::InvalidArgument(format!(
                "gain must be non-negative, got {}",
                self.gain
            )));
        }
        if self.lowpass_hz < 0.0 || self.highpass_hz < 0.0 {
            return Err(AudioLabError::InvalidArgument(
                "filter cutoffs must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Sink that writes each rendered buffer to a WAV file.
///
/// Mirrors an offline export: the live effect parameters are not applied.
#[derive(Debug, Clone)]
pub struct WavFileSink {
    path: PathBuf,
}

impl WavFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlaybackSink for WavFileSink {
    fn render(&mut self, buffer: &SampleBuffer, params: &PlaybackParams) -> Result<()> {
        params.validate()?;
        let bytes = wav::encode(buffer);
        std::fs::write(&self.path, &bytes)?;
        log::info!(
            "Wrote {} ({} bytes, {:.2}s)",
            self.path.display(),
            bytes.len(),
            buffer.duration()
        );
        Ok(())
    }
}

use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

use super::wav;
use crate::audio::buffer::SampleBuffer;
use crate::error::{AudioLabError, Result};

pub const DEFAULT_EXPORT_RATE: u32 = 44100;
pub const DEFAULT_EXPORT_FORMAT: &str = "wav";

/// How to render a buffer for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Sample rate of the written file
    pub sample_rate: u32,
    /// Filename suffix. The payload is WAV whatever the label says.
    pub format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_EXPORT_RATE,
            format: DEFAULT_EXPORT_FORMAT.into(),
        }
    }
}

/// An encoded export ready to be written by a file sink.
#[derive(Debug, Clone)]
pub struct ExportedAudio {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub frame_count: usize,
}

/// Render `buffer` at the requested rate and encode it.
pub fn export(buffer: &SampleBuffer, options: &ExportOptions) -> Result<ExportedAudio> {
    let rendered = render_at(buffer, options.sample_rate)?;
    let bytes = wav::encode(&rendered);
    let format = options.format.trim().trim_start_matches('.');
    let format = if format.is_empty() { DEFAULT_EXPORT_FORMAT } else { format };
    Ok(ExportedAudio {
        file_name: format!("processed_audio.{}", format),
        bytes,
        sample_rate: rendered.sample_rate(),
        frame_count: rendered.frame_count(),
    })
}

/// Resample to `sample_rate`, keeping duration: the output has
/// `round(frames * sample_rate / source_rate)` frames rather than the
/// source frame count. Returns a copy when the rate already matches.
pub fn render_at(buffer: &SampleBuffer, sample_rate: u32) -> Result<SampleBuffer> {
    if sample_rate == 0 {
        return Err(AudioLabError::InvalidArgument(
            "export sample rate must be positive".into(),
        ));
    }
    if sample_rate == buffer.sample_rate() {
        return Ok(buffer.clone());
    }

    let ratio = sample_rate as f64 / buffer.sample_rate() as f64;
    let target_len = (buffer.frame_count() as f64 * ratio).round() as usize;
    if buffer.is_empty() {
        return Ok(SampleBuffer::silent(buffer.channel_count(), 0, sample_rate));
    }

    log::info!(
        "Resampling {} frames from {}Hz to {}Hz",
        buffer.frame_count(),
        buffer.sample_rate(),
        sample_rate
    );

    let channels = resample(buffer.channels(), ratio, target_len)?;
    SampleBuffer::new(channels, sample_rate)
}

fn resample(input: &[Vec<f32>], ratio: f64, target_len: usize) -> Result<Vec<Vec<f32>>> {
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        1.0,
        params,
        input[0].len(),
        input.len(),
    )
    .map_err(|e| AudioLabError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();

    let mut output = resampler
        .process(input, None)
        .map_err(|e| AudioLabError::Resample(e.to_string()))?;

    // Push zeros through until the delayed tail is out.
    while output[0].len() < delay + target_len {
        let tail = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .map_err(|e| AudioLabError::Resample(e.to_string()))?;
        if tail[0].is_empty() {
            break;
        }
        for (out, more) in output.iter_mut().zip(tail) {
            out.extend(more);
        }
    }

    Ok(output
        .into_iter()
        .map(|mut ch| {
            ch.drain(..delay.min(ch.len()));
            ch.resize(target_len, 0.0);
            ch
        })
        .collect())
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::fmt;

use crate::audio::buffer::SampleBuffer;
use crate::error::{AudioLabError, Result};

/// Grain length for granular synthesis, in seconds.
pub const GRAIN_SECS: f64 = 0.05;
/// Fraction of each grain overlapped by the next one.
pub const GRAIN_OVERLAP: f64 = 0.5;
/// Per-grain gain applied on top of the Hann window.
const GRAIN_GAIN: f32 = 0.5;
/// Largest pitch shift accepted in either direction (four octaves).
pub const MAX_SEMITONES: i32 = 48;

/// Buffer-level synthesis applied to the loaded audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Pass the original buffer through untouched
    Original,
    Reversed,
    /// Resampling pitch shift by the given number of semitones
    Pitched(i32),
    Granular,
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisMode::Original => f.write_str("original"),
            SynthesisMode::Reversed => f.write_str("reversed"),
            SynthesisMode::Pitched(st) => write!(f, "pitched ({:+} st)", st),
            SynthesisMode::Granular => f.write_str("granular"),
        }
    }
}

/// Apply `mode` to `buffer`, drawing grain positions from `rng`.
pub fn apply<R: Rng + ?Sized>(buffer: &SampleBuffer, mode: SynthesisMode, rng: &mut R) -> Result<SampleBuffer> {
    Ok(match mode {
        SynthesisMode::Original => buffer.clone(),
        SynthesisMode::Reversed => reverse(buffer),
        SynthesisMode::Pitched(semitones) => pitch_shift(buffer, semitones)?,
        SynthesisMode::Granular => granular(buffer, rng),
    })
}

/// Play every channel backwards.
pub fn reverse(buffer: &SampleBuffer) -> SampleBuffer {
    let frames = buffer.frame_count();
    let mut out = SampleBuffer::silent(buffer.channel_count(), frames, buffer.sample_rate());
    for (dst, src) in out.channels_mut().iter_mut().zip(buffer.channels()) {
        for (d, s) in dst.iter_mut().zip(src.iter().rev()) {
            *d = *s;
        }
    }
    out
}

/// Naive resampling pitch shift.
///
/// Reads the input at `2^(semitones/12)` samples per output sample, so
/// duration changes along with pitch. Output frames whose source index
/// falls past the end stay silent. Shifts beyond [`MAX_SEMITONES`] are
/// rejected.
pub fn pitch_shift(buffer: &SampleBuffer, semitones: i32) -> Result<SampleBuffer> {
    if !(-MAX_SEMITONES..=MAX_SEMITONES).contains(&semitones) {
        return Err(AudioLabError::InvalidArgument(format!(
            "pitch shift must be within +/-{} semitones, got {}",
            MAX_SEMITONES, semitones
        )));
    }
    let ratio = 2f64.powf(semitones as f64 / 12.0);
    let in_len = buffer.frame_count();
    let out_len = (in_len as f64 / ratio).floor() as usize;

    let mut out = SampleBuffer::silent(buffer.channel_count(), out_len, buffer.sample_rate());
    for (dst, src) in out.channels_mut().iter_mut().zip(buffer.channels()) {
        for (i, d) in dst.iter_mut().enumerate() {
            let source_index = (i as f64 * ratio).floor() as usize;
            if let Some(&s) = src.get(source_index) {
                *d = s;
            }
        }
    }
    Ok(out)
}

/// Granular re-synthesis: Hann-windowed 50 ms grains taken from random
/// positions, overlap-added at a fixed half-grain stride.
///
/// Output has the input's length. Buffers shorter than one grain, or
/// sample rates too low for a non-zero stride, produce silence.
pub fn granular<R: Rng + ?Sized>(buffer: &SampleBuffer, rng: &mut R) -> SampleBuffer {
    let len = buffer.frame_count();
    let sample_rate = buffer.sample_rate();
    let grain_samples = (GRAIN_SECS * sample_rate as f64).floor() as usize;
    let step = (grain_samples as f64 * (1.0 - GRAIN_OVERLAP)).floor() as usize;

    let mut out = SampleBuffer::silent(buffer.channel_count(), len, sample_rate);
    if step == 0 || len < grain_samples {
        log::debug!(
            "Granular synthesis skipped: {} frames, grain {} samples",
            len,
            grain_samples
        );
        return out;
    }

    let window = hann_window(grain_samples);
    let max_start = len - grain_samples;

    for (dst, src) in out.channels_mut().iter_mut().zip(buffer.channels()) {
        for i in (0..len).step_by(step) {
            let grain_start = ((rng.gen::<f64>() * max_start as f64).floor() as usize).min(max_start);
            let grain = &src[grain_start..grain_start + grain_samples];
            for (j, (&s, &w)) in grain.iter().zip(&window).enumerate() {
                let Some(d) = dst.get_mut(i + j) else {
                    break;
                };
                *d += s * w * GRAIN_GAIN;
            }
        }
    }
    out
}

/// [`granular`] with a reproducible random source.
pub fn granular_seeded(buffer: &SampleBuffer, seed: u64) -> SampleBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    granular(buffer, &mut rng)
}

/// Periodic Hann window: `0.5 - 0.5 cos(2 pi j / size)`.
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|j| (0.5 - 0.5 * (2.0 * PI * j as f64 / size as f64).cos()) as f32)
        .collect()
}

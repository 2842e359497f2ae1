//! audiolab - buffer-level audio analysis and effects
//!
//! A small DSP core over decoded PCM buffers: feature extraction with a
//! windowed-energy tempo estimate, reverse / pitch-shift / granular
//! transforms, heuristic four-stem band separation, and a canonical
//! 16-bit WAV encoder. Decoding and playback are reached through the
//! traits in [`host`].

pub mod audio;
pub mod config;
pub mod encode;
pub mod error;
pub mod host;
pub mod session;
pub mod synth;

pub use audio::buffer::SampleBuffer;
pub use audio::features::{FeatureKey, FeatureSet, FeatureValue};
pub use error::{AudioLabError, Result};
pub use host::{AudioDecoder, PlaybackParams, PlaybackSink};
pub use session::Session;
pub use synth::separate::Stem;
pub use synth::transform::SynthesisMode;

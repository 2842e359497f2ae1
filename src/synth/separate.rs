use rayon::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::audio::buffer::SampleBuffer;
use crate::error::AudioLabError;

/// A named component produced by the band separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Stem {
    Vocals,
    Drums,
    Bass,
    Other,
}

impl Stem {
    pub const ALL: [Stem; 4] = [Stem::Vocals, Stem::Drums, Stem::Bass, Stem::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Stem::Vocals => "vocals",
            Stem::Drums => "drums",
            Stem::Bass => "bass",
            Stem::Other => "other",
        }
    }

    /// Nominal frequency range in Hz. Descriptive only: the separator does
    /// not band-limit to it.
    pub fn nominal_range(self) -> (f32, f32) {
        match self {
            Stem::Vocals => (200.0, 4000.0),
            Stem::Drums => (20.0, 200.0),
            Stem::Bass => (20.0, 250.0),
            Stem::Other => (4000.0, 20000.0),
        }
    }

    /// Output sample for one interior frame given its neighbours.
    #[inline]
    fn shape(self, prev: f32, cur: f32, next: f32) -> f32 {
        let highpass = cur - prev;
        let lowpass = (prev + cur + next) / 3.0;
        match self {
            Stem::Drums => highpass * 0.8,
            Stem::Bass => lowpass * 1.5,
            Stem::Vocals => cur - lowpass * 0.5,
            Stem::Other => highpass * 0.5,
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stem {
    type Err = AudioLabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stem::ALL
            .iter()
            .copied()
            .find(|stem| stem.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AudioLabError::InvalidArgument(format!(
                    "unknown stem '{}'. Valid stems: vocals, drums, bass, other",
                    s
                ))
            })
    }
}

impl TryFrom<String> for Stem {
    type Error = AudioLabError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Split one stem out of channel 0 using first-difference high-pass and
/// 3-tap moving-average low-pass combinations.
///
/// The result is mono with the input's rate and length. The first and last
/// frames have no full neighbourhood and stay at zero.
pub fn separate(buffer: &SampleBuffer, stem: Stem) -> SampleBuffer {
    let x = buffer.channel(0).unwrap_or(&[]);
    let mut out = SampleBuffer::silent(1, x.len(), buffer.sample_rate());
    let dst = &mut out.channels_mut()[0];

    for (i, w) in x.windows(3).enumerate() {
        dst[i + 1] = stem.shape(w[0], w[1], w[2]);
    }
    out
}

/// Separate several stems from the same buffer in parallel.
pub fn separate_many(buffer: &SampleBuffer, stems: &[Stem]) -> Vec<(Stem, SampleBuffer)> {
    stems
        .par_iter()
        .map(|&stem| (stem, separate(buffer, stem)))
        .collect()
}

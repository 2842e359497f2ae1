use crate::error::{AudioLabError, Result};

/// Decoded multi-channel PCM, stored de-interleaved.
///
/// Every channel holds exactly `frame_count()` samples. Buffers are never
/// mutated after construction; transforms allocate a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(AudioLabError::InvalidArgument(
                "sample buffer needs at least one channel".into(),
            ));
        }
        if sample_rate == 0 {
            return Err(AudioLabError::InvalidArgument(
                "sample rate must be positive".into(),
            ));
        }
        let frames = channels[0].len();
        if let Some((idx, ch)) = channels.iter().enumerate().find(|(_, c)| c.len() != frames) {
            return Err(AudioLabError::InvalidArgument(format!(
                "channel {} has {} frames, expected {}",
                idx,
                ch.len(),
                frames
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Split interleaved samples (ch0, ch1, ch0, ch1, ...) into channels.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Result<Self> {
        if channel_count == 0 {
            return Err(AudioLabError::InvalidArgument(
                "sample buffer needs at least one channel".into(),
            ));
        }
        if samples.len() % channel_count != 0 {
            return Err(AudioLabError::InvalidArgument(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                channel_count
            )));
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// Zero-filled buffer, the starting point of every transform.
    pub(crate) fn silent(channel_count: usize, frame_count: usize, sample_rate: u32) -> Self {
        Self {
            channels: vec![vec![0.0; frame_count]; channel_count.max(1)],
            sample_rate,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Largest absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|s| s.abs())
            .fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_channels() {
        let err = SampleBuffer::new(vec![vec![0.0; 4], vec![0.0; 3]], 44100).unwrap_err();
        assert!(matches!(err, AudioLabError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_zero_channels_and_rate() {
        assert!(SampleBuffer::new(vec![], 44100).is_err());
        assert!(SampleBuffer::from_mono(vec![0.0], 0).is_err());
    }

    #[test]
    fn deinterleaves_frames() {
        let buf = SampleBuffer::from_interleaved(&[0.1, -0.1, 0.2, -0.2, 0.3, -0.3], 2, 48000).unwrap();
        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), 3);
        assert_eq!(buf.channel(0).unwrap(), &[0.1, 0.2, 0.3]);
        assert_eq!(buf.channel(1).unwrap(), &[-0.1, -0.2, -0.3]);
    }

    #[test]
    fn empty_buffer_is_valid() {
        let buf = SampleBuffer::from_mono(Vec::new(), 44100).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.duration(), 0.0);
        assert_eq!(buf.peak(), 0.0);
    }
}

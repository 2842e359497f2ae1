use crate::audio::buffer::SampleBuffer;

pub const HEADER_LEN: usize = 44;

const WAV_FORMAT_PCM: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// Serialize a buffer as a canonical 16-bit PCM WAV file.
///
/// The layout is a 44-byte RIFF/fmt/data header followed by frame-major
/// interleaved little-endian samples. Samples are clamped to [-1, 1],
/// scaled by 32767 and truncated, so -1.0 encodes as -32767.
pub fn encode(buffer: &SampleBuffer) -> Vec<u8> {
    let channel_count = buffer.channel_count();
    let frames = buffer.frame_count();

    let num_channels = channel_count as u16;
    let block_align = num_channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = buffer.sample_rate() * block_align as u32;
    let data_size = (frames * channel_count * BYTES_PER_SAMPLE) as u32;
    let riff_size = (HEADER_LEN as u32 - 8) + data_size;

    let mut out = Vec::with_capacity(HEADER_LEN + data_size as usize);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&WAV_FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate().to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());

    let channels = buffer.channels();
    for frame in 0..frames {
        for channel in channels {
            out.extend_from_slice(&to_pcm16(channel[frame]).to_le_bytes());
        }
    }

    out
}

/// Clamp, scale by 32767 and truncate toward zero. NaN encodes as 0.
#[inline]
fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    fn pcm_payload(bytes: &[u8]) -> Vec<i16> {
        bytes[HEADER_LEN..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn mono_header_and_payload() {
        let buf = SampleBuffer::from_mono(vec![0.0, 1.0, -1.0, 0.5], 44100).unwrap();
        let bytes = encode(&buf);

        assert_eq!(bytes.len(), 52);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4), 44);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16);
        assert_eq!(u16_at(&bytes, 20), 1);
        assert_eq!(u16_at(&bytes, 22), 1);
        assert_eq!(u32_at(&bytes, 24), 44100);
        assert_eq!(u32_at(&bytes, 28), 88200);
        assert_eq!(u16_at(&bytes, 32), 2);
        assert_eq!(u16_at(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), 8);
        assert_eq!(pcm_payload(&bytes), vec![0, 32767, -32767, 16383]);
    }

    #[test]
    fn stereo_is_frame_interleaved() {
        let buf = SampleBuffer::new(vec![vec![0.25, 0.5], vec![-0.25, -0.5]], 48000).unwrap();
        let bytes = encode(&buf);
        assert_eq!(bytes.len(), HEADER_LEN + 2 * 2 * 2);
        assert_eq!(u32_at(&bytes, 28), 48000 * 4);
        assert_eq!(u16_at(&bytes, 32), 4);
        assert_eq!(pcm_payload(&bytes), vec![8191, -8191, 16383, -16383]);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let buf = SampleBuffer::from_mono(vec![2.5, -7.0, f32::NAN], 8000).unwrap();
        assert_eq!(pcm_payload(&encode(&buf)), vec![32767, -32767, 0]);
    }

    #[test]
    fn empty_buffer_is_header_only() {
        let buf = SampleBuffer::from_mono(Vec::new(), 44100).unwrap();
        let bytes = encode(&buf);
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(u32_at(&bytes, 4), 36);
        assert_eq!(u32_at(&bytes, 40), 0);
    }

    #[test]
    fn readable_by_hound() {
        let buf = SampleBuffer::new(vec![vec![0.0, 0.5, -0.5], vec![1.0, -1.0, 0.0]], 22050).unwrap();
        let bytes = encode(&buf);
        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 32767, 16383, -32767, -16383, 0]);
    }
}

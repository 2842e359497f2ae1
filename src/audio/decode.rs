use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::buffer::SampleBuffer;
use crate::error::{AudioLabError, Result};
use crate::host::AudioDecoder;

/// Host decoder backed by symphonia. Keeps every channel of the first
/// audio track.
#[derive(Debug, Default, Clone)]
pub struct SymphoniaDecoder {
    extension: Option<String>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe hint, usually the source file's extension.
    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extension = Some(ext.to_ascii_lowercase());
        self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = self.extension.as_deref() {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AudioLabError::Decode(format!("failed to probe audio format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
            .ok_or_else(|| AudioLabError::Decode("no audio tracks found".into()))?;

        let track_id = track.id;
        let mut channel_count = track.codec_params.channels.map_or(0, |c| c.count());
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioLabError::Decode("unknown sample rate".into()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioLabError::Decode(format!("failed to create audio decoder: {}", e)))?;

        let mut interleaved: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(AudioLabError::Decode(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                    log::warn!("Skipping undecodable packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(AudioLabError::Decode(e.to_string())),
            };

            let spec = *decoded.spec();
            if channel_count == 0 {
                channel_count = spec.channels.count();
            }

            let mut scratch = InterleavedBuffer::<f32>::new(decoded.capacity() as u64, spec);
            scratch.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(scratch.samples());
        }

        let buffer = SampleBuffer::from_interleaved(&interleaved, channel_count.max(1), sample_rate)?;

        log::info!(
            "Decoded audio: {} frames x {} channels, {}Hz, {:.1}s",
            buffer.frame_count(),
            buffer.channel_count(),
            sample_rate,
            buffer.duration()
        );

        Ok(buffer)
    }
}

/// Read and decode a file, using its extension as the probe hint.
pub fn decode_file(path: &Path) -> Result<SampleBuffer> {
    let bytes = std::fs::read(path)?;
    let mut decoder = SymphoniaDecoder::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        decoder = decoder.with_extension(ext);
    }
    decoder.decode(&bytes)
}

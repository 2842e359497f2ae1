use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::wav;
use crate::audio::buffer::SampleBuffer;
use crate::error::{AudioLabError, Result};
use crate::synth::separate::Stem;

/// Archive name for the stems of `source_name`: the file stem with every
/// non-alphanumeric character replaced by `_`, plus `_stems.zip`.
pub fn archive_name(source_name: &str) -> String {
    let base = std::path::Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let safe: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_stems.zip", safe)
}

/// Write one stored `<stem>.wav` entry per stem into `writer`.
pub fn write_stems<W: Write + Seek>(writer: W, stems: &[(Stem, &SampleBuffer)]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);

    for (stem, buffer) in stems {
        let name = format!("{}.wav", stem);
        zip.start_file(name.as_str(), options)
            .map_err(|e| AudioLabError::Archive(format!("{}: {}", name, e)))?;
        zip.write_all(&wav::encode(buffer))?;
        log::debug!("Archived {} ({} frames)", name, buffer.frame_count());
    }

    zip.finish().map_err(|e| AudioLabError::Archive(e.to_string()))
}

/// In-memory zip of the given stems.
pub fn stems_to_zip(stems: &[(Stem, &SampleBuffer)]) -> Result<Vec<u8>> {
    let cursor = write_stems(Cursor::new(Vec::new()), stems)?;
    Ok(cursor.into_inner())
}

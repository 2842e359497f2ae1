use std::io::{Cursor, Read};

use audiolab::audio::decode::{decode_file, SymphoniaDecoder};
use audiolab::encode::archive;
use audiolab::encode::export::ExportOptions;
use audiolab::encode::wav;
use audiolab::host::{PlaybackSink, WavFileSink};
use audiolab::{FeatureKey, FeatureValue, SampleBuffer, Session, Stem, SynthesisMode};

fn stereo_tone(frames: usize, sample_rate: u32) -> SampleBuffer {
    let left = (0..frames)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    let right = (0..frames)
        .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sample_rate as f32).sin() * 0.25)
        .collect();
    SampleBuffer::new(vec![left, right], sample_rate).unwrap()
}

#[test]
fn decode_analyze_transform_export() {
    let source = stereo_tone(22050, 22050);
    let bytes = wav::encode(&source);

    let mut session = Session::new().with_seed(3);
    let features = session
        .load_bytes(&SymphoniaDecoder::new().with_extension("wav"), &bytes)
        .unwrap();

    assert_eq!(features.get(FeatureKey::Duration), Some(&FeatureValue::Text("1.00 s".into())));
    assert_eq!(features.get(FeatureKey::SampleRate), Some(&FeatureValue::Text("22050 Hz".into())));
    assert_eq!(features.get(FeatureKey::Channels), Some(&FeatureValue::Integer(2)));

    session.apply_synthesis_mode(SynthesisMode::Reversed).unwrap();
    let reversed = session.current().unwrap();
    let original = session.original().unwrap();
    assert_eq!(reversed.channel(0).unwrap()[0], original.channel(0).unwrap()[22049]);

    let exported = session
        .export(&ExportOptions {
            sample_rate: 44100,
            format: "wav".into(),
        })
        .unwrap();
    assert_eq!(exported.file_name, "processed_audio.wav");
    assert_eq!(exported.sample_rate, 44100);
    assert_eq!(exported.frame_count, 44100);

    let reader = hound::WavReader::new(Cursor::new(exported.bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.duration(), 44100);
}

#[test]
fn stems_written_as_files_and_archive() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mix take.wav");
    std::fs::write(&input, wav::encode(&stereo_tone(4410, 44100))).unwrap();

    let mut session = Session::new();
    session.load(decode_file(&input).unwrap());
    session.separate_all(&[Stem::Drums, Stem::Bass]).unwrap();

    for (stem, track) in session.separated_tracks() {
        let mut sink = WavFileSink::new(dir.path().join(format!("{}.wav", stem)));
        sink.render(track, session.params()).unwrap();
    }
    let drums = hound::WavReader::open(dir.path().join("drums.wav")).unwrap();
    assert_eq!(drums.spec().channels, 1);
    assert_eq!(drums.duration(), 4410);
    assert!(!dir.path().join("vocals.wav").exists());

    let tracks: Vec<_> = session.separated_tracks().collect();
    let zip_bytes = archive::stems_to_zip(&tracks).unwrap();
    assert_eq!(archive::archive_name("mix take.wav"), "mix_take_stems.zip");

    let mut zip = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
    assert_eq!(zip.len(), 2);
    let mut entry = zip.by_name("bass.wav").unwrap();
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, wav::encode(session.separated(Stem::Bass).unwrap()));
}

#[test]
fn pitch_shift_through_session_changes_length() {
    let mut session = Session::new();
    session.load(stereo_tone(8000, 8000));
    let up = session.apply_synthesis_mode(SynthesisMode::Pitched(12)).unwrap();
    assert_eq!(up.frame_count(), 4000);
    assert_eq!(up.channel_count(), 2);

    let features = session.features().unwrap();
    assert_eq!(features.get(FeatureKey::Duration), Some(&FeatureValue::Text("0.50 s".into())));
}

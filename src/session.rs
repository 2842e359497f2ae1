//! Explicit playback/editing context
//!
//! Holds what an interactive front end keeps between actions: the buffer
//! as loaded, the buffer currently selected for playback, the stems split
//! from it, and the live playback parameters. DSP functions stay pure;
//! only this object changes state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use crate::audio::analysis;
use crate::audio::buffer::SampleBuffer;
use crate::audio::features::FeatureSet;
use crate::encode::export::{self, ExportOptions, ExportedAudio};
use crate::error::{AudioLabError, Result};
use crate::host::{AudioDecoder, PlaybackParams, PlaybackSink};
use crate::synth::separate::{self, Stem};
use crate::synth::transform::{self, SynthesisMode};

#[derive(Debug, Default)]
pub struct Session {
    original: Option<SampleBuffer>,
    current: Option<SampleBuffer>,
    separated: BTreeMap<Stem, SampleBuffer>,
    params: PlaybackParams,
    seed: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin granular synthesis to a reproducible random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Make `buffer` both the original and the current buffer and return
    /// its features. Previously separated stems are kept.
    pub fn load(&mut self, buffer: SampleBuffer) -> FeatureSet {
        let features = analysis::extract(&buffer);
        log::info!(
            "Loaded {:.2}s of audio ({} ch, {}Hz)",
            buffer.duration(),
            buffer.channel_count(),
            buffer.sample_rate()
        );
        self.current = Some(buffer.clone());
        self.original = Some(buffer);
        features
    }

    /// Decode `bytes` with the host decoder and load the result.
    pub fn load_bytes(&mut self, decoder: &dyn AudioDecoder, bytes: &[u8]) -> Result<FeatureSet> {
        let buffer = decoder.decode(bytes)?;
        Ok(self.load(buffer))
    }

    pub fn original(&self) -> Option<&SampleBuffer> {
        self.original.as_ref()
    }

    pub fn current(&self) -> Option<&SampleBuffer> {
        self.current.as_ref()
    }

    /// Features of the current buffer.
    pub fn features(&self) -> Result<FeatureSet> {
        Ok(analysis::extract(self.require_current()?))
    }

    /// Replace the current buffer with `mode` applied to the original.
    pub fn apply_synthesis_mode(&mut self, mode: SynthesisMode) -> Result<&SampleBuffer> {
        let original = self
            .original
            .as_ref()
            .ok_or_else(|| AudioLabError::InvalidArgument("no audio loaded".into()))?;

        let processed = match self.seed {
            Some(seed) => transform::apply(original, mode, &mut StdRng::seed_from_u64(seed))?,
            None => transform::apply(original, mode, &mut rand::thread_rng())?,
        };

        log::info!("Applied {} synthesis mode", mode);
        Ok(&*self.current.insert(processed))
    }

    /// Split `stem` out of the current buffer and store it, replacing any
    /// earlier result for the same stem.
    pub fn separate_component(&mut self, stem: Stem) -> Result<&SampleBuffer> {
        let track = separate::separate(self.require_current()?, stem);
        log::info!("{} separated successfully", stem);
        self.separated.insert(stem, track);
        Ok(&self.separated[&stem])
    }

    /// Separate several stems at once.
    pub fn separate_all(&mut self, stems: &[Stem]) -> Result<()> {
        let results = separate::separate_many(self.require_current()?, stems);
        for (stem, track) in results {
            self.separated.insert(stem, track);
        }
        log::info!("Separated {} stems", stems.len());
        Ok(())
    }

    pub fn separated(&self, stem: Stem) -> Option<&SampleBuffer> {
        self.separated.get(&stem)
    }

    /// Separated stems in stem order.
    pub fn separated_tracks(&self) -> impl Iterator<Item = (Stem, &SampleBuffer)> {
        self.separated.iter().map(|(s, b)| (*s, b))
    }

    /// Make a separated stem the current buffer.
    pub fn select_separated(&mut self, stem: Stem) -> Result<&SampleBuffer> {
        let track = self.separated.get(&stem).cloned().ok_or_else(|| {
            AudioLabError::InvalidArgument(format!("{} has not been separated yet", stem))
        })?;
        Ok(&*self.current.insert(track))
    }

    /// Make the original mix current again.
    pub fn select_original(&mut self) -> Result<&SampleBuffer> {
        let original = self
            .original
            .clone()
            .ok_or_else(|| AudioLabError::InvalidArgument("no audio loaded".into()))?;
        Ok(&*self.current.insert(original))
    }

    pub fn params(&self) -> &PlaybackParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut PlaybackParams {
        &mut self.params
    }

    pub fn set_distortion(&mut self, amount: i32) {
        self.params.distortion = amount;
    }

    /// Hand the current buffer and playback parameters to `sink`.
    pub fn play(&self, sink: &mut dyn PlaybackSink) -> Result<()> {
        let buffer = self
            .current
            .as_ref()
            .ok_or_else(|| AudioLabError::InvalidArgument("please load an audio file first".into()))?;
        sink.render(buffer, &self.params)
    }

    /// Render and encode the current buffer.
    pub fn export(&self, options: &ExportOptions) -> Result<ExportedAudio> {
        let buffer = self
            .current
            .as_ref()
            .ok_or_else(|| AudioLabError::InvalidArgument("no audio to export".into()))?;
        export::export(buffer, options)
    }

    fn require_current(&self) -> Result<&SampleBuffer> {
        self.current
            .as_ref()
            .ok_or_else(|| AudioLabError::InvalidArgument("no audio loaded".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        rendered: Vec<(usize, PlaybackParams)>,
    }

    impl PlaybackSink for RecordingSink {
        fn render(&mut self, buffer: &SampleBuffer, params: &PlaybackParams) -> Result<()> {
            self.rendered.push((buffer.frame_count(), params.clone()));
            Ok(())
        }
    }

    fn tone() -> SampleBuffer {
        let samples = (0..4410).map(|i| ((i as f32) * 0.05).sin() * 0.5).collect();
        SampleBuffer::from_mono(samples, 44100).unwrap()
    }

    #[test]
    fn empty_session_rejects_actions() {
        let mut session = Session::new();
        assert!(session.features().is_err());
        assert!(session.apply_synthesis_mode(SynthesisMode::Reversed).is_err());
        assert!(session.separate_component(Stem::Bass).is_err());
        assert!(session.select_original().is_err());
        let mut sink = RecordingSink { rendered: Vec::new() };
        assert!(session.play(&mut sink).is_err());
        assert!(session.export(&ExportOptions::default()).is_err());
    }

    #[test]
    fn synthesis_always_starts_from_original() {
        let mut session = Session::new();
        session.load(tone());
        session.apply_synthesis_mode(SynthesisMode::Pitched(12)).unwrap();
        assert_eq!(session.current().unwrap().frame_count(), 2205);
        // A second shift is applied to the original, not stacked.
        session.apply_synthesis_mode(SynthesisMode::Pitched(12)).unwrap();
        assert_eq!(session.current().unwrap().frame_count(), 2205);
        session.apply_synthesis_mode(SynthesisMode::Original).unwrap();
        assert_eq!(session.current(), session.original());
    }

    #[test]
    fn rejected_pitch_shift_keeps_current_buffer() {
        let mut session = Session::new();
        session.load(tone());
        session.apply_synthesis_mode(SynthesisMode::Reversed).unwrap();
        let before = session.current().cloned();
        assert!(matches!(
            session.apply_synthesis_mode(SynthesisMode::Pitched(i32::MIN)),
            Err(AudioLabError::InvalidArgument(_))
        ));
        assert_eq!(session.current().cloned(), before);
    }

    #[test]
    fn seeded_session_is_reproducible() {
        let mut a = Session::new().with_seed(11);
        let mut b = Session::new().with_seed(11);
        a.load(tone());
        b.load(tone());
        let out_a = a.apply_synthesis_mode(SynthesisMode::Granular).unwrap().clone();
        let out_b = b.apply_synthesis_mode(SynthesisMode::Granular).unwrap().clone();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn separation_overwrites_per_stem_and_selects() {
        let mut session = Session::new();
        session.load(tone());
        session.separate_component(Stem::Drums).unwrap();
        session.separate_all(&Stem::ALL).unwrap();
        assert_eq!(session.separated_tracks().count(), 4);

        let drums = session.select_separated(Stem::Drums).unwrap().clone();
        assert_eq!(drums.channel_count(), 1);
        assert_eq!(session.current(), Some(&drums));

        session.select_original().unwrap();
        assert_eq!(session.current(), session.original());
    }

    #[test]
    fn selecting_unseparated_stem_fails() {
        let mut session = Session::new();
        session.load(tone());
        assert!(matches!(
            session.select_separated(Stem::Vocals),
            Err(AudioLabError::InvalidArgument(_))
        ));
    }

    #[test]
    fn play_passes_current_params() {
        let mut session = Session::new();
        session.load(tone());
        session.set_distortion(25);
        session.params_mut().gain = 0.3;
        let mut sink = RecordingSink { rendered: Vec::new() };
        session.play(&mut sink).unwrap();
        assert_eq!(sink.rendered.len(), 1);
        assert_eq!(sink.rendered[0].0, 4410);
        assert_eq!(sink.rendered[0].1.distortion, 25);
        assert_eq!(sink.rendered[0].1.gain, 0.3);
    }
}

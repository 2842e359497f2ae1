mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use audiolab::audio::decode::SymphoniaDecoder;
use audiolab::config::{self, SeparateSettings, TransformSettings};
use audiolab::encode::archive;
use audiolab::encode::export::ExportOptions;
use audiolab::host::{PlaybackSink, WavFileSink};
use audiolab::synth::distortion;
use audiolab::{Session, Stem, SynthesisMode};
use cli::{Cli, Command, Mode};

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    // Config values apply only when the CLI is at its default
    if let Some(path) = config::find_config(cli.config.as_deref()) {
        if let Some(cfg) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            merge_config(&mut cli.command, cfg);
        } else {
            log::warn!("Could not load config from {}", path.display());
        }
    }

    match cli.command {
        Command::Analyze { input, json } => analyze(&input, json),
        Command::Transform {
            input,
            mode,
            semitones,
            seed,
            output,
            sample_rate,
            format,
        } => {
            let mode = match mode {
                Mode::Reverse => SynthesisMode::Reversed,
                Mode::Pitch => SynthesisMode::Pitched(semitones),
                Mode::Granular => SynthesisMode::Granular,
            };
            transform(&input, mode, seed, output, ExportOptions { sample_rate, format })
        }
        Command::Separate {
            input,
            stems,
            output,
            archive,
        } => separate(&input, &stems, &output, archive),
        Command::Curve { amount, output } => curve(amount, output.as_deref()),
    }
}

fn merge_config(command: &mut Command, cfg: config::Config) {
    match command {
        Command::Transform {
            semitones,
            seed,
            sample_rate,
            format,
            ..
        } => {
            let merged = cfg.merge_transform(TransformSettings {
                semitones: *semitones,
                seed: *seed,
                sample_rate: *sample_rate,
                format: std::mem::take(format),
            });
            *semitones = merged.semitones;
            *seed = merged.seed;
            *sample_rate = merged.sample_rate;
            *format = merged.format;
        }
        Command::Separate { stems, archive, .. } => {
            let merged = cfg.merge_separate(SeparateSettings {
                stems: std::mem::take(stems),
                archive: *archive,
            });
            *stems = merged.stems;
            *archive = merged.archive;
        }
        Command::Analyze { .. } | Command::Curve { .. } => {}
    }
}

fn load_session(input: &Path, seed: Option<u64>) -> Result<(Session, audiolab::FeatureSet)> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut decoder = SymphoniaDecoder::new();
    if let Some(ext) = input.extension().and_then(|e| e.to_str()) {
        decoder = decoder.with_extension(ext);
    }

    let mut session = match seed {
        Some(seed) => Session::new().with_seed(seed),
        None => Session::new(),
    };
    let features = session
        .load_bytes(&decoder, &bytes)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    Ok((session, features))
}

fn analyze(input: &Path, json: bool) -> Result<()> {
    let (_, features) = load_session(input, None)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&features)?);
    } else {
        for (key, value) in features.iter() {
            println!("{}: {}", key.display_label(), value);
        }
    }
    Ok(())
}

fn transform(
    input: &Path,
    mode: SynthesisMode,
    seed: Option<u64>,
    output: Option<PathBuf>,
    options: ExportOptions,
) -> Result<()> {
    let (mut session, _) = load_session(input, seed)?;
    session.apply_synthesis_mode(mode)?;

    let exported = session.export(&options).context("Export failed")?;
    let path = output.unwrap_or_else(|| PathBuf::from(&exported.file_name));
    std::fs::write(&path, &exported.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!(
        "Wrote {} ({} frames at {}Hz)",
        path.display(),
        exported.frame_count,
        exported.sample_rate
    );
    Ok(())
}

fn separate(input: &Path, stems: &[Stem], output: &Path, archive: bool) -> Result<()> {
    let stems: Vec<Stem> = if stems.is_empty() { Stem::ALL.to_vec() } else { stems.to_vec() };

    let (mut session, _) = load_session(input, None)?;
    session.separate_all(&stems)?;

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    if archive {
        let tracks: Vec<_> = session.separated_tracks().collect();
        let source = input.file_name().and_then(|n| n.to_str()).unwrap_or("audio");
        let path = output.join(archive::archive_name(source));
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        archive::write_stems(file, &tracks).context("Failed to write stem archive")?;
        log::info!("Wrote {} ({} stems)", path.display(), tracks.len());
        return Ok(());
    }

    for (stem, track) in session.separated_tracks() {
        let mut sink = WavFileSink::new(output.join(format!("{}.wav", stem)));
        sink.render(track, session.params())
            .with_context(|| format!("Failed to write {} stem", stem))?;
    }
    Ok(())
}

fn curve(amount: i32, output: Option<&Path>) -> Result<()> {
    let curve = distortion::make_curve(amount);

    match output {
        Some(path) => {
            let json = serde_json::to_string(&curve)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}-point curve to {}", curve.len(), path.display());
        }
        None => {
            let min = curve.iter().cloned().fold(f32::INFINITY, f32::min);
            let max = curve.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            println!("amount: {}", amount);
            println!("points: {}", curve.len());
            println!("range: [{:.4}, {:.4}]", min, max);
            println!("midpoint: {:.4}", curve[curve.len() / 2]);
        }
    }
    Ok(())
}

use audiolab::synth::transform::MAX_SEMITONES;
use audiolab::Stem;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "audiolab", about = "Audio feature extraction, effects and stem separation")]
pub struct Cli {
    /// Config file (defaults to audiolab.toml or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the features of an audio file
    Analyze {
        /// Input audio file (WAV, MP3, FLAC, OGG)
        input: PathBuf,

        /// Emit JSON instead of a label table
        #[arg(long)]
        json: bool,
    },

    /// Reverse, pitch-shift or granulate an audio file
    Transform {
        /// Input audio file
        input: PathBuf,

        /// Synthesis mode
        #[arg(short, long, value_enum)]
        mode: Mode,

        /// Pitch shift in semitones (pitch mode only)
        #[arg(
            long,
            default_value_t = 0,
            allow_hyphen_values = true,
            value_parser = clap::value_parser!(i32).range(-(MAX_SEMITONES as i64)..=MAX_SEMITONES as i64)
        )]
        semitones: i32,

        /// Seed for granular grain placement
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (defaults to processed_audio.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Filename label for the export (the payload is always WAV)
        #[arg(long, default_value = "wav")]
        format: String,
    },

    /// Split an audio file into heuristic stems
    Separate {
        /// Input audio file
        input: PathBuf,

        /// Stems to extract (repeatable; all four when omitted)
        #[arg(long = "stem", value_parser = parse_stem)]
        stems: Vec<Stem>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Bundle the stems into a zip archive instead of loose files
        #[arg(long)]
        archive: bool,
    },

    /// Dump the wave-shaper distortion curve
    Curve {
        /// Distortion amount
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        amount: i32,

        /// Write the curve as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Reverse,
    Pitch,
    Granular,
}

fn parse_stem(s: &str) -> Result<Stem, audiolab::AudioLabError> {
    s.parse()
}

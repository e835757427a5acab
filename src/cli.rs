use std::path::PathBuf;

use clap::Parser;

pub const OFFSET_DEFAULT: f64 = 0.4;
pub const THRESHOLD_DEFAULT: f64 = -70.0;
/// ffmpeg's own default for `silencedetect=d=`.
pub const TRIM_DURATION_DEFAULT: f64 = 2.0;

/// Split a .wav file into tracks that are separated by silences.
#[derive(Parser, Debug)]
#[command(name = "split", author, version, about)]
pub struct SplitArgs {
    /// The .wav file that is to be split
    pub file: PathBuf,

    /// The noise level in dB that is regarded as silence (e.g. -50)
    #[arg(allow_negative_numbers = true)]
    pub noise: f64,

    /// The minimum silence duration in seconds that separates two tracks (e.g. 1.5)
    pub duration: f64,

    /// Seconds of silence kept before the start and after the end of each track
    #[arg(short = 'o', long, default_value_t = OFFSET_DEFAULT)]
    pub offset: f64,

    /// Write the tracks as 01.wav, 02.wav, ... next to the input file. Without it, only preview.
    #[arg(short = 'x', long)]
    pub execute: bool,

    /// Print the computed tracks as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show ffmpeg/sox output and debug logs.
    #[arg(short = 'g', long)]
    pub debug: bool,
}

/// Trim leading and trailing silence from a .wav file.
#[derive(Parser, Debug)]
#[command(name = "trim", author, version, about)]
pub struct TrimArgs {
    /// The .wav file to be trimmed
    pub file: PathBuf,

    /// Silence threshold in dB. Use a higher value (e.g. -50) if silences are louder.
    #[arg(short = 't', long, default_value_t = THRESHOLD_DEFAULT, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Minimum duration in seconds for a quiet stretch to count as silence
    #[arg(short = 'd', long, default_value_t = TRIM_DURATION_DEFAULT)]
    pub duration: f64,

    /// Seconds of silence kept before the start and after the end of the sound
    #[arg(short = 'o', long, default_value_t = OFFSET_DEFAULT)]
    pub offset: f64,

    /// Write the trimmed audio to <name>_trimmed.wav next to the input file
    #[arg(short = 'x', long)]
    pub execute: bool,

    /// Remove DC offset and normalize the trimmed file (requires --execute)
    #[arg(short = 'n', long)]
    pub normalize: bool,

    /// Print the computed trim window as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show ffmpeg/sox output and debug logs.
    #[arg(short = 'g', long)]
    pub debug: bool,
}

//! Validated, immutable per-run settings built from the command line.

use std::path::{Path, PathBuf};

use crate::cli::{SplitArgs, TrimArgs};
use crate::error::{Result, SilenceError};

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub file: PathBuf,
    pub noise_db: f64,
    pub min_silence: f64,
    pub offset: f64,
    pub execute: bool,
    pub json: bool,
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct TrimConfig {
    pub file: PathBuf,
    pub threshold_db: f64,
    pub min_silence: f64,
    pub offset: f64,
    pub execute: bool,
    pub normalize: bool,
    pub json: bool,
    pub debug: bool,
}

impl TryFrom<SplitArgs> for SplitConfig {
    type Error = SilenceError;

    fn try_from(args: SplitArgs) -> Result<Self> {
        check_wav_file(&args.file)?;
        check_threshold("noise", args.noise)?;
        check_min_silence("duration", args.duration)?;
        check_offset(args.offset)?;
        Ok(Self {
            file: args.file,
            noise_db: args.noise,
            min_silence: args.duration,
            offset: args.offset,
            execute: args.execute,
            json: args.json,
            debug: args.debug,
        })
    }
}

impl TryFrom<TrimArgs> for TrimConfig {
    type Error = SilenceError;

    fn try_from(args: TrimArgs) -> Result<Self> {
        if args.normalize && !args.execute {
            return Err(SilenceError::NormalizeWithoutExecute);
        }
        check_wav_file(&args.file)?;
        check_threshold("threshold", args.threshold)?;
        check_min_silence("duration", args.duration)?;
        check_offset(args.offset)?;
        Ok(Self {
            file: args.file,
            threshold_db: args.threshold,
            min_silence: args.duration,
            offset: args.offset,
            execute: args.execute,
            normalize: args.normalize,
            json: args.json,
            debug: args.debug,
        })
    }
}

fn invalid(message: String) -> SilenceError {
    SilenceError::InvalidArgument(message)
}

fn check_wav_file(file: &Path) -> Result<()> {
    let is_wav = file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if !is_wav {
        return Err(invalid(format!("\"{}\" is not a .wav file", file.display())));
    }
    if !file.is_file() {
        return Err(invalid(format!("File \"{}\" does not exist", file.display())));
    }
    Ok(())
}

fn check_threshold(name: &str, db: f64) -> Result<()> {
    if !db.is_finite() || db >= 0.0 {
        return Err(invalid(format!("\"{}\" must be < 0 dB, got {}", name, db)));
    }
    Ok(())
}

fn check_min_silence(name: &str, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(invalid(format!("\"{}\" must be > 0 seconds, got {}", name, seconds)));
    }
    Ok(())
}

fn check_offset(seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid(format!("\"offset\" must be >= 0 seconds, got {}", seconds)));
    }
    Ok(())
}

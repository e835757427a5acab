use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::boundary::{TrackBoundary, TrimWindow};
use crate::error::{Result, SilenceError};
use crate::ffmpeg::{SOX, run_tool};
use crate::util::{format_timestamp, path_to_str};

/// Writes audio files. Only called in execute mode.
pub trait ActionExecutor {
    /// Copy `[start, end)` of `input` to `output`; `end == None` copies through the end of the file.
    fn extract(&self, input: &Path, start: f64, end: Option<f64>, output: &Path) -> Result<()>;

    /// Remove DC offset and normalize `file` in place.
    fn normalize(&self, file: &Path) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct SoxExecutor {
    pub debug: bool,
}

impl ActionExecutor for SoxExecutor {
    fn extract(&self, input: &Path, start: f64, end: Option<f64>, output: &Path) -> Result<()> {
        let start_str = format_timestamp(start);
        let end_str = end.map(|end| format!("={}", format_timestamp(end)));
        let mut args = vec![path_to_str(input)?, path_to_str(output)?, "trim", start_str.as_str()];
        if let Some(end_str) = &end_str {
            args.push(end_str.as_str());
        }
        run_tool(SOX, &args, self.debug)
    }

    fn normalize(&self, file: &Path) -> Result<()> {
        let dir = file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        // Same directory as the target so `persist` is an atomic rename.
        let scratch = tempfile::Builder::new()
            .prefix(".normalize")
            .suffix(".wav")
            .tempfile_in(dir)?;
        // 0.5 dB of headroom keeps dither from clipping.
        run_tool(
            SOX,
            &[
                path_to_str(file)?,
                path_to_str(scratch.path())?,
                "dcshift",
                "-0.0",
                "gain",
                "-n",
                "-0.5",
            ],
            self.debug,
        )?;
        scratch.persist(file).map_err(|e| e.error)?;
        Ok(())
    }
}

/// `01.wav`, `02.wav`, ... in the directory of the input file.
pub fn track_output_path(input: &Path, number: usize) -> PathBuf {
    let name = format!("{:02}.wav", number);
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// `recording.wav` becomes `recording_trimmed.wav` next to it.
pub fn trimmed_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_trimmed.wav", stem))
}

/// Write every track, carrying on past failures. All failures are reported together at the end.
pub fn write_tracks(
    executor: &dyn ActionExecutor,
    input: &Path,
    tracks: &[TrackBoundary],
) -> Result<Vec<PathBuf>> {
    let outputs: Vec<PathBuf> = (1..=tracks.len())
        .map(|number| track_output_path(input, number))
        .collect();
    if let Some(clash) = outputs.iter().find(|out| out.as_path() == input) {
        return Err(SilenceError::InvalidArgument(format!(
            "track {} would overwrite the input file",
            clash.display()
        )));
    }

    let mut failures = Vec::new();
    for (track, output) in tracks.iter().zip(&outputs) {
        println!("Writing {}", output.display());
        if let Err(e) = executor.extract(input, track.start, track.end, output) {
            log::error!("Writing {} failed: {}", output.display(), e);
            failures.push(format!("{}: {}", output.display(), e));
        }
    }

    if !failures.is_empty() {
        return Err(SilenceError::TrackWritesFailed {
            failures,
            total: tracks.len(),
        });
    }
    Ok(outputs)
}

/// Write the kept part of `input` to `<stem>_trimmed.wav`, normalizing it if asked to.
pub fn write_trimmed(
    executor: &dyn ActionExecutor,
    input: &Path,
    window: &TrimWindow,
    duration: f64,
    normalize: bool,
) -> Result<PathBuf> {
    let output = trimmed_output_path(input);
    let (start, length) = window.kept_range(duration);

    println!("Trimming to: {}", output.display());
    executor.extract(input, start, Some(start + length), &output)?;

    if normalize {
        println!("Removing DC offset and normalizing: {}", output.display());
        executor.normalize(&output)?;
    }
    Ok(output)
}

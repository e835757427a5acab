use std::{
    cell::RefCell,
    io::{BufRead, BufReader},
    path::Path,
    process::{Command, Stdio},
};

use serde::Deserialize;

use crate::error::{Result, SilenceError};
use crate::ffmpeg::{FFMPEG, FFPROBE, capture_tool, command_line, spawn_error};
use crate::parser::{SilenceInterval, SilenceLogParser};
use crate::util::path_to_str;

/// What a detector found in one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub intervals: Vec<SilenceInterval>,
    pub duration: f64,
}

/// Finds the silences in an audio file. The pipelines only ever see this trait.
pub trait SilenceDetector {
    fn detect(&self, file: &Path, threshold_db: f64, min_duration: f64) -> Result<Detection>;
}

/// Uses `ffprobe` for the duration and ffmpeg's `silencedetect` filter for the silences.
#[derive(Debug, Default)]
pub struct FfmpegDetector {
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Get the duration (in seconds) of a media file from its container metadata.
pub fn probe_duration(file: &Path) -> Result<f64> {
    let file_str = path_to_str(file)?;
    let output = capture_tool(
        FFPROBE,
        &[
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
            file_str,
        ],
    )?;
    duration_from_probe_json(&String::from_utf8_lossy(&output.stdout), file_str)
}

fn duration_from_probe_json(json: &str, file: &str) -> Result<f64> {
    let probe: ProbeOutput = serde_json::from_str(json)?;
    let duration = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| SilenceError::InvalidDuration(file.to_string()))?;
    Ok(duration)
}

impl SilenceDetector for FfmpegDetector {
    fn detect(&self, file: &Path, threshold_db: f64, min_duration: f64) -> Result<Detection> {
        let duration = probe_duration(file)?;
        log::debug!("Duration of {}: {:.3}s", file.display(), duration);

        let filter = format!("silencedetect=noise={}dB:d={}", threshold_db, min_duration);
        let args = [
            "-hide_banner",
            "-nostats",
            "-i",
            path_to_str(file)?,
            "-af",
            filter.as_str(),
            "-f",
            "null",
            "-",
        ];
        let line = command_line(FFMPEG, &args);
        log::debug!("Running: {}", line);

        let mut child = Command::new(FFMPEG)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(FFMPEG, e))?;
        let stderr = child.stderr.take().ok_or_else(|| {
            SilenceError::SubprocessFailure(line.clone(), "stderr was not captured".to_string())
        })?;

        // ffmpeg explains its failures in the last line it prints.
        let last_line = RefCell::new(String::new());
        let lines = BufReader::new(stderr).lines().inspect(|l| {
            if let Ok(l) = l {
                if self.debug {
                    eprintln!("{}", l);
                }
                if !l.trim().is_empty() {
                    *last_line.borrow_mut() = l.clone();
                }
            }
        });

        // Trim needs the last interval and the whole log must be drained before `wait`,
        // so the lazy parser is collected here rather than handed further down.
        let parsed: Result<Vec<_>> = SilenceLogParser::new(lines, duration)
            .and_then(|parser| parser.collect());
        let intervals = match parsed {
            Ok(intervals) => intervals,
            Err(e) => {
                // Don't leave ffmpeg blocked on a full pipe.
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(SilenceError::SubprocessFailure(
                line,
                format!("exited with {}: {}", status, last_line.into_inner()),
            ));
        }

        log::info!("Detected {} silences in {}", intervals.len(), file.display());
        Ok(Detection {
            intervals,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_duration_from_probe_json() {
        let json = r#"{ "format": { "duration": "10.000000" } }"#;
        assert_eq!(duration_from_probe_json(json, "a.wav").unwrap(), 10.0);
    }

    #[test]
    fn missing_or_zero_duration_is_invalid() {
        for json in [
            r#"{ "format": {} }"#,
            r#"{}"#,
            r#"{ "format": { "duration": "N/A" } }"#,
            r#"{ "format": { "duration": "0.000000" } }"#,
        ] {
            let err = duration_from_probe_json(json, "a.wav").unwrap_err();
            assert!(matches!(err, SilenceError::InvalidDuration(_)), "{json}");
        }
    }

    #[test]
    fn garbage_probe_output_is_a_json_error() {
        let err = duration_from_probe_json("not json", "a.wav").unwrap_err();
        assert!(matches!(err, SilenceError::SerdeJson(_)));
    }
}

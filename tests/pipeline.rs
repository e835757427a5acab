//! Split and trim pipelines driven by a canned detector log and a recording executor.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use silence_cut::app::{split_with, trim_with};
use silence_cut::config::{SplitConfig, TrimConfig};
use silence_cut::error::Result;
use silence_cut::executor::ActionExecutor;
use silence_cut::{Detection, SilenceDetector, SilenceError, SilenceLogParser, TrackBoundary};

/// Replays an ffmpeg `silencedetect` log instead of running ffmpeg.
struct CannedDetector {
    log: &'static str,
    duration: f64,
}

impl SilenceDetector for CannedDetector {
    fn detect(&self, _file: &Path, _threshold_db: f64, _min_duration: f64) -> Result<Detection> {
        let intervals = SilenceLogParser::from_text(self.log, self.duration)?.collect::<Result<_>>()?;
        Ok(Detection {
            intervals,
            duration: self.duration,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Extract {
        start: f64,
        end: Option<f64>,
        output: PathBuf,
    },
    Normalize(PathBuf),
}

#[derive(Default)]
struct RecordingExecutor {
    calls: RefCell<Vec<Call>>,
    fail_on: Vec<PathBuf>,
}

impl ActionExecutor for RecordingExecutor {
    fn extract(&self, _input: &Path, start: f64, end: Option<f64>, output: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call::Extract {
            start,
            end,
            output: output.to_path_buf(),
        });
        if self.fail_on.iter().any(|p| p == output) {
            return Err(SilenceError::SubprocessFailure(
                "sox".to_string(),
                "exited with exit status: 2".to_string(),
            ));
        }
        Ok(())
    }

    fn normalize(&self, file: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call::Normalize(file.to_path_buf()));
        Ok(())
    }
}

const THREE_TRACKS: &str = "\
[silencedetect @ 0x5581] silence_start: 100
[silencedetect @ 0x5581] silence_end: 102 | silence_duration: 2
[silencedetect @ 0x5581] silence_start: 200
[silencedetect @ 0x5581] silence_end: 203 | silence_duration: 3
";

const TRIMMABLE: &str = "\
[silencedetect @ 0x5581] silence_start: 0
[silencedetect @ 0x5581] silence_end: 1 | silence_duration: 1
[silencedetect @ 0x5581] silence_start: 8
";

fn split_config(execute: bool) -> SplitConfig {
    SplitConfig {
        file: PathBuf::from("/recordings/side_a.wav"),
        noise_db: -50.0,
        min_silence: 1.5,
        offset: 0.5,
        execute,
        json: false,
        debug: false,
    }
}

fn trim_config(execute: bool, normalize: bool) -> TrimConfig {
    TrimConfig {
        file: PathBuf::from("/recordings/take.wav"),
        threshold_db: -70.0,
        min_silence: 0.5,
        offset: 0.4,
        execute,
        normalize,
        json: false,
        debug: false,
    }
}

fn extract(start: f64, end: Option<f64>, output: &str) -> Call {
    Call::Extract {
        start,
        end,
        output: PathBuf::from(output),
    }
}

#[test]
fn split_preview_writes_nothing() {
    let detector = CannedDetector { log: THREE_TRACKS, duration: 300.0 };
    let executor = RecordingExecutor::default();

    let plan = split_with(&split_config(false), &detector, &executor).unwrap();

    assert_eq!(plan.tracks.len(), 3);
    assert!(executor.calls.borrow().is_empty());
}

#[test]
fn split_execute_writes_one_file_per_track() {
    let detector = CannedDetector { log: THREE_TRACKS, duration: 300.0 };
    let executor = RecordingExecutor::default();

    let preview = split_with(&split_config(false), &detector, &executor).unwrap();
    let plan = split_with(&split_config(true), &detector, &executor).unwrap();

    assert_eq!(preview, plan);
    assert_eq!(
        *executor.calls.borrow(),
        vec![
            extract(0.0, Some(100.5), "/recordings/01.wav"),
            extract(101.5, Some(200.5), "/recordings/02.wav"),
            extract(202.5, None, "/recordings/03.wav"),
        ]
    );
}

#[test]
fn split_keeps_going_after_a_failed_track() {
    let detector = CannedDetector { log: THREE_TRACKS, duration: 300.0 };
    let executor = RecordingExecutor {
        fail_on: vec![PathBuf::from("/recordings/02.wav")],
        ..Default::default()
    };

    let err = split_with(&split_config(true), &detector, &executor).unwrap_err();

    assert_eq!(executor.calls.borrow().len(), 3);
    match err.downcast_ref::<SilenceError>() {
        Some(SilenceError::TrackWritesFailed { failures, total }) => {
            assert_eq!(*total, 3);
            assert_eq!(failures.len(), 1);
            assert!(failures[0].contains("02.wav"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn split_without_silence_is_a_single_track() {
    let detector = CannedDetector { log: "size=N/A time=00:04:00.00\n", duration: 240.0 };
    let executor = RecordingExecutor::default();

    let plan = split_with(&split_config(false), &detector, &executor).unwrap();

    assert_eq!(plan.tracks, vec![TrackBoundary { start: 0.0, end: None }]);
    assert_eq!(plan.tracks[0].length(plan.duration), 240.0);
}

#[test]
fn split_fails_on_malformed_log() {
    let detector = CannedDetector {
        log: "[silencedetect @ 0x5581] silence_end: 3 | silence_duration: 1\n",
        duration: 10.0,
    };
    let executor = RecordingExecutor::default();

    let err = split_with(&split_config(true), &detector, &executor).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SilenceError>(),
        Some(SilenceError::MalformedDetectorOutput(_))
    ));
    assert!(executor.calls.borrow().is_empty());
}

#[test]
fn trim_preview_reports_window() {
    let detector = CannedDetector { log: TRIMMABLE, duration: 10.0 };
    let executor = RecordingExecutor::default();

    let plan = trim_with(&trim_config(false, false), &detector, &executor).unwrap();

    assert!((plan.window.lead_trim - 0.6).abs() < 1e-9);
    assert!((plan.window.trail_trim - 1.6).abs() < 1e-9);
    assert!(executor.calls.borrow().is_empty());
}

#[test]
fn trim_execute_extracts_and_normalizes() {
    let detector = CannedDetector { log: TRIMMABLE, duration: 10.0 };
    let executor = RecordingExecutor::default();

    trim_with(&trim_config(true, true), &detector, &executor).unwrap();

    let calls = executor.calls.borrow();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        Call::Extract { start, end, output } => {
            assert!((start - 0.6).abs() < 1e-9);
            assert!((end.unwrap() - 8.4).abs() < 1e-9);
            assert_eq!(output, Path::new("/recordings/take_trimmed.wav"));
        }
        other => panic!("expected an extract, got {other:?}"),
    }
    assert_eq!(calls[1], Call::Normalize(PathBuf::from("/recordings/take_trimmed.wav")));
}

#[test]
fn trim_normalize_without_execute_is_refused() {
    let detector = CannedDetector { log: TRIMMABLE, duration: 10.0 };
    let executor = RecordingExecutor::default();

    let err = trim_with(&trim_config(false, true), &detector, &executor).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SilenceError>(),
        Some(SilenceError::NormalizeWithoutExecute)
    ));
    assert!(executor.calls.borrow().is_empty());
}

#[test]
fn trim_of_silent_file_is_refused() {
    let detector = CannedDetector {
        log: "[silencedetect @ 0x5581] silence_start: 0\n",
        duration: 10.0,
    };
    let executor = RecordingExecutor::default();

    let err = trim_with(&trim_config(true, false), &detector, &executor).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SilenceError>(),
        Some(SilenceError::EntireFileSilent)
    ));
    assert!(executor.calls.borrow().is_empty());
}

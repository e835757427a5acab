use serde::Serialize;

use crate::error::{Result, SilenceError};
use crate::parser::SilenceInterval;

/// Silences this close to the start or end of the file count as leading/trailing.
pub const EDGE_TOLERANCE: f64 = 0.001;

/// One track of a split. `end == None` means the track runs through the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackBoundary {
    pub start: f64,
    pub end: Option<f64>,
}

impl TrackBoundary {
    pub fn end_or(&self, duration: f64) -> f64 {
        self.end.unwrap_or(duration)
    }

    pub fn length(&self, duration: f64) -> f64 {
        self.end_or(duration) - self.start
    }
}

/// How much to cut from the start and from the end of a file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimWindow {
    pub lead_trim: f64,
    pub trail_trim: f64,
}

impl TrimWindow {
    /// Start and length of the part that is kept.
    pub fn kept_range(&self, duration: f64) -> (f64, f64) {
        (self.lead_trim, duration - self.lead_trim - self.trail_trim)
    }
}

fn check_duration(duration: f64) -> Result<()> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SilenceError::InvalidDuration(format!("{} seconds", duration)));
    }
    Ok(())
}

/// ffmpeg reports silences at the file edges a hair off 0 and short of the duration.
fn snap_to_edges(silence: SilenceInterval, duration: f64) -> SilenceInterval {
    SilenceInterval {
        start: if silence.start <= EDGE_TOLERANCE { 0.0 } else { silence.start },
        end: if silence.end >= duration - EDGE_TOLERANCE { duration } else { silence.end },
    }
}

/// Every stretch of sound between two silences becomes a track. Each track reaches
/// `offset` seconds into the silence on both sides so attack and decay are not clipped.
///
/// Stretches without positive length (a silence at the very start, silences that touch)
/// produce no track. The last track always runs through the end of the file.
pub fn split_tracks<I>(intervals: I, offset: f64, duration: f64) -> Result<Vec<TrackBoundary>>
where
    I: IntoIterator<Item = SilenceInterval>,
{
    check_duration(duration)?;

    let mut tracks = Vec::new();
    let mut sound_start = 0.0f64;
    let mut track_start = 0.0f64;

    for silence in intervals {
        let silence = snap_to_edges(silence, duration);
        let sound_end = silence.start.min(duration);
        if sound_end > sound_start {
            let end = (silence.start + offset).min(duration);
            if end > track_start {
                tracks.push(TrackBoundary {
                    start: track_start,
                    end: Some(end),
                });
            }
        } else {
            log::debug!(
                "No sound between {:.3}s and {:.3}s, dropping candidate track",
                sound_start,
                silence.start
            );
        }
        sound_start = silence.end;
        track_start = (silence.end - offset).max(0.0);
    }

    if duration > sound_start {
        tracks.push(TrackBoundary {
            start: track_start,
            end: None,
        });
    } else if let Some(last) = tracks.last_mut() {
        last.end = None;
    }

    if tracks.is_empty() {
        return Err(SilenceError::EntireFileSilent);
    }

    for (i, track) in tracks.iter().enumerate() {
        log::debug!("Track {}: {:.3}s - {:?}", i + 1, track.start, track.end);
    }
    Ok(tracks)
}

/// Cut leading and trailing silence, keeping `offset` seconds of it on each side.
///
/// Only a silence touching the start (or end) of the file is trimmed; silences in the
/// middle are left alone.
pub fn trim_window<I>(intervals: I, offset: f64, duration: f64) -> Result<TrimWindow>
where
    I: IntoIterator<Item = SilenceInterval>,
{
    check_duration(duration)?;

    let mut intervals = intervals.into_iter();
    let first = intervals.next();
    let last = intervals.last().or(first);

    let first_sound = first
        .filter(|silence| silence.start <= EDGE_TOLERANCE)
        .map_or(0.0, |silence| silence.end.min(duration));
    let last_sound = last
        .filter(|silence| silence.end >= duration - EDGE_TOLERANCE)
        .map_or(duration, |silence| silence.start);

    if last_sound <= first_sound {
        return Err(SilenceError::EntireFileSilent);
    }

    let window = TrimWindow {
        lead_trim: (first_sound - offset).clamp(0.0, duration),
        trail_trim: (duration - (last_sound + offset)).clamp(0.0, duration),
    };
    if window.lead_trim + window.trail_trim >= duration {
        return Err(SilenceError::EntireFileSilent);
    }

    log::debug!(
        "Trim {:.3}s from the start and {:.3}s from the end",
        window.lead_trim,
        window.trail_trim
    );
    Ok(window)
}

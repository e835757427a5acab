//! Turns the textual log of ffmpeg's `silencedetect` filter into silence intervals.
//!
//! The filter reports events on stderr, interleaved with banner and stream information:
//!
//! ```text
//! [silencedetect @ 0x55d0c8a3c840] silence_start: 2.00045
//! [silencedetect @ 0x55d0c8a3c840] silence_end: 4.00113 | silence_duration: 2.00068
//! ```
//!
//! Lines without an event are ignored. Intervals are produced lazily, one per matched
//! start/end pair, so the log never has to be held in memory as a whole.

use std::{collections::VecDeque, io, iter::FusedIterator};

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, SilenceError};

/// A stretch of the file that stayed below the noise threshold for at least the minimum duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SilenceInterval {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Start,
    End,
}

pub struct SilenceLogParser<I> {
    lines: I,
    pattern: Regex,
    duration: f64,
    pending_start: Option<f64>,
    last_end: f64,
    ready: VecDeque<SilenceInterval>,
    line_no: usize,
    done: bool,
}

impl<I> SilenceLogParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// `duration` closes a silence that is still open when the log ends.
    pub fn new(lines: I, duration: f64) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SilenceError::InvalidDuration(format!("{} seconds", duration)));
        }
        Ok(Self {
            lines,
            pattern: Regex::new(r"silence_(start|end):\s*([^\s|]*)")?,
            duration,
            pending_start: None,
            last_end: 0.0,
            ready: VecDeque::new(),
            line_no: 0,
            done: false,
        })
    }

    fn consume_line(&mut self, line: &str) -> Result<()> {
        let events = self
            .pattern
            .captures_iter(line)
            .map(|caps| {
                let kind = if &caps[1] == "start" {
                    EventKind::Start
                } else {
                    EventKind::End
                };
                Ok((kind, parse_timestamp(&caps[2], self.line_no)?))
            })
            .collect::<Result<Vec<_>>>()?;
        for (kind, time) in events {
            self.consume_event(kind, time)?;
        }
        Ok(())
    }

    fn consume_event(&mut self, kind: EventKind, time: f64) -> Result<()> {
        match (kind, self.pending_start) {
            (EventKind::Start, Some(open)) => Err(self.malformed(format!(
                "silence_start at {} while the silence starting at {} is still open",
                time, open
            ))),
            (EventKind::Start, None) => {
                if time < self.last_end {
                    return Err(self.malformed(format!(
                        "silence_start at {} overlaps the previous silence ending at {}",
                        time, self.last_end
                    )));
                }
                self.pending_start = Some(time);
                Ok(())
            }
            (EventKind::End, None) => Err(self.malformed(format!(
                "silence_end at {} without a preceding silence_start",
                time
            ))),
            (EventKind::End, Some(start)) => {
                if time <= start {
                    return Err(self.malformed(format!(
                        "silence_end at {} is not after its silence_start at {}",
                        time, start
                    )));
                }
                self.pending_start = None;
                self.last_end = time;
                let interval = SilenceInterval { start, end: time };
                log::debug!("Silence {:.3}s - {:.3}s", interval.start, interval.end);
                self.ready.push_back(interval);
                Ok(())
            }
        }
    }

    fn malformed(&self, message: String) -> SilenceError {
        SilenceError::MalformedDetectorOutput(format!("line {}: {}", self.line_no, message))
    }

    fn finish(&mut self) -> Option<SilenceInterval> {
        let start = self.pending_start.take()?;
        if start < self.duration {
            log::debug!("Silence {:.3}s - end of file", start);
            Some(SilenceInterval {
                start,
                end: self.duration,
            })
        } else {
            None
        }
    }
}

impl<'a> SilenceLogParser<std::iter::Map<std::str::Lines<'a>, fn(&'a str) -> io::Result<String>>> {
    /// Parse a log that is already in memory.
    pub fn from_text(text: &'a str, duration: f64) -> Result<Self> {
        let to_owned: fn(&'a str) -> io::Result<String> = |line| Ok(line.to_string());
        Self::new(text.lines().map(to_owned), duration)
    }
}

impl<I> Iterator for SilenceLogParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<SilenceInterval>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(interval) = self.ready.pop_front() {
                return Some(Ok(interval));
            }
            if self.done {
                return None;
            }
            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_no += 1;
                    if let Err(e) = self.consume_line(&line) {
                        self.done = true;
                        self.ready.clear();
                        return Some(Err(e));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return self.finish().map(Ok);
                }
            }
        }
    }
}

impl<I> FusedIterator for SilenceLogParser<I> where I: Iterator<Item = io::Result<String>> {}

fn parse_timestamp(raw: &str, line_no: usize) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(SilenceError::MalformedDetectorOutput(format!(
            "line {}: '{}' is not a non-negative timestamp",
            line_no, raw
        ))),
    }
}

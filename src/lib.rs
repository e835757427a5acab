pub mod app;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod executor;
pub mod ffmpeg;
pub mod parser;
pub mod report;
pub mod util;

pub use boundary::{TrackBoundary, TrimWindow, split_tracks, trim_window};
pub use detector::{Detection, SilenceDetector};
pub use error::SilenceError;
pub use parser::{SilenceInterval, SilenceLogParser};

use comfy_table::{Table, presets::UTF8_FULL};
use serde::Serialize;

use crate::boundary::{TrackBoundary, TrimWindow};
use crate::error::Result;
use crate::util::{format_seconds, format_timestamp, round_away_from_zero};

pub const PREVIEW_NOTICE: &str = "Preview only, no files were written. Use --execute to write them.";

/// Computed tracks of one split run, identical for preview and execute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPlan {
    pub duration: f64,
    pub tracks: Vec<TrackBoundary>,
}

/// Computed trim of one trim run, identical for preview and execute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimPlan {
    pub duration: f64,
    pub window: TrimWindow,
}

impl TrimPlan {
    pub fn trimmed_duration(&self) -> f64 {
        self.window.kept_range(self.duration).1
    }
}

fn seconds_cell(seconds: f64) -> String {
    let whole = round_away_from_zero(seconds);
    format!("{} s ({})", whole, format_seconds(whole))
}

pub fn render_split_plan(plan: &SplitPlan) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Track", "Start (s)", "End (s)", "Length"]);

    for (i, track) in plan.tracks.iter().enumerate() {
        let end = track
            .end
            .map(format_timestamp)
            .unwrap_or_else(|| "end of file".to_string());
        table.add_row(vec![
            format!("{:02}.wav", i + 1),
            format_timestamp(track.start),
            end,
            format_seconds(round_away_from_zero(track.length(plan.duration))),
        ]);
    }
    table.to_string()
}

pub fn render_trim_plan(plan: &TrimPlan) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Parameter", "Value"]);

    table
        .add_row(vec!["Original duration".to_string(), seconds_cell(plan.duration)])
        .add_row(vec![
            "Lead trim".to_string(),
            format!("{} s", format_timestamp(plan.window.lead_trim)),
        ])
        .add_row(vec![
            "Trail trim".to_string(),
            format!("{} s", format_timestamp(plan.window.trail_trim)),
        ])
        .add_row(vec![
            "Expected trimmed duration".to_string(),
            seconds_cell(plan.trimmed_duration()),
        ]);
    table.to_string()
}

pub fn render_json<T: Serialize>(plan: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

use anyhow::{Result, bail};

use crate::cli::{SplitArgs, TrimArgs};
use crate::config::{SplitConfig, TrimConfig};
use crate::detector::{FfmpegDetector, SilenceDetector};
use crate::error::SilenceError;
use crate::executor::{ActionExecutor, SoxExecutor, write_tracks, write_trimmed};
use crate::ffmpeg::{FFMPEG, FFPROBE, SOX, check_dependency};
use crate::report::{
    PREVIEW_NOTICE, SplitPlan, TrimPlan, render_json, render_split_plan, render_trim_plan,
};
use crate::{boundary, error};

fn check_dependencies(execute: bool) -> error::Result<()> {
    check_dependency(FFMPEG)?;
    check_dependency(FFPROBE)?;
    if execute {
        check_dependency(SOX)?;
    }
    Ok(())
}

/// Detect silences and compute the tracks. Preview and execute share this.
pub fn plan_split(detector: &dyn SilenceDetector, config: &SplitConfig) -> error::Result<SplitPlan> {
    let detection = detector.detect(&config.file, config.noise_db, config.min_silence)?;
    let tracks = boundary::split_tracks(detection.intervals, config.offset, detection.duration)?;
    Ok(SplitPlan {
        duration: detection.duration,
        tracks,
    })
}

/// Detect silences and compute the trim window. Preview and execute share this.
pub fn plan_trim(detector: &dyn SilenceDetector, config: &TrimConfig) -> error::Result<TrimPlan> {
    let detection = detector.detect(&config.file, config.threshold_db, config.min_silence)?;
    let window = boundary::trim_window(detection.intervals, config.offset, detection.duration)?;
    Ok(TrimPlan {
        duration: detection.duration,
        window,
    })
}

pub fn split_with(
    config: &SplitConfig,
    detector: &dyn SilenceDetector,
    executor: &dyn ActionExecutor,
) -> Result<SplitPlan> {
    let plan = plan_split(detector, config)?;

    if config.json {
        println!("{}", render_json(&plan)?);
    } else {
        println!("\n▶️ Detected Tracks:");
        println!("{}", render_split_plan(&plan));
    }

    if config.execute {
        let written = write_tracks(executor, &config.file, &plan.tracks)?;
        println!("✅ Wrote {} tracks.", written.len());
    } else if !config.json {
        println!("{}", PREVIEW_NOTICE);
    }
    Ok(plan)
}

pub fn trim_with(
    config: &TrimConfig,
    detector: &dyn SilenceDetector,
    executor: &dyn ActionExecutor,
) -> Result<TrimPlan> {
    // Config validation already refuses this; keep preview from ever reaching a write.
    if config.normalize && !config.execute {
        bail!(SilenceError::NormalizeWithoutExecute);
    }

    let plan = plan_trim(detector, config)?;

    if config.json {
        println!("{}", render_json(&plan)?);
    } else {
        println!("\n▶️ Trim Plan:");
        println!("{}", render_trim_plan(&plan));
    }

    if config.execute {
        let output = write_trimmed(
            executor,
            &config.file,
            &plan.window,
            plan.duration,
            config.normalize,
        )?;
        println!("✅ Processing complete! Output: {}", output.display());
    } else if !config.json {
        println!("{}", PREVIEW_NOTICE);
    }
    Ok(plan)
}

pub fn run_split(args: SplitArgs) -> Result<()> {
    let config = SplitConfig::try_from(args)?;
    check_dependencies(config.execute)?;

    log::info!(
        "Splitting {} at silences below {} dB lasting at least {} s",
        config.file.display(),
        config.noise_db,
        config.min_silence
    );
    let detector = FfmpegDetector {
        debug: config.debug,
    };
    let executor = SoxExecutor {
        debug: config.debug,
    };
    split_with(&config, &detector, &executor)?;
    Ok(())
}

pub fn run_trim(args: TrimArgs) -> Result<()> {
    let config = TrimConfig::try_from(args)?;
    check_dependencies(config.execute)?;

    log::info!(
        "Trimming {} with threshold {} dB",
        config.file.display(),
        config.threshold_db
    );
    let detector = FfmpegDetector {
        debug: config.debug,
    };
    let executor = SoxExecutor {
        debug: config.debug,
    };
    trim_with(&config, &detector, &executor)?;
    Ok(())
}

/// Log to stderr; `--debug` shows everything down to the external command lines.
pub fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

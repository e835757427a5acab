use std::{
    io,
    process::{Command, Output, Stdio},
};

use crate::error::{Result, SilenceError};

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";
pub const SOX: &str = "sox";

/// Map a spawn error onto the subprocess taxonomy, telling "missing binary" apart from the rest.
pub fn spawn_error(program: &str, e: io::Error) -> SilenceError {
    if e.kind() == io::ErrorKind::NotFound {
        SilenceError::CommandNotFound(program.to_string())
    } else {
        SilenceError::SubprocessFailure(program.to_string(), e.to_string())
    }
}

pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run an external tool to completion. Its own output is discarded unless `debug` is set.
pub fn run_tool(program: &str, args: &[&str], debug: bool) -> Result<()> {
    let line = command_line(program, args);
    log::debug!("Running: {}", line);

    let mut command = Command::new(program);
    command.args(args);

    if !debug {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = command.status().map_err(|e| spawn_error(program, e))?;
    if !status.success() {
        return Err(SilenceError::SubprocessFailure(line, format!("exited with {}", status)));
    }
    Ok(())
}

/// Run an external tool and capture its output, failing on a non-zero exit.
pub fn capture_tool(program: &str, args: &[&str]) -> Result<Output> {
    let line = command_line(program, args);
    log::debug!("Running: {}", line);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| spawn_error(program, e))?;

    if !output.status.success() {
        return Err(SilenceError::SubprocessFailure(
            line,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(output)
}

/// Make sure `cmd` can be found on the search path before any real work starts.
pub fn check_dependency(cmd: &str) -> Result<()> {
    let version_flag = if cmd == SOX { "--version" } else { "-version" };
    match Command::new(cmd)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(e) => Err(spawn_error(cmd, e)),
    }
}

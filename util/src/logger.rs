//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use fern;
use log::{self, debug};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Status lines go to stdout tagged with `[ OK ]`, `[ WARNING ]` and so on.
/// Only errors are printed unless `verbose` is set. If the session has a log
/// file it receives every record down to `DEBUG`, timestamped with the
/// seconds elapsed since the session started.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(verbose: bool, session: &session::Session) -> Result<(), LoggerInitError> {
    let stdout_level = stdout_level(verbose);

    let stdout = fern::Dispatch::new()
        .format(|out, message, record| {
            // If debug or trace include the target, otherwise don't include it
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "{} {}: {}",
                    level_to_tag(record.level()),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!("{} {}", level_to_tag(record.level()), message))
            }
        })
        .level(stdout_level)
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .level_for("plotters", LevelFilter::Info)
        .chain(stdout);

    if let Some(ref path) = session.log_file_path {
        let file = match fern::log_file(path) {
            Ok(f) => f,
            Err(e) => return Err(LoggerInitError::LogFileInitError(e)),
        };

        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{:10.6} {:5}] {}: {}",
                        session::get_elapsed_seconds(),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
    }

    if let Err(e) = dispatch.apply() {
        return Err(LoggerInitError::FernInitError(e));
    }

    debug!("Logging initialised");
    debug!("    Stdout log level: {:?}", stdout_level);
    debug!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Minimum level printed to stdout.
fn stdout_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    }
}

/// Get the status tag printed in front of a record of the given level
fn level_to_tag(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "[ TRACE ]".dimmed().italic(),
        log::Level::Debug => "[ DEBUG ]".dimmed(),
        log::Level::Info => "[ OK ]".green(),
        log::Level::Warn => "[ WARNING ]".yellow(),
        log::Level::Error => "[ ERROR ]".red().bold(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stdout_level() {
        assert_eq!(stdout_level(true), LevelFilter::Info);
        assert_eq!(stdout_level(false), LevelFilter::Error);
    }

    #[test]
    fn test_tags() {
        colored::control::set_override(false);

        assert_eq!(level_to_tag(log::Level::Info).to_string(), "[ OK ]");
        assert_eq!(level_to_tag(log::Level::Warn).to_string(), "[ WARNING ]");
        assert_eq!(level_to_tag(log::Level::Error).to_string(), "[ ERROR ]");
    }
}

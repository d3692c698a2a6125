//! Session management
//!
//! A session covers one run of the comparison tool: it owns the output
//! directory and the epoch used to timestamp log records.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
#[derive(Clone, Debug)]
pub struct Session {
    /// The directory all outputs are written into
    pub output_root: PathBuf,

    /// The path to the session's log file, if one was requested
    pub log_file_path: Option<PathBuf>,

    /// Whether the output directory had to be created by this session
    pub created_output_root: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot create the output directory {0:?}: {1}")]
    CannotCreateDir(PathBuf, std::io::Error),

    #[error("The output path {0:?} exists but is not a directory")]
    NotADirectory(PathBuf),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session writing into the given directory.
    ///
    /// The directory is created if it does not already exist. If
    /// `log_file_name` is given the log file is placed inside the directory.
    pub fn new<P: AsRef<Path>>(
        output_dir: P,
        log_file_name: Option<&str>,
    ) -> Result<Self, SessionError> {
        // Set the session epoch, the first session of the process wins
        let _ = SESSION_EPOCH.try_init_once(Utc::now);

        let path = output_dir.as_ref().to_path_buf();

        let existed = path.exists();
        if existed && !path.is_dir() {
            return Err(SessionError::NotADirectory(path));
        }

        if let Err(e) = fs::create_dir_all(&path) {
            return Err(SessionError::CannotCreateDir(path, e));
        }

        let log_file_path = log_file_name.map(|n| path.join(n));

        Ok(Session {
            output_root: path,
            log_file_path,
            created_output_root: !existed,
        })
    }

    /// Get the path of an output file inside the session's directory.
    pub fn output_path<P: AsRef<Path>>(&self, file_name: P) -> PathBuf {
        self.output_root.join(file_name)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns `NaN` if no session has been started yet.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => std::f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_output_dir_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");

        let first = Session::new(&out, None).unwrap();
        assert!(first.created_output_root);
        assert!(out.is_dir());
        assert!(first.log_file_path.is_none());

        let second = Session::new(&out, Some("run.log")).unwrap();
        assert!(!second.created_output_root);
        assert_eq!(second.log_file_path, Some(out.join("run.log")));
        assert_eq!(second.output_path("plot.png"), out.join("plot.png"));

        assert!(get_elapsed_seconds() >= 0.0);
    }

    #[test]
    fn test_output_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("output");
        std::fs::write(&file, "").unwrap();

        assert!(matches!(
            Session::new(&file, None),
            Err(SessionError::NotADirectory(_))
        ));
    }
}

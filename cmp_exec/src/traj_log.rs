//! # Trajectory logs
//!
//! A trajectory log is a CSV file with a header row, one row per sample:
//!
//! ```text
//! x,y,heading,s,angle,delta
//! 0.0,0.0,0.0,0.0,0.0,0.0
//! 0.5,0.1,0.19,0.51,0.02,0.01
//! ```
//!
//! Column order does not matter but row order does, it is the order in which
//! the vehicle visited the samples. Only the columns an operation requires
//! are validated and parsed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use nalgebra::Point2;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A validated trajectory log.
#[derive(Debug, Clone)]
pub struct TrajLog {
    path: PathBuf,

    /// All column names found in the header, in file order
    headers: Vec<String>,

    /// Parsed values of the columns which were required at load time
    columns: HashMap<Column, Vec<f64>>,

    num_rows: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Columns recognised in a trajectory log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    X,
    Y,
    Heading,
    S,
    Angle,
    Delta,
}

#[derive(Debug, thiserror::Error)]
pub enum TrajLogError {
    #[error("Error opening file {path:?}: {source}")]
    FileOpening {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "File {0:?} is empty. Try passing a log file that has a header row \
        naming its columns (x, y, ...)"
    )]
    EmptyFile(PathBuf),

    #[error("The required column '{column}' does not exist in the file {path:?}")]
    UnexistentRequiredColumn { column: Column, path: PathBuf },

    #[error("Invalid value {value:?} for column '{column}' in {path:?} at line {line}")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: Column,
        value: String,
    },

    #[error("Cannot parse the CSV file {0:?}: {1}")]
    Csv(PathBuf, csv::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Column {
    /// Every recognised column.
    pub const ALL: [Column; 6] = [
        Column::X,
        Column::Y,
        Column::Heading,
        Column::S,
        Column::Angle,
        Column::Delta,
    ];

    /// The name of the column as it appears in the header.
    pub fn name(&self) -> &'static str {
        match self {
            Column::X => "x",
            Column::Y => "y",
            Column::Heading => "heading",
            Column::S => "s",
            Column::Angle => "angle",
            Column::Delta => "delta",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TrajLog {
    /// Load the log at `path`, checking that every column in `required` is
    /// present and holds numbers.
    ///
    /// A file with a header but no rows loads successfully, a warning is
    /// logged.
    pub fn load<P: AsRef<Path>>(path: P, required: &[Column]) -> Result<Self, TrajLogError> {
        let path = path.as_ref().to_path_buf();

        let file = open(&path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| TrajLogError::Csv(path.clone(), e))?
            .iter()
            .map(String::from)
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(TrajLogError::EmptyFile(path));
        }

        // Find the index of each required column, deduplicated and in a
        // stable order so the first missing column reported is predictable
        let mut required = required.to_vec();
        required.sort();
        required.dedup();

        let mut indices = Vec::with_capacity(required.len());
        for column in required {
            match headers.iter().position(|h| h == column.name()) {
                Some(i) => indices.push((column, i)),
                None => {
                    return Err(TrajLogError::UnexistentRequiredColumn { column, path });
                }
            }
        }

        let mut columns: HashMap<Column, Vec<f64>> =
            indices.iter().map(|(c, _)| (*c, Vec::new())).collect();
        let mut num_rows = 0;

        let mut record = StringRecord::new();
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => (),
                Ok(false) => break,
                Err(e) => return Err(TrajLogError::Csv(path, e)),
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);

            for (column, index) in indices.iter() {
                let raw = record.get(*index).unwrap_or("");
                // Infinite and NaN values are rejected, they cannot be framed
                let value = match raw.parse::<f64>() {
                    Ok(v) if v.is_finite() => v,
                    _ => {
                        return Err(TrajLogError::InvalidValue {
                            path,
                            line,
                            column: *column,
                            value: raw.to_string(),
                        })
                    }
                };

                if let Some(values) = columns.get_mut(column) {
                    values.push(value);
                }
            }

            num_rows += 1;
        }

        if num_rows == 0 {
            warn!("The file {:?} does not contain any values.", path);
        } else {
            debug!("Loaded {} rows from {:?}", num_rows, path);
        }

        Ok(Self {
            path,
            headers,
            columns,
            num_rows,
        })
    }

    /// The file this log was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names found in the header, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows in the log.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Values of a column, in row order.
    ///
    /// Only columns which were required when loading are available.
    pub fn column(&self, column: Column) -> Result<&[f64], TrajLogError> {
        self.columns
            .get(&column)
            .map(|v| v.as_slice())
            .ok_or_else(|| TrajLogError::UnexistentRequiredColumn {
                column,
                path: self.path.clone(),
            })
    }

    /// The (x, y) position of every row, in row order.
    pub fn points(&self) -> Result<Vec<Point2<f64>>, TrajLogError> {
        let xs = self.column(Column::X)?;
        let ys = self.column(Column::Y)?;

        Ok(xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| Point2::new(*x, *y))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that the file at `path` can be opened for reading.
pub fn check_file_opens<P: AsRef<Path>>(path: P) -> Result<(), TrajLogError> {
    open(path.as_ref()).map(|_| ())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<File, TrajLogError> {
    File::open(path).map_err(|source| TrajLogError::FileOpening {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

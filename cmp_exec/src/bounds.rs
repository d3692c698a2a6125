//! # Bounds
//!
//! Computes the view window framing two trajectories in the overhead panel.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Point2;
use util::maths::{min_max, pad_range};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Fraction of the width/height added on each side of the box by default.
pub const DEFAULT_PADDING_FRACTION: f64 = 0.10;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An axis aligned box, `top >= bottom` and `right >= left`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum BoundsError {
    #[error(
        "Cannot compute the bounds of the {0} trajectory as it has no points, \
        check that its log file contains rows"
    )]
    EmptySeries(&'static str),

    #[error("The padding fraction must be a finite, non-negative number (got {0})")]
    InvalidPadding(f64),

    #[error(
        "The trajectories span a range too large to frame ({0:?}), check the logs \
        for extreme coordinates"
    )]
    NonFinite(BoundingBox),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True if every edge and both spans are finite.
    pub fn is_finite(&self) -> bool {
        self.width().is_finite() && self.height().is_finite()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the box framing both point sequences, expanded on each side by
/// `padding_fraction` of its width (horizontally) and height (vertically).
///
/// Both sequences must contain at least one point.
pub fn compute_bounds(
    series_a: &[Point2<f64>],
    series_b: &[Point2<f64>],
    padding_fraction: f64,
) -> Result<BoundingBox, BoundsError> {
    if !padding_fraction.is_finite() || padding_fraction < 0.0 {
        return Err(BoundsError::InvalidPadding(padding_fraction));
    }

    let (a_x, a_y) = series_extent(series_a).ok_or(BoundsError::EmptySeries("first"))?;
    let (b_x, b_y) = series_extent(series_b).ok_or(BoundsError::EmptySeries("second"))?;

    let (left, right) = pad_range(a_x.0.min(b_x.0), a_x.1.max(b_x.1), padding_fraction);
    let (bottom, top) = pad_range(a_y.0.min(b_y.0), a_y.1.max(b_y.1), padding_fraction);

    let bounds = BoundingBox {
        top,
        right,
        bottom,
        left,
    };

    // Extreme but finite coordinates can still overflow once padded
    if !bounds.is_finite() {
        return Err(BoundsError::NonFinite(bounds));
    }

    Ok(bounds)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The (min, max) of the x and y coordinates of a series, `None` if it has no
/// comparable points.
fn series_extent(series: &[Point2<f64>]) -> Option<((f64, f64), (f64, f64))> {
    let x = min_max(series.iter().map(|p| p.x))?;
    let y = min_max(series.iter().map(|p| p.y))?;

    Some((x, y))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

//! Declarative description of the panels making up a comparison figure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::style::{PanelStyle, SeriesStyle};
use crate::bounds::BoundingBox;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The range covered by one axis of a panel.
///
/// `from` is drawn at the origin of the axis (left or bottom). If `from` is
/// larger than `to` the axis is inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub from: f64,
    pub to: f64,
}

/// One labelled line drawn in a panel.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub label: String,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
}

/// One chart panel of the figure.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub kind: PanelKind,
    pub style: PanelStyle,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub x_desc: Option<String>,
    pub y_desc: Option<String>,
    pub series: Vec<SeriesSpec>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What a panel shows, which also decides where it is placed in the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Top down view of both trajectories.
    Overhead,

    /// An angle plotted against sample index or arc length.
    Timeline,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AxisRange {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    pub fn is_inverted(&self) -> bool {
        self.from > self.to
    }

    /// The lower and upper values of the range, regardless of direction.
    pub fn ordered(&self) -> (f64, f64) {
        if self.is_inverted() {
            (self.to, self.from)
        } else {
            (self.from, self.to)
        }
    }

    /// The span of the range, widened if it is empty so that it can be drawn.
    pub fn drawable(&self) -> (f64, f64) {
        let (low, high) = self.ordered();
        if high - low > std::f64::EPSILON {
            (low, high)
        } else {
            (low - 0.5, high + 0.5)
        }
    }
}

impl PanelSpec {
    /// Build the overhead panel, framed by the given box.
    pub fn overhead(style: PanelStyle, bounds: &BoundingBox, series: Vec<SeriesSpec>) -> Self {
        Self {
            kind: PanelKind::Overhead,
            style,
            x_range: AxisRange::new(bounds.left, bounds.right),
            y_range: AxisRange::new(bounds.bottom, bounds.top),
            x_desc: Some("x (m)".into()),
            y_desc: Some("y (m)".into()),
            series,
        }
    }

    /// Build a timeline panel.
    pub fn timeline(
        style: PanelStyle,
        x_range: AxisRange,
        y_range: AxisRange,
        x_desc: &str,
        y_desc: &str,
        series: Vec<SeriesSpec>,
    ) -> Self {
        Self {
            kind: PanelKind::Timeline,
            style,
            x_range,
            y_range,
            x_desc: Some(x_desc.into()),
            y_desc: Some(y_desc.into()),
            series,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_axis_range() {
        let r = AxisRange::new(180.0, -180.0);
        assert!(r.is_inverted());
        assert_eq!(r.ordered(), (-180.0, 180.0));
        assert_eq!(r.drawable(), (-180.0, 180.0));

        let flat = AxisRange::new(2.0, 2.0);
        assert!(!flat.is_inverted());
        assert_eq!(flat.drawable(), (1.5, 2.5));
    }

    #[test]
    fn test_overhead_ranges_follow_bounds() {
        let bounds = BoundingBox {
            top: 4.0,
            right: 3.0,
            bottom: -1.0,
            left: -2.0,
        };
        let panel = PanelSpec::overhead(PanelStyle::default(), &bounds, vec![]);

        assert_eq!(panel.kind, PanelKind::Overhead);
        assert_eq!(panel.x_range, AxisRange::new(-2.0, 3.0));
        assert_eq!(panel.y_range, AxisRange::new(-1.0, 4.0));
    }
}

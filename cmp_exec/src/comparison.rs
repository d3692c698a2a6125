//! # Comparison
//!
//! Turns the settings and the two loaded trajectory logs into the ordered
//! list of panels handed to the renderer.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Deserialize;

// Internal
use crate::bounds::{compute_bounds, BoundsError, DEFAULT_PADDING_FRACTION};
use crate::render::{AxisRange, Colour, PanelSpec, PanelStyle, SeriesSpec, SeriesStyle};
use crate::traj_log::{Column, TrajLog, TrajLogError};
use util::maths::min_max;
use util::settings::Settings;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Settings namespace of the overhead panel.
pub const OVERHEAD_NAMESPACE: &str = "trajectories_comparisons_plot";

/// Settings namespace of the expected trajectory series.
pub const EXPECTED_NAMESPACE: &str = "expected_trajectory";

/// Settings namespace of the real trajectory series.
pub const REAL_NAMESPACE: &str = "real_trajectory";

/// Vertical range of every timeline, drawn with +180 at the bottom.
///
/// Units: degrees
pub const TIMELINE_Y_RANGE: AxisRange = AxisRange {
    from: 180.0,
    to: -180.0,
};

const EXPECTED_DEFAULT_COLOUR: Colour = Colour::new(0x1F, 0x77, 0xB4);
const REAL_DEFAULT_COLOUR: Colour = Colour::new(0xFF, 0x7F, 0x0E);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Which panels are drawn and how the timelines are indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSelection {
    pub overhead: bool,

    /// Enabled timelines in drawing order
    pub timelines: Vec<(Quantity, TimelineAxis)>,
}

/// The two trajectories being compared.
#[derive(Debug, Clone, Copy)]
pub struct TrajPair<'a> {
    pub expected: &'a TrajLog,
    pub real: &'a TrajLog,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Angular quantities which can be shown in a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Heading,
    Angle,
    Delta,
}

/// The horizontal axis of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TimelineAxis {
    /// Row index within the log
    #[serde(rename = "samples")]
    Samples,

    /// Arc length, the `s` column of the log
    #[serde(rename = "s")]
    ArcLength,
}

#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error(transparent)]
    TrajLog(#[from] TrajLogError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Quantity {
    /// All quantities, in the order their panels are drawn.
    pub const ALL: [Quantity; 3] = [Quantity::Heading, Quantity::Angle, Quantity::Delta];

    pub fn column(&self) -> Column {
        match self {
            Quantity::Heading => Column::Heading,
            Quantity::Angle => Column::Angle,
            Quantity::Delta => Column::Delta,
        }
    }

    /// Settings namespace of this quantity's timeline panel.
    pub fn namespace(&self) -> &'static str {
        match self {
            Quantity::Heading => "heading_timeline_plot",
            Quantity::Angle => "angle_timeline_plot",
            Quantity::Delta => "delta_timeline_plot",
        }
    }

    fn default_title(&self) -> &'static str {
        match self {
            Quantity::Heading => "Heading",
            Quantity::Angle => "Steering Angle",
            Quantity::Delta => "Delta",
        }
    }
}

impl TimelineAxis {
    fn desc(&self) -> &'static str {
        match self {
            TimelineAxis::Samples => "sample",
            TimelineAxis::ArcLength => "s (m)",
        }
    }
}

impl PanelSelection {
    /// Read which panels are enabled from the settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let overhead = settings.get(&format!("{}.enabled", OVERHEAD_NAMESPACE), true);

        let timelines = Quantity::ALL
            .iter()
            .filter(|q| settings.get(&format!("{}.enabled", q.namespace()), true))
            .map(|q| {
                let axis = settings.get(
                    &format!("{}.x_axis", q.namespace()),
                    TimelineAxis::Samples,
                );
                (*q, axis)
            })
            .collect();

        Self {
            overhead,
            timelines,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.overhead && self.timelines.is_empty()
    }

    /// Columns each log must contain for the enabled panels.
    pub fn required_columns(&self) -> Vec<Column> {
        let mut columns = Vec::new();

        if self.overhead {
            columns.push(Column::X);
            columns.push(Column::Y);
        }

        for (quantity, axis) in self.timelines.iter() {
            columns.push(quantity.column());
            if *axis == TimelineAxis::ArcLength {
                columns.push(Column::S);
            }
        }

        columns.sort();
        columns.dedup();
        columns
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build every enabled panel, overhead first then the timelines.
pub fn build_panels(
    settings: &Settings,
    selection: &PanelSelection,
    trajs: TrajPair,
) -> Result<Vec<PanelSpec>, ComparisonError> {
    let mut panels = Vec::new();

    if selection.overhead {
        panels.push(overhead_panel(settings, trajs)?);
    }

    for (quantity, axis) in selection.timelines.iter() {
        panels.push(timeline_panel(settings, *quantity, *axis, trajs)?);
    }

    debug!("Built {} panels", panels.len());

    Ok(panels)
}

/// Build the top down view of both trajectories.
pub fn overhead_panel(settings: &Settings, trajs: TrajPair) -> Result<PanelSpec, ComparisonError> {
    let expected = trajs.expected.points()?;
    let real = trajs.real.points()?;

    let padding = settings.get(
        &format!("{}.padding", OVERHEAD_NAMESPACE),
        DEFAULT_PADDING_FRACTION,
    );
    let bounds = compute_bounds(&expected, &real, padding)?;

    debug!(
        "Overhead bounds: {:?} ({} x {})",
        bounds,
        bounds.width(),
        bounds.height()
    );

    let to_pairs = |points: Vec<nalgebra::Point2<f64>>| -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.x, p.y)).collect()
    };

    let (expected_label, expected_style) = series_style(settings, EXPECTED_NAMESPACE);
    let (real_label, real_style) = series_style(settings, REAL_NAMESPACE);

    Ok(PanelSpec::overhead(
        PanelStyle::from_settings(settings, OVERHEAD_NAMESPACE, "Trajectories Comparison"),
        &bounds,
        vec![
            SeriesSpec {
                label: expected_label,
                style: expected_style,
                points: to_pairs(expected),
            },
            SeriesSpec {
                label: real_label,
                style: real_style,
                points: to_pairs(real),
            },
        ],
    ))
}

/// Build the timeline of one angular quantity, converted to degrees.
pub fn timeline_panel(
    settings: &Settings,
    quantity: Quantity,
    axis: TimelineAxis,
    trajs: TrajPair,
) -> Result<PanelSpec, ComparisonError> {
    let expected = timeline_points(trajs.expected, quantity, axis)?;
    let real = timeline_points(trajs.real, quantity, axis)?;

    let x_max = match axis {
        TimelineAxis::Samples => trajs.expected.num_rows().max(trajs.real.num_rows()) as f64,
        TimelineAxis::ArcLength => {
            let s_expected = trajs.expected.column(Column::S)?;
            let s_real = trajs.real.column(Column::S)?;
            min_max(s_expected.iter().chain(s_real.iter()).copied())
                .map(|(_, max)| max)
                .unwrap_or(0.0)
        }
    };

    if expected.is_empty() && real.is_empty() {
        warn!(
            "Both logs are empty, the {} timeline will have no data",
            quantity.column()
        );
    }

    let (expected_label, expected_style) = series_style(settings, EXPECTED_NAMESPACE);
    let (real_label, real_style) = series_style(settings, REAL_NAMESPACE);

    Ok(PanelSpec::timeline(
        PanelStyle::from_settings(settings, quantity.namespace(), quantity.default_title()),
        AxisRange::new(0.0, x_max),
        TIMELINE_Y_RANGE,
        axis.desc(),
        &format!("{} (deg)", quantity.column()),
        vec![
            SeriesSpec {
                label: expected_label,
                style: expected_style,
                points: expected,
            },
            SeriesSpec {
                label: real_label,
                style: real_style,
                points: real,
            },
        ],
    ))
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Pair each angle, in degrees, with its position on the horizontal axis.
fn timeline_points(
    log: &TrajLog,
    quantity: Quantity,
    axis: TimelineAxis,
) -> Result<Vec<(f64, f64)>, TrajLogError> {
    let values = log.column(quantity.column())?;

    // Radians near the limit of f64 overflow once converted, those samples
    // cannot be placed on the axis
    let points: Vec<(f64, f64)> = match axis {
        TimelineAxis::Samples => values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, v.to_degrees()))
            .collect(),
        TimelineAxis::ArcLength => log
            .column(Column::S)?
            .iter()
            .zip(values.iter())
            .map(|(s, v)| (*s, v.to_degrees()))
            .collect(),
    };

    Ok(points.into_iter().filter(|(_, v)| v.is_finite()).collect())
}

/// Read the label and line style of a trajectory series.
fn series_style(settings: &Settings, namespace: &str) -> (String, SeriesStyle) {
    let (default_label, default_colour) = if namespace == REAL_NAMESPACE {
        ("Real trajectory", REAL_DEFAULT_COLOUR)
    } else {
        ("Expected trajectory", EXPECTED_DEFAULT_COLOUR)
    };

    (
        settings.get(&format!("{}.label", namespace), default_label.to_string()),
        SeriesStyle::from_settings(settings, namespace, default_colour),
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

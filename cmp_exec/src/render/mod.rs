//! # Comparison renderer
//!
//! Lays out an ordered list of panels on a single canvas and draws them
//! using plotters. Overhead panels are placed in the left column and
//! timelines are stacked in the right column:
//!
//! ```text
//! ┌──────────────┬──────────────┐
//! │              │   heading    │
//! │   overhead   ├──────────────┤
//! │              │    angle     │
//! │              ├──────────────┤
//! │              │    delta     │
//! └──────────────┴──────────────┘
//! ```
//!
//! If only one kind of panel is present it takes the whole width.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod panel;
mod style;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::TRANSPARENT;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;

// Internal
pub use panel::*;
pub use style::*;
use util::settings::Settings;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of centimeters in an inch
const CM_PER_INCH: f64 = 2.54;

/// Height reserved above each chart for the panel title.
///
/// Units: pixels
const TITLE_AREA_HEIGHT: i32 = 32;

/// Space left around each chart.
///
/// Units: pixels
const PANEL_MARGIN: i32 = 8;

/// Space reserved for the tick labels and axis descriptions.
///
/// Units: pixels
const LABEL_AREA_SIZE: u32 = 48;

const TITLE_FONT_SIZE: u32 = 20;

const LABEL_FONT_SIZE: u32 = 12;

/// Length of the line sample drawn in the legend.
///
/// Units: pixels
const LEGEND_SAMPLE_LENGTH: i32 = 20;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Size and background of the whole figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    pub width_px: u32,
    pub height_px: u32,
    pub background_color: Colour,
}

/// Position of a panel on the canvas, in pixels from the top left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("There are no panels to render, enable at least one panel in the settings")]
    NoPanels,

    #[error("The canvas must be at least 1x1 pixels (got {0}x{1})")]
    InvalidCanvas(u32, u32),

    #[error("Cannot draw the figure: {0}")]
    Drawing(String),
}

/// Image formats the figure can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CanvasSpec {
    /// Read the canvas size from `general.width_cm`, `general.height_cm` and
    /// `general.dpi`.
    pub fn from_settings(settings: &Settings) -> Self {
        let width_cm: f64 = settings.get("general.width_cm", 20.32);
        let height_cm: f64 = settings.get("general.height_cm", 20.32);
        let dpi: f64 = settings.get("general.dpi", 100.0);

        let to_px = |cm: f64| (cm / CM_PER_INCH * dpi).round().max(0.0) as u32;

        Self {
            width_px: to_px(width_cm),
            height_px: to_px(height_cm),
            background_color: Colour::from_setting(
                settings,
                "general.background_color",
                Colour::WHITE,
            ),
        }
    }
}

impl OutputFormat {
    /// Choose the format from the file extension, PNG unless it is `.svg`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Render the panels into a single image at `output_path`.
pub fn render<P: AsRef<Path>>(
    panels: &[PanelSpec],
    canvas: &CanvasSpec,
    output_path: P,
) -> Result<(), RenderError> {
    if panels.is_empty() {
        return Err(RenderError::NoPanels);
    }
    if canvas.width_px == 0 || canvas.height_px == 0 {
        return Err(RenderError::InvalidCanvas(canvas.width_px, canvas.height_px));
    }

    let path = output_path.as_ref();
    let size = (canvas.width_px, canvas.height_px);
    let format = OutputFormat::from_path(path);

    debug!(
        "Rendering {} panels on a {}x{} canvas as {:?}",
        panels.len(),
        size.0,
        size.1,
        format
    );

    match format {
        OutputFormat::Png => {
            draw_figure(BitMapBackend::new(path, size).into_drawing_area(), panels, canvas)
        }
        OutputFormat::Svg => {
            draw_figure(SVGBackend::new(path, size).into_drawing_area(), panels, canvas)
        }
    }
}

/// Draw the panels onto any plotters drawing area.
pub fn draw_figure<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    panels: &[PanelSpec],
    canvas: &CanvasSpec,
) -> Result<(), RenderError> {
    root.fill(&RGBColor::from(canvas.background_color))
        .map_err(drawing_err)?;

    let (width, height) = root.dim_in_pixel();
    let kinds: Vec<PanelKind> = panels.iter().map(|p| p.kind).collect();

    for (panel, cell) in panels.iter().zip(layout(&kinds, width, height)) {
        let area = root.clone().shrink((cell.x, cell.y), (cell.width, cell.height));
        draw_panel(&area, panel)?;
    }

    root.present().map_err(drawing_err)
}

/// Compute the cell of each panel, in the same order as `kinds`.
pub fn layout(kinds: &[PanelKind], width: u32, height: u32) -> Vec<Cell> {
    let num_overhead = kinds.iter().filter(|k| **k == PanelKind::Overhead).count() as u32;
    let num_timeline = kinds.len() as u32 - num_overhead;

    let num_cols = (num_overhead > 0) as u32 + (num_timeline > 0) as u32;
    if num_cols == 0 {
        return Vec::new();
    }
    let col_width = width / num_cols;

    let mut next_overhead = 0;
    let mut next_timeline = 0;

    kinds
        .iter()
        .map(|kind| {
            let (col, row, rows) = match kind {
                PanelKind::Overhead => {
                    next_overhead += 1;
                    (0, next_overhead - 1, num_overhead)
                }
                PanelKind::Timeline => {
                    next_timeline += 1;
                    (num_cols - 1, next_timeline - 1, num_timeline)
                }
            };

            let row_height = height / rows;

            Cell {
                x: col * col_width,
                y: row * row_height,
                width: col_width,
                height: row_height,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Draw a single panel filling the given area.
fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &PanelSpec,
) -> Result<(), RenderError> {
    let style = &panel.style;
    let text_color = RGBColor::from(style.text_color);
    let grid_color = RGBColor::from(style.grid_color);
    let axes_color = RGBColor::from(style.axes_color);

    area.fill(&RGBColor::from(style.background_color))
        .map_err(drawing_err)?;

    // ---- TITLE ----

    if !style.title.is_empty() {
        let (width, _) = area.dim_in_pixel();
        let (x, h_pos) = match style.title_location {
            TitleLocation::Left => (PANEL_MARGIN, HPos::Left),
            TitleLocation::Center => (width as i32 / 2, HPos::Center),
            TitleLocation::Right => (width as i32 - PANEL_MARGIN, HPos::Right),
        };

        let font = ("sans-serif", TITLE_FONT_SIZE)
            .into_font()
            .color(&text_color)
            .pos(Pos::new(h_pos, VPos::Top));

        area.draw(&Text::new(style.title.as_str(), (x, PANEL_MARGIN), font))
            .map_err(drawing_err)?;
    }

    let chart_area = area.margin(TITLE_AREA_HEIGHT, PANEL_MARGIN, PANEL_MARGIN, PANEL_MARGIN);

    // ---- AXES ----

    let (x_span, x_sign) = axis_span(&panel.x_range);
    let (y_span, y_sign) = axis_span(&panel.y_range);

    let mut chart = ChartBuilder::on(&chart_area)
        .x_label_area_size(LABEL_AREA_SIZE)
        .y_label_area_size(LABEL_AREA_SIZE)
        .build_cartesian_2d(x_span, y_span)
        .map_err(drawing_err)?;

    let x_formatter = move |v: &f64| format_tick(*v * x_sign);
    let y_formatter = move |v: &f64| format_tick(*v * y_sign);

    let mut mesh = chart.configure_mesh();
    mesh.label_style(("sans-serif", LABEL_FONT_SIZE).into_font().color(&text_color))
        .bold_line_style(&grid_color.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter);

    if let Some(ref desc) = panel.x_desc {
        mesh.x_desc(desc.as_str());
    }
    if let Some(ref desc) = panel.y_desc {
        mesh.y_desc(desc.as_str());
    }
    if !style.show_grid {
        mesh.disable_mesh();
    }

    // Hidden axes keep their tick labels, only the lines and marks go
    if style.show_axes {
        mesh.axis_style(&axes_color);
    } else {
        mesh.axis_style(&TRANSPARENT)
            .set_tick_mark_size(LabelAreaPosition::Left, 0)
            .set_tick_mark_size(LabelAreaPosition::Bottom, 0);
    }

    mesh.draw().map_err(drawing_err)?;

    // ---- SERIES ----

    let mut num_drawn = 0;

    for series in panel.series.iter().filter(|s| !s.points.is_empty()) {
        let line = RGBColor::from(series.style.color)
            .mix(series.style.opacity)
            .stroke_width(series.style.line_width);

        chart
            .draw_series(LineSeries::new(
                series.points.iter().map(|(x, y)| (x * x_sign, y * y_sign)),
                line,
            ))
            .map_err(drawing_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + LEGEND_SAMPLE_LENGTH, y)], line));

        num_drawn += 1;
    }

    // ---- LEGEND ----

    if style.show_legend && num_drawn > 0 {
        let legend_text = RGBColor::from(style.legend_text_color);

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&RGBColor::from(style.legend_background_color).mix(0.8))
            .border_style(&legend_text)
            .label_font(("sans-serif", LABEL_FONT_SIZE).into_font().color(&legend_text))
            .draw()
            .map_err(drawing_err)?;
    }

    Ok(())
}

/// Get the plotted span of an axis and the sign applied to values on it.
///
/// Plotters only draws increasing ranges, inverted axes are drawn by
/// negating the values and the tick labels.
fn axis_span(range: &AxisRange) -> (Range<f64>, f64) {
    let (low, high) = range.drawable();

    if range.is_inverted() {
        (-high..-low, -1.0)
    } else {
        (low..high, 1.0)
    }
}

fn format_tick(value: f64) -> String {
    // Avoid printing "-0"
    if value == 0.0 {
        return "0".into();
    }
    format!("{}", (value * 100.0).round() / 100.0)
}

fn drawing_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::bounds::BoundingBox;
    use serde_json::json;

    #[test]
    fn test_layout_overhead_only() {
        let cells = layout(&[PanelKind::Overhead], 800, 600);
        assert_eq!(
            cells,
            vec![Cell {
                x: 0,
                y: 0,
                width: 800,
                height: 600
            }]
        );
    }

    #[test]
    fn test_layout_overhead_and_timelines() {
        let kinds = [
            PanelKind::Overhead,
            PanelKind::Timeline,
            PanelKind::Timeline,
            PanelKind::Timeline,
        ];
        let cells = layout(&kinds, 800, 600);

        assert_eq!(cells.len(), 4);
        assert_eq!(
            cells[0],
            Cell {
                x: 0,
                y: 0,
                width: 400,
                height: 600
            }
        );
        for (i, cell) in cells[1..].iter().enumerate() {
            assert_eq!(
                *cell,
                Cell {
                    x: 400,
                    y: 200 * i as u32,
                    width: 400,
                    height: 200
                }
            );
        }
    }

    #[test]
    fn test_layout_timelines_only() {
        let cells = layout(&[PanelKind::Timeline, PanelKind::Timeline], 600, 400);
        assert_eq!(cells[0].x, 0);
        assert_eq!(cells[0].width, 600);
        assert_eq!(cells[1].y, 200);
        assert!(layout(&[], 600, 400).is_empty());
    }

    #[test]
    fn test_inverted_axis_span() {
        let (span, sign) = axis_span(&AxisRange::new(180.0, -180.0));
        assert_eq!(span, -180.0..180.0);
        assert_eq!(sign, -1.0);

        // The origin end of the axis holds `from` once the sign is applied
        assert_eq!(span.start * sign, 180.0);

        let (span, sign) = axis_span(&AxisRange::new(0.0, 80.0));
        assert_eq!(span, 0.0..80.0);
        assert_eq!(sign, 1.0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_tick(12.346), "12.35");
        assert_eq!(format_tick(-90.0), "-90");
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_path("out/plot.png"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path("out/plot.SVG"), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path("out/plot"), OutputFormat::Png);
    }

    #[test]
    fn test_canvas_from_settings() {
        let settings = Settings::from_value(json!({
            "general": { "width_cm": 25.4, "height_cm": { "value": 12.7 }, "dpi": 200 }
        }));
        let canvas = CanvasSpec::from_settings(&settings);
        assert_eq!(canvas.width_px, 2000);
        assert_eq!(canvas.height_px, 1000);

        let canvas = CanvasSpec::from_settings(&Settings::from_value(json!({})));
        assert_eq!(canvas.width_px, 800);
        assert_eq!(canvas.height_px, 800);
        assert_eq!(canvas.background_color, Colour::WHITE);
    }

    #[test]
    fn test_render_rejects_empty_figures() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = CanvasSpec::from_settings(&Settings::from_value(json!({})));

        assert!(matches!(
            render(&[], &canvas, dir.path().join("empty.png")),
            Err(RenderError::NoPanels)
        ));
    }

    fn series(label: &str, colour: Colour, points: Vec<(f64, f64)>) -> SeriesSpec {
        SeriesSpec {
            label: label.to_string(),
            style: SeriesStyle::new(colour),
            points,
        }
    }

    fn small_canvas() -> CanvasSpec {
        CanvasSpec {
            width_px: 320,
            height_px: 240,
            background_color: Colour::WHITE,
        }
    }

    /// Overhead panel plus an inverted timeline, the usual figure.
    fn figure() -> Vec<PanelSpec> {
        let bounds = BoundingBox {
            top: 2.0,
            right: 4.0,
            bottom: -1.0,
            left: -0.5,
        };

        vec![
            PanelSpec::overhead(
                PanelStyle {
                    title: "Overhead".into(),
                    show_axes: true,
                    ..PanelStyle::default()
                },
                &bounds,
                vec![
                    series("Expected", Colour::BLACK, vec![(0.0, 0.0), (3.5, 1.5)]),
                    series("Real", Colour::new(255, 0, 0), vec![(0.0, -0.5), (3.0, 1.8)]),
                ],
            ),
            PanelSpec::timeline(
                PanelStyle {
                    title: "Heading".into(),
                    title_location: TitleLocation::Center,
                    ..PanelStyle::default()
                },
                AxisRange::new(0.0, 2.0),
                AxisRange::new(180.0, -180.0),
                "samples",
                "heading (deg)",
                vec![series("Expected", Colour::BLACK, vec![(0.0, 90.0), (1.0, -45.0)])],
            ),
        ]
    }

    fn assert_rendered(panels: &[PanelSpec], file_name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);

        render(panels, &small_canvas(), &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0, "{:?} is empty", path);
    }

    #[test]
    fn test_render_png() {
        assert_rendered(&figure(), "comparison.png");
    }

    #[test]
    fn test_render_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.svg");

        render(&figure(), &small_canvas(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn test_render_single_point_overhead() {
        let bounds = BoundingBox {
            top: 3.0,
            right: 2.0,
            bottom: 3.0,
            left: 2.0,
        };
        let panels = vec![PanelSpec::overhead(
            PanelStyle::default(),
            &bounds,
            vec![series("Expected", Colour::BLACK, vec![(2.0, 3.0)])],
        )];

        assert_rendered(&panels, "single_point.png");
    }

    #[test]
    fn test_render_empty_timeline() {
        let panels = vec![PanelSpec::timeline(
            PanelStyle::default(),
            AxisRange::new(0.0, 0.0),
            AxisRange::new(180.0, -180.0),
            "samples",
            "delta (deg)",
            vec![
                series("Expected", Colour::BLACK, Vec::new()),
                series("Real", Colour::WHITE, Vec::new()),
            ],
        )];

        assert_rendered(&panels, "empty_timeline.png");
    }

    #[test]
    fn test_render_without_legend_grid_or_axes() {
        let mut panels = figure();
        for panel in panels.iter_mut() {
            panel.style.show_legend = false;
            panel.style.show_grid = false;
            panel.style.show_axes = false;
            panel.style.title = String::new();
        }
        panels[0].style.title_location = TitleLocation::Right;

        assert_rendered(&panels, "bare.png");
    }
}

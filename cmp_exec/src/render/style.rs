//! Panel and series styles
//!
//! Styles are read from the settings once per panel and passed by value to
//! the drawing functions, nothing is taken from ambient state while drawing.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use plotters::style::RGBColor;
use serde::Deserialize;

// Internal
use util::settings::Settings;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Everything needed to decorate a single panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStyle {
    pub title: String,
    pub title_location: TitleLocation,
    pub background_color: Colour,
    pub text_color: Colour,
    pub show_axes: bool,
    pub axes_color: Colour,
    pub show_grid: bool,
    pub grid_color: Colour,
    pub show_legend: bool,
    pub legend_background_color: Colour,
    pub legend_text_color: Colour,
}

/// Line style of one data series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Colour,

    /// Units: pixels
    pub line_width: u32,

    /// In the range [0, 1], 1 being fully opaque
    pub opacity: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Horizontal placement of a panel title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleLocation {
    Left,
    Center,
    Right,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Colour {
    pub const WHITE: Colour = Colour::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Colour = Colour::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB`, `#RGB` or basic named colour.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }

            return match hex.len() {
                6 => Some(Self::new(
                    u8::from_str_radix(&hex[0..2], 16).ok()?,
                    u8::from_str_radix(&hex[2..4], 16).ok()?,
                    u8::from_str_radix(&hex[4..6], 16).ok()?,
                )),
                3 => {
                    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                    Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
                }
                _ => None,
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "white" => Some(Self::WHITE),
            "black" => Some(Self::BLACK),
            "red" => Some(Self::new(0xFF, 0x00, 0x00)),
            "green" => Some(Self::new(0x00, 0x80, 0x00)),
            "blue" => Some(Self::new(0x00, 0x00, 0xFF)),
            "orange" => Some(Self::new(0xFF, 0xA5, 0x00)),
            "gray" | "grey" => Some(Self::new(0x80, 0x80, 0x80)),
            _ => None,
        }
    }

    /// Read a colour setting, falling back to `default` if it is missing or
    /// cannot be parsed.
    pub fn from_setting(settings: &Settings, setting_path: &str, default: Colour) -> Self {
        match settings.get::<Option<String>>(setting_path, None) {
            Some(s) => Self::parse(&s).unwrap_or_else(|| {
                warn!(
                    "Invalid colour {:?} for \"{}\", using the default",
                    s, setting_path
                );
                default
            }),
            None => default,
        }
    }
}

impl From<Colour> for RGBColor {
    fn from(c: Colour) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_location: TitleLocation::Left,
            background_color: Colour::WHITE,
            text_color: Colour::BLACK,
            show_axes: false,
            axes_color: Colour::BLACK,
            show_grid: true,
            grid_color: Colour::BLACK,
            show_legend: true,
            legend_background_color: Colour::WHITE,
            legend_text_color: Colour::BLACK,
        }
    }
}

impl PanelStyle {
    /// Read the style of the panel configured under `namespace`.
    pub fn from_settings(settings: &Settings, namespace: &str, default_title: &str) -> Self {
        let d = Self::default();
        let key = |k: &str| format!("{}.{}", namespace, k);

        let text_color = Colour::from_setting(settings, &key("text_color"), d.text_color);

        Self {
            title: settings.get(&key("title"), default_title.to_string()),
            title_location: settings.get(&key("title_location"), d.title_location),
            background_color: Colour::from_setting(
                settings,
                &key("background_color"),
                d.background_color,
            ),
            text_color,
            show_axes: settings.get(&key("show_axes"), d.show_axes),
            axes_color: Colour::from_setting(settings, &key("axes_color"), text_color),
            show_grid: settings.get(&key("show_grid"), d.show_grid),
            grid_color: Colour::from_setting(settings, &key("grid_color"), d.grid_color),
            show_legend: settings.get(&key("show_legend"), d.show_legend),
            legend_background_color: Colour::from_setting(
                settings,
                &key("legend_background_color"),
                d.legend_background_color,
            ),
            legend_text_color: Colour::from_setting(
                settings,
                &key("legend_text_color"),
                text_color,
            ),
        }
    }
}

impl SeriesStyle {
    pub fn new(color: Colour) -> Self {
        Self {
            color,
            line_width: 2,
            opacity: 1.0,
        }
    }

    /// Read the style of the series configured under `namespace`.
    pub fn from_settings(settings: &Settings, namespace: &str, default_color: Colour) -> Self {
        let d = Self::new(default_color);
        let key = |k: &str| format!("{}.{}", namespace, k);

        Self {
            color: Colour::from_setting(settings, &key("color"), d.color),
            line_width: settings.get(&key("line_width"), d.line_width).max(1),
            opacity: settings.get(&key("opacity"), d.opacity).max(0.0).min(1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_colours() {
        assert_eq!(Colour::parse("#FF8000"), Some(Colour::new(255, 128, 0)));
        assert_eq!(Colour::parse("#f80"), Some(Colour::new(255, 136, 0)));
        assert_eq!(Colour::parse(" White "), Some(Colour::WHITE));
        assert_eq!(Colour::parse("#GG0000"), None);
        assert_eq!(Colour::parse("#12345"), None);
        assert_eq!(Colour::parse("#ÿÿÿ"), None);
        assert_eq!(Colour::parse("chartreuse"), None);
    }

    #[test]
    fn test_panel_style_from_settings() {
        let settings = Settings::from_value(json!({
            "heading_timeline_plot": {
                "title": { "value": "Heading", "description": "Panel title" },
                "title_location": "right",
                "text_color": "#101010",
                "show_axes": true,
                "show_grid": false,
                "grid_color": "not a colour",
                "legend_background_color": "#000"
            }
        }));

        let style = PanelStyle::from_settings(&settings, "heading_timeline_plot", "Default");

        assert_eq!(style.title, "Heading");
        assert_eq!(style.title_location, TitleLocation::Right);
        assert_eq!(style.text_color, Colour::new(0x10, 0x10, 0x10));
        assert_eq!(style.axes_color, style.text_color);
        assert_eq!(style.legend_text_color, style.text_color);
        assert!(style.show_axes);
        assert!(!style.show_grid);
        assert_eq!(style.grid_color, Colour::BLACK);
        assert_eq!(style.legend_background_color, Colour::BLACK);
        assert_eq!(style.background_color, Colour::WHITE);
        assert!(style.show_legend);
    }

    #[test]
    fn test_panel_style_defaults() {
        let settings = Settings::from_value(json!({}));

        let style = PanelStyle::from_settings(&settings, "angle_timeline_plot", "Angle");
        assert_eq!(
            style,
            PanelStyle {
                title: "Angle".into(),
                ..PanelStyle::default()
            }
        );
    }

    #[test]
    fn test_series_style_from_settings() {
        let settings = Settings::from_value(json!({
            "real_trajectory": {
                "color": "#00FF00",
                "line_width": 0,
                "opacity": 1.5
            }
        }));

        let style = SeriesStyle::from_settings(&settings, "real_trajectory", Colour::BLACK);
        assert_eq!(style.color, Colour::new(0, 255, 0));
        assert_eq!(style.line_width, 1);
        assert_eq!(style.opacity, 1.0);

        let style = SeriesStyle::from_settings(&settings, "expected_trajectory", Colour::WHITE);
        assert_eq!(style, SeriesStyle::new(Colour::WHITE));
    }
}

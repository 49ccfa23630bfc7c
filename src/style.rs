use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PlotError;

/// Caller overrides for the box sub-plot. Every field is optional; anything
/// left unset falls back to the built-in default. Unknown option names are
/// rejected rather than silently dropped.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BoxStyle {
    pub widths: Option<f64>,
    pub show_fliers: Option<bool>,
    pub show_means: Option<bool>,
    pub mean_line: Option<bool>,
    pub median_color: Option<String>,
    pub box_color: Option<String>,
    pub fill_color: Option<String>,
}

impl BoxStyle {
    pub fn from_json(value: &Value) -> Result<Self> {
        style_from_json(value, "box_style")
    }
}

/// Caller overrides for the cloud (violin) sub-plot.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CloudStyle {
    pub widths: Option<f64>,
    pub show_means: Option<bool>,
    pub show_medians: Option<bool>,
    pub show_extrema: Option<bool>,
    pub fill_color: Option<String>,
    pub alpha: Option<f64>,
}

impl CloudStyle {
    pub fn from_json(value: &Value) -> Result<Self> {
        style_from_json(value, "cloud_style")
    }
}

fn style_from_json<T: serde::de::DeserializeOwned>(
    value: &Value,
    argument: &'static str,
) -> Result<T> {
    if !value.is_object() {
        return Err(PlotError::InvalidArgument {
            argument,
            value: value.to_string(),
        }
        .into());
    }
    serde_json::from_value(value.clone()).map_err(|e| {
        PlotError::InvalidArgument {
            argument,
            value: e.to_string(),
        }
        .into()
    })
}

/// Fully-resolved box options handed to the surface: defaults overlaid by
/// caller overrides. Data, labels and orientation are passed to the surface
/// separately, so overrides can restyle but never rebind them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOptions {
    pub widths: f64,
    pub show_fliers: bool,
    pub show_means: bool,
    pub mean_line: bool,
    pub median_color: String,
    pub box_color: String,
    pub fill_color: Option<String>,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            widths: 0.2,
            show_fliers: false,
            show_means: true,
            mean_line: true,
            median_color: "black".to_string(),
            box_color: "black".to_string(),
            fill_color: None,
        }
    }
}

impl BoxOptions {
    pub fn resolve(overrides: Option<&BoxStyle>) -> Self {
        let mut options = Self::default();
        if let Some(style) = overrides {
            if let Some(widths) = style.widths {
                options.widths = widths;
            }
            if let Some(show_fliers) = style.show_fliers {
                options.show_fliers = show_fliers;
            }
            if let Some(show_means) = style.show_means {
                options.show_means = show_means;
            }
            if let Some(mean_line) = style.mean_line {
                options.mean_line = mean_line;
            }
            if let Some(color) = &style.median_color {
                options.median_color = color.clone();
            }
            if let Some(color) = &style.box_color {
                options.box_color = color.clone();
            }
            if let Some(color) = &style.fill_color {
                options.fill_color = Some(color.clone());
            }
        }
        options
    }
}

/// Fully-resolved cloud options. Both plot variants use the same defaults;
/// they differ only in the scatter stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudOptions {
    pub widths: f64,
    pub show_means: bool,
    pub show_medians: bool,
    pub show_extrema: bool,
    pub fill_color: Option<String>,
    pub alpha: f64,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            widths: 1.2,
            show_means: false,
            show_medians: false,
            show_extrema: false,
            fill_color: None,
            alpha: 0.3,
        }
    }
}

impl CloudOptions {
    pub fn resolve(overrides: Option<&CloudStyle>) -> Self {
        let mut options = Self::default();
        if let Some(style) = overrides {
            if let Some(widths) = style.widths {
                options.widths = widths;
            }
            if let Some(show_means) = style.show_means {
                options.show_means = show_means;
            }
            if let Some(show_medians) = style.show_medians {
                options.show_medians = show_medians;
            }
            if let Some(show_extrema) = style.show_extrema {
                options.show_extrema = show_extrema;
            }
            if let Some(color) = &style.fill_color {
                options.fill_color = Some(color.clone());
            }
            if let Some(alpha) = style.alpha {
                options.alpha = alpha;
            }
        }
        options
    }
}

// Library exports for raincloud

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod group;
pub mod jitter;
pub mod palette;
pub mod plot;
pub mod render;
pub mod scale;
pub mod stats;
pub mod style;
pub mod surface;
pub mod violin;

pub use data::PlotData;
pub use error::PlotError;
pub use group::{extract_groups, GroupOrder, Groups};
pub use plot::{cloud_plot, raincloud_plot, CloudPlot, RaincloudConfig, RaincloudPlot};
pub use render::PlotCanvas;
pub use scale::{resolve_scales, CloudScale};
pub use style::{BoxOptions, BoxStyle, CloudOptions, CloudStyle};
pub use surface::{BoxHandle, ScatterHandle, Surface, ViolinBody, ViolinHandle};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}

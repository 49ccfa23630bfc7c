use anyhow::Result;
use plotters::style::RGBColor;

use crate::style::{BoxOptions, CloudOptions};

/// Handle to a rendered box-plot series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHandle {
    pub id: usize,
    pub groups: usize,
}

/// Handle to a rendered violin series. Each group owns one density body,
/// reachable through [`Surface::violin_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolinHandle {
    pub id: usize,
    pub groups: usize,
}

/// Handle to a rendered scatter series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterHandle {
    pub id: usize,
}

/// One violin body: the density polygon outline and its resolved fill color.
/// The polygon is mutated in place by the half-violin transform.
#[derive(Debug, Clone)]
pub struct ViolinBody {
    pub vertices: Vec<(f64, f64)>,
    pub face_color: RGBColor,
}

/// The plotting collaborator consumed by the raincloud pipeline.
///
/// Group positions are one-indexed slots on the secondary axis: group i is
/// drawn at coordinate i + 1. When `vertical` is false (the default), values
/// run along x and group slots along y; `vertical` swaps the two.
pub trait Surface {
    fn draw_box(
        &mut self,
        values: &[Vec<f64>],
        labels: &[String],
        vertical: bool,
        options: &BoxOptions,
    ) -> Result<BoxHandle>;

    fn draw_violin(
        &mut self,
        values: &[Vec<f64>],
        vertical: bool,
        options: &CloudOptions,
    ) -> Result<ViolinHandle>;

    fn draw_scatter(
        &mut self,
        x: &[f64],
        y: &[f64],
        size: f64,
        color: RGBColor,
    ) -> Result<ScatterHandle>;

    /// Borrow one group's violin body.
    fn violin_body(&self, handle: &ViolinHandle, group: usize) -> Option<&ViolinBody>;

    /// Mutably borrow one group's violin body for geometry rewrites.
    fn violin_body_mut(&mut self, handle: &ViolinHandle, group: usize)
        -> Option<&mut ViolinBody>;
}

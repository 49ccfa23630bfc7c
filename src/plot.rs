use anyhow::{anyhow, Result};
use rand::Rng;
use std::collections::BTreeMap;

use crate::data::PlotData;
use crate::group::{extract_groups, GroupOrder, Groups};
use crate::jitter::{self, RAIN_MARKER_SIZE};
use crate::scale::{resolve_scales, CloudScale};
use crate::style::{BoxOptions, BoxStyle, CloudOptions, CloudStyle};
use crate::surface::{BoxHandle, ScatterHandle, Surface, ViolinHandle};
use crate::violin::to_half_violin;

/// Per-call configuration shared by both plot variants.
#[derive(Debug, Default)]
pub struct RaincloudConfig {
    pub group_by: Option<String>,
    pub group_order: GroupOrder,
    pub reverse: bool,
    pub scale_clouds: CloudScale,
    pub vertical: bool,
    pub box_style: Option<BoxStyle>,
    pub cloud_style: Option<CloudStyle>,
}

/// Output of [`cloud_plot`]: handles to the box and half-violin series.
#[derive(Debug, Clone, Copy)]
pub struct CloudPlot {
    pub box_plot: BoxHandle,
    pub cloud: ViolinHandle,
}

/// Output of [`raincloud_plot`]: the cloud plot plus one scatter handle per
/// group, keyed by group index.
#[derive(Debug, Clone)]
pub struct RaincloudPlot {
    pub box_plot: BoxHandle,
    pub cloud: ViolinHandle,
    pub rain: BTreeMap<usize, ScatterHandle>,
}

/// Draw a cloud plot: a raincloud plot without the rain.
pub fn cloud_plot<S: Surface>(
    data: &PlotData,
    column: &str,
    surface: &mut S,
    config: &RaincloudConfig,
) -> Result<CloudPlot> {
    let stage = draw_clouds(data, column, surface, config)?;
    Ok(CloudPlot {
        box_plot: stage.box_plot,
        cloud: stage.cloud,
    })
}

/// Draw a full raincloud plot. Rain color always equals cloud color, and the
/// jitter is drawn from the injected `rng` so callers can seed it.
pub fn raincloud_plot<S: Surface, R: Rng + ?Sized>(
    data: &PlotData,
    column: &str,
    surface: &mut S,
    config: &RaincloudConfig,
    rng: &mut R,
) -> Result<RaincloudPlot> {
    let stage = draw_clouds(data, column, surface, config)?;

    let mut rain = BTreeMap::new();
    for (idx, values) in stage.groups.values.iter().enumerate() {
        let color = surface
            .violin_body(&stage.cloud, idx)
            .map(|body| body.face_color)
            .ok_or_else(|| anyhow!("Violin body missing for group {}", idx))?;

        let offsets = jitter::rain_positions(values.len(), idx, rng);
        let handle = if config.vertical {
            surface.draw_scatter(&offsets, values, RAIN_MARKER_SIZE, color)?
        } else {
            surface.draw_scatter(values, &offsets, RAIN_MARKER_SIZE, color)?
        };
        rain.insert(idx, handle);
    }

    Ok(RaincloudPlot {
        box_plot: stage.box_plot,
        cloud: stage.cloud,
        rain,
    })
}

struct CloudStage {
    box_plot: BoxHandle,
    cloud: ViolinHandle,
    groups: Groups,
}

/// The pipeline shared by both variants: extract groups, resolve scales,
/// draw box and violin, then fold each violin body into a half-violin.
/// All argument validation happens before the first surface call.
fn draw_clouds<S: Surface>(
    data: &PlotData,
    column: &str,
    surface: &mut S,
    config: &RaincloudConfig,
) -> Result<CloudStage> {
    let groups = extract_groups(
        data,
        column,
        config.group_by.as_deref(),
        &config.group_order,
        config.reverse,
    )?;
    let scales = resolve_scales(&groups, &config.scale_clouds)?;

    let box_options = BoxOptions::resolve(config.box_style.as_ref());
    let cloud_options = CloudOptions::resolve(config.cloud_style.as_ref());

    let box_plot = surface.draw_box(&groups.values, &groups.labels, config.vertical, &box_options)?;
    let cloud = surface.draw_violin(&groups.values, config.vertical, &cloud_options)?;

    for (idx, &scale) in scales.iter().enumerate() {
        if let Some(body) = surface.violin_body_mut(&cloud, idx) {
            to_half_violin(&mut body.vertices, idx, scale, config.vertical);
        }
    }

    Ok(CloudStage {
        box_plot,
        cloud,
        groups,
    })
}

use anyhow::Result;
use plotters::style::RGBColor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

use raincloud::{
    cloud_plot, raincloud_plot, BoxHandle, BoxOptions, BoxStyle, CloudOptions, CloudScale,
    GroupOrder, OutputFormat, PlotCanvas, PlotData, RaincloudConfig, RenderOptions, ScatterHandle,
    Surface, ViolinBody, ViolinHandle,
};

/// Test double that records every drawing call instead of rendering.
#[derive(Default)]
struct RecordingSurface {
    box_calls: Vec<BoxCall>,
    violin_calls: Vec<ViolinCall>,
    scatter_calls: Vec<ScatterCall>,
    bodies: Vec<ViolinBody>,
}

struct BoxCall {
    values: Vec<Vec<f64>>,
    labels: Vec<String>,
    vertical: bool,
    options: BoxOptions,
}

struct ViolinCall {
    values: Vec<Vec<f64>>,
    vertical: bool,
    options: CloudOptions,
}

struct ScatterCall {
    x: Vec<f64>,
    y: Vec<f64>,
    size: f64,
    color: RGBColor,
}

impl Surface for RecordingSurface {
    fn draw_box(
        &mut self,
        values: &[Vec<f64>],
        labels: &[String],
        vertical: bool,
        options: &BoxOptions,
    ) -> Result<BoxHandle> {
        self.box_calls.push(BoxCall {
            values: values.to_vec(),
            labels: labels.to_vec(),
            vertical,
            options: options.clone(),
        });
        Ok(BoxHandle {
            id: self.box_calls.len() - 1,
            groups: values.len(),
        })
    }

    fn draw_violin(
        &mut self,
        values: &[Vec<f64>],
        vertical: bool,
        options: &CloudOptions,
    ) -> Result<ViolinHandle> {
        let id = self.bodies.len();
        for (idx, series) in values.iter().enumerate() {
            // A simple diamond around the slot stands in for the KDE body.
            let slot = idx as f64 + 1.0;
            let mid = series.iter().sum::<f64>() / series.len().max(1) as f64;
            self.bodies.push(ViolinBody {
                vertices: vec![
                    (mid - 1.0, slot),
                    (mid, slot + 0.6),
                    (mid + 1.0, slot),
                    (mid, slot - 0.6),
                ],
                face_color: RGBColor(idx as u8, 0, 0),
            });
        }
        self.violin_calls.push(ViolinCall {
            values: values.to_vec(),
            vertical,
            options: options.clone(),
        });
        Ok(ViolinHandle {
            id,
            groups: values.len(),
        })
    }

    fn draw_scatter(
        &mut self,
        x: &[f64],
        y: &[f64],
        size: f64,
        color: RGBColor,
    ) -> Result<ScatterHandle> {
        self.scatter_calls.push(ScatterCall {
            x: x.to_vec(),
            y: y.to_vec(),
            size,
            color,
        });
        Ok(ScatterHandle {
            id: self.scatter_calls.len() - 1,
        })
    }

    fn violin_body(&self, handle: &ViolinHandle, group: usize) -> Option<&ViolinBody> {
        if group >= handle.groups {
            return None;
        }
        self.bodies.get(handle.id + group)
    }

    fn violin_body_mut(&mut self, handle: &ViolinHandle, group: usize) -> Option<&mut ViolinBody> {
        if group >= handle.groups {
            return None;
        }
        self.bodies.get_mut(handle.id + group)
    }
}

fn grouped_data() -> PlotData {
    let mut rows = Vec::new();
    for i in 0..8 {
        rows.push(vec![format!("{:.1}", 7.0 + i as f64 * 0.1), "treated".to_string()]);
    }
    for i in 0..4 {
        rows.push(vec![format!("{:.1}", 3.0 + i as f64 * 0.2), "control".to_string()]);
    }
    PlotData::new(vec!["score".to_string(), "arm".to_string()], rows)
}

#[test]
fn test_pipeline_binds_labels_and_data_positionally() {
    let data = grouped_data();
    let mut surface = RecordingSurface::default();
    // Overrides restyle the box but can never rebind labels/data/orientation.
    let config = RaincloudConfig {
        group_by: Some("arm".to_string()),
        box_style: Some(BoxStyle {
            widths: Some(0.5),
            fill_color: Some("red".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    cloud_plot(&data, "score", &mut surface, &config).unwrap();

    assert_eq!(surface.box_calls.len(), 1);
    let call = &surface.box_calls[0];
    // Style overrides are honored...
    assert_eq!(call.options.widths, 0.5);
    assert_eq!(call.options.fill_color.as_deref(), Some("red"));
    // ...while untouched defaults survive...
    assert!(!call.options.show_fliers);
    assert_eq!(call.options.box_color, "black");
    // ...and positional bindings come from the pipeline alone.
    assert_eq!(call.labels, vec!["treated", "control"]);
    assert_eq!(call.values.len(), 2);
    assert_eq!(call.values[0].len(), 8);
    assert_eq!(call.values[1].len(), 4);
    assert!(!call.vertical);

    let violin = &surface.violin_calls[0];
    assert_eq!(violin.values, call.values);
    assert_eq!(violin.options.widths, 1.2);
    assert!(!violin.options.show_means);
    assert!(!violin.options.show_medians);
    assert!(!violin.options.show_extrema);
}

#[test]
fn test_cloud_plot_half_violins_scaled_by_group_size() {
    let data = grouped_data();
    let mut surface = RecordingSurface::default();
    let config = RaincloudConfig {
        group_by: Some("arm".to_string()),
        scale_clouds: CloudScale::Max,
        ..Default::default()
    };

    let plot = cloud_plot(&data, "score", &mut surface, &config).unwrap();

    // Group 0 (treated, largest) keeps full height above its baseline.
    let body = surface.violin_body(&plot.cloud, 0).unwrap();
    let max_y = body.vertices.iter().fold(f64::NEG_INFINITY, |a, &(_, y)| a.max(y));
    assert!((max_y - 1.6).abs() < 1e-9);
    assert!(body.vertices.iter().all(|&(_, y)| y >= 1.0));

    // Group 1 (control, half the size) is compressed to 0.5 * 0.6 above 2.
    let body = surface.violin_body(&plot.cloud, 1).unwrap();
    let max_y = body.vertices.iter().fold(f64::NEG_INFINITY, |a, &(_, y)| a.max(y));
    assert!((max_y - 2.3).abs() < 1e-9);
    assert!(body.vertices.iter().all(|&(_, y)| y >= 2.0));
}

#[test]
fn test_raincloud_rain_matches_cloud_color_and_band() {
    let data = grouped_data();
    let mut surface = RecordingSurface::default();
    let config = RaincloudConfig {
        group_by: Some("arm".to_string()),
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(99);

    let plot = raincloud_plot(&data, "score", &mut surface, &config, &mut rng).unwrap();

    assert_eq!(plot.rain.len(), 2);
    assert_eq!(surface.scatter_calls.len(), 2);

    for (idx, call) in surface.scatter_calls.iter().enumerate() {
        // Rain shares the violin body's resolved color.
        let body = surface.violin_body(&plot.cloud, idx).unwrap();
        assert_eq!(call.color, body.face_color);
        assert_eq!(call.size, 0.3);

        // Primary axis carries raw observations, secondary the jitter band.
        let expected: &[f64] = &surface.violin_calls[0].values[idx];
        assert_eq!(call.x, expected);
        let low = idx as f64 + 0.6;
        let high = idx as f64 + 0.9;
        assert!(call.y.iter().all(|&v| (low..=high).contains(&v)));
    }
}

#[test]
fn test_vertical_raincloud_swaps_scatter_axes() {
    let data = grouped_data();
    let mut surface = RecordingSurface::default();
    let config = RaincloudConfig {
        group_by: Some("arm".to_string()),
        vertical: true,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(5);

    raincloud_plot(&data, "score", &mut surface, &config, &mut rng).unwrap();

    let call = &surface.scatter_calls[0];
    // Jitter band on x, observations on y.
    assert!(call.x.iter().all(|&v| (0.6..=0.9).contains(&v)));
    assert_eq!(call.y, surface.violin_calls[0].values[0]);
    assert!(surface.box_calls[0].vertical);
}

#[test]
fn test_explicit_ordering_and_reverse_end_to_end() {
    let data = grouped_data();
    let mut surface = RecordingSurface::default();
    let ranks: HashMap<String, f64> =
        [("treated".to_string(), 2.0), ("control".to_string(), 1.0)].into();
    let config = RaincloudConfig {
        group_by: Some("arm".to_string()),
        group_order: GroupOrder::ByRank(ranks),
        reverse: true,
        ..Default::default()
    };

    cloud_plot(&data, "score", &mut surface, &config).unwrap();

    assert_eq!(surface.box_calls[0].labels, vec!["treated", "control"]);
}

#[test]
fn test_invalid_scale_leaves_surface_untouched() {
    let data = grouped_data();
    let mut surface = RecordingSurface::default();
    let map: HashMap<String, f64> = [("treated".to_string(), 1.5)].into();
    let config = RaincloudConfig {
        group_by: Some("arm".to_string()),
        scale_clouds: CloudScale::ByLabel(map),
        ..Default::default()
    };

    assert!(cloud_plot(&data, "score", &mut surface, &config).is_err());
    assert!(surface.box_calls.is_empty());
    assert!(surface.violin_calls.is_empty());
    assert!(surface.scatter_calls.is_empty());
}

#[test]
fn test_ungrouped_raincloud_renders_png() {
    // Bimodal ungrouped sample, rendered end to end like the example use
    // case: one group labelled by the value column.
    let mut rows = Vec::new();
    for i in 0..50 {
        rows.push(vec![format!("{:.2}", 7.0 + (i % 10) as f64 * 0.05)]);
    }
    for i in 0..50 {
        rows.push(vec![format!("{:.2}", 4.0 + (i % 12) as f64 * 0.3)]);
    }
    let data = PlotData::new(vec!["x".to_string()], rows);

    let options = RenderOptions {
        width: 400,
        height: 300,
        format: OutputFormat::Png,
    };
    let mut canvas = PlotCanvas::new(&options, Some("Example Raincloud".to_string()));
    let mut rng = StdRng::seed_from_u64(0);
    let config = RaincloudConfig::default();

    let plot = raincloud_plot(&data, "x", &mut canvas, &config, &mut rng).unwrap();
    assert_eq!(plot.cloud.groups, 1);
    assert_eq!(plot.rain.len(), 1);

    let png = canvas.encode().unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}

use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::palette::{parse_color, ColorPalette};
use crate::stats::{box_summary, compute_kde, silverman_bandwidth};
use crate::style::{BoxOptions, CloudOptions};
use crate::surface::{BoxHandle, ScatterHandle, Surface, ViolinBody, ViolinHandle};
use crate::{OutputFormat, RenderOptions};

/// Map (value, group-slot) coordinates onto the chart's (x, y).
fn orient(vertical: bool, value: f64, slot: f64) -> (f64, f64) {
    if vertical {
        (slot, value)
    } else {
        (value, slot)
    }
}

/// Primitive geometry for one group's box plot, in final chart coordinates.
#[derive(Debug, Clone)]
struct BoxGlyph {
    segments: Vec<[(f64, f64); 2]>,
    rect: [(f64, f64); 2],
    median: [(f64, f64); 2],
    mean: Option<[(f64, f64); 2]>,
    outliers: Vec<(f64, f64)>,
    line_color: RGBColor,
    median_color: RGBColor,
    fill_color: Option<RGBColor>,
}

/// A tick across a violin body (mean/median/extrema marks).
#[derive(Debug, Clone)]
struct MarkGlyph {
    segment: [(f64, f64); 2],
    color: RGBColor,
}

#[derive(Debug, Clone)]
struct ScatterGlyph {
    points: Vec<(f64, f64)>,
    radius: i32,
    color: RGBColor,
}

/// Retained-scene plotting surface backed by plotters.
///
/// Drawing calls record glyphs; [`PlotCanvas::encode`] renders the whole
/// scene to PNG or SVG bytes. Violin bodies stay addressable (and mutable)
/// between their draw call and encoding, which is what lets the pipeline
/// rewrite them into half-violins.
pub struct PlotCanvas {
    width: u32,
    height: u32,
    format: OutputFormat,
    title: Option<String>,
    vertical: bool,
    labels: Vec<String>,
    boxes: Vec<BoxGlyph>,
    bodies: Vec<ViolinBody>,
    body_alpha: f64,
    marks: Vec<MarkGlyph>,
    scatters: Vec<ScatterGlyph>,
}

impl PlotCanvas {
    pub fn new(options: &RenderOptions, title: Option<String>) -> Self {
        Self {
            width: options.width,
            height: options.height,
            format: options.format,
            title,
            vertical: false,
            labels: Vec::new(),
            boxes: Vec::new(),
            bodies: Vec::new(),
            body_alpha: 0.3,
            marks: Vec::new(),
            scatters: Vec::new(),
        }
    }

    /// Render the recorded scene and encode it in the configured format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Png => self.encode_png(),
            OutputFormat::Svg => Ok(self.encode_svg()?.into_bytes()),
        }
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
        }

        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;

        Ok(png_bytes)
    }

    fn encode_svg(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
        }
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (x_range, y_range) = self
            .ranges()
            .ok_or_else(|| anyhow!("Cannot render canvas with no data points"))?;

        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to fill background: {}", e))?;

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(self.title.as_deref().unwrap_or(""), ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

        let labels = self.labels.clone();
        let slot_formatter = move |v: &f64| -> String {
            let slot = v.round();
            if (v - slot).abs() < 1e-6 && slot >= 1.0 && slot as usize <= labels.len() {
                labels[slot as usize - 1].clone()
            } else {
                String::new()
            }
        };

        {
            let mut mesh = chart.configure_mesh();
            if self.vertical {
                mesh.x_labels(self.labels.len() + 2)
                    .x_label_formatter(&slot_formatter);
            } else {
                mesh.y_labels(self.labels.len() + 2)
                    .y_label_formatter(&slot_formatter);
            }
            mesh.draw().map_err(|e| anyhow!("Failed to draw mesh: {}", e))?;
        }

        // Clouds first so boxes and rain stay visible on top.
        for body in &self.bodies {
            if body.vertices.is_empty() {
                continue;
            }
            chart
                .draw_series(std::iter::once(Polygon::new(
                    body.vertices.clone(),
                    body.face_color.mix(self.body_alpha).filled(),
                )))
                .map_err(|e| anyhow!("Failed to draw violin body: {}", e))?;
        }

        for mark in &self.marks {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    mark.segment.to_vec(),
                    mark.color.stroke_width(1),
                )))
                .map_err(|e| anyhow!("Failed to draw violin mark: {}", e))?;
        }

        for glyph in &self.boxes {
            if let Some(fill) = glyph.fill_color {
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        glyph.rect,
                        fill.mix(0.8).filled(),
                    )))
                    .map_err(|e| anyhow!("Failed to draw box fill: {}", e))?;
            }
            for segment in &glyph.segments {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        segment.to_vec(),
                        glyph.line_color.stroke_width(2),
                    )))
                    .map_err(|e| anyhow!("Failed to draw whisker: {}", e))?;
            }
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    glyph.rect,
                    glyph.line_color.stroke_width(2),
                )))
                .map_err(|e| anyhow!("Failed to draw box: {}", e))?;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    glyph.median.to_vec(),
                    glyph.median_color.stroke_width(2),
                )))
                .map_err(|e| anyhow!("Failed to draw median line: {}", e))?;
            if let Some(mean) = glyph.mean {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        mean.to_vec(),
                        RGBColor(44, 160, 44).stroke_width(2),
                    )))
                    .map_err(|e| anyhow!("Failed to draw mean line: {}", e))?;
            }
            if !glyph.outliers.is_empty() {
                chart
                    .draw_series(
                        glyph
                            .outliers
                            .iter()
                            .map(|&p| Circle::new(p, 2, glyph.line_color.filled())),
                    )
                    .map_err(|e| anyhow!("Failed to draw outliers: {}", e))?;
            }
        }

        for scatter in &self.scatters {
            chart
                .draw_series(
                    scatter
                        .points
                        .iter()
                        .map(|&p| Circle::new(p, scatter.radius, scatter.color.filled())),
                )
                .map_err(|e| anyhow!("Failed to draw scatter: {}", e))?;
        }

        Ok(())
    }

    /// Padded axis ranges covering every recorded glyph.
    fn ranges(&self) -> Option<(std::ops::Range<f64>, std::ops::Range<f64>)> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        let mut include = |&(x, y): &(f64, f64)| {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        };

        for body in &self.bodies {
            body.vertices.iter().for_each(&mut include);
        }
        for mark in &self.marks {
            mark.segment.iter().for_each(&mut include);
        }
        for glyph in &self.boxes {
            glyph.rect.iter().for_each(&mut include);
            glyph.median.iter().for_each(&mut include);
            glyph.outliers.iter().for_each(&mut include);
            for segment in &glyph.segments {
                segment.iter().for_each(&mut include);
            }
        }
        for scatter in &self.scatters {
            scatter.points.iter().for_each(&mut include);
        }

        if x_min > x_max || y_min > y_max {
            return None;
        }

        Some((pad_range(x_min, x_max), pad_range(y_min, y_max)))
    }
}

fn pad_range(min: f64, max: f64) -> std::ops::Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

impl Surface for PlotCanvas {
    fn draw_box(
        &mut self,
        values: &[Vec<f64>],
        labels: &[String],
        vertical: bool,
        options: &BoxOptions,
    ) -> Result<BoxHandle> {
        self.vertical = vertical;
        self.labels = labels.to_vec();

        let line_color = parse_color(&Some(options.box_color.clone()), RGBColor(0, 0, 0));
        let median_color = parse_color(&Some(options.median_color.clone()), RGBColor(0, 0, 0));
        let fill_color = options
            .fill_color
            .as_ref()
            .map(|c| parse_color(&Some(c.clone()), RGBColor(0, 0, 0)));

        let id = self.boxes.len();
        for (idx, series) in values.iter().enumerate() {
            let slot = idx as f64 + 1.0;
            let summary = box_summary(series);
            let half = options.widths / 2.0;
            let cap_half = options.widths * 0.4 / 2.0;

            let mut segments = vec![
                // Whiskers from the box edges out to the fenced extremes
                [
                    orient(vertical, summary.lower_whisker, slot),
                    orient(vertical, summary.q1, slot),
                ],
                [
                    orient(vertical, summary.q3, slot),
                    orient(vertical, summary.upper_whisker, slot),
                ],
                // Whisker caps
                [
                    orient(vertical, summary.lower_whisker, slot - cap_half),
                    orient(vertical, summary.lower_whisker, slot + cap_half),
                ],
                [
                    orient(vertical, summary.upper_whisker, slot - cap_half),
                    orient(vertical, summary.upper_whisker, slot + cap_half),
                ],
            ];
            segments.retain(|[a, b]| a != b);

            let glyph = BoxGlyph {
                segments,
                rect: [
                    orient(vertical, summary.q1, slot - half),
                    orient(vertical, summary.q3, slot + half),
                ],
                median: [
                    orient(vertical, summary.median, slot - half),
                    orient(vertical, summary.median, slot + half),
                ],
                mean: (options.show_means && options.mean_line).then(|| {
                    [
                        orient(vertical, summary.mean, slot - half),
                        orient(vertical, summary.mean, slot + half),
                    ]
                }),
                outliers: if options.show_fliers {
                    summary
                        .outliers
                        .iter()
                        .map(|&v| orient(vertical, v, slot))
                        .collect()
                } else {
                    Vec::new()
                },
                line_color,
                median_color,
                fill_color,
            };
            self.boxes.push(glyph);
        }

        Ok(BoxHandle {
            id,
            groups: values.len(),
        })
    }

    fn draw_violin(
        &mut self,
        values: &[Vec<f64>],
        vertical: bool,
        options: &CloudOptions,
    ) -> Result<ViolinHandle> {
        self.vertical = vertical;
        self.body_alpha = options.alpha;

        let palette = ColorPalette::category10();
        let id = self.bodies.len();

        for (idx, series) in values.iter().enumerate() {
            let slot = idx as f64 + 1.0;
            let half = options.widths / 2.0;
            let face_color = match &options.fill_color {
                Some(name) => parse_color(&Some(name.clone()), palette.color(idx)),
                None => palette.color(idx),
            };

            let bandwidth = silverman_bandwidth(series);
            let (grid, density) = compute_kde(series, bandwidth);

            // Trace +density forward, then -density backward, closing the
            // violin outline around the group's slot.
            let mut vertices = Vec::with_capacity(grid.len() * 2);
            for (v, d) in grid.iter().zip(&density) {
                vertices.push(orient(vertical, *v, slot + half * d));
            }
            for (v, d) in grid.iter().zip(&density).rev() {
                vertices.push(orient(vertical, *v, slot - half * d));
            }

            if !series.is_empty() {
                let mut marked = Vec::new();
                if options.show_means {
                    marked.push(series.iter().sum::<f64>() / series.len() as f64);
                }
                if options.show_medians {
                    let mut sorted = series.clone();
                    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                    marked.push(crate::stats::percentile(&sorted, 0.5));
                }
                if options.show_extrema {
                    marked.push(series.iter().fold(f64::INFINITY, |a, &b| a.min(b)));
                    marked.push(series.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)));
                }
                for value in marked {
                    self.marks.push(MarkGlyph {
                        segment: [
                            orient(vertical, value, slot - half),
                            orient(vertical, value, slot + half),
                        ],
                        color: face_color,
                    });
                }
            }

            self.bodies.push(ViolinBody {
                vertices,
                face_color,
            });
        }

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
        if x.len() != y.len() {
            anyhow::bail!(
                "X and Y data must have the same length (x: {}, y: {})",
                x.len(),
                y.len()
            );
        }

        let id = self.scatters.len();
        self.scatters.push(ScatterGlyph {
            points: x.iter().copied().zip(y.iter().copied()).collect(),
            radius: size.max(1.0).round() as i32,
            color,
        });
        Ok(ScatterHandle { id })
    }

    fn violin_body(&self, handle: &ViolinHandle, group: usize) -> Option<&ViolinBody> {
        if group >= handle.groups {
            return None;
        }
        self.bodies.get(handle.id + group)
    }

    fn violin_body_mut(
        &mut self,
        handle: &ViolinHandle,
        group: usize,
    ) -> Option<&mut ViolinBody> {
        if group >= handle.groups {
            return None;
        }
        self.bodies.get_mut(handle.id + group)
    }
}

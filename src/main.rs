use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};

use raincloud::{
    cloud_plot, csv_reader, raincloud_plot, BoxStyle, CloudScale, CloudStyle, GroupOrder,
    OutputFormat, PlotCanvas, PlotData, PlotError, RaincloudConfig, RenderOptions,
};

#[derive(Parser, Debug)]
#[command(name = "raincloud")]
#[command(about = "Generate raincloud plots from CSV data", long_about = None)]
struct Args {
    /// Column containing the numeric values to plot
    column: String,

    /// Categorical column to group the data by
    #[arg(long)]
    group_by: Option<String>,

    /// Group ordering: "discovery", "label", or a JSON map of label to rank
    #[arg(long, default_value = "discovery")]
    order: String,

    /// Reverse the group order
    #[arg(long)]
    reverse: bool,

    /// Cloud scaling: "none", "max", or a JSON map of label to factor in [0, 1]
    #[arg(long, default_value = "none")]
    scale: String,

    /// Render vertically (values on the y axis)
    #[arg(long)]
    vertical: bool,

    /// Also draw the jittered scatter of raw observations
    #[arg(long)]
    rain: bool,

    /// JSON object overriding box style defaults (e.g. '{"widths": 0.3}')
    #[arg(long)]
    box_style: Option<String>,

    /// JSON object overriding cloud style defaults
    #[arg(long)]
    cloud_style: Option<String>,

    /// Plot title
    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Seed for the rain jitter (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: png or svg
    #[arg(long, default_value = "png")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read CSV from stdin
    let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
    let data = PlotData::from_csv(csv_data);

    let config = RaincloudConfig {
        group_by: args.group_by.clone(),
        group_order: GroupOrder::parse(&args.order)?,
        reverse: args.reverse,
        scale_clouds: CloudScale::parse(&args.scale)?,
        vertical: args.vertical,
        box_style: parse_style(args.box_style.as_deref(), "box_style", BoxStyle::from_json)?,
        cloud_style: parse_style(
            args.cloud_style.as_deref(),
            "cloud_style",
            CloudStyle::from_json,
        )?,
    };

    let format = match args.format.as_str() {
        "png" => OutputFormat::Png,
        "svg" => OutputFormat::Svg,
        other => {
            return Err(PlotError::InvalidArgument {
                argument: "format",
                value: other.to_string(),
            }
            .into())
        }
    };

    let options = RenderOptions {
        width: args.width,
        height: args.height,
        format,
    };
    let mut canvas = PlotCanvas::new(&options, args.title.clone());

    if args.rain {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        raincloud_plot(&data, &args.column, &mut canvas, &config, &mut rng)
            .context("Failed to render raincloud plot")?;
    } else {
        cloud_plot(&data, &args.column, &mut canvas, &config)
            .context("Failed to render cloud plot")?;
    }

    let bytes = canvas.encode().context("Failed to encode plot")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn parse_style<T>(
    raw: Option<&str>,
    argument: &'static str,
    from_json: fn(&serde_json::Value) -> Result<T>,
) -> Result<Option<T>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|_| PlotError::InvalidArgument {
        argument,
        value: raw.to_string(),
    })?;
    Ok(Some(from_json(&value)?))
}

use crate::config::load_config;
use crate::export::write_svg;
use crate::figure::{
    Card, FigureSpec, Flow, MergeGroup, ProcessSpec, ScatterMapSpec, SequenceSpec, SequenceStep,
    Series, Station, TimeSeriesSpec,
};
use crate::layout::compute_layout;
use crate::render::render_svg;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cardflow", version, about = "Render built-in scientific figures to SVG or PDF")]
pub struct Args {
    /// Figure to render
    #[arg(short = 'f', long = "figure", value_enum, default_value = "process")]
    pub figure: FigureName,

    /// Output file. Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme name, themeVariables, layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FigureName {
    Process,
    Sequence,
    Timeseries,
    Scatter,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    #[cfg(feature = "pdf")]
    Pdf,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let spec = demo_figure(args.figure);
    let layout = compute_layout(&spec, &config.theme, &config.layout);
    let svg = render_svg(&layout, &config.theme, &config.layout);

    match args.output_format {
        OutputFormat::Svg => {
            write_svg(&svg, args.output.as_deref())?;
        }
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => {
            let output = args
                .output
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Output path required for pdf output"))?;
            crate::export::write_pdf(&svg, output, &config.render.pdf_font_family)?;
        }
    }
    Ok(())
}

/// Built-in sample figures, one per figure family.
pub fn demo_figure(name: FigureName) -> FigureSpec {
    match name {
        FigureName::Process => FigureSpec::Process(irrigation_process()),
        FigureName::Sequence => FigureSpec::Sequence(reading_sequence()),
        FigureName::Timeseries => FigureSpec::TimeSeries(latency_series()),
        FigureName::Scatter => FigureSpec::ScatterMap(station_map()),
    }
}

fn irrigation_process() -> ProcessSpec {
    ProcessSpec {
        title: Some("Irrigation scheduling pipeline".to_string()),
        columns: vec![
            vec![
                Card::with_detail("probes", "Soil moisture probes", "volumetric %, hourly"),
                Card::with_detail("weather", "Weather feed", "ET₀ reference"),
            ],
            vec![Card::with_detail(
                "model",
                "Water balance model",
                "crop coefficient Kc",
            )],
            vec![Card::new("schedule", "Valve schedule")],
        ],
        flows: vec![Flow::labelled("model", "schedule", "daily demand")],
        merges: vec![MergeGroup {
            sources: vec!["probes".to_string(), "weather".to_string()],
            target: "model".to_string(),
            gap: 10.0,
        }],
    }
}

fn reading_sequence() -> SequenceSpec {
    SequenceSpec {
        title: Some("Sensor reading lifecycle".to_string()),
        steps: vec![
            SequenceStep {
                card: Card::new("sample", "Sample sensors"),
                x_fraction: 0.0,
            },
            SequenceStep {
                card: Card::with_detail("validate", "Validate range", "reject spikes"),
                x_fraction: 0.65,
            },
            SequenceStep {
                card: Card::new("aggregate", "Aggregate to hourly"),
                x_fraction: 0.25,
            },
            SequenceStep {
                card: Card::new("publish", "Publish reading"),
                x_fraction: 0.5,
            },
        ],
    }
}

fn latency_series() -> TimeSeriesSpec {
    TimeSeriesSpec {
        title: Some("Station uplink latency".to_string()),
        x_label: Some("minute of hour".to_string()),
        y_label: Some("latency (ms)".to_string()),
        series: vec![
            Series {
                name: "north field".to_string(),
                points: vec![
                    (0.0, 18.0),
                    (10.0, 16.5),
                    (20.0, 21.0),
                    (30.0, 19.2),
                    (40.0, 24.8),
                    (50.0, 17.9),
                ],
            },
            Series {
                name: "river gate".to_string(),
                points: vec![
                    (0.0, 31.0),
                    (10.0, 29.4),
                    (20.0, 35.6),
                    (30.0, 33.0),
                    (40.0, 30.2),
                    (50.0, 28.7),
                ],
            },
        ],
    }
}

fn station_map() -> ScatterMapSpec {
    ScatterMapSpec {
        title: Some("Telemetry stations".to_string()),
        stations: vec![
            Station {
                id: "nf".to_string(),
                name: "North field".to_string(),
                lon: 24.93,
                lat: 60.21,
                weight: 1.2,
            },
            Station {
                id: "rg".to_string(),
                name: "River gate".to_string(),
                lon: 24.71,
                lat: 60.08,
                weight: 2.0,
            },
            Station {
                id: "wb".to_string(),
                name: "West basin".to_string(),
                lon: 24.40,
                lat: 60.15,
                weight: 0.6,
            },
            Station {
                id: "se".to_string(),
                name: "South edge".to_string(),
                lon: 24.83,
                lat: 59.97,
                weight: 1.0,
            },
        ],
        highlight: Some("rg".to_string()),
    }
}

mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dayline_core::source::FileSource;
use dayline_core::svg::render_svg;
use dayline_core::{TimelineConfig, TimelineEngine};
use log::info;

#[derive(Parser)]
#[command(name = "dayline")]
#[command(about = "Scrollable 24-hour agenda timeline")]
struct Cli {
    /// Timeline document (JSON). Overrides `source` from the config file.
    data: Option<PathBuf>,

    /// JSON config file; flags below override its fields.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// First day of the window, YYYY-MM-DD. Defaults to today (UTC).
    #[arg(long, short)]
    date: Option<String>,

    /// Hour of day the window opens at.
    #[arg(long)]
    hour: Option<u32>,

    /// Zoom level: 4, 6, 12 or 24.
    #[arg(long, short)]
    level: Option<u32>,

    /// Write a static SVG of the first frame instead of opening the UI.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Drawable width for SVG export, in pixels.
    #[arg(long, default_value = "1200")]
    width: u32,

    /// Drawable height for SVG export, in pixels.
    #[arg(long, default_value = "400")]
    height: u32,

    /// Use the dark palette for SVG export.
    #[arg(long)]
    dark: bool,
}

impl Cli {
    fn timeline_config(&self) -> Result<TimelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                TimelineConfig::from_json(&data)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => TimelineConfig::default(),
        };
        if let Some(data) = &self.data {
            config.source = Some(data.clone());
        }
        if let Some(date) = &self.date {
            config.date = Some(date.clone());
        }
        if let Some(hour) = self.hour {
            config.hour = hour;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if self.svg.is_some() {
            config.width = self.width;
            config.height = self.height;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let config = cli.timeline_config()?;
    let Some(path) = config.source.clone() else {
        bail!("no timeline document given (pass a path or set `source` in the config)");
    };

    let mut engine = TimelineEngine::new(&config)?;
    let frame = engine.load(&FileSource::new(&path))?;
    if !engine.rejected().is_empty() {
        eprintln!(
            "{} malformed record(s) skipped in {}",
            engine.rejected().len(),
            path.display()
        );
    }

    if let Some(out) = &cli.svg {
        let svg = render_svg(
            &frame,
            engine.surface_width(),
            engine.surface_height(),
            cli.dark,
        );
        std::fs::write(out, svg).with_context(|| format!("writing {}", out.display()))?;
        info!("wrote {}", out.display());
        return Ok(());
    }

    renderer::render_tui(&mut engine)
}

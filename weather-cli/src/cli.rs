use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use herecast_core::{
    App, Config, ConnectionInfo, Coordinate, GeolocationSource, OpenMeteoProvider, Outcome,
    Platform, PlotCanvas,
};
use inquire::{Confirm, CustomType, CustomUserError, Select, Text, validator::Validation};
use std::{path::PathBuf, process::ExitCode};

use crate::terminal::{self, TerminalMap, TerminalNotifier};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "herecast",
    version,
    about = "Weather where you are: map tile, current conditions, 24h temperature chart"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the geolocation source, network hints and chart output.
    Configure,

    /// Locate, map, fetch weather and chart the next 24 hours.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Use this latitude instead of the configured source.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Use this longitude instead of the configured source.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Run as if the host had no geolocation capability.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub no_geolocation: bool,

    /// Effective connection type reported by the host, e.g. "2g" or "4g".
    #[arg(long)]
    pub effective_type: Option<String>,

    /// The host is in data-saving mode.
    #[arg(long)]
    pub save_data: bool,

    /// Write the temperature chart to this path (PNG for `.png`, SVG otherwise).
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Download the center map tile (PNG) to this path.
    #[arg(long)]
    pub tile: Option<PathBuf>,
}

impl ShowArgs {
    /// Flags win over the stored config.
    fn apply(&self, config: &mut Config) {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.set_fixed_position(Coordinate::new(lat, lon));
        }
        if self.no_geolocation {
            config.geolocation = GeolocationSource::None;
        }
        if self.effective_type.is_some() || self.save_data {
            let mut network = config.network.take().unwrap_or_default();
            if let Some(effective_type) = &self.effective_type {
                network.effective_type = effective_type.clone();
            }
            network.save_data |= self.save_data;
            config.network = Some(network);
        }
        if let Some(chart) = &self.chart {
            config.chart_path = Some(chart.clone());
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show(args) => show(args).await,
        }
    }
}

async fn show(args: ShowArgs) -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    let platform = Platform {
        geolocation: config.geolocator()?,
        connection: config.network.clone(),
    };

    let app = App::new(
        platform,
        Box::new(TerminalMap::new(args.tile)),
        Box::new(OpenMeteoProvider::new(config.weather_base_url())),
        PlotCanvas::default(),
        Box::new(TerminalNotifier),
    );

    let report = app.run().await?;
    terminal::print_report(&report.state);

    if report.outcome != Outcome::Loaded {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(path) = &config.chart_path {
        report
            .canvas
            .save(path)
            .with_context(|| format!("Failed to write chart: {}", path.display()))?;
        println!("Chart written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let source = Select::new(
        "Where should the position come from?",
        GeolocationSource::all().to_vec(),
    )
    .with_starting_cursor(
        GeolocationSource::all()
            .iter()
            .position(|s| *s == config.geolocation)
            .unwrap_or(0),
    )
    .prompt()?;
    config.geolocation = source;

    if source == GeolocationSource::Fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_validator(|v: &f64| -> Result<Validation, CustomUserError> {
                Ok(if (-90.0..=90.0).contains(v) {
                    Validation::Valid
                } else {
                    Validation::Invalid("Latitude must be between -90 and 90".into())
                })
            })
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_validator(|v: &f64| -> Result<Validation, CustomUserError> {
                Ok(if (-180.0..=180.0).contains(v) {
                    Validation::Valid
                } else {
                    Validation::Invalid("Longitude must be between -180 and 180".into())
                })
            })
            .prompt()?;
        config.set_fixed_position(Coordinate::new(latitude, longitude));
    }

    let knows_network = Confirm::new("Do you want to describe your network connection?")
        .with_default(config.network.is_some())
        .prompt()?;
    config.network = if knows_network {
        let effective_type = Text::new("Effective connection type (2g, 3g, 4g):")
            .with_default("4g")
            .prompt()?;
        let save_data = Confirm::new("Is data-saving mode on?")
            .with_default(false)
            .prompt()?;
        Some(ConnectionInfo {
            effective_type: effective_type.trim().to_lowercase(),
            save_data,
        })
    } else {
        None
    };

    let chart = Text::new("Default chart path, .svg or .png (empty for none):").prompt()?;
    let chart = chart.trim();
    config.chart_path = (!chart.is_empty()).then(|| PathBuf::from(chart));

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Text};
use meteo_core::{
    ClickEvent, Config, Coordinate, CycleOutcome, MapConfig, OpenMeteoClient, Session,
    source_from_config,
};

use crate::render::{self, RenderOptions};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Point forecasts from Open-Meteo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for one coordinate.
    Show {
        /// Latitude in degrees, -90..=90.
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in degrees, -180..=180.
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Pick points interactively, starting from the configured map center.
    Pick {
        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Edit the forecast endpoint and initial map view.
    Configure,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct DisplayArgs {
    /// Number of hourly points to draw per series.
    #[arg(long, default_value_t = 24)]
    hours: usize,

    /// Also print the full API response.
    #[arg(long)]
    raw: bool,
}

impl From<DisplayArgs> for RenderOptions {
    fn from(args: DisplayArgs) -> Self {
        RenderOptions {
            hours: args.hours,
            raw: args.raw,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { latitude, longitude, display } => {
                show(latitude, longitude, display.into()).await
            }
            Command::Pick { display } => pick(display.into()).await,
            Command::Configure => configure(),
        }
    }
}

async fn show(latitude: f64, longitude: f64, options: RenderOptions) -> anyhow::Result<()> {
    let coordinate = Coordinate::new(latitude, longitude)?;
    let config = Config::load()?;

    let mut session = Session::new(source_from_config(&config)?);
    session.click(ClickEvent::from(coordinate));

    match session.run_cycle().await {
        CycleOutcome::Failed { error, .. } => {
            Err(anyhow::Error::new(error).context("Failed to fetch weather data"))
        }
        outcome => {
            print!("{}", render::outcome(&outcome, options));
            Ok(())
        }
    }
}

async fn pick(options: RenderOptions) -> anyhow::Result<()> {
    let config = Config::load()?;
    let view = config.map.view()?;
    let mut session = Session::new(source_from_config(&config)?);

    println!("Map centered on {} (zoom {})", view.center, view.zoom);
    print!("{}", render::outcome(&session.run_cycle().await, options));

    let mut last = view.center;
    loop {
        let Some(click) = prompt_click(last)? else {
            break;
        };

        session.click(click);
        print!("{}", render::outcome(&session.run_cycle().await, options));

        if let Some(selected) = session.selection() {
            last = selected;
        }

        let again = Confirm::new("Pick another point?").with_default(true).prompt();
        match cancelled(again)? {
            Some(true) => continue,
            _ => break,
        }
    }

    Ok(())
}

/// Stand-in for a map click: asks for a position, defaulting to the last one.
fn prompt_click(last: Coordinate) -> anyhow::Result<Option<ClickEvent>> {
    let lat = CustomType::<f64>::new("Latitude:")
        .with_default(last.latitude())
        .with_error_message("Please type a number")
        .prompt();
    let Some(lat) = cancelled(lat)? else {
        return Ok(None);
    };

    let lng = CustomType::<f64>::new("Longitude:")
        .with_default(last.longitude())
        .with_error_message("Please type a number")
        .prompt();

    Ok(cancelled(lng)?.map(|lng| ClickEvent { lat, lng }))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let url = Text::new("Forecast API URL:").with_default(config.api_base_url()).prompt()?;
    OpenMeteoClient::with_base_url(url.as_str())?;
    config.set_api_base_url(url);

    let map = MapConfig {
        center_latitude: CustomType::<f64>::new("Map center latitude:")
            .with_default(config.map.center_latitude)
            .prompt()?,
        center_longitude: CustomType::<f64>::new("Map center longitude:")
            .with_default(config.map.center_longitude)
            .prompt()?,
        zoom: CustomType::<u8>::new("Map zoom level:").with_default(config.map.zoom).prompt()?,
    };
    map.view()?;
    config.map = map;

    let path = config.save().context("Failed to store configuration")?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// Esc / Ctrl-C end the interaction instead of failing it.
fn cancelled<T>(res: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(anyhow!(e)),
    }
}

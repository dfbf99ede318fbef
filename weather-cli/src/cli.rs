use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use tokio::sync::watch;
use weather_core::{
    ApiClient, Config, Controller, Coordinates, FixedPosition, NoPosition, PositionSource,
    SessionState,
};

use crate::render::Rendered;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup client")]
pub struct Cli {
    /// Base URL of the weather server; overrides the configured one.
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key used by the server.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name.
        city: String,
    },

    /// Show weather for the place at the given position.
    ///
    /// Without `--lat`/`--long` the device has no position to offer.
    Locate {
        #[arg(long, allow_negative_numbers = true, requires = "long")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        long: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city } => {
                let mut controller = controller_for(&config, self.server.as_deref());
                controller.submit(&city).await;
                finish(controller.state())
            }
            Command::Locate { lat, long } => {
                let mut controller = controller_for(&config, self.server.as_deref());
                let fixed = lat.zip(long).map(|(lat, long)| FixedPosition(Coordinates::new(lat, long)));
                let position: &dyn PositionSource = match &fixed {
                    Some(fixed) => fixed,
                    None => &NoPosition,
                };
                controller.on_load(position).await;
                finish(controller.state())
            }
        }
    }
}

fn controller_for(config: &Config, server: Option<&str>) -> Controller<ApiClient> {
    let base_url = server.unwrap_or(&config.server.url);
    let controller = Controller::new(ApiClient::new(base_url));
    tokio::spawn(log_progress(controller.subscribe()));
    controller
}

async fn log_progress(mut updates: watch::Receiver<SessionState>) {
    while updates.changed().await.is_ok() {
        match &*updates.borrow_and_update() {
            SessionState::LocatingUser => tracing::info!("Locating device"),
            SessionState::LookupPlace(coords) => {
                tracing::info!(lat = coords.latitude, long = coords.longitude, "Looking up place")
            }
            SessionState::LookupWeather { city, request } => {
                tracing::info!(%city, request, "Looking up weather")
            }
            _ => {}
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn finish(state: &SessionState) -> anyhow::Result<()> {
    match state {
        SessionState::Displaying(display) => {
            print!("{}", Rendered(display));
            Ok(())
        }
        SessionState::Error(message) => anyhow::bail!("{message}"),
        other => anyhow::bail!("Lookup ended unexpectedly in state {other:?}"),
    }
}

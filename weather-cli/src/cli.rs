use std::{fmt, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::debug;
use weather_core::{
    Config, Coordinates, FixedPosition, GeoLocator, NoGeolocation, TemperatureUnit, Theme,
    Widget, WidgetConfig, WidgetView, provider::provider_from_config,
};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and a multi-day forecast carousel")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the default city, API key and unit.
    Configure,

    /// Print current conditions and the three-day window once.
    Show {
        #[command(flatten)]
        widget: WidgetArgs,

        /// Move the carousel this many days forward before printing.
        #[arg(long, default_value_t = 0)]
        day: usize,
    },

    /// Browse the forecast interactively.
    Browse {
        #[command(flatten)]
        widget: WidgetArgs,
    },
}

#[derive(Debug, Args)]
pub struct WidgetArgs {
    /// City name; defaults to the configured city.
    #[arg(value_parser = parse_city)]
    pub city: Option<String>,

    /// Device latitude; takes precedence over the city.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Device longitude.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Display unit: celsius or fahrenheit.
    #[arg(long, value_parser = parse_unit)]
    pub unit: Option<TemperatureUnit>,

    /// API key; overrides the config file and environment.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Start with the dark theme.
    #[arg(long)]
    pub dark: bool,
}

fn parse_city(value: &str) -> Result<String, String> {
    let city = value.trim();
    if city.is_empty() {
        return Err("City must not be empty".to_string());
    }
    Ok(city.to_string())
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::try_from(value).map_err(|e| e.to_string())
}

impl WidgetArgs {
    fn position(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        }
    }

    /// Standalone mount: a missing API key is fatal here.
    fn build_widget(&self, config: &Config) -> anyhow::Result<Widget> {
        let position = self.position();

        let city = match (&self.city, position) {
            (Some(city), _) => city.clone(),
            (None, None) => config.default_city()?.to_string(),
            (None, Some(_)) => config.city.clone().unwrap_or_else(|| "Current location".to_string()),
        };

        let provider = provider_from_config(config, self.api_key.as_deref())?;

        let locator: Arc<dyn GeoLocator> = match position {
            Some(coords) => Arc::new(FixedPosition(coords)),
            None => Arc::new(NoGeolocation),
        };

        let theme = if self.dark { Theme::Dark } else { config.theme };

        debug!(%city, ?position, "mounting widget");

        Ok(Widget::new(WidgetConfig::new(city, self.api_key.clone()), provider, locator, &config.cache)
            .with_unit(self.unit.unwrap_or(config.unit))
            .with_theme(theme))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Previous,
    Next,
    ToggleUnit(TemperatureUnit),
    ToggleTheme,
    Refresh,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Previous => f.write_str("< Previous day"),
            Action::Next => f.write_str("Next day >"),
            Action::ToggleUnit(unit) => write!(f, "Switch to {}", unit.toggled().symbol()),
            Action::ToggleTheme => f.write_str("Toggle theme"),
            Action::Refresh => f.write_str("Refresh"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { widget, day } => {
                let config = Config::load()?;
                let mut widget = widget.build_widget(&config)?;
                widget.load().await;

                widget.advance_days(day);

                let view = widget.view();
                if let WidgetView::Error { message } = &view {
                    anyhow::bail!("{message}");
                }
                print!("{}", render(&view));
                Ok(())
            }
            Command::Browse { widget } => {
                let config = Config::load()?;
                let widget = widget.build_widget(&config)?;
                browse(widget).await
            }
        }
    }
}

async fn browse(mut widget: Widget) -> anyhow::Result<()> {
    widget.load().await;

    loop {
        println!("\n{}", render(&widget.view()));

        let actions = vec![
            Action::Previous,
            Action::Next,
            Action::ToggleUnit(widget.unit()),
            Action::ToggleTheme,
            Action::Refresh,
            Action::Quit,
        ];

        let action = Select::new("Action:", actions)
            .with_starting_cursor(1)
            .prompt()
            .context("Failed to read action")?;

        match action {
            Action::Previous => widget.previous_day(),
            Action::Next => widget.next_day(),
            Action::ToggleUnit(_) => widget.toggle_unit(),
            Action::ToggleTheme => widget.toggle_theme(),
            Action::Refresh => widget.refresh().await,
            Action::Quit => return Ok(()),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let city = Text::new("Default city:")
        .with_default(config.city.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read city")?;

    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let unit = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
        .with_starting_cursor(if config.unit == TemperatureUnit::Fahrenheit { 1 } else { 0 })
        .prompt()
        .context("Failed to read unit")?;

    let city = city.trim();
    config.city = (!city.is_empty()).then(|| city.to_string());
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }
    config.unit = unit;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

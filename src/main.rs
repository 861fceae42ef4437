use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use weatherfree::{
    AddressComponents, AppConfig, ForecastProduct, Location, LocationForecast, WeatherError,
    WeatherService,
};

#[derive(Parser)]
#[command(name = "weatherfree", about = "National Weather Service forecasts by place, address or ZIP")]
struct Cli {
    /// Config file (defaults to ./weatherfree.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Give up on the whole lookup after this many seconds
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a place, address or ZIP code to coordinates
    Locate {
        /// Free-text query, e.g. "Los Angeles, CA" or 10001
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Resolve a query and show its forecast
    Forecast {
        #[arg(required = true)]
        query: Vec<String>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Forecast for explicit coordinates (no geocoding)
    Point {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Forecast for a structured street address
    Address {
        /// Street line, e.g. "4600 Silver Hill Rd"
        street: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(clap::Args)]
struct DisplayArgs {
    /// Hour-by-hour instead of day/night periods
    #[arg(long)]
    hourly: bool,
    /// Number of periods to show
    #[arg(short, long, default_value = "14")]
    limit: usize,
}

impl DisplayArgs {
    fn product(&self) -> ForecastProduct {
        if self.hourly {
            ForecastProduct::Hourly
        } else {
            ForecastProduct::Periods
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weatherfree=info".into()),
        )
        .init();

    // Load .env if present (override system env vars)
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        match e.downcast_ref::<WeatherError>() {
            Some(err) => {
                warn!("{}", err);
                eprintln!("\n⚠️  {}", err.user_message());
                if err.is_retryable() {
                    eprintln!("   This looks temporary, try again in a moment.");
                }
            }
            None => eprintln!("\n⚠️  {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let service = WeatherService::new(&config)?;
    let service = match cli.deadline_secs {
        Some(secs) => service.with_deadline(Duration::from_secs(secs)),
        None => service,
    };

    match cli.command {
        Commands::Locate { query } => {
            let location = service.locate(&query.join(" ")).await?;
            println!("\n📍 {}", location.display_name);
            println!("   Lat: {:.4}  Lon: {:.4}", location.latitude, location.longitude);
        }
        Commands::Forecast { query, display } => {
            let forecast = service.lookup_product(&query.join(" "), display.product()).await?;
            print_forecast(&forecast, display.limit);
        }
        Commands::Point { lat, lon, display } => {
            let location = Location::new(lat, lon, format!("{:.4}, {:.4}", lat, lon))
                .ok_or_else(|| anyhow::anyhow!("Coordinates out of range: {}, {}", lat, lon))?;
            let forecast = service.forecast_for(location, display.product()).await?;
            print_forecast(&forecast, display.limit);
        }
        Commands::Address { street, city, state, zip, display } => {
            let components = AddressComponents { street, city, state, zip };
            let forecast = service.lookup_components(&components, display.product()).await?;
            info!("Address resolved to {}", forecast.location);
            print_forecast(&forecast, display.limit);
        }
    }

    Ok(())
}

fn print_forecast(forecast: &LocationForecast, limit: usize) {
    let location = &forecast.location;
    println!("\n📍 {}", location.display_name);
    println!("   Lat: {:.4}  Lon: {:.4}", location.latitude, location.longitude);

    if let Some(now) = forecast.current() {
        println!("\n🌡  {} {}, {}", now.label, now.format_temperature(), now.short_summary);
        if !now.detailed_summary.is_empty() {
            println!("   {}", now.detailed_summary);
        }
    }

    println!(
        "\n{:<18} {:>6} {:<28} {:>5} {:<20}",
        "Period", "Temp", "Forecast", "RH", "Wind"
    );
    println!("{}", "-".repeat(82));
    for period in forecast.periods.iter().take(limit) {
        let label = if period.label.is_empty() {
            period.start_time.format("%a %H:%M").to_string()
        } else {
            period.label.clone()
        };
        println!(
            "{:<18} {:>6} {:<28} {:>5} {:<20}",
            truncate(&label, 18),
            period.format_temperature(),
            truncate(&period.short_summary, 28),
            period
                .relative_humidity_percent
                .map(|h| format!("{}%", h))
                .unwrap_or_default(),
            period.format_wind(),
        );
    }
    println!("\nShowing {} of {} periods", forecast.periods.len().min(limit), forecast.periods.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

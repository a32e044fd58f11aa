use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use medfinder_core::{load_app_config, Shop};
use medfinder_locate::{
    rank_by_distance, Coordinates, LocationController, ManualLocationProvider, MemorySessionStore,
    RefreshOutcome, RequestStatus,
};

#[derive(Debug, Parser)]
#[command(name = "medfinder")]
#[command(about = "Location-aware medicine and pharmacy discovery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a position fix into an area and pincode.
    Resolve {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
    },
    /// Rank a shop list by distance from a reference point.
    Rank {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
        /// Path to a JSON array of shop records.
        #[arg(long)]
        shops: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { lat, lon } => resolve(coords_from(lat, lon)?).await,
        Commands::Rank { lat, lon, shops } => rank(coords_from(lat, lon)?, &shops),
    }
}

fn coords_from(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<Option<Coordinates>> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(Some(Coordinates {
            latitude,
            longitude,
        })),
        (None, None) => Ok(None),
        _ => bail!("--lat and --lon must be given together"),
    }
}

async fn resolve(fix: Option<Coordinates>) -> anyhow::Result<()> {
    let config = load_app_config()?;
    tracing::debug!(?config, "loaded configuration");
    let provider = ManualLocationProvider::new(fix);
    let controller =
        LocationController::from_config(provider, &config, Arc::new(MemorySessionStore::new()))?;

    let RefreshOutcome::Completed(snapshot) = controller.refresh().await else {
        bail!("location request did not run");
    };

    match snapshot.status {
        RequestStatus::Resolved => {
            let location = snapshot
                .location
                .context("resolved state must carry a location")?;
            println!("{}, {}", location.area, location.pincode);
            if let (Some(lat), Some(lon)) = (location.latitude, location.longitude) {
                println!("coordinates: {lat}, {lon}");
            }
            if let Some(note) = snapshot.error_message {
                println!("note: {note}");
            }
        }
        _ => {
            let message = snapshot
                .error_message
                .clone()
                .unwrap_or_else(|| "location request failed".to_string());
            eprintln!("error: {message}");
            if let Some(hint) = snapshot.request_state().hint() {
                eprintln!("{hint}");
            }
        }
    }

    Ok(())
}

fn rank(reference: Option<Coordinates>, shops_path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(shops_path)
        .with_context(|| format!("failed to read {}", shops_path.display()))?;
    let shops: Vec<Shop> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse shop list {}", shops_path.display()))?;

    for (position, ranked) in rank_by_distance(reference, &shops).iter().enumerate() {
        let shop = ranked.entity;
        let distance = ranked
            .distance_km
            .map_or_else(String::new, |km| format!(" ({km:.1} km away)"));
        println!("{}. {} - {}{distance}", position + 1, shop.name, shop.address);
        if let Some(url) = shop.maps_url() {
            println!("   {url}");
        }
    }

    Ok(())
}

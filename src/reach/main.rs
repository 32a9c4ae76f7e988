//! Reachable outcodes from a UK postcode.
//!
//! Resolves the start postcode, fetches a drive-time isochrone from
//! OpenRouteService and lists the outcodes that fall inside it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use isoreach::candidates::{CandidateSource, RemoteSupplier, TableSupplier};
use isoreach::config::Config;
use isoreach::export::write_geojson;
use isoreach::postcodes::PostcodesClient;
use isoreach::reachable_outcodes;
use isoreach::routing::IsochroneClient;

#[derive(Parser, Debug)]
#[command(name = "reach")]
#[command(about = "List UK outcodes reachable by car from a postcode")]
struct Args {
    /// Starting postcode, e.g. "SW1A 1AA"
    postcode: String,

    /// Drive time in minutes
    #[arg(short, long, default_value = "30")]
    minutes: u32,

    /// OpenRouteService API key
    #[arg(long, env = "ORS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local outcode table (outcode,latitude,longitude) instead of the radius search
    #[arg(long)]
    table: Option<PathBuf>,

    /// Label column of the local table
    #[arg(long)]
    label_column: Option<String>,

    /// Radius search distance in meters
    #[arg(long)]
    radius: Option<u32>,

    /// Result cap for the radius search
    #[arg(long)]
    limit: Option<u32>,

    /// Write the isochrone and candidates to a GeoJSON file
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Print the outcodes as a JSON array
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    isoreach::logging::init()?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(key) = args.api_key.clone() {
        config.routing.api_key = Some(key);
    }
    if let Some(radius) = args.radius {
        config.search.radius_m = radius;
    }
    if let Some(limit) = args.limit {
        config.search.limit = limit;
    }
    if args.table.is_some() {
        config.table.path = args.table.clone();
    }
    if let Some(column) = args.label_column.clone() {
        config.table.label_column = column;
    }

    let postcodes =
        PostcodesClient::new(&config.postcodes).context("Failed to create postcodes.io client")?;
    let routing = IsochroneClient::new(&config.routing)
        .context("Failed to create OpenRouteService client (set ORS_API_KEY or --api-key)")?;

    let source = match &config.table.path {
        Some(path) => {
            let table = TableSupplier::load(path, &config.table.columns())
                .with_context(|| format!("Failed to load outcode table {}", path.display()))?;
            CandidateSource::Table(table)
        }
        None => {
            let remote = RemoteSupplier::new(postcodes.clone(), config.search.limit);
            info!(
                "Using postcodes.io radius search ({} m, at most {} results)",
                config.search.radius_m,
                remote.limit()
            );
            CandidateSource::Remote(remote)
        }
    };

    let result = reachable_outcodes(
        &postcodes,
        &routing,
        &source,
        &args.postcode,
        args.minutes,
        config.search.radius_m,
    )
    .await?;

    if result.skipped > 0 {
        warn!(
            "Skipped {} candidates without usable coordinates",
            result.skipped
        );
    }

    if args.json {
        println!("{}", serde_json::to_string(&result.outcodes)?);
    } else {
        println!(
            "Reachable outcodes from {} within {} minutes:",
            result.postcode, result.minutes
        );
        println!("{}", result.outcodes.to_vec().join(", "));
    }

    if let Some(path) = &args.geojson {
        write_geojson(&result, path).context("Failed to write GeoJSON map")?;
    }

    Ok(())
}

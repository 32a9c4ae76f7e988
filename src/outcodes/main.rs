//! Build the local outcode table from an ONS Postcode Directory export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use isoreach::candidates::{build_outcode_table, DirectoryColumns};

#[derive(Parser, Debug)]
#[command(name = "outcodes")]
#[command(about = "Average ONS postcode coordinates into an outcode table")]
struct Args {
    /// ONS Postcode Directory CSV (.csv or .csv.gz)
    #[arg(short, long)]
    input: PathBuf,

    /// Output table
    #[arg(short, long, default_value = "uk_outcodes.csv")]
    output: PathBuf,

    /// Postcode column
    #[arg(long, default_value = "PCD8")]
    postcode_column: String,

    /// Latitude column
    #[arg(long, default_value = "LAT")]
    lat_column: String,

    /// Longitude column
    #[arg(long, default_value = "LONG")]
    lon_column: String,
}

fn main() -> Result<()> {
    isoreach::logging::init()?;

    let args = Args::parse();

    let columns = DirectoryColumns {
        postcode: args.postcode_column,
        latitude: args.lat_column,
        longitude: args.lon_column,
    };

    let count = build_outcode_table(&args.input, &args.output, &columns)
        .with_context(|| format!("Failed to build outcode table from {}", args.input.display()))?;

    info!("Created {} with {} outcodes", args.output.display(), count);
    Ok(())
}

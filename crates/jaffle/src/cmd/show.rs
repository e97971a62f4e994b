//! Show command - print loaded tables and load history

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use jaffle_config::Config;
use jaffle_connectors::jaffle_shop_resources;
use jaffle_sinks::{Destination, TursoDestination};

/// Show command arguments
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show this table
    #[arg(short, long)]
    table: Option<String>,

    /// Print up to this many stored rows per table
    #[arg(short, long, default_value_t = 0)]
    rows: usize,
}

/// Run the show command
pub async fn run(config: &Config, args: ShowArgs) -> Result<()> {
    let Some(data_dir) = config.destination.data_dir.as_deref() else {
        anyhow::bail!("no data_dir configured, nothing to show");
    };
    if config.destination.in_memory {
        anyhow::bail!("destination is in memory, nothing persists between runs");
    }

    let dataset_name = &config.pipeline.dataset_name;
    let path = TursoDestination::database_path(data_dir, dataset_name);
    if !Path::new(&path).exists() {
        anyhow::bail!("dataset {} has not been loaded yet ({} not found)", dataset_name, path);
    }

    let destination = TursoDestination::open(data_dir, dataset_name.as_str())
        .await
        .context("failed to open dataset")?;

    let tables: Vec<String> = match args.table {
        Some(table) => vec![table],
        None => jaffle_shop_resources()?
            .iter()
            .map(|def| def.table().name().to_string())
            .collect(),
    };

    println!("Dataset {} ({})", destination.dataset_name(), path);
    for table in &tables {
        let count = destination.row_count(table).await?;
        println!("\n{} ({} rows)", table, count);

        for (column, data_type) in destination.columns(table).await? {
            println!("  {:<24} {}", column, data_type);
        }

        if args.rows > 0 {
            for record in destination.rows(table).await?.into_iter().take(args.rows) {
                println!("  {}", serde_json::to_string(&record)?);
            }
        }
    }

    let loads = destination.loads().await?;
    println!("\nLoads ({})", loads.len());
    for load in loads.iter().rev() {
        println!(
            "  {}  {:<9} {}  {}",
            load.load_id,
            load.status.as_str(),
            load.pipeline_name,
            load.inserted_at
        );
    }

    Ok(())
}

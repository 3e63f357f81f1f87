//! bikestat - Filter and aggregate hourly bike-sharing rental data

use bikestat::{
    cli::{Cli, Command, render_report},
    data_loader::DataLoader,
    error::Result,
    output::get_formatter,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose opens up info logs
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            tracing_subscriber::EnvFilter::new("bikestat=info,bikestat_core=info")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let stdout_is_terminal = is_terminal::is_terminal(std::io::stdout());
    let show_progress = !cli.json && stdout_is_terminal;
    let use_color = !cli.json
        && !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && stdout_is_terminal;
    if !use_color {
        colored::control::set_override(false);
    }

    let data_loader = DataLoader::new(cli.data.clone())
        .await?
        .with_progress(show_progress);
    let loaded = data_loader.load_records().await?;

    let criteria = cli.filters.to_criteria(&loaded.records)?;
    let records = cli.filters.select_records(&loaded.records, &criteria)?;
    info!(
        "{} of {} records selected",
        records.len(),
        loaded.records.len()
    );

    let formatter = get_formatter(cli.json, use_color);
    if records.is_empty() {
        println!("{}", formatter.format_no_data(&criteria));
        return Ok(());
    }

    let command = cli.command.unwrap_or(Command::Summary);
    println!("{}", render_report(&command, &records, formatter.as_ref())?);

    Ok(())
}

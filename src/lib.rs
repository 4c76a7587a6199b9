pub mod cli;
pub mod decode;
pub mod denormalize;
pub mod error;
pub mod fetch;
pub mod output;
pub mod pivot;
pub mod preview;
pub mod sdmx;
pub mod summary;
pub mod tax_types;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("oecd_div", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => handle_fetch(&args.output),
        Commands::Process(args) => handle_process(&args),
        Commands::Run(args) => {
            handle_fetch(&args.json)?;
            handle_process(&cli::ProcessArgs {
                input: args.json,
                output: args.output,
                delimiter: args.delimiter,
                preview_rows: 5,
            })
        }
        Commands::Preview(args) => handle_preview(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn handle_fetch(output: &Path) -> Result<()> {
    let payload = fetch::fetch_dataset(fetch::ENDPOINT)
        .with_context(|| format!("Fetching dataset from {}", fetch::ENDPOINT))?;
    fetch::save_payload(&payload, output)
        .with_context(|| format!("Writing dataset to {output:?}"))?;
    Ok(())
}

fn handle_process(args: &cli::ProcessArgs) -> Result<()> {
    info!(
        "Processing '{}' -> '{}'",
        args.input.display(),
        args.output.display()
    );
    let table = denormalize::run(&args.input, &args.output, args.delimiter)
        .with_context(|| format!("Denormalizing {:?}", args.input))?;

    if args.preview_rows > 0 {
        info!(
            "First rows of the reformatted table:\n{}",
            preview::render(&table, args.preview_rows)
        );
    }
    let summaries = summary::summarize(&table);
    let headers = ["#", "column", "non-empty", "kind"].map(String::from);
    info!(
        "{} row(s) x {} column(s):\n{}",
        table.rows.len(),
        summaries.len(),
        preview::render_grid(&headers, &summary::summary_rows(&summaries))
    );
    if !table.conflicts.is_empty() {
        info!(
            "{} ambiguous observation(s) resolved by keeping the first value",
            table.conflicts.len()
        );
    }
    info!(
        "Data has been parsed, reformatted, and saved to {:?}",
        args.output
    );
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let table = denormalize::load_table(&args.input)
        .with_context(|| format!("Denormalizing {:?}", args.input))?;
    print!("{}", preview::render(&table, args.rows));
    info!(
        "Displayed {} of {} row(s) from {:?}",
        args.rows.min(table.rows.len()),
        table.rows.len(),
        args.input
    );
    Ok(())
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let table = denormalize::load_table(&args.input)
        .with_context(|| format!("Denormalizing {:?}", args.input))?;
    if table.columns.is_empty() {
        info!("{:?} does not contain any tax types", args.input);
        return Ok(());
    }
    let summaries = summary::summarize(&table);
    let rows = summaries
        .iter()
        .filter(|summary| table.columns.contains(&summary.name))
        .enumerate()
        .map(|(idx, summary)| {
            vec![
                (idx + 1).to_string(),
                summary.name.clone(),
                summary.non_empty.to_string(),
                tax_types::describe(&summary.name),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "tax_type", "non-empty", "description"].map(String::from);
    print!("{}", preview::render_grid(&headers, &rows));
    info!("Listed {} tax type(s) from {:?}", rows.len(), args.input);
    Ok(())
}

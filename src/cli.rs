use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_JSON_PATH: &str = "oecd_div.json";
pub const DEFAULT_TABLE_PATH: &str = "oecd_div_tax.xlsx";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Fetch the OECD dividend income tax dataset and pivot it by country and year",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download the raw SDMX-JSON dataset
    Fetch(FetchArgs),
    /// Pivot a saved SDMX-JSON file into a country-by-year table
    Process(ProcessArgs),
    /// Fetch then process in one go
    Run(RunArgs),
    /// Print the first rows of the pivoted table without writing files
    Preview(PreviewArgs),
    /// List the tax type columns found in a saved dataset
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Destination JSON file
    #[arg(short = 'o', long = "output", default_value = DEFAULT_JSON_PATH)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// SDMX-JSON file produced by `fetch`
    #[arg(short = 'i', long = "input", default_value = DEFAULT_JSON_PATH)]
    pub input: PathBuf,
    /// Output table (`.xlsx` workbook, `.csv`/`.tsv` text, `-` for CSV on stdout)
    #[arg(short = 'o', long = "output", default_value = DEFAULT_TABLE_PATH)]
    pub output: PathBuf,
    /// Delimiter for text output (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Rows of the result to log once written (0 disables)
    #[arg(long = "preview-rows", default_value_t = 5)]
    pub preview_rows: usize,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Intermediate JSON file
    #[arg(long = "json", default_value = DEFAULT_JSON_PATH)]
    pub json: PathBuf,
    /// Output table (`.xlsx` workbook, `.csv`/`.tsv` text, `-` for CSV on stdout)
    #[arg(short = 'o', long = "output", default_value = DEFAULT_TABLE_PATH)]
    pub output: PathBuf,
    /// Delimiter for text output (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// SDMX-JSON file produced by `fetch`
    #[arg(short = 'i', long = "input", default_value = DEFAULT_JSON_PATH)]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// SDMX-JSON file produced by `fetch`
    #[arg(short = 'i', long = "input", default_value = DEFAULT_JSON_PATH)]
    pub input: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

use std::path::PathBuf;

use adjustment_tools::config::{BranchCode, ColumnRef, ToolConfig};
use adjustment_tools::io::locate::PathLocator;
use adjustment_tools::sync;
use adjustment_tools::{Result, ToolError};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    let mut config = ToolConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Format(args) => {
            let path = sync::format_adjustments(
                &PathLocator::new(args.file),
                args.sheet.as_deref(),
                &config,
            )?;
            println!("Processing complete. File saved: {}", path.display());
        }
        Command::Purge(args) => {
            if let Some(sheet) = args.sheet {
                config.purge.sheet = sheet;
            }
            if let Some(column) = args.column {
                config.purge.column = column;
            }
            if !args.codes.is_empty() {
                config.purge.codes = args.codes;
            }
            let (path, removed) = sync::purge_codes(&PathLocator::new(args.file), &config.purge)?;
            println!("Deleted {removed} row(s). File saved: {}", path.display());
        }
        Command::Split(args) => {
            for (group, codes) in args.groups {
                config.split.groups.insert(group, codes);
            }
            let written = sync::split_branches(&PathLocator::new(args.file), &config)?;
            for path in &written {
                println!("Created file: {}", path.display());
            }
            println!("Splitting complete. {} file(s) written.", written.len());
        }
        Command::Summarize(args) => {
            if let Some(sheet) = args.data_sheet {
                config.summary.data_sheet = sheet;
            }
            if let Some(sheet) = args.sheet {
                config.summary.sheet = sheet;
            }
            let path = sync::summarize(&PathLocator::new(args.file), &config)?;
            println!(
                "Summary tables written to '{}'. File saved: {}",
                config.summary.sheet,
                path.display()
            );
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn parse_group(raw: &str) -> std::result::Result<(String, Vec<BranchCode>), String> {
    let (name, codes) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=CODE[,CODE...], got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("group name missing in '{raw}'"));
    }
    let codes = codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(BranchCode::from)
        .collect();
    Ok((name.to_string(), codes))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sort, highlight, purge, split, and summarize adjustment report workbooks."
)]
struct Cli {
    /// Optional JSON configuration overriding the stock columns, formats, and rules.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sort by sell branch and cost, apply number formats and highlight fills, and save in place.
    Format(FormatArgs),
    /// Delete rows whose code column matches one of the given codes, and save in place.
    Purge(PurgeArgs),
    /// Write one workbook per branch group next to the input file.
    Split(SplitArgs),
    /// Rebuild the cost summary tables from the data sheet, and save in place.
    Summarize(SummarizeArgs),
}

#[derive(clap::Args)]
struct FormatArgs {
    /// Workbook to process (.xlsx).
    file: Option<PathBuf>,

    /// Sheet to process; defaults to the first sheet.
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(clap::Args)]
struct PurgeArgs {
    /// Workbook to clean (.xlsx).
    file: Option<PathBuf>,

    /// Sheet holding the data.
    #[arg(long)]
    sheet: Option<String>,

    /// Code column as a 1-based position or a header name.
    #[arg(long)]
    column: Option<ColumnRef>,

    /// Code to delete; repeat for several.
    #[arg(long = "code")]
    codes: Vec<String>,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Workbook to split (.xlsx or .xlsm).
    file: Option<PathBuf>,

    /// Branch group as NAME=CODE[,CODE...]; repeat for several.
    #[arg(long = "group", value_parser = parse_group)]
    groups: Vec<(String, Vec<BranchCode>)>,
}

#[derive(clap::Args)]
struct SummarizeArgs {
    /// Workbook to summarize (.xlsx).
    file: Option<PathBuf>,

    /// Sheet holding the data.
    #[arg(long)]
    data_sheet: Option<String>,

    /// Sheet receiving the summary tables; created when missing.
    #[arg(long)]
    sheet: Option<String>,
}

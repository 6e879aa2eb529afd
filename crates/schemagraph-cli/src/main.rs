//! schemagraph command-line tool
//!
//! Reports on crawled schema snapshots, diffs two crawls, and computes weak
//! association names.

mod config;
mod formatter;
mod input;
mod report;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use config::ReportArgs;
use formatter::OutputFormat;
use schemagraph_core::{weak_association_name, CatalogDiff, Error, ReportOptions, TableName};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// schemagraph command-line tool
#[derive(Parser, Debug)]
#[command(name = "schemagraph")]
#[command(version, about = "Schema catalog reports and weak association inference")]
pub struct Args {
    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print tables, indexes, foreign keys and weak associations of a snapshot
    Report(ReportArgs),

    /// Compare two snapshots
    Diff {
        /// Older snapshot
        old: PathBuf,
        /// Newer snapshot
        new: PathBuf,
    },

    /// Print the weak association name for a pair of tables
    Name {
        /// Referenced table, as schema.table
        pk_table: String,
        /// Referencing table, as schema.table
        fk_table: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("schemagraph_cli=info,schemagraph_core=warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let formatter = formatter::create_formatter(args.format);

    match &args.command {
        Command::Report(report_args) => {
            let options = ReportOptions::from(report_args);
            let catalog =
                input::load_catalog(&report_args.snapshot, options.infer_weak_associations)?;
            let report = report::build_report(&catalog, &options);
            println!("{}", formatter.format_report(&report));
        }
        Command::Diff { old, new } => {
            let from = input::load_catalog(old, true)?;
            let to = input::load_catalog(new, true)?;
            let diff = CatalogDiff::compute(&from, &to);
            println!("{}", formatter.format_diff(&diff));
        }
        Command::Name { pk_table, fk_table } => {
            let name = weak_association_name(&parse_table(pk_table)?, &parse_table(fk_table)?);
            println!("{}", formatter.format_name(&name));
        }
    }

    Ok(())
}

fn parse_table(name: &str) -> Result<TableName, Error> {
    TableName::parse(name)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid table name: {:?}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_command() {
        let args = Args::try_parse_from([
            "schemagraph",
            "--format",
            "json",
            "name",
            "SALES.CUSTOMERS",
            "SALES.ORDERS",
        ])
        .unwrap();

        assert_eq!(args.format, OutputFormat::Json);
        assert!(matches!(args.command, Command::Name { .. }));
    }

    #[test]
    fn test_parse_report_command() {
        let args = Args::try_parse_from([
            "schemagraph",
            "report",
            "crawl.json",
            "--quoting",
            "quote_all",
            "--omit-large-objects",
            "--no-infer",
        ])
        .unwrap();

        match args.command {
            Command::Report(report) => {
                assert_eq!(report.snapshot, PathBuf::from("crawl.json"));
                assert!(report.omit_large_objects);
                assert!(report.no_infer);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_table() {
        assert_eq!(
            parse_table("SALES.ORDERS").unwrap(),
            TableName::new("SALES", "ORDERS")
        );
        assert!(matches!(parse_table(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_name_matches_known_value() {
        let name = weak_association_name(
            &parse_table("SALES.CUSTOMERS").unwrap(),
            &parse_table("SALES.ORDERS").unwrap(),
        );
        assert_eq!(name, "SC_8EB9F9B3_83BC0A27");
    }
}

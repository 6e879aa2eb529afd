//! Report configuration from command line arguments.

use std::path::PathBuf;

use clap::Args;
use schemagraph_core::{IdentifierQuotingStrategy, Identifiers, ReportOptions};

/// Arguments of the `report` command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Snapshot file to report on.
    pub snapshot: PathBuf,

    /// Identifier quoting strategy: quote_none, quote_if_special or quote_all.
    #[arg(long, default_value = "quote_if_special")]
    pub quoting: String,

    /// Quote delimiter. Two distinct characters, such as `[]`, are an open/close pair.
    #[arg(long, default_value = "\"")]
    pub quote_string: String,

    /// Extra reserved words that force quoting (repeatable).
    #[arg(long = "reserved-word")]
    pub reserved_words: Vec<String>,

    /// Leave large-object columns out of index column lists.
    #[arg(long)]
    pub omit_large_objects: bool,

    /// Skip weak association inference.
    #[arg(long)]
    pub no_infer: bool,

    /// Include placeholder tables referenced from outside the crawl.
    #[arg(long)]
    pub show_partial: bool,
}

impl From<&ReportArgs> for ReportOptions {
    fn from(args: &ReportArgs) -> Self {
        let identifiers = Identifiers::new(
            IdentifierQuotingStrategy::from_name(&args.quoting),
            args.quote_string.clone(),
        )
        .with_reserved_words(args.reserved_words.iter().cloned());

        ReportOptions::new()
            .with_identifiers(identifiers)
            .with_omit_large_objects(args.omit_large_objects)
            .with_infer_weak_associations(!args.no_infer)
            .with_show_partial_tables(args.show_partial)
    }
}

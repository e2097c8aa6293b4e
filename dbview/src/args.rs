//! Command line.

use clap::Parser;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "dbview", about = "Browse a generated table through a virtual scroller.")]
pub struct Args {
    /// Number of records to generate.
    #[arg(long, default_value_t = 100_000)]
    pub rows: usize,

    /// Records fetched per page.
    #[arg(long, default_value_t = 200, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub page_size: usize,
}

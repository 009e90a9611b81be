use clap::Parser;
use std::path::PathBuf;

use crate::io::HeaderMode;
use crate::types::TableSchema;

/// Summarize an expense export by spending category
#[derive(Parser, Debug)]
#[command(name = "expense-summary")]
#[command(about = "Summarize an expense export by spending category", long_about = None)]
pub struct CliArgs {
    /// Input xlsx file containing one transaction per row
    #[arg(value_name = "INPUT", help = "Path to the input xlsx expense export")]
    pub input_file: PathBuf,

    /// Where to write the summary workbook
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT",
        default_value = "summary.xlsx",
        help = "Path of the summary workbook to write"
    )]
    pub output_file: PathBuf,

    /// Category rule table overriding the built-in one
    #[arg(
        long = "rules",
        value_name = "FILE",
        help = "TOML rule table overriding the built-in categories"
    )]
    pub rules_file: Option<PathBuf>,

    /// Column of the transaction amount
    #[arg(
        long = "amount-col",
        value_name = "COL",
        default_value_t = 4,
        help = "0-based column index of the transaction amount"
    )]
    pub amount_col: usize,

    /// Column of the transaction description
    #[arg(
        long = "desc-col",
        value_name = "COL",
        default_value_t = 11,
        help = "0-based column index of the transaction description"
    )]
    pub desc_col: usize,

    /// Fixed header offset instead of auto-detection
    #[arg(
        long = "header-rows",
        value_name = "ROWS",
        help = "Number of leading header rows to skip (default: auto-detect, falling back to 1)"
    )]
    pub header_rows: Option<usize>,

    /// Skip rows with unparseable amounts instead of aborting
    #[arg(
        long = "lenient",
        help = "Skip rows with unparseable amounts instead of aborting the run"
    )]
    pub lenient: bool,
}

impl CliArgs {
    /// Positional schema of the input table from the column arguments
    pub fn schema(&self) -> TableSchema {
        TableSchema {
            amount_col: self.amount_col,
            desc_col: self.desc_col,
        }
    }

    /// Header handling: fixed offset when given, auto-detection otherwise
    pub fn header_mode(&self) -> HeaderMode {
        match self.header_rows {
            Some(rows) => HeaderMode::Offset(rows),
            None => HeaderMode::Auto,
        }
    }
}

//! Expense Summary CLI
//!
//! Command-line interface for summarizing an xlsx expense export by
//! spending category.
//!
//! # Usage
//!
//! ```bash
//! expense-summary export.xlsx
//! expense-summary export.xlsx -o summary.xlsx
//! expense-summary --rules my-rules.toml --amount-col 4 --desc-col 11 export.xlsx
//! expense-summary --lenient export.xlsx
//! ```
//!
//! The program reads transaction rows from the first sheet of the input
//! workbook, resolves each description against the category rule table,
//! and writes a summary workbook: per-category totals on top and, below
//! them, a verbatim copy of every row that stayed uncategorized.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (empty input, unreadable workbook, invalid amount cell, etc.)

use std::process;

use expense_summary_engine::cli::{self, CliArgs};
use expense_summary_engine::io::{read_table, write_report};
use expense_summary_engine::rules::RuleSet;
use expense_summary_engine::types::SummaryError;
use expense_summary_engine::SummaryEngine;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Run the full pipeline for one invocation
fn run(args: &CliArgs) -> Result<(), SummaryError> {
    // An empty upload is rejected before the core pipeline is invoked
    let metadata = std::fs::metadata(&args.input_file)
        .map_err(|e| SummaryError::input_read(format!("{}: {}", args.input_file.display(), e)))?;
    if metadata.len() == 0 {
        return Err(SummaryError::EmptyInput);
    }

    let rules = match &args.rules_file {
        Some(path) => RuleSet::from_file(path)?,
        None => RuleSet::built_in()?,
    };

    let rows = read_table(&args.input_file, args.header_mode())?;

    let engine = SummaryEngine::new(rules, args.schema(), args.lenient);
    let summary = engine.summarize(rows)?;

    if summary.skipped_rows > 0 {
        eprintln!(
            "Skipped {} row(s) with unparseable amounts",
            summary.skipped_rows
        );
    }

    write_report(&summary.report, &args.output_file)?;

    Ok(())
}

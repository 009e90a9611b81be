//! Summarization engine
//!
//! Orchestrates one run: classify every input row, fold the outcomes into
//! per-category totals plus the uncategorized list, and build the output
//! report. One invocation is one full pass over the input; the engine holds
//! no state between runs other than the immutable rule table.

use crate::core::aggregator::aggregate;
use crate::core::classifier::RowClassifier;
use crate::core::report::{build_report, Report};
use crate::core::resolver::CategoryResolver;
use crate::rules::RuleSet;
use crate::types::{SourceRow, SummaryError, TableSchema};

/// Result of one summarization run
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The report to render into the output workbook
    pub report: Report,
    /// Rows skipped for unparseable amounts (always 0 in strict mode)
    pub skipped_rows: usize,
}

/// The categorization-and-aggregation engine
///
/// Construct once per configuration; `summarize` may then be called any
/// number of times, including concurrently, since the engine is read-only
/// after construction.
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    resolver: CategoryResolver,
    schema: TableSchema,
    lenient: bool,
}

impl SummaryEngine {
    /// Create an engine over a rule set and table schema
    ///
    /// `lenient` selects the amount-error policy: `false` (the default
    /// choice) aborts the run on the first row whose amount cell is not
    /// numeric, `true` skips such rows and reports how many were skipped.
    pub fn new(rules: RuleSet, schema: TableSchema, lenient: bool) -> Self {
        SummaryEngine {
            resolver: CategoryResolver::new(rules),
            schema,
            lenient,
        }
    }

    /// Run the full pipeline over the data rows of one input table
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidAmount` in strict mode when a row's
    /// amount cell cannot be interpreted as a number.
    pub fn summarize(&self, rows: Vec<SourceRow>) -> Result<Summary, SummaryError> {
        let classifier = RowClassifier::new(&self.resolver, self.schema);
        let aggregation = aggregate(rows, &classifier, self.lenient)?;
        let report = build_report(&aggregation.totals, &aggregation.uncategorized);

        Ok(Summary {
            report,
            skipped_rows: aggregation.skipped,
        })
    }
}

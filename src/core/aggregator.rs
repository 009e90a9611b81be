//! Aggregation of classified rows
//!
//! A single left-to-right fold over the input rows: categorized rows add
//! their amount to the running total of their category, unresolved rows are
//! appended to the passthrough list. Category order is first-seen order and
//! passthrough order is input order, so the same input always produces the
//! same output.
//!
//! Accumulation is pure decimal arithmetic; rounding happens once, at
//! render time, in the report builder.

use rust_decimal::Decimal;

use crate::core::classifier::RowClassifier;
use crate::types::{RowOutcome, SourceRow, SummaryError};

/// Ordered mapping from category name to accumulated amount
///
/// Entries appear in the order their category was first seen while scanning
/// the input top to bottom; that order is preserved into the report. Every
/// total is a sum of amount magnitudes and is therefore never negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, Decimal)>,
}

impl CategoryTotals {
    /// Create an empty totals mapping
    pub fn new() -> Self {
        CategoryTotals::default()
    }

    /// Add an amount to a category's running total
    ///
    /// A category seen for the first time is appended at the end, fixing
    /// its position in the output.
    pub fn add(&mut self, category: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category.to_string(), amount)),
        }
    }

    /// Total for a category, if any row resolved to it
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    /// Iterate (category, total) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Number of distinct categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no row resolved to any category
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of folding all input rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Per-category totals in first-seen order
    pub totals: CategoryTotals,
    /// Unresolved rows in input order, for the passthrough block
    pub uncategorized: Vec<SourceRow>,
    /// Rows skipped for unparseable amounts (lenient mode only)
    pub skipped: usize,
}

/// Fold classified rows into totals and a passthrough list
///
/// In strict mode (`lenient == false`) the first row with an unparseable
/// amount aborts the whole run. In lenient mode such rows are skipped and
/// counted instead.
///
/// # Errors
///
/// Returns `SummaryError::InvalidAmount` from the first bad row in strict
/// mode.
pub fn aggregate(
    rows: impl IntoIterator<Item = SourceRow>,
    classifier: &RowClassifier<'_>,
    lenient: bool,
) -> Result<Aggregation, SummaryError> {
    let mut aggregation = Aggregation::default();

    for row in rows {
        match classifier.classify(row) {
            Ok(RowOutcome::Categorized { category, amount }) => {
                aggregation.totals.add(&category, amount);
            }
            Ok(RowOutcome::Unresolved(row)) => {
                aggregation.uncategorized.push(row);
            }
            Err(SummaryError::InvalidAmount { .. }) if lenient => {
                // Explicitly requested leniency: count and move on
                aggregation.skipped += 1;
            }
            Err(error) => return Err(error),
        }
    }

    Ok(aggregation)
}

//! Row classification
//!
//! Reads the amount and description cells of one input row and turns the
//! row into either a (category, amount) contribution or an unresolved row
//! carried whole into the passthrough block.
//!
//! The amount is structurally required: a row whose amount cell cannot be
//! interpreted as a number is an error, unlike a missing description, which
//! is merely unresolved.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::core::resolver::CategoryResolver;
use crate::types::{CellValue, RowOutcome, SourceRow, SummaryError, TableSchema};

/// Classifies input rows against a resolver and a positional schema
#[derive(Debug)]
pub struct RowClassifier<'a> {
    resolver: &'a CategoryResolver,
    schema: TableSchema,
}

impl<'a> RowClassifier<'a> {
    /// Create a classifier over a resolver and table schema
    pub fn new(resolver: &'a CategoryResolver, schema: TableSchema) -> Self {
        RowClassifier { resolver, schema }
    }

    /// Classify a single row
    ///
    /// # Returns
    ///
    /// * `Ok(RowOutcome::Categorized)` when the description resolves; the
    ///   amount is the cell value's magnitude
    /// * `Ok(RowOutcome::Unresolved)` when the description is missing,
    ///   empty, or matches no rule; the row is handed back for passthrough
    /// * `Err(SummaryError::InvalidAmount)` when the amount cell is absent
    ///   or not interpretable as a number
    pub fn classify(&self, row: SourceRow) -> Result<RowOutcome, SummaryError> {
        let amount = self.parse_amount(&row)?;

        let resolved = row
            .cell(self.schema.desc_col)
            .and_then(|cell| cell.value.as_text())
            .and_then(|text| self.resolver.resolve(text));

        match resolved {
            Some(category) => Ok(RowOutcome::Categorized {
                category: category.to_string(),
                amount,
            }),
            None => Ok(RowOutcome::Unresolved(row)),
        }
    }

    /// Parse the amount cell into a non-negative magnitude
    ///
    /// Numeric cells are taken directly; text cells are accepted when their
    /// trimmed content parses as a decimal. Anything else is a per-file
    /// error carrying the offending position.
    fn parse_amount(&self, row: &SourceRow) -> Result<Decimal, SummaryError> {
        let column = self.schema.amount_col;

        let parsed = match row.cell(column).map(|cell| &cell.value) {
            Some(CellValue::Number(n)) => Decimal::from_f64(*n),
            Some(CellValue::Text(s)) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };

        parsed
            .map(|amount| amount.abs())
            .ok_or_else(|| SummaryError::invalid_amount(row.index, column))
    }
}

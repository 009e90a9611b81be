//! End-to-end integration tests
//!
//! These tests validate the complete pipeline using generated xlsx
//! fixtures. Each test:
//! 1. Writes an input workbook into a temp directory (real export layout:
//!    amount in column 4, description in column 11)
//! 2. Reads it back through the workbook reader
//! 3. Runs the summary engine
//! 4. Writes the summary workbook and inspects it with calamine
//!
//! Generating the fixtures instead of committing binary files keeps them
//! reviewable and exercises the writer on the input side as well.

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use calamine::{open_workbook_auto, Data, Reader};
    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::TempDir;

    use expense_summary_engine::core::report::UNCATEGORIZED_HEADER;
    use expense_summary_engine::io::{
        read_table, write_report, write_report_to_buffer, HeaderMode, SHEET_NAME,
    };
    use expense_summary_engine::rules::RuleSet;
    use expense_summary_engine::types::{SummaryError, TableSchema};
    use expense_summary_engine::SummaryEngine;

    const AMOUNT_COL: u16 = 4;
    const DESC_COL: u16 = 11;

    /// One fixture transaction: date text, amount cell, description cell
    struct FixtureRow<'a> {
        date: &'a str,
        amount: Option<f64>,
        /// Written as text when `amount` is None (the malformed case)
        amount_text: Option<&'a str>,
        description: &'a str,
        bold_description: bool,
    }

    impl<'a> FixtureRow<'a> {
        fn new(date: &'a str, amount: f64, description: &'a str) -> Self {
            FixtureRow {
                date,
                amount: Some(amount),
                amount_text: None,
                description,
                bold_description: false,
            }
        }

        fn bold(mut self) -> Self {
            self.bold_description = true;
            self
        }

        fn with_text_amount(date: &'a str, amount_text: &'a str, description: &'a str) -> Self {
            FixtureRow {
                date,
                amount: None,
                amount_text: Some(amount_text),
                description,
                bold_description: false,
            }
        }
    }

    /// Write an input export: keyword header row, then one row per fixture
    fn write_input(path: &Path, rows: &[FixtureRow<'_>]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Дата").unwrap();
        worksheet.write_string(0, AMOUNT_COL, "Сумма").unwrap();
        worksheet.write_string(0, DESC_COL, "Описание").unwrap();

        let bold = Format::new().set_bold();
        for (i, fixture) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, 0, fixture.date).unwrap();
            match (fixture.amount, fixture.amount_text) {
                (Some(amount), _) => {
                    worksheet.write_number(row, AMOUNT_COL, amount).unwrap();
                }
                (None, Some(text)) => {
                    worksheet.write_string(row, AMOUNT_COL, text).unwrap();
                }
                (None, None) => {}
            }
            if fixture.bold_description {
                worksheet
                    .write_string_with_format(row, DESC_COL, fixture.description, &bold)
                    .unwrap();
            } else {
                worksheet
                    .write_string(row, DESC_COL, fixture.description)
                    .unwrap();
            }
        }

        workbook.save(path).unwrap();
    }

    /// Run the full pipeline: read, summarize, write
    fn run_pipeline(
        dir: &TempDir,
        rows: &[FixtureRow<'_>],
        lenient: bool,
    ) -> Result<PathBuf, SummaryError> {
        let input_path = dir.path().join("input.xlsx");
        let output_path = dir.path().join("summary.xlsx");
        write_input(&input_path, rows);

        let table = read_table(&input_path, HeaderMode::Auto)?;
        let engine = SummaryEngine::new(RuleSet::built_in()?, TableSchema::default(), lenient);
        let summary = engine.summarize(table)?;
        write_report(&summary.report, &output_path)?;

        Ok(output_path)
    }

    fn read_output(path: &Path) -> calamine::Range<Data> {
        let mut workbook = open_workbook_auto(path).unwrap();
        workbook.worksheet_range(SHEET_NAME).unwrap()
    }

    fn string_at(range: &calamine::Range<Data>, row: u32, col: u32) -> Option<String> {
        match range.get_value((row, col)) {
            Some(Data::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn number_at(range: &calamine::Range<Data>, row: u32, col: u32) -> Option<f64> {
        match range.get_value((row, col)) {
            Some(Data::Float(n)) => Some(*n),
            Some(Data::Int(n)) => Some(*n as f64),
            _ => None,
        }
    }

    #[test]
    fn test_happy_path_with_passthrough_block() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(
            &dir,
            &[
                FixtureRow::new("01.07.2025", 150.0, "Пятёрочка #123"),
                FixtureRow::new("02.07.2025", 30.0, "unknown shop").bold(),
                FixtureRow::new("03.07.2025", 20.0, "Лукойл АЗС"),
            ],
            false,
        )
        .unwrap();

        let range = read_output(&output);

        // Summary block: header + categories in first-seen order
        assert_eq!(string_at(&range, 0, 0).as_deref(), Some("Category"));
        assert_eq!(string_at(&range, 0, 1).as_deref(), Some("Total"));
        assert_eq!(string_at(&range, 1, 0).as_deref(), Some("продукты"));
        assert_eq!(number_at(&range, 1, 1), Some(150.0));
        assert_eq!(string_at(&range, 2, 0).as_deref(), Some("бензин"));
        assert_eq!(number_at(&range, 2, 1), Some(20.0));

        // Separator row is blank
        assert!(string_at(&range, 3, 0).is_none());

        // Passthrough block: section header, then the original row verbatim
        assert_eq!(
            string_at(&range, 4, 0).as_deref(),
            Some(UNCATEGORIZED_HEADER)
        );
        assert_eq!(string_at(&range, 5, 0).as_deref(), Some("02.07.2025"));
        assert_eq!(number_at(&range, 5, AMOUNT_COL as u32), Some(30.0));
        assert_eq!(
            string_at(&range, 5, DESC_COL as u32).as_deref(),
            Some("unknown shop")
        );
    }

    #[test]
    fn test_passthrough_preserves_cell_style() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(
            &dir,
            &[
                FixtureRow::new("01.07.2025", 150.0, "Пятёрочка #123"),
                FixtureRow::new("02.07.2025", 30.0, "unknown shop").bold(),
            ],
            false,
        )
        .unwrap();

        // The bold description cell must come through with its style
        let (table, formatting) =
            expense_summary_engine::io::xlsx_styles::load_formatting(&output, SHEET_NAME);
        let style_id = formatting
            .cell_styles
            .get(&(4, DESC_COL as usize))
            .copied()
            .expect("passthrough description cell carries a style");
        assert!(table.get(style_id).unwrap().bold);
    }

    #[test]
    fn test_all_categorized_omits_passthrough_block() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(
            &dir,
            &[
                FixtureRow::new("01.07.2025", 10.0, "пятёрочка"),
                FixtureRow::new("02.07.2025", 5.0, "вкусвилл"),
                FixtureRow::new("03.07.2025", 20.0, "лукойл"),
            ],
            false,
        )
        .unwrap();

        let range = read_output(&output);
        let (height, _) = range.get_size();

        // Header + продукты + бензин, nothing below
        assert_eq!(height, 3);
        for row in 0..height as u32 {
            assert_ne!(
                string_at(&range, row, 0).as_deref(),
                Some(UNCATEGORIZED_HEADER)
            );
        }
    }

    #[test]
    fn test_totals_round_half_up() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(
            &dir,
            &[
                FixtureRow::new("01.07.2025", 10.005, "пятёрочка"),
                FixtureRow::new("02.07.2025", 10.005, "пятёрочка"),
            ],
            false,
        )
        .unwrap();

        let range = read_output(&output);
        assert_eq!(number_at(&range, 1, 1), Some(20.01));
    }

    #[test]
    fn test_strict_mode_aborts_on_malformed_amount() {
        let dir = TempDir::new().unwrap();
        let result = run_pipeline(
            &dir,
            &[
                FixtureRow::new("01.07.2025", 10.0, "пятёрочка"),
                FixtureRow::with_text_amount("02.07.2025", "n/a", "лукойл"),
            ],
            false,
        );

        assert_eq!(
            result,
            Err(SummaryError::InvalidAmount {
                row: 2,
                column: AMOUNT_COL as usize,
            })
        );
        assert!(!dir.path().join("summary.xlsx").exists());
    }

    #[test]
    fn test_lenient_mode_skips_malformed_amount() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(
            &dir,
            &[
                FixtureRow::new("01.07.2025", 10.0, "пятёрочка"),
                FixtureRow::with_text_amount("02.07.2025", "n/a", "лукойл"),
                FixtureRow::new("03.07.2025", 20.0, "лукойл"),
            ],
            true,
        )
        .unwrap();

        let range = read_output(&output);
        assert_eq!(string_at(&range, 1, 0).as_deref(), Some("продукты"));
        assert_eq!(number_at(&range, 1, 1), Some(10.0));
        assert_eq!(string_at(&range, 2, 0).as_deref(), Some("бензин"));
        assert_eq!(number_at(&range, 2, 1), Some(20.0));
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let input_path = dir.path().join("input.xlsx");
        write_input(
            &input_path,
            &[
                FixtureRow::new("01.07.2025", 150.0, "Пятёрочка #123"),
                FixtureRow::new("02.07.2025", 30.0, "unknown shop"),
            ],
        );

        let buffers: Vec<Vec<u8>> = (0..2)
            .map(|_| {
                let table = read_table(&input_path, HeaderMode::Auto).unwrap();
                let engine = SummaryEngine::new(
                    RuleSet::built_in().unwrap(),
                    TableSchema::default(),
                    false,
                );
                let summary = engine.summarize(table).unwrap();
                write_report_to_buffer(&summary.report).unwrap()
            })
            .collect();

        assert_eq!(buffers[0], buffers[1]);
    }

    #[test]
    fn test_custom_rules_file_overrides_built_in() {
        let dir = TempDir::new().unwrap();
        let input_path = dir.path().join("input.xlsx");
        write_input(
            &input_path,
            &[FixtureRow::new("01.07.2025", 12.0, "Corner Cafe latte")],
        );

        let rules_path = dir.path().join("rules.toml");
        std::fs::write(
            &rules_path,
            r#"
            [[rule]]
            keyword = "corner cafe"
            category = "eating out"
            "#,
        )
        .unwrap();

        let table = read_table(&input_path, HeaderMode::Auto).unwrap();
        let engine = SummaryEngine::new(
            RuleSet::from_file(&rules_path).unwrap(),
            TableSchema::default(),
            false,
        );
        let summary = engine.summarize(table).unwrap();

        let output_path = dir.path().join("summary.xlsx");
        write_report(&summary.report, &output_path).unwrap();

        let range = read_output(&output_path);
        assert_eq!(string_at(&range, 1, 0).as_deref(), Some("eating out"));
        assert_eq!(number_at(&range, 1, 1), Some(12.0));
    }
}

use crate::csv_sink::{column_names, format_cell};
use analytics::IndicatorRow;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use core_types::{Field, RawBar};
use loader::MissingValueSummary;

fn base_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Console view of loaded rows before validation; missing cells are blank.
pub fn raw_preview(rows: &[RawBar]) -> Table {
    let mut table = base_table(Field::ALL.iter().map(|f| f.label().to_string()).collect());
    for row in rows {
        table.add_row(vec![
            opt(row.date),
            opt(row.open),
            opt(row.high),
            opt(row.low),
            opt(row.close),
            opt(row.volume),
        ]);
    }
    table
}

/// Console view of augmented rows; undefined cells are blank.
pub fn indicator_preview(rows: &[IndicatorRow], short_window: usize, long_window: usize) -> Table {
    let mut table = base_table(column_names(short_window, long_window));
    for row in rows {
        let bar = &row.bar;
        table.add_row(vec![
            bar.date.to_string(),
            format!("{:.2}", bar.open),
            format!("{:.2}", bar.high),
            format!("{:.2}", bar.low),
            format!("{:.2}", bar.close),
            bar.volume.to_string(),
            format_cell(row.sma_short),
            format_cell(row.sma_long),
            format_cell(row.daily_return),
            format_cell(row.cumulative_return),
        ]);
    }
    table
}

/// One row per column with its count of missing values.
pub fn missing_values_table(summary: &MissingValueSummary) -> Table {
    let mut table = base_table(vec!["Column".to_string(), "Missing".to_string()]);
    for (field, count) in summary.iter() {
        table.add_row(vec![field.label().to_string(), count.to_string()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::augmented;

    #[test]
    fn indicator_preview_has_one_line_per_row() {
        let table = augmented(&[100.0, 102.0, 101.0], 2, 2);
        let rendered = indicator_preview(table.tail(2), 2, 2);
        assert_eq!(rendered.row_iter().count(), 2);
        let text = rendered.to_string();
        assert!(text.contains("SMA_2"));
        assert!(text.contains("2023-01-05"));
        assert!(!text.contains("2023-01-03"));
    }

    #[test]
    fn indicator_preview_header_matches_the_export() {
        let table = augmented(&[100.0, 102.0, 101.0, 103.0], 2, 3);
        let rendered = indicator_preview(table.rows(), 2, 3);
        let header: Vec<String> = rendered
            .header()
            .unwrap()
            .cell_iter()
            .map(|cell| cell.content())
            .collect();
        assert_eq!(header, crate::CsvReportSink::header(&table));
    }

    #[test]
    fn raw_preview_leaves_missing_cells_blank() {
        let row = RawBar {
            date: chrono::NaiveDate::from_ymd_opt(2023, 1, 3),
            close: Some(1.5),
            ..RawBar::default()
        };
        let rendered = raw_preview(&[row]);
        assert_eq!(rendered.row_iter().count(), 1);
        assert!(rendered.to_string().contains("1.5"));
    }

    #[test]
    fn missing_values_table_lists_every_column() {
        let summary = MissingValueSummary::from_rows(&[RawBar::default()]);
        let rendered = missing_values_table(&summary);
        assert_eq!(rendered.row_iter().count(), 6);
    }
}

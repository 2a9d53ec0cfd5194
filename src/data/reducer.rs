use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::filter::FilterRegistry;
use super::model::{CellValue, DateColumnCount, Grid};
use super::words::WordList;
use crate::config::SheetLayout;

/// Placeholder for a missing company or station cell.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// Grid → per-date counts
// ---------------------------------------------------------------------------

/// Count, per non-empty date header, the data cells passing both the active
/// filters and the word list.
///
/// Grids without a header row produce no counts. Columns run from
/// `first_date_col` to the end of the header row, in ascending order.
pub fn reduce(
    grid: &Grid,
    layout: &SheetLayout,
    registry: &FilterRegistry,
    words: &WordList,
) -> Vec<DateColumnCount> {
    if grid.len() < layout.min_rows() {
        return Vec::new();
    }

    let header = grid.row(layout.header_row);
    header
        .iter()
        .enumerate()
        .skip(layout.first_date_col)
        .filter(|(_, raw)| !raw.is_empty_label())
        .map(|(column, raw)| {
            let count = (layout.first_data_row()..grid.len())
                .map(|row| grid.cell(row, column))
                .filter(|cell| registry.apply(cell) && words.lookup(&cell.normalized()))
                .count();
            DateColumnCount {
                label: format_date(raw),
                raw: raw.clone(),
                column,
                count,
            }
        })
        .collect()
}

/// Company and station names from the metadata row.
pub fn metadata(grid: &Grid, layout: &SheetLayout) -> (String, String) {
    let read = |col: usize| {
        let value = grid.cell(layout.metadata_row, col).to_string();
        let value = value.trim();
        if value.is_empty() {
            UNKNOWN.to_string()
        } else {
            value.to_string()
        }
    };
    (read(layout.company_col), read(layout.station_col))
}

// ---------------------------------------------------------------------------
// Header labels
// ---------------------------------------------------------------------------

const LABEL_FORMAT: &str = "%b %-d, %Y";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%a %b %d %Y",
    "%A, %B %d, %Y",
];

/// Render a header cell as "Mon D, YYYY".
///
/// Date cells are formatted directly, text is parsed against common layouts,
/// and anything else (including numeric date serials) is shown verbatim.
/// Text without a year, such as "Jan 1", does not parse and is shown as-is.
pub fn format_date(value: &CellValue) -> String {
    match value {
        CellValue::Date(dt) => dt.format(LABEL_FORMAT).to_string(),
        CellValue::Text(s) => match parse_date(s) {
            Some(dt) => dt.format(LABEL_FORMAT).to_string(),
            None => s.clone(),
        },
        other => other.to_string(),
    }
}

/// Best-effort date parse of free text.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{EXCLUDE_BLANK, EXCLUDE_NUMERIC, EXCLUDE_PREFIX};

    fn t(s: &str) -> CellValue {
        CellValue::from(s)
    }

    /// Header `["", "", "Jan 1", "Jan 2"]` with the given data rows below.
    fn scenario(data: Vec<Vec<CellValue>>) -> Grid {
        let mut rows = vec![
            vec![t("Schedule")],
            vec![t(""), t("Acme Logistics"), t("DXX1")],
            vec![],
            vec![t(""), t(""), t("Jan 1"), t("Jan 2")],
        ];
        rows.extend(data);
        Grid::new(rows)
    }

    fn column(values: &[&str], col: usize) -> Vec<Vec<CellValue>> {
        values
            .iter()
            .map(|v| {
                let mut row = vec![CellValue::Empty; col + 1];
                row[col] = t(v);
                row
            })
            .collect()
    }

    #[test]
    fn short_grid_has_no_counts() {
        let grid = Grid::new(vec![vec![t("a"), t("b"), t("c"), t("d")]; 3]);
        let counts = reduce(
            &grid,
            &SheetLayout::default(),
            &FilterRegistry::default(),
            &WordList::new(),
        );
        assert!(counts.is_empty());
    }

    #[test]
    fn builtins_reject_numeric_prefix_and_blank() {
        let grid = scenario(column(&["DSP Initiated Work - X", "42", "", "hello"], 2));
        let counts = reduce(
            &grid,
            &SheetLayout::default(),
            &FilterRegistry::default(),
            &WordList::new(),
        );

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].label, "Jan 1");
        assert_eq!(counts[0].column, 2);
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[1].column, 3);
        assert_eq!(counts[1].count, 0);
    }

    #[test]
    fn prefix_match_ignores_case() {
        let grid = scenario(column(&["dsp initiated WORK", "  DSP INITIATED WORK y", "ok"], 2));
        let counts = reduce(
            &grid,
            &SheetLayout::default(),
            &FilterRegistry::default(),
            &WordList::new(),
        );
        assert_eq!(counts[0].count, 1);
    }

    #[test]
    fn excluded_word_is_not_counted() {
        let grid = scenario(column(&["hello", "Hello ", "world"], 2));
        let mut words = WordList::new();
        words.merge(["hello", "world"]);
        words.set("hello", false);

        let counts = reduce(&grid, &SheetLayout::default(), &FilterRegistry::default(), &words);
        assert_eq!(counts[0].count, 1);
    }

    #[test]
    fn disabling_filters_widens_counts() {
        let grid = scenario(column(&["DSP Initiated Work - X", "42", "", "hello"], 2));
        let mut registry = FilterRegistry::default();
        for id in [EXCLUDE_BLANK, EXCLUDE_NUMERIC, EXCLUDE_PREFIX] {
            registry.set_active(id, false);
        }
        let counts = reduce(&grid, &SheetLayout::default(), &registry, &WordList::new());
        assert_eq!(counts[0].count, 4);
        // Column 3 is absent in every data row; absent cells count once blanks are allowed.
        assert_eq!(counts[1].count, 4);
    }

    #[test]
    fn empty_headers_are_skipped() {
        let grid = Grid::new(vec![
            vec![],
            vec![],
            vec![],
            vec![t("x"), t("x"), t(""), CellValue::Number(0.0), t("2024-02-01"), CellValue::Empty, t(" ")],
            vec![t(""), t(""), t("a"), t("b"), t("c"), t("d"), t("e")],
        ]);
        let counts = reduce(
            &grid,
            &SheetLayout::default(),
            &FilterRegistry::default(),
            &WordList::new(),
        );
        let columns: Vec<usize> = counts.iter().map(|c| c.column).collect();
        assert_eq!(columns, [4, 6]);
        assert_eq!(counts[0].label, "Feb 1, 2024");
        assert_eq!(counts[1].label, " ");
    }

    #[test]
    fn header_without_data_rows_counts_zero() {
        let grid = scenario(Vec::new());
        let counts = reduce(
            &grid,
            &SheetLayout::default(),
            &FilterRegistry::default(),
            &WordList::new(),
        );
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|c| c.count == 0));
    }

    #[test]
    fn reduce_is_deterministic() {
        let grid = scenario(column(&["a", "b", "42", "c"], 3));
        let layout = SheetLayout::default();
        let registry = FilterRegistry::default();
        let words = WordList::new();
        assert_eq!(
            reduce(&grid, &layout, &registry, &words),
            reduce(&grid, &layout, &registry, &words)
        );
    }

    #[test]
    fn format_date_variants() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(format_date(&CellValue::Date(dt)), "Jan 5, 2024");
        assert_eq!(format_date(&t("2024-01-05")), "Jan 5, 2024");
        assert_eq!(format_date(&t("1/5/2024")), "Jan 5, 2024");
        assert_eq!(format_date(&t("January 5, 2024")), "Jan 5, 2024");
        assert_eq!(format_date(&t("2024-12-25T08:00:00Z")), "Dec 25, 2024");
        assert_eq!(format_date(&t("Week 3")), "Week 3");
        // Numeric serials are not treated as dates.
        assert_eq!(format_date(&CellValue::Number(45292.0)), "45292");
        assert_eq!(format_date(&CellValue::Empty), "");
    }

    #[test]
    fn metadata_reads_fixed_cells() {
        let grid = scenario(Vec::new());
        assert_eq!(
            metadata(&grid, &SheetLayout::default()),
            ("Acme Logistics".to_string(), "DXX1".to_string())
        );
        let bare = Grid::new(vec![vec![]]);
        assert_eq!(
            metadata(&bare, &SheetLayout::default()),
            (UNKNOWN.to_string(), UNKNOWN.to_string())
        );
    }
}

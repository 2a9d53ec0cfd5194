use std::fmt;

use chrono::{NaiveDateTime, Timelike};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the first worksheet
// ---------------------------------------------------------------------------

/// An untyped spreadsheet scalar, closed over the shapes the parser hands us.
///
/// Booleans and cell errors are folded into `Text` at the loader boundary, so
/// downstream predicates only ever match on these four tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent cell (never written, or past the end of a short row).
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// A cell carrying a date number format.
    Date(NaiveDateTime),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            // f64's Display is the shortest round-trip form: 42.0 → "42", 1.5 → "1.5".
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Date(dt) => {
                if dt.num_seconds_from_midnight() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl CellValue {
    /// Word-list key: string form, lower-cased and trimmed.
    pub fn normalized(&self) -> String {
        self.to_string().to_lowercase().trim().to_string()
    }

    /// Whether this cell is "empty" as a header label.
    ///
    /// Mirrors a loose truthiness check: absent cells, empty strings, zero and
    /// NaN all count as empty. Whitespace-only text does not.
    pub fn is_empty_label(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Date(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid – rows of cells from one file
// ---------------------------------------------------------------------------

static EMPTY_CELL: CellValue = CellValue::Empty;

/// The first worksheet of a file as ragged rows at absolute positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Grid { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one row; out-of-range rows are empty.
    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell at (row, col); anything past the end of the data reads as `Empty`.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.row(row).get(col).unwrap_or(&EMPTY_CELL)
    }
}

// ---------------------------------------------------------------------------
// Counts and loaded files
// ---------------------------------------------------------------------------

/// Count of surviving data cells under one date header.
#[derive(Debug, Clone, PartialEq)]
pub struct DateColumnCount {
    /// Header rendered as "Mon D, YYYY" when it reads as a date, verbatim otherwise.
    pub label: String,
    pub raw: CellValue,
    pub column: usize,
    pub count: usize,
}

/// One successfully parsed spreadsheet retained for recomputation.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub id: u64,
    pub name: String,
    pub company: String,
    pub station: String,
    pub grid: Grid,
    pub counts: Vec<DateColumnCount>,
}

impl LoadedFile {
    /// Sum of all per-date counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}

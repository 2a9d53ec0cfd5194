use super::model::CellValue;

// ---------------------------------------------------------------------------
// Value filters: one predicate over one cell
// ---------------------------------------------------------------------------

pub const EXCLUDE_BLANK: &str = "exclude_blank";
pub const EXCLUDE_NUMERIC: &str = "exclude_numeric";
pub const EXCLUDE_PREFIX: &str = "exclude_dsp_initiated_work";

/// The predicate behind a [`ValueFilter`]. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// Rejects absent cells and text that is empty after trimming.
    Blank,
    /// Rejects cells whose trimmed string form parses as a finite number.
    /// Decimal and exponent forms count, as do `0x`, `0o` and `0b` integers.
    /// A leading byte-order mark is trimmed like whitespace.
    Numeric,
    /// Rejects cells whose lower-cased, trimmed form starts with the prefix.
    /// The prefix is stored already lower-cased and trimmed.
    Prefix(String),
}

impl FilterKind {
    /// `true` means this filter does not reject the value.
    pub fn evaluate(&self, value: &CellValue) -> bool {
        match self {
            FilterKind::Blank => match value {
                CellValue::Empty => false,
                CellValue::Text(s) => !s.trim().is_empty(),
                CellValue::Number(_) | CellValue::Date(_) => true,
            },
            FilterKind::Numeric => {
                let text = value.to_string();
                let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
                // Blanks are the blank filter's business.
                if text.is_empty() {
                    return true;
                }
                !parse_number(text).is_some_and(f64::is_finite)
            }
            FilterKind::Prefix(prefix) => !value.normalized().starts_with(prefix.as_str()),
        }
    }
}

/// Parse a decimal number or an unsigned `0x`/`0o`/`0b` integer literal.
fn parse_number(text: &str) -> Option<f64> {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return text.parse::<f64>().ok(),
    };
    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    )
}

/// A named, toggleable predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFilter {
    pub id: String,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub kind: FilterKind,
}

impl ValueFilter {
    pub fn new(id: &str, name: &str, description: &str, kind: FilterKind) -> Self {
        ValueFilter {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            active: true,
            kind,
        }
    }

    pub fn evaluate(&self, value: &CellValue) -> bool {
        self.kind.evaluate(value)
    }
}

// ---------------------------------------------------------------------------
// FilterRegistry – built-ins in display order
// ---------------------------------------------------------------------------

/// Ordered set of filters with unique ids; `apply` is the conjunction of the active ones.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRegistry {
    filters: Vec<ValueFilter>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins(crate::config::DEFAULT_EXCLUDED_PREFIX)
    }
}

impl FilterRegistry {
    /// The three built-in filters, all active.
    pub fn with_builtins(excluded_prefix: &str) -> Self {
        let prefix = excluded_prefix.trim().to_lowercase();
        let filters = vec![
            ValueFilter::new(
                EXCLUDE_BLANK,
                "Exclude blank cells",
                "Skip empty cells and cells containing only whitespace.",
                FilterKind::Blank,
            ),
            ValueFilter::new(
                EXCLUDE_NUMERIC,
                "Exclude numeric values",
                "Skip cells whose content is a number, such as route counts or IDs.",
                FilterKind::Numeric,
            ),
            ValueFilter::new(
                EXCLUDE_PREFIX,
                "Exclude \"DSP Initiated Work\"",
                &format!("Skip cells starting with \"{prefix}\" (case-insensitive)."),
                FilterKind::Prefix(prefix.clone()),
            ),
        ];
        FilterRegistry { filters }
    }

    /// Whether `value` passes every active filter. No active filters → passes.
    pub fn apply(&self, value: &CellValue) -> bool {
        self.filters
            .iter()
            .filter(|f| f.active)
            .all(|f| f.evaluate(value))
    }

    /// Toggle one filter. Returns `false` if the id is unknown.
    pub fn set_active(&mut self, id: &str, active: bool) -> bool {
        match self.filters.iter_mut().find(|f| f.id == id) {
            Some(f) => {
                f.active = active;
                true
            }
            None => {
                log::warn!("Unknown filter id '{id}'");
                false
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueFilter> {
        self.filters.iter()
    }
}

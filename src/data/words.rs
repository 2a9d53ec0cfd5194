use std::collections::{BTreeMap, BTreeSet};

use super::filter::FilterRegistry;
use super::model::{CellValue, Grid};
use crate::config::SheetLayout;

// ---------------------------------------------------------------------------
// Word discovery
// ---------------------------------------------------------------------------

/// Distinct normalized values in the data regions of `grids` that pass `registry`.
///
/// Only the built-in filters are consulted here; the word list itself is not,
/// so excluded words stay discoverable. Empty keys are dropped. The set is
/// sorted, which keeps presentation stable.
pub fn discover<'a>(
    grids: impl IntoIterator<Item = &'a Grid>,
    layout: &SheetLayout,
    registry: &FilterRegistry,
) -> BTreeSet<String> {
    collect(grids, layout, |cell| registry.apply(cell))
}

/// Every distinct normalized value in the data regions of `grids`, whatever
/// the filter state. A word hidden by an active filter is still in use.
pub fn vocabulary<'a>(
    grids: impl IntoIterator<Item = &'a Grid>,
    layout: &SheetLayout,
) -> BTreeSet<String> {
    collect(grids, layout, |_| true)
}

fn collect<'a>(
    grids: impl IntoIterator<Item = &'a Grid>,
    layout: &SheetLayout,
    keep: impl Fn(&CellValue) -> bool,
) -> BTreeSet<String> {
    let mut words = BTreeSet::new();
    for grid in grids {
        let width = grid.row(layout.header_row).len();
        for row in layout.first_data_row()..grid.len() {
            for col in layout.first_date_col..width {
                let cell = grid.cell(row, col);
                if !keep(cell) {
                    continue;
                }
                let key = cell.normalized();
                if !key.is_empty() {
                    words.insert(key);
                }
            }
        }
    }
    words
}

// ---------------------------------------------------------------------------
// WordList – normalized value → keep?
// ---------------------------------------------------------------------------

/// Per-word keep/exclude choices. A word with no entry is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordList {
    entries: BTreeMap<String, bool>,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert newly discovered words as kept. Existing choices are never overwritten.
    ///
    /// Returns how many words were new.
    pub fn merge<I, S>(&mut self, discovered: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.entries.len();
        for word in discovered {
            self.entries.entry(word.into()).or_insert(true);
        }
        self.entries.len() - before
    }

    /// Whether `word` (already normalized) is kept. Unknown words are kept.
    pub fn lookup(&self, word: &str) -> bool {
        self.entries.get(word).copied().unwrap_or(true)
    }

    pub fn set(&mut self, word: &str, keep: bool) {
        self.entries.insert(word.to_string(), keep);
    }

    /// Set every known word to `keep`. Never adds words.
    pub fn set_all(&mut self, keep: bool) {
        for status in self.entries.values_mut() {
            *status = keep;
        }
    }

    /// Forget words that are not in `in_use`. Returns how many were dropped.
    pub fn prune(&mut self, in_use: &BTreeSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|word, _| in_use.contains(word));
        before - self.entries.len()
    }

    /// `(word, keep)` pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(w, k)| (w.as_str(), *k))
    }

    pub fn excluded_count(&self) -> usize {
        self.entries.values().filter(|keep| !**keep).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{AppConfig, SheetLayout};
use crate::data::export;
use crate::data::filter::FilterRegistry;
use crate::data::loader;
use crate::data::model::{Grid, LoadedFile};
use crate::data::reducer::{metadata, reduce};
use crate::data::words::{discover, vocabulary, WordList};

// ---------------------------------------------------------------------------
// Batch outcome
// ---------------------------------------------------------------------------

/// What happened to each input of one `add_*` call.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Display names of files added to the corpus.
    pub loaded: Vec<String>,
    /// Files that failed to parse, with the error message.
    pub failed: Vec<(String, String)>,
    /// Words seen for the first time in this batch.
    pub new_words: usize,
}

impl BatchReport {
    /// One-line summary for the status bar, if anything failed.
    pub fn failure_summary(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.failed.iter().map(|(n, _)| n.as_str()).collect();
        Some(format!("Could not read: {}", names.join(", ")))
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Loaded files plus the filter and word configuration applied to them.
///
/// Every mutation of the configuration recomputes all counts.
pub struct Session {
    pub layout: SheetLayout,
    pub registry: FilterRegistry,
    pub words: WordList,
    pub files: Vec<LoadedFile>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    next_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            registry: FilterRegistry::with_builtins(&config.excluded_prefix),
            words: WordList::new(),
            files: Vec::new(),
            status_message: None,
            next_id: 1,
        }
    }

    /// Read and add spreadsheet files from disk, in order.
    pub fn add_files(&mut self, paths: &[PathBuf]) -> BatchReport {
        let items = paths.iter().map(|path| {
            let name = display_name(path);
            let grid = loader::load_file(path).map_err(anyhow::Error::from);
            (name, grid)
        });
        self.add_loaded(items)
    }

    /// Add already-parsed inputs. Failed parses are logged and skipped.
    ///
    /// Words are discovered and merged file by file, so a batch merges in
    /// submission order. Counts are recomputed once at the end.
    pub fn add_loaded<I>(&mut self, items: I) -> BatchReport
    where
        I: IntoIterator<Item = (String, Result<Grid>)>,
    {
        let mut report = BatchReport::default();
        for (name, grid) in items {
            match grid {
                Ok(grid) => {
                    report.new_words += self.ingest(name.clone(), grid);
                    report.loaded.push(name);
                }
                Err(e) => {
                    log::error!("Failed to load {name}: {e:#}");
                    report.failed.push((name, format!("{e:#}")));
                }
            }
        }
        self.recompute_all();
        self.status_message = report.failure_summary();
        report
    }

    fn ingest(&mut self, name: String, grid: Grid) -> usize {
        let discovered = discover([&grid], &self.layout, &self.registry);
        let new_words = self.words.merge(discovered);
        let (company, station) = metadata(&grid, &self.layout);
        log::info!(
            "Loaded {name} ({} rows, company {company:?}, station {station:?}, {new_words} new words)",
            grid.len()
        );

        let id = self.next_id;
        self.next_id += 1;
        self.files.push(LoadedFile {
            id,
            name,
            company,
            station,
            grid,
            counts: Vec::new(),
        });
        new_words
    }

    /// Rerun the reducer over every retained grid with the current configuration.
    pub fn recompute_all(&mut self) {
        for file in &mut self.files {
            file.counts = reduce(&file.grid, &self.layout, &self.registry, &self.words);
        }
        log::debug!(
            "Recomputed counts for {} files ({} words, {} excluded)",
            self.files.len(),
            self.words.len(),
            self.words.excluded_count()
        );
    }

    pub fn set_filter_active(&mut self, id: &str, active: bool) {
        if self.registry.set_active(id, active) {
            self.recompute_all();
        }
    }

    pub fn set_word_status(&mut self, word: &str, keep: bool) {
        self.words.set(word, keep);
        self.recompute_all();
    }

    /// Check or uncheck every known word.
    pub fn bulk_set_words(&mut self, keep: bool) {
        self.words.set_all(keep);
        self.recompute_all();
    }

    /// Drop one file. Its words stay in the word list.
    pub fn remove_file(&mut self, id: u64) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        before != self.files.len()
    }

    /// Drop every file. The word list is kept.
    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    /// Forget words no retained file contains.
    ///
    /// Filter state is ignored, so a word hidden by an active filter keeps
    /// its choice for when the filter is switched off again.
    pub fn prune_words(&mut self) -> usize {
        let in_use = vocabulary(self.files.iter().map(|f| &f.grid), &self.layout);
        let dropped = self.words.prune(&in_use);
        if dropped > 0 {
            log::info!("Pruned {dropped} unused words");
            self.recompute_all();
        }
        dropped
    }

    /// Write the current counts as CSV.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        export::export_csv(path, &self.files)?;
        log::info!("Exported counts for {} files to {}", self.files.len(), path.display());
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::EXCLUDE_NUMERIC;
    use crate::data::model::CellValue;

    fn t(s: &str) -> CellValue {
        CellValue::from(s)
    }

    /// A schedule with two date columns; `cells` fill column 2 row by row.
    fn schedule(company: &str, cells: &[&str]) -> Grid {
        let mut rows = vec![
            vec![],
            vec![t(""), t(company), t("DXX1")],
            vec![],
            vec![t(""), t(""), t("2024-01-01"), t("2024-01-02")],
        ];
        rows.extend(cells.iter().map(|c| vec![t(""), t(""), t(c)]));
        Grid::new(rows)
    }

    fn ok(name: &str, grid: Grid) -> (String, Result<Grid>) {
        (name.to_string(), Ok(grid))
    }

    fn first_count(session: &Session, id: u64) -> usize {
        session.files.iter().find(|f| f.id == id).unwrap().counts[0].count
    }

    #[test]
    fn add_loaded_builds_files_and_counts() {
        let mut session = Session::default();
        let report = session.add_loaded([ok("a.xlsx", schedule("Acme", &["hello", "42", "world"]))]);

        assert_eq!(report.loaded, ["a.xlsx"]);
        assert_eq!(report.new_words, 2);
        let file = &session.files[0];
        assert_eq!(file.company, "Acme");
        assert_eq!(file.station, "DXX1");
        assert_eq!(file.counts.len(), 2);
        assert_eq!(file.counts[0].label, "Jan 1, 2024");
        assert_eq!(file.counts[0].count, 2);
        assert_eq!(file.total(), 2);
    }

    #[test]
    fn parse_failures_are_skipped_not_fatal() {
        let mut session = Session::default();
        let report = session.add_loaded([
            ("bad.xlsx".to_string(), Err(anyhow::anyhow!("corrupt"))),
            ok("good.xlsx", schedule("Acme", &["x"])),
        ]);
        assert_eq!(report.loaded, ["good.xlsx"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(session.files.len(), 1);
        assert_eq!(
            session.status_message.as_deref(),
            Some("Could not read: bad.xlsx")
        );
    }

    #[test]
    fn add_files_reports_unreadable_paths() {
        let mut session = Session::default();
        let report = session.add_files(&[PathBuf::from("/nowhere/week.xlsx")]);
        assert_eq!(report.failed[0].0, "week.xlsx");
        assert!(session.files.is_empty());
    }

    #[test]
    fn excluding_a_word_recomputes_counts() {
        let mut session = Session::default();
        session.add_loaded([ok("a.xlsx", schedule("Acme", &["hello", "Hello", "world"]))]);
        let id = session.files[0].id;
        assert_eq!(first_count(&session, id), 3);

        session.set_word_status("hello", false);
        assert_eq!(first_count(&session, id), 1);

        session.set_word_status("hello", true);
        assert_eq!(first_count(&session, id), 3);
    }

    #[test]
    fn toggling_a_filter_recomputes_counts() {
        let mut session = Session::default();
        session.add_loaded([ok("a.xlsx", schedule("Acme", &["12", "route"]))]);
        let id = session.files[0].id;
        assert_eq!(first_count(&session, id), 1);

        session.set_filter_active(EXCLUDE_NUMERIC, false);
        assert_eq!(first_count(&session, id), 2);
    }

    #[test]
    fn unchecked_words_survive_new_files_and_new_words_are_kept() {
        let mut session = Session::default();
        session.add_loaded([ok("a.xlsx", schedule("Acme", &["a", "b", "c", "d", "e"]))]);
        session.bulk_set_words(false);
        assert_eq!(first_count(&session, session.files[0].id), 0);

        session.add_loaded([ok("b.xlsx", schedule("Acme", &["a", "f"]))]);
        assert!(session.words.lookup("f"));
        assert!(!session.words.lookup("a"));
        assert_eq!(first_count(&session, session.files[1].id), 1);
        assert_eq!(session.words.len(), 6);
    }

    #[test]
    fn batch_merges_in_submission_order() {
        let mut session = Session::default();
        let report = session.add_loaded([
            ok("a.xlsx", schedule("Acme", &["x", "y"])),
            ok("b.xlsx", schedule("Beta", &["y", "z"])),
        ]);
        assert_eq!(report.new_words, 3);
        let ids: Vec<u64> = session.files.iter().map(|f| f.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn removing_a_file_keeps_its_words() {
        let mut session = Session::default();
        session.add_loaded([ok("a.xlsx", schedule("Acme", &["only-here"]))]);
        let id = session.files[0].id;

        assert!(session.remove_file(id));
        assert!(!session.remove_file(id));
        assert!(session.files.is_empty());
        assert_eq!(session.words.len(), 1);

        assert_eq!(session.prune_words(), 1);
        assert!(session.words.is_empty());
    }

    #[test]
    fn prune_keeps_words_hidden_by_a_filter() {
        let mut session = Session::default();
        session.set_filter_active(EXCLUDE_NUMERIC, false);
        session.add_loaded([ok("a.xlsx", schedule("Acme", &["42", "route"]))]);
        let id = session.files[0].id;
        session.set_word_status("42", false);
        assert_eq!(first_count(&session, id), 1);

        session.set_filter_active(EXCLUDE_NUMERIC, true);
        assert_eq!(session.prune_words(), 0);

        session.set_filter_active(EXCLUDE_NUMERIC, false);
        assert!(!session.words.lookup("42"));
        assert_eq!(first_count(&session, id), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut session = Session::default();
        session.add_loaded([ok("a.xlsx", schedule("Acme", &[]))]);
        session.clear_files();
        session.add_loaded([ok("b.xlsx", schedule("Acme", &[]))]);
        assert_eq!(session.files[0].id, 2);
    }

    #[test]
    fn short_grid_loads_with_no_counts() {
        let mut session = Session::default();
        session.add_loaded([ok("tiny.xlsx", Grid::new(vec![vec![t("x")]; 3]))]);
        assert_eq!(session.files.len(), 1);
        assert!(session.files[0].counts.is_empty());
        assert_eq!(session.files[0].company, "Unknown");
    }

    #[test]
    fn export_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.csv");
        let mut session = Session::default();
        session.add_loaded([ok("a.xlsx", schedule("Acme", &["x"]))]);
        session.export_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("a.xlsx,Acme,DXX1,\"Jan 1, 2024\",2,1"));
    }
}

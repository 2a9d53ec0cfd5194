use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::Session;

/// Widget state that is not part of the session.
#[derive(Debug, Default)]
pub struct PanelState {
    /// Substring filter for the word list.
    pub word_search: String,
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and word list
// ---------------------------------------------------------------------------

/// Render the left panel: built-in filters, then the word list.
pub fn side_panel(ui: &mut Ui, session: &mut Session, panel: &mut PanelState) {
    ui.heading("Filters");
    ui.separator();

    // Collect toggles first; the registry is borrowed while drawing.
    let mut toggled: Option<(String, bool)> = None;
    for filter in session.registry.iter() {
        let mut active = filter.active;
        if ui
            .checkbox(&mut active, &filter.name)
            .on_hover_text(&filter.description)
            .changed()
        {
            toggled = Some((filter.id.clone(), active));
        }
    }
    if let Some((id, active)) = toggled {
        session.set_filter_active(&id, active);
    }

    ui.add_space(8.0);
    let n_total = session.words.len();
    let n_kept = n_total - session.words.excluded_count();
    ui.heading(format!("Words  ({n_kept}/{n_total})"));
    ui.separator();

    if session.words.is_empty() {
        ui.label("Load a schedule to list its words.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            session.bulk_set_words(true);
        }
        if ui.small_button("None").clicked() {
            session.bulk_set_words(false);
        }
        if ui
            .small_button("Prune unused")
            .on_hover_text("Forget words that no loaded file contains, whatever the filters hide.")
            .clicked()
        {
            let dropped = session.prune_words();
            session.status_message = Some(format!("Pruned {dropped} unused words"));
        }
    });
    ui.add(egui::TextEdit::singleline(&mut panel.word_search).hint_text("Search words…"));

    let needle = panel.word_search.trim().to_lowercase();
    let mut changed: Option<(String, bool)> = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (word, keep) in session.words.iter() {
                if !needle.is_empty() && !word.contains(&needle) {
                    continue;
                }
                let mut checked = keep;
                let text = if keep {
                    RichText::new(word)
                } else {
                    RichText::new(word).strikethrough().color(Color32::GRAY)
                };
                if ui.checkbox(&mut checked, text).changed() {
                    changed = Some((word.to_string(), checked));
                }
            }
        });
    if let Some((word, keep)) = changed {
        session.set_word_status(&word, keep);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut Session) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(session);
                ui.close_menu();
            }
            if ui
                .add_enabled(!session.files.is_empty(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(session);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(!session.files.is_empty(), egui::Button::new("Clear files"))
                .clicked()
            {
                session.clear_files();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} files loaded", session.files.len()));

        if let Some(msg) = &session.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(session: &mut Session) {
    let files = rfd::FileDialog::new()
        .set_title("Open schedules")
        .add_filter("Excel workbooks", SUPPORTED_EXTENSIONS)
        .pick_files();

    if let Some(paths) = files {
        let report = session.add_files(&paths);
        log::info!(
            "Batch done: {} loaded, {} failed, {} new words",
            report.loaded.len(),
            report.failed.len(),
            report.new_words
        );
    }
}

pub fn export_dialog(session: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Export counts")
        .set_file_name("counts.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match session.export_csv(&path) {
            Ok(()) => session.status_message = None,
            Err(e) => {
                log::error!("Failed to export counts: {e:#}");
                session.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

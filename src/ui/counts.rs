use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::LoadedFile;
use crate::state::Session;

// ---------------------------------------------------------------------------
// Per-file counts (central panel)
// ---------------------------------------------------------------------------

/// Render one section per loaded file with its date → count table.
pub fn file_counts(ui: &mut Ui, session: &mut Session) {
    if session.files.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Drop .xlsx / .xls schedules here  (or File → Open…)");
        });
        return;
    }

    let mut remove: Option<u64> = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for file in &session.files {
                ui.push_id(file.id, |ui: &mut Ui| {
                    if file_section(ui, file) {
                        remove = Some(file.id);
                    }
                });
                ui.add_space(12.0);
            }
        });

    if let Some(id) = remove {
        session.remove_file(id);
    }
}

/// Draw one file. Returns `true` when its remove button was clicked.
fn file_section(ui: &mut Ui, file: &LoadedFile) -> bool {
    let mut remove = false;
    ui.group(|ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(&file.name);
            ui.label(format!("{} · {}", file.company, file.station));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                if ui.small_button("Remove").clicked() {
                    remove = true;
                }
            });
        });

        if file.counts.is_empty() {
            ui.label(RichText::new("No date columns found.").italics());
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Date");
                });
                header.col(|ui| {
                    ui.strong("Count");
                });
            })
            .body(|mut body| {
                for c in &file.counts {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&c.label).on_hover_text(format!(
                                "Column {} · header cell: {}",
                                c.column + 1,
                                c.raw
                            ));
                        });
                        row.col(|ui| {
                            ui.label(c.count.to_string());
                        });
                    });
                }
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.strong("Total");
                    });
                    row.col(|ui| {
                        ui.strong(file.total().to_string());
                    });
                });
            });
    });
    remove
}

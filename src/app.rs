use eframe::egui;

use crate::config::AppConfig;
use crate::data::loader;
use crate::state::Session;
use crate::ui::{counts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DspTallyApp {
    pub session: Session,
    pub ui: panels::PanelState,
}

impl DspTallyApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            session: Session::new(config),
            ui: panels::PanelState::default(),
        }
    }

    /// Feed files dropped onto the window into the session as one batch.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let items: Vec<_> = dropped
            .into_iter()
            .filter_map(|file| {
                let name = match &file.path {
                    Some(path) => path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                    None => file.name.clone(),
                };
                if !loader::is_supported(&name) {
                    log::warn!("Ignoring dropped file {name}: not an .xlsx or .xls file");
                    return None;
                }
                let grid = match (&file.path, &file.bytes) {
                    (Some(path), _) => loader::load_file(path),
                    (None, Some(bytes)) => loader::load_bytes(&name, bytes.to_vec()),
                    (None, None) => return None,
                };
                Some((name, grid.map_err(anyhow::Error::from)))
            })
            .collect();

        if !items.is_empty() {
            self.session.add_loaded(items);
        }
    }
}

impl eframe::App for DspTallyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        // ---- Left side panel: filters and words ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session, &mut self.ui);
            });

        // ---- Central panel: per-file counts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            counts::file_counts(ui, &mut self.session);
        });
    }
}

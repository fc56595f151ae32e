//! Application shell: drop zone, upload progress, result card, theme toggle.

use std::path::{Path, PathBuf};
use std::time::Duration;

use analyzer_core::{UploadPhase, CSV_MIME};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::session::UploadSession;
use crate::ui::theme;

pub const SETTINGS_STORAGE_KEY: &str = "csv_analyzer_settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub dark_mode: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

pub struct AnalyzerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    session: UploadSession,
    status: String,
    status_banner: Option<String>,

    dark_mode: bool,
    applied_dark_mode: Option<bool>,
    drag_hover: bool,
}

impl AnalyzerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedSettings>,
    ) -> Self {
        let settings = persisted.unwrap_or_default();
        Self {
            cmd_tx,
            ui_rx,
            session: UploadSession::new(),
            status: "Starting upload worker...".to_string(),
            status_banner: None,
            dark_mode: settings.dark_mode,
            applied_dark_mode: None,
            drag_hover: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::WorkerReady => {
                    self.status = "Drop a CSV file to get started".to_string();
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::UploadStarted { file_name } => {
                    self.session.begin(file_name.clone());
                    self.status_banner = None;
                    self.status = format!("Requesting upload credential for {file_name}...");
                }
                UiEvent::PhaseChanged(phase) => {
                    self.session.advance(phase);
                    if phase == UploadPhase::Transferring {
                        self.status = "Uploading file to storage...".to_string();
                    }
                }
                UiEvent::UploadFinished(handle) => {
                    self.status = "Upload successful. Processing started.".to_string();
                    self.session.complete(handle);
                }
                UiEvent::Error(err) => {
                    if err.context() == UiErrorContext::Upload {
                        self.session.fail();
                    }
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.status_banner = Some(self.status.clone());
                }
            }
        }
    }

    fn can_select_file(&self) -> bool {
        !self.session.is_busy()
    }

    fn looks_like_csv(path: &Path) -> bool {
        mime_guess::from_path(path).first_raw() == Some(CSV_MIME)
    }

    /// Entry point for both drag-drop and the picker button. Rejections
    /// happen here, synchronously, before anything reaches the worker.
    fn select_file(&mut self, path: PathBuf) {
        if !self.can_select_file() {
            self.status = "An upload is already in progress".to_string();
            return;
        }
        let display_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file")
            .to_string();
        if !Self::looks_like_csv(&path) {
            self.status = format!("Rejected '{display_name}': only text/csv files are accepted");
            self.status_banner = Some("Please choose a valid CSV file".to_string());
            return;
        }
        self.status_banner = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::UploadCsv { path },
            &mut self.status,
        );
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.drag_hover = false;
        if self.session.is_busy() {
            return;
        }
        ctx.input(|i| {
            if !i.raw.hovered_files.is_empty() {
                self.drag_hover = true;
            }
        });

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        // One file per session; extras in a multi-drop are ignored.
        if let Some(path) = dropped.into_iter().next() {
            self.select_file(path);
        }
    }

    fn open_file_picker(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            self.select_file(path);
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_dark_mode == Some(self.dark_mode) {
            return;
        }
        theme::apply(ctx, self.dark_mode);
        self.applied_dark_mode = Some(self.dark_mode);
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📊").size(20.0));
                ui.heading("CSV Analyzer");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let toggle_label = if self.dark_mode { "☀ Light" } else { "🌙 Dark" };
                    if ui.button(toggle_label).clicked() {
                        self.dark_mode = !self.dark_mode;
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_drop_zone(&mut self, ui: &mut egui::Ui) {
        let selectable = self.can_select_file();
        let stroke_color = if self.drag_hover && selectable {
            theme::accent(self.dark_mode)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color)
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .corner_radius(14.0)
            .inner_margin(egui::Margin::symmetric(24, 28))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("📄").size(40.0));
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new("Drag and drop your CSV file here")
                            .strong()
                            .size(17.0),
                    );
                    ui.weak("Or click to browse");
                    ui.add_space(10.0);
                    let button = egui::Button::new(
                        egui::RichText::new("Upload CSV").strong().size(15.0),
                    )
                    .fill(theme::accent(self.dark_mode))
                    .min_size(egui::vec2(160.0, 36.0));
                    if ui.add_enabled(selectable, button).clicked() {
                        self.open_file_picker();
                    }
                });
            });
    }

    /// Shared frame for the progress and result cards. Margins are whole
    /// points; egui stores them as `i8`.
    fn card_frame() -> egui::Frame {
        egui::Frame::NONE
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(16, 16))
    }

    fn show_progress_card(&self, ui: &mut egui::Ui) {
        if !self.session.is_busy() {
            return;
        }
        ui.add_space(12.0);
        Self::card_frame()
            .fill(ui.visuals().faint_bg_color)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new().size(28.0));
                    ui.add_space(6.0);
                    let file_name = self.session.file_name().unwrap_or("file");
                    ui.label(format!(
                        "Analyzing {file_name} ({})...",
                        self.session.phase().label()
                    ));
                });
            });
    }

    fn show_result_card(&self, ui: &mut egui::Ui) {
        let Some(handle) = self.session.download() else {
            return;
        };
        ui.add_space(12.0);
        Self::card_frame()
            .fill(ui.visuals().faint_bg_color)
            .stroke(egui::Stroke::new(2.0, theme::success(self.dark_mode)))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Analysis complete")
                            .strong()
                            .size(17.0)
                            .color(theme::success(self.dark_mode)),
                    );
                    ui.add_space(4.0);
                    ui.hyperlink_to("⬇ Download processed CSV", &handle.download_url);
                    ui.weak(format!("File: {}", handle.suggested_name));
                });
            });
    }
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);
        self.handle_dropped_files(ctx);

        self.show_header(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.heading("Upload CSV for Analysis");
                ui.weak("The remote pipeline processes your file and returns a download link.");
            });
            ui.add_space(12.0);

            self.show_status_banner(ui);
            self.show_drop_zone(ui);
            self.show_progress_card(ui);
            self.show_result_card(ui);

            ui.add_space(12.0);
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        // Events arrive from the worker thread, so keep polling even when
        // no input is happening; faster while an upload is in flight.
        let poll = if self.session.is_busy() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        ctx.request_repaint_after(poll);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            dark_mode: self.dark_mode,
        };
        if let Ok(text) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, text);
        }
    }
}

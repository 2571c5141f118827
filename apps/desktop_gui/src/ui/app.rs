use client_core::{FileIntakeController, IntakeState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    accept::{AcceptFilter, Rejection, RejectionReason},
    domain::FileCandidate,
    protocol::IngestionReceipt,
};

use super::drop_input::{dropped_candidates, hover_items, selected_size_text};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: Option<String>,
    pub filter: AcceptFilter,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            filter: AcceptFilter::pdf_only(),
        }
    }
}

pub struct DarsUploadApp {
    intake: FileIntakeController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    last_receipt: Option<IngestionReceipt>,
    last_error: Option<UiError>,
    hovering: bool,
}

impl DarsUploadApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let status = match &startup.server_url {
            Some(url) => format!("Uploads go to {url}"),
            None => "Uploads are recorded locally".to_string(),
        };
        Self {
            intake: FileIntakeController::new(startup.filter),
            cmd_tx,
            ui_rx,
            status,
            last_receipt: None,
            last_error: None,
            hovering: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Ingested(receipt) => {
                    self.status = format!(
                        "Uploaded {} ({} bytes)",
                        receipt.filename, receipt.size_bytes
                    );
                    self.last_error = None;
                    self.last_receipt = Some(receipt);
                }
                UiEvent::Error(err) => {
                    tracing::warn!(category = ?err.category(), "{}", err.message());
                    self.status = err.status_line();
                    self.last_error = Some(err);
                }
            }
        }
    }

    /// Feeds the frame's raw drag-and-drop input into the intake controller.
    fn sync_drag_and_drop(&mut self, ctx: &egui::Context) {
        let (hovered, dropped) =
            ctx.input(|i| (i.raw.hovered_files.clone(), i.raw.dropped_files.clone()));

        if !dropped.is_empty() {
            self.hovering = false;
            self.intake.on_drop(dropped_candidates(&dropped));
            return;
        }

        match (hovered.is_empty(), self.hovering) {
            (false, false) => {
                self.hovering = true;
                self.intake.on_drag_enter(&hover_items(&hovered));
            }
            (true, true) => {
                self.hovering = false;
                self.intake.on_drag_leave();
            }
            _ => {}
        }
    }

    fn open_file_dialog(&mut self) {
        let filter = self.intake.filter();
        let extensions = filter.dialog_extensions();
        let mut dialog = rfd::FileDialog::new().add_filter(&filter.label, &extensions);
        if let Some(dir) = default_document_dir() {
            dialog = dialog.set_directory(dir);
        }

        // A cancelled dialog leaves the slot untouched.
        let Some(path) = dialog.pick_file() else {
            return;
        };
        let candidates: Vec<FileCandidate> = FileCandidate::from_path(&path).into_iter().collect();
        self.intake.on_picker_selection(candidates);
    }

    fn submit(&mut self) {
        let Some(file) = self.intake.submit() else {
            return;
        };
        self.status = format!("Uploading {}...", file.name);
        self.last_error = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Ingest { file },
            &mut self.status,
        );
    }

    fn show_drop_zone(&mut self, ui: &mut egui::Ui) {
        let visuals = ui.visuals().clone();
        let (fill, stroke) = if self.intake.is_drag_active() {
            (
                visuals.selection.bg_fill.gamma_multiply(0.25),
                egui::Stroke::new(2.0, visuals.selection.stroke.color),
            )
        } else {
            (
                visuals.faint_bg_color,
                egui::Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color),
            )
        };

        let frame = egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(18, 32))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(self.intake.prompt().to_string()).size(16.0));
                    if let Some(size) = self.intake.selected().and_then(selected_size_text) {
                        ui.weak(size);
                    }
                });
            });

        let response = frame
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() {
            self.open_file_dialog();
        }
    }
}

impl eframe::App for DarsUploadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.sync_drag_and_drop(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(360.0, 560.0);
            ui.add_space((avail.y * 0.12).clamp(18.0, 90.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                egui::Frame::NONE
                    .fill(ui.visuals().panel_fill)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                        ui.heading("Upload DARS Report");
                        ui.weak(format!(
                            "Accepted: {} (one file)",
                            self.intake.filter().label
                        ));
                        ui.add_space(6.0);

                        self.show_drop_zone(ui);

                        if let Some(hint) = rejection_hint(self.intake.last_rejections()) {
                            ui.colored_label(ui.visuals().warn_fg_color, hint);
                        }

                        ui.add_space(6.0);
                        let submit = ui.add_enabled(
                            self.intake.can_submit(),
                            egui::Button::new("Submit").min_size(egui::vec2(120.0, 32.0)),
                        );
                        if submit.clicked() {
                            self.submit();
                        }

                        ui.separator();
                        let status_color = if self.last_error.is_some() {
                            ui.visuals().error_fg_color
                        } else {
                            ui.visuals().weak_text_color()
                        };
                        ui.colored_label(status_color, &self.status);
                        if let Some(receipt) = &self.last_receipt {
                            ui.weak(format!(
                                "Last submission {} at {}",
                                receipt.submission_id,
                                receipt.received_at.format("%Y-%m-%d %H:%M:%S UTC")
                            ));
                        }
                    });
            });
        });

        let delay_ms = if self.intake.state() == IntakeState::DragActive {
            16
        } else {
            100
        };
        ctx.request_repaint_after(std::time::Duration::from_millis(delay_ms));
    }
}

fn default_document_dir() -> Option<std::path::PathBuf> {
    dirs::document_dir()
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
}

fn rejection_hint(rejections: &[Rejection]) -> Option<String> {
    let first = rejections.first()?;
    let hint = match first.reason {
        RejectionReason::FileInvalidType => format!("{} is not an accepted file type", first.name),
        RejectionReason::TooManyFiles { limit } => {
            format!("Only {limit} file can be selected; ignored {}", first.name)
        }
    };
    Some(if rejections.len() > 1 {
        format!("{hint} (+{} more)", rejections.len() - 1)
    } else {
        hint
    })
}

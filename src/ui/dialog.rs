use std::path::PathBuf;

use eframe::egui;

use crate::session::{AssignTarget, Assignment};

pub(super) enum DialogOutcome {
    Pending,
    Confirmed(Vec<Assignment>),
    Cancelled,
}

/// Dropped files waiting for the user to pick a target for each.
#[derive(Debug, Clone)]
pub(super) struct AssignDialog {
    rows: Vec<Assignment>,
}

impl AssignDialog {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        let mut dialog = Self { rows: Vec::new() };
        dialog.extend(paths);
        dialog
    }

    /// Adds files not already listed.
    pub(super) fn extend(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if self.rows.iter().any(|row| row.path == path) {
                continue;
            }
            self.rows
                .push(Assignment::new(path, AssignTarget::default()));
        }
    }

    pub(super) fn rows(&self) -> &[Assignment] {
        &self.rows
    }

    pub(super) fn show(&mut self, ctx: &egui::Context) -> DialogOutcome {
        let mut outcome = DialogOutcome::Pending;
        egui::Window::new(format!("Assign {} dropped files", self.rows().len()))
            .id(egui::Id::new("assign-dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("assign-grid")
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        for (index, row) in self.rows.iter_mut().enumerate() {
                            let name = row
                                .path
                                .file_name()
                                .map(|name| name.to_string_lossy().into_owned())
                                .unwrap_or_else(|| row.path.display().to_string());
                            ui.label(name).on_hover_text(row.path.display().to_string());
                            egui::ComboBox::from_id_salt(("assign-target", index))
                                .selected_text(row.target.label())
                                .show_ui(ui, |ui| {
                                    for target in AssignTarget::ALL {
                                        ui.selectable_value(&mut row.target, target, target.label());
                                    }
                                });
                            ui.end_row();
                        }
                    });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() {
                        outcome = DialogOutcome::Confirmed(self.rows.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = DialogOutcome::Cancelled;
                    }
                });
            });
        outcome
    }
}

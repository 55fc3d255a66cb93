use std::path::PathBuf;

use eframe::egui;
use rfd::FileDialog;

use super::canvas::CanvasPair;
use super::dialog::{AssignDialog, DialogOutcome};
use super::panels;
use super::{LaunchOptions, status_message};
use crate::model::{Colormap, Layer};
use crate::session::{
    AssignTarget, Assignment, InteractionSession, KeyCommand, LogitsSide, Result,
};
use crate::viewport::Canvas;

const OPEN_EXTENSIONS: [&str; 5] = ["nii", "gz", "npy", "tif", "tiff"];

/// Everything a widget can ask for. Widgets read the session and push
/// actions; the app applies them after the frame is laid out.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum UiAction {
    SetSlice(usize),
    SetWindowMin(i32),
    SetWindowMax(i32),
    SetSegmentationOpacity(f32),
    SetSegmentationVisible(bool),
    SetLogitsOpacity(f32),
    SetLogitsVisible(bool),
    SetClass(usize),
    SetColormap(Colormap),
    SetThresholdLow(LogitsSide, i32),
    SetThresholdHigh(LogitsSide, i32),
    Key(KeyCommand),
    Assign(Vec<Assignment>),
    Open(AssignTarget),
    ToggleReadout,
    CloseReadout,
    ResetView,
}

/// Applies the actions that only touch session state. UI-only actions
/// are a no-op here.
pub(super) fn apply_to_session(session: &mut InteractionSession, action: UiAction) -> Result<()> {
    match action {
        UiAction::SetSlice(slice) => session.set_slice(slice).map(|_| ()),
        UiAction::SetWindowMin(min) => session.set_window_min(min),
        UiAction::SetWindowMax(max) => session.set_window_max(max),
        UiAction::SetSegmentationOpacity(opacity) => session.set_segmentation_opacity(opacity),
        UiAction::SetSegmentationVisible(visible) => session.set_segmentation_visible(visible),
        UiAction::SetLogitsOpacity(opacity) => {
            session.set_logits_opacity(opacity);
            Ok(())
        }
        UiAction::SetLogitsVisible(visible) => {
            session.set_logits_visible(visible);
            Ok(())
        }
        UiAction::SetClass(class) => session.set_class(class),
        UiAction::SetColormap(colormap) => {
            session.set_colormap(colormap);
            Ok(())
        }
        UiAction::SetThresholdLow(side, low) => session.set_threshold_low(side, low),
        UiAction::SetThresholdHigh(side, high) => session.set_threshold_high(side, high),
        UiAction::Key(command) => session.handle_key(command),
        UiAction::Assign(assignments) => session
            .apply_assignments(assignments)
            .into_iter()
            .map(|report| report.result)
            .find(|result| result.as_ref().is_err_and(|error| status_message(error).is_some()))
            .unwrap_or(Ok(())),
        UiAction::ResetView => {
            session.viewport_mut().reset();
            Ok(())
        }
        UiAction::Open(_) | UiAction::ToggleReadout | UiAction::CloseReadout => Ok(()),
    }
}

pub(super) fn key_command(key: egui::Key) -> Option<KeyCommand> {
    match key {
        egui::Key::W | egui::Key::ArrowUp => Some(KeyCommand::PreviousSlice),
        egui::Key::S | egui::Key::ArrowDown => Some(KeyCommand::NextSlice),
        egui::Key::A => Some(KeyCommand::PreviousClass),
        egui::Key::D => Some(KeyCommand::NextClass),
        _ => None,
    }
}

pub struct ViewerApp {
    session: InteractionSession,
    canvases: CanvasPair,
    status: String,
    show_readout: bool,
    assign_dialog: Option<AssignDialog>,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        Self::from_options(options)
    }

    pub(super) fn from_options(options: LaunchOptions) -> Self {
        let (session, messages) = options.into_session();
        Self {
            session,
            canvases: CanvasPair::default(),
            status: messages.join("; "),
            show_readout: false,
            assign_dialog: None,
        }
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub(super) fn status(&self) -> &str {
        &self.status
    }

    pub(super) fn readout_open(&self) -> bool {
        self.show_readout
    }

    pub(super) fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Open(target) => {
                    if let Some(path) = pick_file(target) {
                        self.apply(UiAction::Assign(vec![Assignment::new(path, target)]));
                    }
                }
                UiAction::ToggleReadout => self.show_readout = !self.show_readout,
                UiAction::CloseReadout => self.show_readout = false,
                action => self.apply(action),
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        let is_load = matches!(action, UiAction::Assign(_));
        match apply_to_session(&mut self.session, action) {
            Ok(()) if is_load => self.status.clear(),
            Ok(()) => {}
            Err(error) => {
                if let Some(message) = status_message(&error) {
                    self.status = message;
                }
            }
        }
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect::<Vec<PathBuf>>()
        });
        if dropped.is_empty() {
            return;
        }
        log::debug!("{} files dropped", dropped.len());
        match &mut self.assign_dialog {
            Some(dialog) => dialog.extend(dropped),
            None => self.assign_dialog = Some(AssignDialog::new(dropped)),
        }
    }

    fn handle_shortcuts(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        if ctx.wants_keyboard_input() || self.assign_dialog.is_some() {
            return;
        }
        let presses = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Some((*key, modifiers.command || modifiers.ctrl)),
                    _ => None,
                })
                .collect::<Vec<_>>()
        });

        for (key, command) in presses {
            if command {
                if key == egui::Key::W {
                    actions.push(UiAction::CloseReadout);
                }
                continue;
            }
            if let Some(command) = key_command(key) {
                actions.push(UiAction::Key(command));
            }
        }
    }

    fn canvas_title(&self, canvas: Canvas) -> String {
        let side = match canvas {
            Canvas::Left => LogitsSide::Left,
            Canvas::Right => LogitsSide::Right,
        };
        match self.session.logits(side) {
            Some(logits) => logits.info().second_name.clone(),
            None => format!("{side:?}"),
        }
    }
}

fn pick_file(target: AssignTarget) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(format!("Open {}", target.label()))
        .add_filter("Arrays", &OPEN_EXTENSIONS)
        .pick_file()
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_dropped_files(ctx);

        let mut actions = Vec::new();
        self.handle_shortcuts(ctx, &mut actions);

        if let Err(error) = self.canvases.refresh(ctx, &self.session) {
            if let Some(message) = status_message(&error) {
                self.status = message;
            }
        }

        egui::TopBottomPanel::bottom("status-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(readout) = self.session.readout() {
                    ui.monospace(readout.status_line());
                    ui.separator();
                }
                ui.label(self.status());
            });
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(290.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::draw_controls(ui, &self.session, self.readout_open(), &mut actions);
                });
            });

        let titles = [Canvas::Left, Canvas::Right].map(|canvas| self.canvas_title(canvas));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                for ((column, canvas), title) in columns
                    .iter_mut()
                    .zip([Canvas::Left, Canvas::Right])
                    .zip(&titles)
                {
                    column.label(title.as_str());
                    self.canvases.show(column, canvas, &mut self.session);
                }
            });
        });

        if self.readout_open() {
            let mut open = true;
            egui::Window::new("Readout")
                .open(&mut open)
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    panels::draw_readout(ui, &self.session);
                });
            if !open {
                actions.push(UiAction::CloseReadout);
            }
        }

        if let Some(dialog) = &mut self.assign_dialog {
            match dialog.show(ctx) {
                DialogOutcome::Pending => {}
                DialogOutcome::Cancelled => self.assign_dialog = None,
                DialogOutcome::Confirmed(assignments) => {
                    self.assign_dialog = None;
                    actions.push(UiAction::Assign(assignments));
                }
            }
        }

        self.apply_actions(actions);
    }
}

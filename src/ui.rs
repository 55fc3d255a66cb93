mod app;
mod canvas;
mod dialog;
mod panels;


use eframe::egui;

use crate::config::ViewerConfig;
use crate::formats::DefaultReader;
use crate::session::{Assignment, InteractionSession, SessionError};

pub use app::ViewerApp;

const WINDOW_TITLE: &str = "Logits Viewer";
const DEFAULT_WINDOW_SIZE: [f32; 2] = [1280.0, 760.0];
const MIN_WINDOW_SIZE: [f32; 2] = [640.0, 420.0];

/// Everything the window needs before the first frame.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config: ViewerConfig,
    pub dummy_shape: Option<[usize; 3]>,
    pub assignments: Vec<Assignment>,
}

impl LaunchOptions {
    /// Builds the session and runs the startup loads. Messages for failed
    /// loads come back for the status line.
    pub fn into_session(self) -> (InteractionSession, Vec<String>) {
        let mut session = InteractionSession::new(self.config, DefaultReader);
        let mut messages = Vec::new();

        if let Some(shape) = self.dummy_shape {
            if let Err(error) = session.load_dummy(shape) {
                messages.extend(status_message(&error));
            }
        }
        for report in session.apply_assignments(self.assignments) {
            if let Err(error) = &report.result {
                messages.extend(status_message(error));
            }
        }
        (session, messages)
    }
}

/// Text for the status line, or `None` for errors the user never sees.
pub(crate) fn status_message(error: &SessionError) -> Option<String> {
    if error.is_silent() || error.is_control_rejection() {
        None
    } else {
        Some(error.to_string())
    }
}

pub fn run(options: LaunchOptions) -> Result<(), String> {
    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(DEFAULT_WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, options)))),
    )
    .map_err(|error| error.to_string())
}

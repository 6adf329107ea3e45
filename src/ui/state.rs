//! Application state management structures.
//!
//! This module contains the state structures that track the canvas gestures in
//! progress and the export operations running in the background, plus the main
//! [`SceneEditorApp`].

use crate::tools::Editor;
use crate::types::*;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// An element drag in progress on the canvas.
#[derive(Debug, Clone)]
pub struct ActiveDrag {
    /// Element being dragged
    pub id: ElementId,
    /// Offset from the pointer to the element's anchor position, in pixels
    pub grab_offset: egui::Vec2,
    /// Pointer position of the press that started the drag, in canvas pixels
    pub press_pixel: Point,
}

/// A vertex or corner handle being dragged.
#[derive(Debug, Clone)]
pub struct ActiveHandle {
    /// Element owning the handle
    pub id: ElementId,
    /// Vertex index for polygons, corner index for rectangles
    pub index: usize,
    /// Pointer position of the press that grabbed the handle, in canvas pixels
    pub press_pixel: Point,
}

/// State related to gestures on the canvas.
#[derive(Debug, Default)]
pub struct InteractionState {
    /// Element drag in progress
    pub drag: Option<ActiveDrag>,
    /// Handle drag in progress
    pub handle: Option<ActiveHandle>,
    /// Time (seconds) of the last pointer move forwarded to the editor
    pub last_move_time: Option<f64>,
    /// Last pointer position forwarded to the editor, in canvas pixels
    pub last_pointer: Option<egui::Pos2>,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Export written, with the destination shown to the user
    ExportCompleted(String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// State related to exporting scenes.
pub struct FileState {
    /// Set when the user asked for an export this frame
    pub pending_export: bool,
    /// Channel for receiving file operation results from async contexts
    pub file_operation_sender: Option<Sender<FileOperationResult>>,
    /// Receiving end of the file operation channel
    pub file_operation_receiver: Option<Receiver<FileOperationResult>>,
    /// Last status message shown in the toolbar
    pub status: Option<String>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            pending_export: false,
            file_operation_sender: Some(sender),
            file_operation_receiver: Some(receiver),
            status: None,
        }
    }
}

/// The main application structure containing the editing session and UI settings.
///
/// Only the settings are persisted between runs. Scene content lives for a single
/// session.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct SceneEditorApp {
    /// Editing session
    #[serde(skip)]
    pub editor: Editor,
    /// Grid, scale and snapping configuration
    pub config: EditorConfig,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Minimum interval between forwarded pointer moves in milliseconds, 0 disables
    pub throttle_ms: u32,
    /// Canvas gesture state
    #[serde(skip)]
    pub interaction: InteractionState,
    /// Export state
    #[serde(skip)]
    pub file: FileState,
}

impl Default for SceneEditorApp {
    fn default() -> Self {
        Self {
            editor: Editor::default(),
            config: EditorConfig::default(),
            dark_mode: true,
            throttle_ms: 0,
            interaction: InteractionState::default(),
            file: FileState::default(),
        }
    }
}

impl SceneEditorApp {
    /// Creates the app, restoring persisted settings when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let Some(json) = cc.storage.and_then(|storage| storage.get_string("app_state")) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(mut app) => {
                app.config = app.config.sanitized();
                app
            }
            Err(err) => {
                log::warn!("Ignoring unreadable persisted settings: {err}");
                Self::default()
            }
        }
    }

    /// Serializes the persisted settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes persisted settings from JSON.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON string produced by [`SceneEditorApp::to_json`]
    ///
    /// # Returns
    ///
    /// A `SceneEditorApp` with a fresh editing session, or an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Applies a configuration edited in the side panel.
    ///
    /// The value is sanitized first. A scale change re-projects every connection.
    pub fn apply_config(&mut self, config: EditorConfig) {
        let config = config.sanitized();
        if config.scale != self.config.scale {
            self.editor.rescale(config.scale);
        }
        self.config = config;
    }
}

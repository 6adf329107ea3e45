//! User interface for the scene editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main SceneEditorApp
//! - `file_ops` - Scene export for native and WASM
//! - `canvas` - Pointer handling on the canvas
//! - `rendering` - Drawing the scene, previews and guides

mod canvas;
mod file_ops;
mod rendering;
mod state;

pub use state::SceneEditorApp;

use crate::tools::Tool;
use eframe::egui;

impl eframe::App for SceneEditorApp {
    /// Persist the editor settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                log::error!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("config_panel")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                self.draw_config_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_warnings(ctx);
    }
}

impl SceneEditorApp {
    /// Handles keyboard shortcuts. Escape cancels the active tool, construction and drag.
    pub fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.cancel();
            self.interaction.drag = None;
            self.interaction.handle = None;
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Export").clicked() {
                self.export_scene();
            }

            ui.separator();

            let theme = if self.dark_mode { "☀ Light" } else { "🌙 Dark" };
            if ui.button(theme).clicked() {
                self.dark_mode = !self.dark_mode;
            }

            ui.separator();

            match self.editor.pointer() {
                Some(p) => ui.monospace(format!("x: {:>7.2} m  y: {:>7.2} m", p.x, p.y)),
                None => ui.monospace("x: -  y: -"),
            };

            if let Some(status) = &self.file.status {
                ui.separator();
                ui.label(status);
            }
        });
    }

    fn draw_config_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        if ui
            .selectable_label(self.editor.tool().is_none(), "Select / Move")
            .clicked()
        {
            self.editor.set_tool(None);
        }
        for tool in Tool::ALL {
            if ui
                .selectable_label(self.editor.tool() == Some(tool), tool.label())
                .clicked()
            {
                self.editor.set_tool(Some(tool));
            }
        }

        ui.separator();
        ui.heading("Configuration");

        let mut config = self.config;
        egui::Grid::new("config_grid")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Scale");
                ui.add(
                    egui::DragValue::new(&mut config.scale)
                        .speed(1.0)
                        .range(crate::constants::MIN_SCALE..=crate::constants::MAX_SCALE)
                        .suffix(" px/m"),
                );
                ui.end_row();

                ui.label("Grid spacing");
                ui.add(
                    egui::DragValue::new(&mut config.grid_spacing)
                        .speed(0.05)
                        .range(crate::constants::MIN_GRID_SPACING..=100.0)
                        .suffix(" m"),
                );
                ui.end_row();

                ui.label("Snap threshold");
                ui.add(
                    egui::DragValue::new(&mut config.snap_threshold)
                        .speed(0.01)
                        .range(0.0..=10.0)
                        .suffix(" m"),
                );
                ui.end_row();

                ui.label("Move throttle");
                ui.add(
                    egui::DragValue::new(&mut self.throttle_ms)
                        .range(0..=500)
                        .suffix(" ms"),
                );
                ui.end_row();
            });
        ui.checkbox(&mut config.show_grid, "Show grid");
        ui.checkbox(&mut config.show_alignment_guides, "Alignment guides");

        if config != self.config {
            self.apply_config(config);
        }
    }

    fn draw_warnings(&self, ctx: &egui::Context) {
        let report = self.editor.containment();
        if report.is_empty() {
            return;
        }
        egui::Window::new("Warnings")
            .collapsible(true)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
            .show(ctx, |ui| {
                let warn_color = egui::Color32::from_rgb(230, 160, 40);
                for warning in &report.warnings {
                    ui.colored_label(warn_color, warning);
                }
                if let Some(dragged) = &report.dragged {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(230, 80, 70), dragged);
                }
            });
    }
}

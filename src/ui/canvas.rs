//! Canvas interaction functionality.
//!
//! This module turns raw pointer input on the canvas into editor events: tool clicks,
//! pointer moves (optionally throttled), element drags and handle drags. Positions are
//! handed to the editor in canvas pixel space, with the origin at the canvas top-left.

use super::state::{ActiveDrag, ActiveHandle, SceneEditorApp};
use crate::constants;
use crate::geometry::find_element_at;
use crate::types::*;
use eframe::egui;

/// Pointer input sampled once per frame.
struct PointerSample {
    pos: Option<egui::Pos2>,
    pressed: bool,
    released: bool,
    down: bool,
    double_clicked: bool,
    time: f64,
}

impl SceneEditorApp {
    /// Converts a screen position to canvas pixel space.
    ///
    /// # Arguments
    ///
    /// * `canvas_rect` - Screen rectangle of the canvas
    /// * `screen_pos` - Position in screen space
    pub fn screen_to_canvas(canvas_rect: egui::Rect, screen_pos: egui::Pos2) -> Point {
        let local = screen_pos - canvas_rect.min;
        Point::new(local.x, local.y)
    }

    /// Converts a canvas pixel position back to screen space.
    pub fn canvas_to_screen(canvas_rect: egui::Rect, pixel: Point) -> egui::Pos2 {
        canvas_rect.min + egui::vec2(pixel.x, pixel.y)
    }

    /// Converts a world position to screen space using the current scale.
    pub fn world_to_screen(&self, canvas_rect: egui::Rect, world: Point) -> egui::Pos2 {
        Self::canvas_to_screen(canvas_rect, world.to_pixels(self.config.scale))
    }

    /// Allocates the canvas, processes this frame's pointer input and draws the scene.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        self.handle_canvas_input(ui, canvas_rect);
        self.render_scene(&painter, canvas_rect);
    }

    fn handle_canvas_input(&mut self, ui: &egui::Ui, canvas_rect: egui::Rect) {
        let sample = ui.input(|i| PointerSample {
            pos: i.pointer.latest_pos(),
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            down: i.pointer.primary_down(),
            double_clicked: i.pointer.button_double_clicked(egui::PointerButton::Primary),
            time: i.time,
        });

        // Gestures already in progress own the pointer until release
        if self.interaction.drag.is_some() || self.interaction.handle.is_some() {
            self.continue_gesture(&sample, canvas_rect);
            return;
        }

        let Some(pos) = sample.pos else {
            return;
        };
        if !canvas_rect.contains(pos) {
            return;
        }
        let pixel = Self::screen_to_canvas(canvas_rect, pos);

        if sample.pressed {
            // Clicks always see the exact press position
            self.forward_pointer_move(pos, pixel, sample.time);
            if self.editor.tool().is_none() {
                self.begin_gesture(pixel);
            } else {
                self.editor.pointer_down(pixel, &self.config);
            }
        } else if self.should_forward_move(pos, sample.time) {
            self.forward_pointer_move(pos, pixel, sample.time);
        }

        if sample.double_clicked {
            self.editor.double_click();
        }
    }

    fn should_forward_move(&self, pos: egui::Pos2, time: f64) -> bool {
        if self.interaction.last_pointer == Some(pos) {
            return false;
        }
        match (self.throttle_ms, self.interaction.last_move_time) {
            (0, _) | (_, None) => true,
            (ms, Some(last)) => (time - last) * 1000.0 >= f64::from(ms),
        }
    }

    fn forward_pointer_move(&mut self, pos: egui::Pos2, pixel: Point, time: f64) {
        self.interaction.last_pointer = Some(pos);
        self.interaction.last_move_time = Some(time);
        self.editor.pointer_move(pixel, &self.config);
    }

    /// Starts a handle drag or an element drag under the pointer (select/move mode).
    fn begin_gesture(&mut self, pixel: Point) {
        if let Some(handle) = self.find_handle_at(pixel) {
            log::debug!("Grabbed handle {} of {}", handle.index, handle.id);
            self.interaction.handle = Some(handle);
            return;
        }

        let world = pixel.to_world(self.config.scale);
        let Some(hit) = find_element_at(self.editor.scene(), world) else {
            return;
        };
        let Some(anchor) = self.editor.scene().position_of(&hit.id) else {
            return;
        };
        if self.editor.drag_start(&hit.id) {
            let anchor = anchor.to_pixels(self.config.scale);
            self.interaction.drag = Some(ActiveDrag {
                id: hit.id,
                grab_offset: egui::vec2(anchor.x - pixel.x, anchor.y - pixel.y),
                press_pixel: pixel,
            });
        }
    }

    fn continue_gesture(&mut self, sample: &PointerSample, canvas_rect: egui::Rect) {
        let pixel = sample
            .pos
            .map(|pos| Self::screen_to_canvas(canvas_rect, pos));
        let finished = sample.released || !sample.down;

        if let Some(drag) = self.interaction.drag.clone() {
            // A press and release in place is a click, not a move
            match pixel.filter(|p| *p != drag.press_pixel) {
                Some(pixel) => {
                    self.editor.pointer_move(pixel, &self.config);
                    let target =
                        Point::new(pixel.x + drag.grab_offset.x, pixel.y + drag.grab_offset.y);
                    if finished {
                        self.editor.drag_end(&drag.id, target, &self.config);
                    } else {
                        self.editor.drag_move(&drag.id, target, &self.config);
                    }
                }
                None if finished => self.editor.drag_abort(),
                None => {}
            }
            if finished {
                self.interaction.drag = None;
            }
        }

        if let Some(handle) = self.interaction.handle.clone() {
            if let Some(pixel) = pixel.filter(|p| *p != handle.press_pixel) {
                self.editor.pointer_move(pixel, &self.config);
                self.editor
                    .edge_drag(&handle.id, handle.index, pixel, &self.config);
            }
            if finished {
                self.interaction.handle = None;
            }
        }
    }

    /// Finds the vertex or corner handle closest to `pixel` within the grab radius.
    ///
    /// # Returns
    ///
    /// The handle, or `None` if no handle is close enough
    pub fn find_handle_at(&self, pixel: Point) -> Option<ActiveHandle> {
        let scale = self.config.scale;
        let scene = self.editor.scene();

        let vertices = scene.geometry().iter().flat_map(|polygon| {
            polygon
                .points
                .iter()
                .enumerate()
                .map(move |(index, p)| (&polygon.id, index, *p))
        });
        let corners = scene
            .exits()
            .iter()
            .chain(scene.distributions())
            .flat_map(|region| {
                (0..4).filter_map(move |index| region.corner(index).map(|c| (&region.id, index, c)))
            });

        vertices
            .chain(corners)
            .map(|(id, index, world)| (id, index, world.to_pixels(scale).distance(pixel)))
            .filter(|(_, _, distance)| *distance <= constants::HANDLE_GRAB_RADIUS)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, index, _)| ActiveHandle {
                id: id.clone(),
                index,
                press_pixel: pixel,
            })
    }
}

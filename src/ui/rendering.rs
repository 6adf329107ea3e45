//! Canvas rendering for the scene, construction previews and guides.
//!
//! Elements are drawn in layers: grid first, then geometry, regions, waypoints and
//! connections, then the transient previews and alignment guides on top.

use super::state::SceneEditorApp;
use crate::constants;
use crate::tools::{Construction, Tool};
use crate::types::*;
use eframe::egui;
use eframe::epaint::StrokeKind;

const GEOMETRY_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 120, 120);
const WAYPOINT_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 170, 90);
const EXIT_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 70);
const DISTRIBUTION_COLOR: egui::Color32 = egui::Color32::from_rgb(70, 130, 220);
const CONNECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 170, 40);
const PREVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const GUIDE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 200);

impl SceneEditorApp {
    /// Renders the whole scene on the canvas.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle of the canvas area
    pub fn render_scene(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.config.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        let show_handles = self.editor.tool().is_none();
        let scene = self.editor.scene();

        for polygon in scene.geometry() {
            self.draw_polygon(painter, canvas_rect, polygon, show_handles);
        }
        for exit in scene.exits() {
            self.draw_region(painter, canvas_rect, exit, EXIT_COLOR, show_handles);
        }
        for distribution in scene.distributions() {
            self.draw_region(
                painter,
                canvas_rect,
                distribution,
                DISTRIBUTION_COLOR,
                show_handles,
            );
        }
        for waypoint in scene.waypoints() {
            let center = self.world_to_screen(canvas_rect, waypoint.center());
            let radius = waypoint.radius * self.config.scale;
            painter.circle_filled(center, radius, WAYPOINT_COLOR.gamma_multiply(0.35));
            painter.circle_stroke(center, radius, egui::Stroke::new(2.0, WAYPOINT_COLOR));
        }
        for connection in scene.connections() {
            let [x1, y1, x2, y2] = connection.points;
            let start = Self::canvas_to_screen(canvas_rect, Point::new(x1, y1));
            let end = Self::canvas_to_screen(canvas_rect, Point::new(x2, y2));
            draw_arrow(painter, start, end, CONNECTION_COLOR);
        }

        self.draw_construction(painter, canvas_rect);
        self.draw_guides(painter, canvas_rect);
    }

    /// Draws grid lines every `grid_spacing` world units.
    ///
    /// The grid is skipped when lines would be closer than a few pixels apart.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let step = self.config.grid_spacing * self.config.scale;
        if step < 4.0 {
            return;
        }
        let stroke = egui::Stroke::new(
            1.0,
            egui::Color32::from_rgba_unmultiplied(128, 128, 128, 40),
        );

        let mut x = canvas_rect.min.x;
        while x <= canvas_rect.max.x {
            painter.line_segment(
                [
                    egui::pos2(x, canvas_rect.min.y),
                    egui::pos2(x, canvas_rect.max.y),
                ],
                stroke,
            );
            x += step;
        }

        let mut y = canvas_rect.min.y;
        while y <= canvas_rect.max.y {
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, y),
                    egui::pos2(canvas_rect.max.x, y),
                ],
                stroke,
            );
            y += step;
        }
    }

    fn draw_polygon(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        polygon: &GeometryPolygon,
        show_handles: bool,
    ) {
        let points: Vec<egui::Pos2> = polygon
            .points
            .iter()
            .map(|p| self.world_to_screen(canvas_rect, *p))
            .collect();
        if show_handles {
            for point in &points {
                draw_handle(painter, *point);
            }
        }
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(2.0, GEOMETRY_COLOR),
        ));
    }

    fn draw_region(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        region: &RegionRect,
        color: egui::Color32,
        show_handles: bool,
    ) {
        let min = self.world_to_screen(canvas_rect, region.position());
        let size = egui::vec2(region.width, region.height) * self.config.scale;
        let rect = egui::Rect::from_min_size(min, size);
        painter.rect_filled(rect, 0.0, color.gamma_multiply(0.35));
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, color), StrokeKind::Inside);

        if show_handles {
            for corner in (0..4).filter_map(|index| region.corner(index)) {
                draw_handle(painter, self.world_to_screen(canvas_rect, corner));
            }
        }
    }

    /// Draws the in-progress element of the active tool.
    fn draw_construction(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let stroke = egui::Stroke::new(1.5, PREVIEW_COLOR);
        let pointer = self
            .editor
            .pointer()
            .map(|p| self.world_to_screen(canvas_rect, p));

        match self.editor.construction() {
            Some(Construction::Polygon(points)) => {
                let mut line: Vec<egui::Pos2> = points
                    .iter()
                    .map(|p| self.world_to_screen(canvas_rect, *p))
                    .collect();
                for point in &line {
                    draw_handle(painter, *point);
                }
                line.extend(pointer);
                painter.add(egui::Shape::line(line, stroke));
            }
            Some(Construction::Waypoint { center, radius }) => {
                let center = self.world_to_screen(canvas_rect, *center);
                painter.circle_stroke(center, radius * self.config.scale, stroke);
            }
            Some(Construction::Exit(rect)) | Some(Construction::Distribution(rect)) => {
                let bounds = rect.bounds();
                let min = self.world_to_screen(canvas_rect, Point::new(bounds.x, bounds.y));
                let size = egui::vec2(bounds.width, bounds.height) * self.config.scale;
                painter.rect_stroke(
                    egui::Rect::from_min_size(min, size),
                    0.0,
                    stroke,
                    StrokeKind::Inside,
                );
            }
            Some(Construction::Connection(pending)) => {
                let start = self.world_to_screen(canvas_rect, pending.from.anchor);
                if let Some(cursor) = pending.cursor {
                    let end = self.world_to_screen(canvas_rect, cursor);
                    draw_arrow(painter, start, end, PREVIEW_COLOR);
                }
            }
            None => {}
        }

        if self.editor.tool() == Some(Tool::Geometry) {
            if let Some(pointer) = pointer {
                painter.circle_filled(pointer, 3.0, PREVIEW_COLOR);
            }
        }
    }

    fn draw_guides(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let guides = self.editor.guides();
        let stroke = egui::Stroke::new(1.0, GUIDE_COLOR);
        if let Some(x) = guides.x {
            let x = canvas_rect.min.x + x * self.config.scale;
            painter.extend(egui::Shape::dashed_line(
                &[
                    egui::pos2(x, canvas_rect.min.y),
                    egui::pos2(x, canvas_rect.max.y),
                ],
                stroke,
                6.0,
                4.0,
            ));
        }
        if let Some(y) = guides.y {
            let y = canvas_rect.min.y + y * self.config.scale;
            painter.extend(egui::Shape::dashed_line(
                &[
                    egui::pos2(canvas_rect.min.x, y),
                    egui::pos2(canvas_rect.max.x, y),
                ],
                stroke,
                6.0,
                4.0,
            ));
        }
    }
}

fn draw_handle(painter: &egui::Painter, pos: egui::Pos2) {
    painter.circle(
        pos,
        constants::HANDLE_RADIUS,
        egui::Color32::WHITE,
        egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
    );
}

/// Draws a line with a filled arrow head at `end`.
fn draw_arrow(painter: &egui::Painter, start: egui::Pos2, end: egui::Pos2, color: egui::Color32) {
    painter.line_segment([start, end], egui::Stroke::new(2.0, color));

    let delta = end - start;
    if delta.length() < f32::EPSILON {
        return;
    }
    let direction = delta.normalized();
    let perpendicular = egui::vec2(-direction.y, direction.x);
    let length = constants::ARROW_HEAD_LENGTH;
    let base = end - direction * length;

    painter.add(egui::Shape::convex_polygon(
        vec![
            end,
            base + perpendicular * (length * 0.5),
            base - perpendicular * (length * 0.5),
        ],
        color,
        egui::Stroke::NONE,
    ));
}

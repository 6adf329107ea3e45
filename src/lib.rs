//! # Scene Editor
//!
//! An interactive 2D editor for pedestrian-simulation input scenes. Users draw and
//! reshape the following elements on a scaled canvas:
//! - **Geometry**: closed polygons describing walls and rooms
//! - **Waypoints**: circles agents walk through
//! - **Exits** and **Distributions**: rectangles where agents leave or spawn
//! - **Connections**: directed links between any two elements
//!
//! ## Features
//! - Tool-driven creation, deletion and connection of elements
//! - Dragging with grid snapping and optional alignment guides
//! - Vertex and corner handles for reshaping
//! - Live containment warnings for elements outside every geometry
//! - Export of the scene as a JSON document for the simulation engine

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
mod connections;
mod export;
mod geometry;
mod scene;
mod snap;
mod tools;
mod types;
mod ui;
mod validation;

// Re-export public types and functions
pub use export::{ExportDocument, ExportError};
pub use geometry::*;
pub use scene::Scene;
pub use snap::*;
pub use tools::*;
pub use types::*;
pub use ui::SceneEditorApp;
pub use validation::*;

/// Runs the scene editor with default window settings.
///
/// Configuration persisted by a previous session is restored from eframe storage.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     scene_editor::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Scene Editor",
        options,
        Box::new(|cc| Ok(Box::new(SceneEditorApp::new(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_starts_empty() {
        let editor = Editor::default();
        assert!(editor.scene().is_empty());
        assert!(editor.containment().is_empty());
    }

    #[test]
    fn test_export_of_empty_editor() {
        let document = Editor::new().export();
        assert_eq!(document, ExportDocument::default());
    }

    #[test]
    fn test_draw_connect_drag_and_delete() {
        let scale = 50.0;
        let mut scene = Scene::new();
        scene
            .add_geometry(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 4.0),
            ])
            .unwrap();
        let waypoint = scene.add_waypoint(Point::new(2.0, 2.0), 0.3);
        let exit = scene.add_exit(RectBounds {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        });
        assert!(scene.connect(&waypoint, &exit, scale));

        let document = ExportDocument::from_scene(&scene);
        assert_eq!(document.geometry.len(), 1);
        assert_eq!(document.waypoints.len(), 1);
        assert_eq!(document.exits.len(), 1);
        assert_eq!(document.connections[0].from, waypoint);
        assert_eq!(document.connections[0].to, exit);

        scene.move_element(&waypoint, Point::new(3.0, 3.0), scale);
        assert_eq!(scene.connections()[0].points[..2], [150.0, 150.0]);

        scene.delete_element(&exit);
        let document = ExportDocument::from_scene(&scene);
        assert!(document.exits.is_empty());
        assert!(document.connections.is_empty());
        assert!(check_containment(&scene, None).is_empty());
    }
}

//! Export of the scene as the simulation input document.
//!
//! The document holds five arrays, one per scene collection. Element coordinates are in
//! world units while connection `points` stay in pixel space, exactly as cached on the
//! connections themselves.

use crate::scene::Scene;
use crate::types::*;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Failure while producing or writing an export document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document could not be serialized
    #[error("failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The document could not be written
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain snapshot of a scene, in the shape consumed by the simulation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Geometry polygons with flat point lists
    pub geometry: Vec<GeometryPolygon>,
    /// Waypoints
    pub waypoints: Vec<Waypoint>,
    /// Exits
    pub exits: Vec<RegionRect>,
    /// Distributions
    pub distributions: Vec<RegionRect>,
    /// Connections with pixel-space endpoints
    pub connections: Vec<Connection>,
}

impl ExportDocument {
    /// Copies every collection of `scene`.
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            geometry: scene.geometry().to_vec(),
            waypoints: scene.waypoints().to_vec(),
            exits: scene.exits().to_vec(),
            distributions: scene.distributions().to_vec(),
            connections: scene.connections().to_vec(),
        }
    }

    /// Serializes the document to pretty-printed JSON.
    ///
    /// # Returns
    ///
    /// The JSON text, or [`ExportError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document as JSON to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!("Exported scene to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SCALE: f32 = 10.0;

    fn sample_scene() -> (Scene, ElementId, ElementId) {
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
        assert!(scene.connect(&waypoint, &exit, SCALE));
        (scene, waypoint, exit)
    }

    #[test]
    fn test_export_document_shape() {
        let (scene, waypoint, exit) = sample_scene();

        let json = ExportDocument::from_scene(&scene).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let points = value["geometry"][0]["points"].as_array().unwrap();
        assert_eq!(points.len(), 8);
        assert_eq!(points[4].as_f64(), Some(4.0));

        assert_eq!(value["waypoints"][0]["id"], waypoint.as_str());
        assert_eq!(value["waypoints"][0]["radius"].as_f64().unwrap() as f32, 0.3);
        assert_eq!(value["exits"][0]["width"].as_f64(), Some(1.0));
        assert!(value["distributions"].as_array().unwrap().is_empty());

        let connection = &value["connections"][0];
        assert_eq!(connection["from"], waypoint.as_str());
        assert_eq!(connection["to"], exit.as_str());
        assert_eq!(
            connection["points"],
            serde_json::json!([20.0, 20.0, 5.0, 5.0])
        );
    }

    #[test]
    fn test_export_omits_internal_anchors() {
        let (scene, _, _) = sample_scene();

        let value = serde_json::to_value(ExportDocument::from_scene(&scene)).unwrap();

        let keys: Vec<&String> = value["connections"][0].as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_empty_scene_exports_five_empty_arrays() {
        let value = serde_json::to_value(ExportDocument::from_scene(&Scene::new())).unwrap();

        for key in ["geometry", "waypoints", "exits", "distributions", "connections"] {
            assert_eq!(value[key], serde_json::json!([]), "{key} should be empty");
        }
    }

    #[test]
    fn test_write_to_creates_file() {
        let (scene, _, _) = sample_scene();
        let path = std::env::temp_dir().join(format!(
            "scene_editor_export_{}.json",
            uuid::Uuid::new_v4().simple()
        ));

        ExportDocument::from_scene(&scene).write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: ExportDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.geometry, scene.geometry());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let (scene, _, _) = sample_scene();
        let path = std::env::temp_dir()
            .join("scene_editor_missing_dir")
            .join(uuid::Uuid::new_v4().simple().to_string())
            .join("out.json");

        let err = ExportDocument::from_scene(&scene).write_to(&path).unwrap_err();

        assert!(matches!(err, ExportError::Io(_)));
    }
}

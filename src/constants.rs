//! Shared application-wide constants.
//! Centralizes tweakable values used by the editing core and the canvas.

// Configuration defaults
/// Default grid spacing in world units (meters).
pub const DEFAULT_GRID_SPACING: f32 = 1.0;
/// Default scale in pixels per world unit.
pub const DEFAULT_SCALE: f32 = 50.0;
/// Default snapping/alignment threshold in world units.
pub const DEFAULT_SNAP_THRESHOLD: f32 = 0.2;

// Configuration bounds applied by `EditorConfig::sanitized`
/// Smallest accepted scale (pixels per world unit).
pub const MIN_SCALE: f32 = 1.0;
/// Largest accepted scale (pixels per world unit).
pub const MAX_SCALE: f32 = 500.0;
/// Smallest accepted grid spacing in world units.
pub const MIN_GRID_SPACING: f32 = 0.05;

// Geometry rules
/// Exits and distributions never shrink to this size or below (world units) during a corner drag.
pub const MIN_REGION_DIMENSION: f32 = 0.1;
/// Minimum number of vertices for a polygon to be committed.
pub const MIN_POLYGON_POINTS: usize = 2;

// Canvas interactions
/// Radius of the vertex/corner handles in screen pixels.
pub const HANDLE_RADIUS: f32 = 5.0;
/// Grab distance for handles in screen pixels.
pub const HANDLE_GRAB_RADIUS: f32 = 8.0;
/// Length of the arrow head drawn at the end of a connection, in screen pixels.
pub const ARROW_HEAD_LENGTH: f32 = 10.0;

/// File name offered when exporting a scene.
pub const EXPORT_FILE_NAME: &str = "simulation_data.json";

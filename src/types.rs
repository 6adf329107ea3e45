//! Core data types and structures for the scene editor.
//!
//! This module defines the scene elements (geometry polygons, waypoints, exits,
//! distributions and connections), their identifiers, and the editor configuration.
//! All element coordinates are stored in world units (meters).

use crate::constants;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A 2D point or vector. Interpreted as world units unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate (grows downwards, like the screen)
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Converts a pixel-space point to world units.
    pub fn to_world(self, scale: f32) -> Point {
        Point::new(
            crate::geometry::to_world(self.x, scale),
            crate::geometry::to_world(self.y, scale),
        )
    }

    /// Converts a world-space point to pixels.
    pub fn to_pixels(self, scale: f32) -> Point {
        Point::new(
            crate::geometry::to_pixels(self.x, scale),
            crate::geometry::to_pixels(self.y, scale),
        )
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// The four kinds of scene elements that can be hit, dragged, deleted and connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A closed wall/room polygon
    Geometry,
    /// A circular waypoint
    Waypoint,
    /// A rectangular exit
    Exit,
    /// A rectangular agent-spawn region
    Distribution,
}

impl ElementKind {
    /// Prefix used when generating identifiers of this kind.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ElementKind::Geometry => "g",
            ElementKind::Waypoint => "w",
            ElementKind::Exit => "e",
            ElementKind::Distribution => "d",
        }
    }

    /// Human readable name, used in warnings and the UI.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Geometry => "Geometry",
            ElementKind::Waypoint => "Waypoint",
            ElementKind::Exit => "Exit",
            ElementKind::Distribution => "Distribution",
        }
    }
}

/// Unique identifier of a scene element, e.g. `w-3f2a...`.
///
/// Identifiers are regenerated every session and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generates a fresh identifier for an element of the given kind.
    pub fn generate(kind: ElementKind) -> Self {
        Self(format!("{}-{}", kind.id_prefix(), Uuid::new_v4().simple()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Result of a hit test: which element was found and its anchor point.
///
/// The anchor is the circle/rectangle center, or the clicked point itself for polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHit {
    /// Identifier of the element that was hit
    pub id: ElementId,
    /// Kind of the element that was hit
    pub kind: ElementKind,
    /// Anchor point in world units
    pub anchor: Point,
}

/// A closed polygon describing walls or rooms.
///
/// The closing edge (last vertex back to the first) is implicit and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPolygon {
    /// Unique identifier
    pub id: ElementId,
    /// Ordered vertices, serialized as a flat `[x1, y1, x2, y2, ...]` list
    #[serde(with = "flat_points")]
    pub points: Vec<Point>,
}

/// A circular waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Unique identifier
    pub id: ElementId,
    /// Center x coordinate
    pub x: f32,
    /// Center y coordinate
    pub y: f32,
    /// Radius, never negative
    pub radius: f32,
}

impl Waypoint {
    /// Center of the waypoint.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Axis-aligned bounds anchored at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectBounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width, non-negative once normalized
    pub width: f32,
    /// Height, non-negative once normalized
    pub height: f32,
}

impl RectBounds {
    /// Builds normalized bounds spanning two arbitrary corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }
}

/// A rectangular region. Used for both exits and distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRect {
    /// Unique identifier
    pub id: ElementId,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl RegionRect {
    pub(crate) fn new(id: ElementId, bounds: RectBounds) -> Self {
        Self {
            id,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corner handle positions: 0 top-left, 1 top-right, 2 bottom-right, 3 bottom-left.
    pub fn corner(&self, index: usize) -> Option<Point> {
        let (right, bottom) = (self.x + self.width, self.y + self.height);
        match index {
            0 => Some(Point::new(self.x, self.y)),
            1 => Some(Point::new(right, self.y)),
            2 => Some(Point::new(right, bottom)),
            3 => Some(Point::new(self.x, bottom)),
            _ => None,
        }
    }

    /// Moves one corner to `target` while the diagonally opposite corner stays fixed.
    ///
    /// Each axis is only applied if the resulting dimension stays above
    /// [`constants::MIN_REGION_DIMENSION`], so the rectangle can neither collapse nor
    /// invert. Returns `false` for an unknown corner index.
    pub fn drag_corner(&mut self, index: usize, target: Point) -> bool {
        let min = constants::MIN_REGION_DIMENSION;
        let (moves_left, moves_top) = match index {
            0 => (true, true),
            1 => (false, true),
            2 => (false, false),
            3 => (true, false),
            _ => return false,
        };
        let (right, bottom) = (self.x + self.width, self.y + self.height);

        if moves_left {
            let width = right - target.x;
            if width > min {
                self.x = target.x;
                self.width = width;
            }
        } else {
            let width = target.x - self.x;
            if width > min {
                self.width = width;
            }
        }

        if moves_top {
            let height = bottom - target.y;
            if height > min {
                self.y = target.y;
                self.height = height;
            }
        } else {
            let height = target.y - self.y;
            if height > min {
                self.height = height;
            }
        }
        true
    }
}

/// A directed connection between two scene elements.
///
/// `points` is a cached projection `[x1, y1, x2, y2]` of both endpoint anchors in
/// pixel space. It is kept in sync by the scene whenever an endpoint moves or the
/// scale changes; the world-space anchors it is derived from are not exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Source element
    pub from: ElementId,
    /// Destination element
    pub to: ElementId,
    /// Cached endpoint coordinates in pixels
    pub points: [f32; 4],
    #[serde(skip)]
    pub(crate) from_anchor: Point,
    #[serde(skip)]
    pub(crate) to_anchor: Point,
}

impl Connection {
    /// Creates a connection between two hit elements, projecting their anchors with `scale`.
    pub fn new(from: &ElementHit, to: &ElementHit, scale: f32) -> Self {
        let mut connection = Self {
            from: from.id.clone(),
            to: to.id.clone(),
            points: [0.0; 4],
            from_anchor: from.anchor,
            to_anchor: to.anchor,
        };
        connection.project(scale);
        connection
    }

    /// Whether this connection references `id` at either end.
    pub fn touches(&self, id: &ElementId) -> bool {
        self.from == *id || self.to == *id
    }

    /// Recomputes the cached pixel points from the world anchors.
    pub(crate) fn project(&mut self, scale: f32) {
        let start = self.from_anchor.to_pixels(scale);
        let end = self.to_anchor.to_pixels(scale);
        self.points = [start.x, start.y, end.x, end.y];
    }
}

/// Editor configuration supplied by the configuration panel.
///
/// Read-only to the editing core, which assumes a [sanitized](EditorConfig::sanitized) value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing in world units
    pub grid_spacing: f32,
    /// Whether the grid is drawn
    pub show_grid: bool,
    /// Pixels per world unit
    pub scale: f32,
    /// Whether alignment guides are computed while dragging
    pub show_alignment_guides: bool,
    /// Snapping and alignment distance in world units
    pub snap_threshold: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_spacing: constants::DEFAULT_GRID_SPACING,
            show_grid: true,
            scale: constants::DEFAULT_SCALE,
            show_alignment_guides: false,
            snap_threshold: constants::DEFAULT_SNAP_THRESHOLD,
        }
    }
}

impl EditorConfig {
    /// Returns a copy with every numeric field clamped into its valid range.
    pub fn sanitized(self) -> Self {
        let scale = if self.scale.is_finite() {
            self.scale.clamp(constants::MIN_SCALE, constants::MAX_SCALE)
        } else {
            constants::DEFAULT_SCALE
        };
        let grid_spacing = if self.grid_spacing.is_finite() {
            self.grid_spacing.max(constants::MIN_GRID_SPACING)
        } else {
            constants::DEFAULT_GRID_SPACING
        };
        let snap_threshold = if self.snap_threshold.is_finite() {
            self.snap_threshold.max(0.0)
        } else {
            constants::DEFAULT_SNAP_THRESHOLD
        };
        Self {
            scale,
            grid_spacing,
            snap_threshold,
            ..self
        }
    }
}

/// Serializes polygon vertices as a flat coordinate list.
mod flat_points {
    use super::Point;
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(points.len() * 2))?;
        for point in points {
            seq.serialize_element(&point.x)?;
            seq.serialize_element(&point.y)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point>, D::Error> {
        let flat = Vec::<f32>::deserialize(deserializer)?;
        if flat.len() % 2 != 0 {
            return Err(D::Error::custom("odd number of polygon coordinates"));
        }
        Ok(flat
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect())
    }
}

//! Tool-driven editing session.
//!
//! [`Editor`] owns the scene plus all transient interaction state and turns pointer
//! events (in pixel space) into scene mutations according to the active [`Tool`].
//! Every handler runs to completion synchronously: the scene mutation, connection
//! refresh and containment check all happen before it returns.

use crate::export::ExportDocument;
use crate::geometry::find_element_at;
use crate::scene::Scene;
use crate::snap::{alignment_guides, snap_to_grid, AlignmentGuides};
use crate::types::*;
use crate::validation::{check_containment, ContainmentReport};
use log::debug;

/// The tools that can be active. No tool at all is represented by `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Click vertices, double-click to close a polygon
    Geometry,
    /// Click the center, then a point on the circumference
    Waypoint,
    /// Click two opposite corners
    Exit,
    /// Click two opposite corners
    Distribution,
    /// Click a source element, then a destination element
    Connection,
    /// Click an element to remove it
    Delete,
}

impl Tool {
    /// Every tool, in toolbar order.
    pub const ALL: [Tool; 6] = [
        Tool::Geometry,
        Tool::Waypoint,
        Tool::Exit,
        Tool::Distribution,
        Tool::Connection,
        Tool::Delete,
    ];

    /// Toolbar label.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Geometry => "Geometry Tool",
            Tool::Waypoint => "Waypoint Tool",
            Tool::Exit => "Exit Tool",
            Tool::Distribution => "Distribution Tool",
            Tool::Connection => "Connection Tool",
            Tool::Delete => "Delete Tool",
        }
    }
}

/// A rectangle being drawn. Width and height stay signed until committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRect {
    /// First clicked corner
    pub origin: Point,
    /// Signed width towards the pointer
    pub width: f32,
    /// Signed height towards the pointer
    pub height: f32,
}

impl PendingRect {
    fn at(origin: Point) -> Self {
        Self {
            origin,
            width: 0.0,
            height: 0.0,
        }
    }

    fn stretch_to(&mut self, pointer: Point) {
        self.width = pointer.x - self.origin.x;
        self.height = pointer.y - self.origin.y;
    }

    /// Normalized bounds of the rectangle drawn so far.
    pub fn bounds(&self) -> RectBounds {
        RectBounds::from_corners(
            self.origin,
            Point::new(self.origin.x + self.width, self.origin.y + self.height),
        )
    }
}

/// A connection waiting for its destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConnection {
    /// The armed source element
    pub from: ElementHit,
    /// Live pointer position in world units, for the rubber-band line
    pub cursor: Option<Point>,
}

/// In-progress construction state. Only one can exist at a time and it always belongs
/// to the active tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Vertices clicked so far
    Polygon(Vec<Point>),
    /// Center and live radius
    Waypoint {
        /// Clicked center
        center: Point,
        /// Distance from the center to the pointer
        radius: f32,
    },
    /// Exit being drawn
    Exit(PendingRect),
    /// Distribution being drawn
    Distribution(PendingRect),
    /// Connection with its source armed
    Connection(PendingConnection),
}

/// The element currently being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Dragged element
    pub id: ElementId,
    /// Its kind
    pub kind: ElementKind,
}

/// An editing session: the scene plus tool and gesture state.
#[derive(Debug, Clone)]
pub struct Editor {
    scene: Scene,
    tool: Option<Tool>,
    construction: Option<Construction>,
    pointer: Option<Point>,
    guides: AlignmentGuides,
    dragging: Option<DragState>,
    containment: ContainmentReport,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            tool: Some(Tool::Geometry),
            construction: None,
            pointer: None,
            guides: AlignmentGuides::default(),
            dragging: None,
            containment: ContainmentReport::default(),
        }
    }
}

impl Editor {
    /// Creates a session with an empty scene and the geometry tool selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene being edited.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The active tool, if any.
    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    /// Transient construction state of the active tool.
    pub fn construction(&self) -> Option<&Construction> {
        self.construction.as_ref()
    }

    /// Last known pointer position in world units.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Alignment guides of the current drag.
    pub fn guides(&self) -> AlignmentGuides {
        self.guides
    }

    /// The element being dragged, if any.
    pub fn dragging(&self) -> Option<&DragState> {
        self.dragging.as_ref()
    }

    /// Latest containment warnings.
    pub fn containment(&self) -> &ContainmentReport {
        &self.containment
    }

    /// Selects a tool. Switching to a different tool drops any unfinished construction.
    pub fn set_tool(&mut self, tool: Option<Tool>) {
        if self.tool != tool {
            self.construction = None;
        }
        self.tool = tool;
    }

    /// Clears the tool and every piece of transient state. Calling it again changes nothing.
    pub fn cancel(&mut self) {
        self.tool = None;
        self.construction = None;
        self.pointer = None;
        self.guides = AlignmentGuides::default();
        if self.dragging.take().is_some() {
            self.refresh_containment();
        }
    }

    /// Handles a primary button press at a pixel position.
    pub fn pointer_down(&mut self, pixel: Point, config: &EditorConfig) {
        if self.dragging.is_some() {
            return;
        }
        let Some(tool) = self.tool else {
            return;
        };
        let pos = pixel.to_world(config.scale);
        match tool {
            Tool::Delete => self.delete_at(pos),
            Tool::Geometry => self.add_polygon_vertex(pos),
            Tool::Waypoint => self.waypoint_click(pos),
            Tool::Exit | Tool::Distribution => self.region_click(tool, pos),
            Tool::Connection => self.connection_click(pos, config.scale),
        }
        self.refresh_containment();
    }

    /// Handles pointer movement: records the position and updates live previews.
    pub fn pointer_move(&mut self, pixel: Point, config: &EditorConfig) {
        let pos = pixel.to_world(config.scale);
        self.pointer = Some(pos);
        match self.construction.as_mut() {
            Some(Construction::Waypoint { center, radius }) => *radius = center.distance(pos),
            Some(Construction::Exit(rect)) | Some(Construction::Distribution(rect)) => {
                rect.stretch_to(pos)
            }
            Some(Construction::Connection(pending)) => pending.cursor = Some(pos),
            Some(Construction::Polygon(_)) | None => {}
        }
    }

    /// Handles a double click: closes the polygon under construction.
    ///
    /// Polygons with fewer than two vertices are dropped without a trace.
    pub fn double_click(&mut self) {
        if self.tool != Some(Tool::Geometry) {
            return;
        }
        if let Some(Construction::Polygon(points)) = self.construction.take() {
            if self.scene.add_geometry(points).is_none() {
                debug!("Polygon discarded on double click");
            }
            self.pointer = None;
            self.refresh_containment();
        }
    }

    /// Starts dragging a waypoint, exit or distribution.
    pub fn drag_start(&mut self, id: &ElementId) -> bool {
        match self.scene.kind_of(id) {
            Some(ElementKind::Geometry) | None => false,
            Some(kind) => {
                self.dragging = Some(DragState {
                    id: id.clone(),
                    kind,
                });
                self.refresh_containment();
                true
            }
        }
    }

    /// Moves the dragged element to a new pixel position (circle center or rectangle
    /// top-left), snapping to the grid and updating alignment guides.
    pub fn drag_move(&mut self, id: &ElementId, pixel: Point, config: &EditorConfig) {
        self.apply_drag(id, pixel, config);
    }

    /// Commits the final drag position and clears the drag state and guides.
    pub fn drag_end(&mut self, id: &ElementId, pixel: Point, config: &EditorConfig) {
        self.apply_drag(id, pixel, config);
        self.guides = AlignmentGuides::default();
        self.dragging = None;
        self.refresh_containment();
    }

    /// Ends the current drag, leaving the element where the last move put it.
    pub fn drag_abort(&mut self) {
        self.guides = AlignmentGuides::default();
        if self.dragging.take().is_some() {
            self.refresh_containment();
        }
    }

    /// Drags a vertex of a polygon or a corner of an exit/distribution to a pixel position.
    pub fn edge_drag(
        &mut self,
        id: &ElementId,
        index: usize,
        pixel: Point,
        config: &EditorConfig,
    ) -> bool {
        let pos = pixel.to_world(config.scale);
        let changed = self.scene.update_edge(id, index, pos, config.scale);
        if changed {
            self.refresh_containment();
        }
        changed
    }

    /// Re-projects cached connection points after the scale changed.
    pub fn rescale(&mut self, scale: f32) {
        self.scene.rescale_connections(scale);
    }

    /// Snapshot of the scene for export.
    pub fn export(&self) -> ExportDocument {
        ExportDocument::from_scene(&self.scene)
    }

    fn apply_drag(&mut self, id: &ElementId, pixel: Point, config: &EditorConfig) {
        let pos = snap_to_grid(
            pixel.to_world(config.scale),
            config.grid_spacing,
            config.snap_threshold,
        );
        if !self.scene.move_element(id, pos, config.scale) {
            return;
        }
        if config.show_alignment_guides {
            self.guides = alignment_guides(
                id,
                pos,
                self.scene.positioned_elements(),
                config.snap_threshold,
            );
        }
        self.refresh_containment();
    }

    fn delete_at(&mut self, pos: Point) {
        if let Some(hit) = find_element_at(&self.scene, pos) {
            self.scene.delete_element(&hit.id);
        }
    }

    fn add_polygon_vertex(&mut self, pos: Point) {
        match self.construction.as_mut() {
            Some(Construction::Polygon(points)) => {
                // A double click delivers a second press at the same spot.
                if points.last() != Some(&pos) {
                    points.push(pos);
                }
            }
            _ => self.construction = Some(Construction::Polygon(vec![pos])),
        }
    }

    fn waypoint_click(&mut self, pos: Point) {
        match self.construction.take() {
            Some(Construction::Waypoint { center, .. }) => {
                self.scene.add_waypoint(center, center.distance(pos));
            }
            _ => {
                self.construction = Some(Construction::Waypoint {
                    center: pos,
                    radius: 0.0,
                })
            }
        }
    }

    fn region_click(&mut self, tool: Tool, pos: Point) {
        match (tool, self.construction.take()) {
            (Tool::Exit, Some(Construction::Exit(rect))) => {
                self.scene.add_exit(RectBounds::from_corners(rect.origin, pos));
            }
            (Tool::Distribution, Some(Construction::Distribution(rect))) => {
                self.scene
                    .add_distribution(RectBounds::from_corners(rect.origin, pos));
            }
            (Tool::Exit, _) => self.construction = Some(Construction::Exit(PendingRect::at(pos))),
            _ => self.construction = Some(Construction::Distribution(PendingRect::at(pos))),
        }
    }

    fn connection_click(&mut self, pos: Point, scale: f32) {
        let Some(hit) = find_element_at(&self.scene, pos) else {
            // Clicking empty space keeps the armed source.
            return;
        };
        match self.construction.take() {
            Some(Construction::Connection(pending)) => {
                self.scene.add_connection(&pending.from, &hit, scale);
            }
            _ => {
                self.construction = Some(Construction::Connection(PendingConnection {
                    from: hit,
                    cursor: None,
                }))
            }
        }
    }

    fn refresh_containment(&mut self) {
        self.containment =
            check_containment(&self.scene, self.dragging.as_ref().map(|drag| &drag.id));
    }
}

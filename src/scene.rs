//! The scene store: authoritative element collections and their mutations.
//!
//! Every change to the scene goes through a named operation on [`Scene`]. Deleting an
//! element cascades to the connections that reference it, and moving an element keeps
//! the cached connection endpoints in sync (see the `connections` module).

use crate::constants;
use crate::types::*;
use log::{debug, info};

/// All elements of the scene being edited.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    geometry: Vec<GeometryPolygon>,
    waypoints: Vec<Waypoint>,
    exits: Vec<RegionRect>,
    distributions: Vec<RegionRect>,
    pub(crate) connections: Vec<Connection>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry polygons in creation order.
    pub fn geometry(&self) -> &[GeometryPolygon] {
        &self.geometry
    }

    /// Waypoints in creation order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Exits in creation order.
    pub fn exits(&self) -> &[RegionRect] {
        &self.exits
    }

    /// Distributions in creation order.
    pub fn distributions(&self) -> &[RegionRect] {
        &self.distributions
    }

    /// Connections in creation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Whether the scene holds no elements at all.
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
            && self.waypoints.is_empty()
            && self.exits.is_empty()
            && self.distributions.is_empty()
            && self.connections.is_empty()
    }

    /// Adds a polygon. Returns `None` if it has fewer than two vertices.
    pub fn add_geometry(&mut self, points: Vec<Point>) -> Option<ElementId> {
        if points.len() < constants::MIN_POLYGON_POINTS {
            debug!("Discarding polygon with {} vertices", points.len());
            return None;
        }
        let id = ElementId::generate(ElementKind::Geometry);
        info!("Added geometry {} with {} vertices", id, points.len());
        self.geometry.push(GeometryPolygon {
            id: id.clone(),
            points,
        });
        Some(id)
    }

    /// Adds a waypoint. Negative radii are clamped to zero.
    pub fn add_waypoint(&mut self, center: Point, radius: f32) -> ElementId {
        let id = ElementId::generate(ElementKind::Waypoint);
        info!("Added waypoint {} at ({:.2}, {:.2})", id, center.x, center.y);
        self.waypoints.push(Waypoint {
            id: id.clone(),
            x: center.x,
            y: center.y,
            radius: radius.max(0.0),
        });
        id
    }

    /// Adds an exit.
    pub fn add_exit(&mut self, bounds: RectBounds) -> ElementId {
        let id = ElementId::generate(ElementKind::Exit);
        info!("Added exit {}", id);
        self.exits.push(RegionRect::new(id.clone(), bounds));
        id
    }

    /// Adds a distribution.
    pub fn add_distribution(&mut self, bounds: RectBounds) -> ElementId {
        let id = ElementId::generate(ElementKind::Distribution);
        info!("Added distribution {}", id);
        self.distributions.push(RegionRect::new(id.clone(), bounds));
        id
    }

    /// Adds a connection between two hit elements.
    ///
    /// Rejected (returns `false`) when both ends are the same element or when either
    /// element does not exist.
    pub fn add_connection(&mut self, from: &ElementHit, to: &ElementHit, scale: f32) -> bool {
        if from.id == to.id {
            debug!("Rejected self-connection on {}", from.id);
            return false;
        }
        if self.kind_of(&from.id).is_none() || self.kind_of(&to.id).is_none() {
            debug!("Rejected connection {} -> {}: unknown endpoint", from.id, to.id);
            return false;
        }
        info!("Connected {} -> {}", from.id, to.id);
        self.connections.push(Connection::new(from, to, scale));
        true
    }

    /// Connects two elements by id, using [`Scene::endpoint_for`] as anchors.
    pub fn connect(&mut self, from: &ElementId, to: &ElementId, scale: f32) -> bool {
        match (self.endpoint_for(from), self.endpoint_for(to)) {
            (Some(from), Some(to)) => self.add_connection(&from, &to, scale),
            _ => false,
        }
    }

    /// Removes an element and every connection that references it.
    ///
    /// Returns the kind of the removed element, or `None` if no element has this id.
    pub fn delete_element(&mut self, id: &ElementId) -> Option<ElementKind> {
        let kind = self.kind_of(id)?;
        match kind {
            ElementKind::Geometry => self.geometry.retain(|g| g.id != *id),
            ElementKind::Waypoint => self.waypoints.retain(|w| w.id != *id),
            ElementKind::Exit => self.exits.retain(|e| e.id != *id),
            ElementKind::Distribution => self.distributions.retain(|d| d.id != *id),
        }
        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        info!(
            "Deleted {} {} and {} connection(s)",
            kind.label().to_lowercase(),
            id,
            before - self.connections.len()
        );
        Some(kind)
    }

    /// Moves a waypoint (center) or exit/distribution (top-left corner) to `pos`.
    ///
    /// Geometry polygons are reshaped per vertex through [`Scene::update_edge`] and cannot
    /// be moved here. Returns `false` when nothing was moved.
    pub fn move_element(&mut self, id: &ElementId, pos: Point, scale: f32) -> bool {
        let moved = match self.kind_of(id) {
            Some(ElementKind::Waypoint) => {
                for w in self.waypoints.iter_mut().filter(|w| w.id == *id) {
                    w.x = pos.x;
                    w.y = pos.y;
                }
                true
            }
            Some(ElementKind::Exit | ElementKind::Distribution) => {
                if let Some(r) = self.region_mut(id) {
                    r.x = pos.x;
                    r.y = pos.y;
                }
                true
            }
            Some(ElementKind::Geometry) | None => false,
        };
        if moved {
            self.recompute_endpoints(id, scale);
        }
        moved
    }

    /// Drags a handle of an element to `pos`.
    ///
    /// For polygons `index` is the vertex to move. For exits and distributions it is a
    /// corner (0 top-left, 1 top-right, 2 bottom-right, 3 bottom-left) and the opposite
    /// corner stays fixed. Returns `false` for unknown ids, circles, or bad indices.
    pub fn update_edge(&mut self, id: &ElementId, index: usize, pos: Point, scale: f32) -> bool {
        if let Some(polygon) = self.geometry.iter_mut().find(|g| g.id == *id) {
            return match polygon.points.get_mut(index) {
                Some(vertex) => {
                    *vertex = pos;
                    true
                }
                None => false,
            };
        }
        let changed = match self.region_mut(id) {
            Some(region) => region.drag_corner(index, pos),
            None => false,
        };
        if changed {
            self.recompute_endpoints(id, scale);
        }
        changed
    }

    /// Which collection holds `id`, if any.
    pub fn kind_of(&self, id: &ElementId) -> Option<ElementKind> {
        if self.geometry.iter().any(|g| g.id == *id) {
            Some(ElementKind::Geometry)
        } else if self.waypoints.iter().any(|w| w.id == *id) {
            Some(ElementKind::Waypoint)
        } else if self.exits.iter().any(|e| e.id == *id) {
            Some(ElementKind::Exit)
        } else if self.distributions.iter().any(|d| d.id == *id) {
            Some(ElementKind::Distribution)
        } else {
            None
        }
    }

    /// Anchor of a waypoint, exit or distribution (its center).
    ///
    /// Polygons have no intrinsic anchor and return `None`.
    pub fn anchor_of(&self, id: &ElementId) -> Option<Point> {
        self.waypoints
            .iter()
            .find(|w| w.id == *id)
            .map(Waypoint::center)
            .or_else(|| self.region(id).map(RegionRect::center))
    }

    /// Hit descriptor for an element identified by id.
    ///
    /// Polygons are anchored at their first vertex.
    pub fn endpoint_for(&self, id: &ElementId) -> Option<ElementHit> {
        let kind = self.kind_of(id)?;
        let anchor = match kind {
            ElementKind::Geometry => self
                .geometry
                .iter()
                .find(|g| g.id == *id)
                .and_then(|g| g.points.first().copied())?,
            _ => self.anchor_of(id)?,
        };
        Some(ElementHit {
            id: id.clone(),
            kind,
            anchor,
        })
    }

    /// Stored positions of every draggable element: waypoint centers and the
    /// top-left corners of exits and distributions.
    pub fn positioned_elements(&self) -> impl Iterator<Item = (&ElementId, Point)> + '_ {
        self.waypoints
            .iter()
            .map(|w| (&w.id, w.center()))
            .chain(
                self.exits
                    .iter()
                    .chain(self.distributions.iter())
                    .map(|r| (&r.id, r.position())),
            )
    }

    /// Stored position of a draggable element.
    pub fn position_of(&self, id: &ElementId) -> Option<Point> {
        self.positioned_elements()
            .find(|(element, _)| *element == id)
            .map(|(_, pos)| pos)
    }

    fn region(&self, id: &ElementId) -> Option<&RegionRect> {
        self.exits
            .iter()
            .chain(self.distributions.iter())
            .find(|r| r.id == *id)
    }

    fn region_mut(&mut self, id: &ElementId) -> Option<&mut RegionRect> {
        self.exits
            .iter_mut()
            .chain(self.distributions.iter_mut())
            .find(|r| r.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]
    }

    fn unit_bounds(x: f32, y: f32) -> RectBounds {
        RectBounds {
            x,
            y,
            width: 1.0,
            height: 1.0,
        }
    }

    #[test]
    fn test_scene_default() {
        let scene = Scene::default();

        assert!(scene.is_empty());
        assert!(scene.connections().is_empty());
    }

    #[test]
    fn test_add_elements_assigns_unique_ids() {
        let mut scene = Scene::new();

        let a = scene.add_waypoint(Point::new(1.0, 1.0), 0.5);
        let b = scene.add_waypoint(Point::new(1.0, 1.0), 0.5);
        let exit = scene.add_exit(unit_bounds(0.0, 0.0));

        assert_ne!(a, b);
        assert_eq!(scene.waypoints().len(), 2);
        assert_eq!(scene.kind_of(&exit), Some(ElementKind::Exit));
        assert_eq!(scene.kind_of(&a), Some(ElementKind::Waypoint));
    }

    #[test]
    fn test_add_geometry_requires_two_points() {
        let mut scene = Scene::new();

        assert!(scene.add_geometry(vec![Point::new(1.0, 1.0)]).is_none());
        assert!(scene.add_geometry(vec![]).is_none());
        assert!(scene.geometry().is_empty());
        assert!(scene
            .add_geometry(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)])
            .is_some());
    }

    #[test]
    fn test_negative_radius_is_clamped() {
        let mut scene = Scene::new();

        scene.add_waypoint(Point::new(0.0, 0.0), -2.0);

        assert_eq!(scene.waypoints()[0].radius, 0.0);
    }

    #[test]
    fn test_self_connection_is_rejected() {
        let mut scene = Scene::new();
        let w = scene.add_waypoint(Point::new(1.0, 1.0), 0.5);

        assert!(!scene.connect(&w, &w, 10.0));
        assert!(scene.connections().is_empty());
    }

    #[test]
    fn test_connection_to_unknown_element_is_rejected() {
        let mut scene = Scene::new();
        let w = scene.add_waypoint(Point::new(1.0, 1.0), 0.5);
        let ghost = ElementHit {
            id: ElementId::from("e-missing"),
            kind: ElementKind::Exit,
            anchor: Point::new(0.0, 0.0),
        };
        let from = scene.endpoint_for(&w).unwrap();

        assert!(!scene.add_connection(&from, &ghost, 10.0));
        assert!(scene.connections().is_empty());
    }

    #[test]
    fn test_delete_cascades_to_connections() {
        let mut scene = Scene::new();
        let a = scene.add_waypoint(Point::new(1.0, 1.0), 0.5);
        let b = scene.add_exit(unit_bounds(2.0, 2.0));
        let c = scene.add_distribution(unit_bounds(5.0, 5.0));
        assert!(scene.connect(&a, &b, 10.0));

        assert_eq!(scene.delete_element(&c), Some(ElementKind::Distribution));
        assert_eq!(scene.connections().len(), 1);

        assert_eq!(scene.delete_element(&a), Some(ElementKind::Waypoint));
        assert!(scene.connections().is_empty());
        assert!(scene.waypoints().is_empty());
        assert_eq!(scene.exits().len(), 1);
    }

    #[test]
    fn test_delete_unknown_element_is_noop() {
        let mut scene = Scene::new();
        scene.add_waypoint(Point::new(1.0, 1.0), 0.5);

        assert_eq!(scene.delete_element(&ElementId::from("w-unknown")), None);
        assert_eq!(scene.waypoints().len(), 1);
    }

    #[test]
    fn test_delete_geometry_cascades_too() {
        let mut scene = Scene::new();
        let room = scene.add_geometry(room()).unwrap();
        let exit = scene.add_exit(unit_bounds(1.0, 1.0));
        assert!(scene.connect(&room, &exit, 10.0));

        scene.delete_element(&room);

        assert!(scene.geometry().is_empty());
        assert!(scene.connections().is_empty());
    }

    #[test]
    fn test_move_element_ignores_geometry() {
        let mut scene = Scene::new();
        let room = scene.add_geometry(room()).unwrap();

        assert!(!scene.move_element(&room, Point::new(9.0, 9.0), 10.0));
        assert_eq!(scene.geometry()[0].points[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_move_region_sets_top_left() {
        let mut scene = Scene::new();
        let exit = scene.add_exit(unit_bounds(0.0, 0.0));

        assert!(scene.move_element(&exit, Point::new(3.0, 2.0), 10.0));

        assert_eq!(scene.exits()[0].position(), Point::new(3.0, 2.0));
        assert_eq!(scene.exits()[0].width, 1.0);
        assert_eq!(scene.position_of(&exit), Some(Point::new(3.0, 2.0)));
    }

    #[test]
    fn test_update_edge_moves_single_polygon_vertex() {
        let mut scene = Scene::new();
        let room = scene.add_geometry(room()).unwrap();

        assert!(scene.update_edge(&room, 2, Point::new(5.0, 6.0), 10.0));

        let points = &scene.geometry()[0].points;
        assert_eq!(points[2], Point::new(5.0, 6.0));
        assert_eq!(points[1], Point::new(4.0, 0.0));
        assert_eq!(points[3], Point::new(0.0, 4.0));
        assert!(!scene.update_edge(&room, 4, Point::new(1.0, 1.0), 10.0));
    }

    #[test]
    fn test_update_edge_on_region_keeps_opposite_corner() {
        let mut scene = Scene::new();
        let distribution = scene.add_distribution(RectBounds {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 2.0,
        });

        assert!(scene.update_edge(&distribution, 0, Point::new(0.0, 0.5), 10.0));

        let region = &scene.distributions()[0];
        assert_eq!(region.position(), Point::new(0.0, 0.5));
        assert_eq!(region.corner(2), Some(Point::new(3.0, 3.0)));
    }

    #[test]
    fn test_update_edge_rejects_waypoints() {
        let mut scene = Scene::new();
        let w = scene.add_waypoint(Point::new(1.0, 1.0), 0.5);

        assert!(!scene.update_edge(&w, 0, Point::new(2.0, 2.0), 10.0));
    }

    #[test]
    fn test_endpoint_for_polygon_uses_first_vertex() {
        let mut scene = Scene::new();
        let room = scene.add_geometry(room()).unwrap();

        let endpoint = scene.endpoint_for(&room).unwrap();

        assert_eq!(endpoint.kind, ElementKind::Geometry);
        assert_eq!(endpoint.anchor, Point::new(0.0, 0.0));
        assert_eq!(scene.anchor_of(&room), None);
    }
}

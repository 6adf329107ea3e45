//! Coordinate transforms and hit-testing predicates.
//!
//! Pointer input and rendering live in pixel space; everything the editor stores is
//! in world units. [`to_world`] and [`to_pixels`] are the only conversion points.

use crate::scene::Scene;
use crate::types::*;

/// Converts a pixel coordinate to world units.
pub fn to_world(px: f32, scale: f32) -> f32 {
    px / scale
}

/// Converts a world coordinate to pixels.
pub fn to_pixels(world: f32, scale: f32) -> f32 {
    world * scale
}

/// Even-odd ray casting test.
///
/// Casts a horizontal ray towards +x and counts edge crossings, treating the polygon
/// as closed. A crossing is only counted when the point lies strictly left of the edge,
/// so points on the right/bottom boundary of an axis-aligned square are outside while
/// points on its left/top boundary are inside. Fewer than 3 vertices is never inside.
pub fn point_in_polygon(x: f32, y: f32, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (pi, pj) = (vertices[i], vertices[j]);
        let crosses = (pi.y > y) != (pj.y > y)
            && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inclusive circle test (`d² <= r²`).
pub fn point_in_circle(x: f32, y: f32, cx: f32, cy: f32, radius: f32) -> bool {
    (x - cx).powi(2) + (y - cy).powi(2) <= radius.powi(2)
}

/// Inclusive axis-aligned rectangle test.
pub fn point_in_rect(x: f32, y: f32, rx: f32, ry: f32, width: f32, height: f32) -> bool {
    x >= rx && x <= rx + width && y >= ry && y <= ry + height
}

/// Finds the element under a world-space point.
///
/// Waypoints are searched first, then exits, then distributions, and geometry polygons
/// last, so small elements win over the rooms that contain them.
pub fn find_element_at(scene: &Scene, pos: Point) -> Option<ElementHit> {
    let (x, y) = (pos.x, pos.y);

    let waypoint = scene
        .waypoints()
        .iter()
        .find(|w| point_in_circle(x, y, w.x, w.y, w.radius))
        .map(|w| ElementHit {
            id: w.id.clone(),
            kind: ElementKind::Waypoint,
            anchor: w.center(),
        });
    if waypoint.is_some() {
        return waypoint;
    }

    let regions = [
        (scene.exits(), ElementKind::Exit),
        (scene.distributions(), ElementKind::Distribution),
    ];
    for (rects, kind) in regions {
        if let Some(rect) = rects
            .iter()
            .find(|r| point_in_rect(x, y, r.x, r.y, r.width, r.height))
        {
            return Some(ElementHit {
                id: rect.id.clone(),
                kind,
                anchor: rect.center(),
            });
        }
    }

    scene
        .geometry()
        .iter()
        .find(|g| point_in_polygon(x, y, &g.points))
        .map(|g| ElementHit {
            id: g.id.clone(),
            kind: ElementKind::Geometry,
            anchor: pos,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    fn room() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]
    }

    #[test]
    fn test_scale_round_trip() {
        for scale in [0.5_f32, 1.0, 10.0, 50.0, 137.5] {
            for world in [-12.25_f32, 0.0, 0.3, 3.0, 999.5] {
                let back = to_world(to_pixels(world, scale), scale);
                assert!((back - world).abs() <= 1e-4 * world.abs().max(1.0));
            }
        }
    }

    #[test]
    fn test_point_in_unit_square() {
        let square = unit_square();

        assert!(point_in_polygon(0.5, 0.5, &square));
        assert!(!point_in_polygon(1.5, 0.5, &square));
    }

    #[test]
    fn test_point_on_square_boundary_is_deterministic() {
        let square = unit_square();

        // Right edge is exclusive, left edge inclusive.
        assert!(!point_in_polygon(1.0, 0.5, &square));
        assert!(point_in_polygon(0.0, 0.5, &square));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let segment = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];

        assert!(!point_in_polygon(0.5, 0.5, &segment));
        assert!(!point_in_polygon(0.0, 0.0, &[]));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape open at the top
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(0.0, 3.0),
        ];

        assert!(point_in_polygon(0.5, 1.0, &u));
        assert!(!point_in_polygon(1.5, 1.0, &u));
        assert!(point_in_polygon(1.5, 2.5, &u));
    }

    #[test]
    fn test_circle_and_rect_boundaries_are_inclusive() {
        assert!(point_in_circle(3.0, 0.0, 0.0, 0.0, 3.0));
        assert!(!point_in_circle(3.01, 0.0, 0.0, 0.0, 3.0));
        assert!(point_in_rect(2.0, 1.0, 0.0, 0.0, 2.0, 1.0));
        assert!(!point_in_rect(2.1, 1.0, 0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn test_find_element_prefers_waypoints_over_regions_and_geometry() {
        let mut scene = Scene::new();
        let room_id = scene.add_geometry(room()).unwrap();
        let exit_id = scene.add_exit(RectBounds {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 2.0,
        });
        let waypoint_id = scene.add_waypoint(Point::new(2.0, 2.0), 0.3);

        let hit = find_element_at(&scene, Point::new(2.1, 2.0)).unwrap();
        assert_eq!(hit.id, waypoint_id);
        assert_eq!(hit.anchor, Point::new(2.0, 2.0));

        let hit = find_element_at(&scene, Point::new(1.2, 1.2)).unwrap();
        assert_eq!(hit.id, exit_id);
        assert_eq!(hit.kind, ElementKind::Exit);
        assert_eq!(hit.anchor, Point::new(2.0, 2.0));

        let hit = find_element_at(&scene, Point::new(0.5, 3.5)).unwrap();
        assert_eq!(hit.id, room_id);
        assert_eq!(hit.anchor, Point::new(0.5, 3.5));

        assert!(find_element_at(&scene, Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_find_element_exits_before_distributions() {
        let mut scene = Scene::new();
        let bounds = RectBounds {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        };
        let distribution_id = scene.add_distribution(bounds);
        let exit_id = scene.add_exit(bounds);

        let hit = find_element_at(&scene, Point::new(0.5, 0.5)).unwrap();

        assert_eq!(hit.id, exit_id);
        assert_ne!(hit.id, distribution_id);
    }
}

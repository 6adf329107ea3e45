//! Containment warnings: every waypoint, exit and distribution should sit inside a
//! geometry polygon.
//!
//! The check is advisory only and never blocks an edit.

use crate::geometry::point_in_polygon;
use crate::scene::Scene;
use crate::types::*;

/// Result of a containment pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainmentReport {
    /// Warnings for elements that are not being dragged
    pub warnings: Vec<String>,
    /// Warning for the element currently being dragged, reported on its own
    pub dragged: Option<String>,
}

impl ContainmentReport {
    /// Whether there is nothing to warn about.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.dragged.is_none()
    }

    /// All warnings, the dragged element's last.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.warnings
            .iter()
            .map(String::as_str)
            .chain(self.dragged.as_deref())
    }
}

fn inside_any(anchor: Point, scene: &Scene) -> bool {
    scene
        .geometry()
        .iter()
        .any(|g| point_in_polygon(anchor.x, anchor.y, &g.points))
}

fn outside_warning(kind: ElementKind, id: &ElementId) -> String {
    format!("{} {} is outside all geometries.", kind.label(), id)
}

/// Checks every waypoint, exit and distribution anchor against all geometry polygons.
///
/// The element identified by `dragged` is left out of the batch and checked on its own,
/// so its warning can be shown apart from the others while it moves.
pub fn check_containment(scene: &Scene, dragged: Option<&ElementId>) -> ContainmentReport {
    let mut report = ContainmentReport::default();

    let anchors = scene
        .waypoints()
        .iter()
        .map(|w| (ElementKind::Waypoint, &w.id, w.center()))
        .chain(scene.exits().iter().map(|e| (ElementKind::Exit, &e.id, e.center())))
        .chain(
            scene
                .distributions()
                .iter()
                .map(|d| (ElementKind::Distribution, &d.id, d.center())),
        );

    for (kind, id, anchor) in anchors {
        if inside_any(anchor, scene) {
            continue;
        }
        let warning = outside_warning(kind, id);
        if Some(id) == dragged {
            report.dragged = Some(warning);
        } else {
            report.warnings.push(warning);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_room() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_geometry(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 4.0),
            ])
            .unwrap();
        scene
    }

    #[test]
    fn test_elements_inside_produce_no_warnings() {
        let mut scene = scene_with_room();
        scene.add_waypoint(Point::new(2.0, 2.0), 0.3);
        scene.add_exit(RectBounds {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        });

        assert!(check_containment(&scene, None).is_empty());
    }

    #[test]
    fn test_element_outside_is_reported() {
        let mut scene = scene_with_room();
        let outside = scene.add_distribution(RectBounds {
            x: 6.0,
            y: 6.0,
            width: 1.0,
            height: 1.0,
        });

        let report = check_containment(&scene, None);

        assert_eq!(
            report.warnings,
            vec![format!("Distribution {} is outside all geometries.", outside)]
        );
        assert!(report.dragged.is_none());
    }

    #[test]
    fn test_no_geometry_warns_about_everything() {
        let mut scene = Scene::new();
        scene.add_waypoint(Point::new(1.0, 1.0), 0.2);
        scene.add_exit(RectBounds::default());

        assert_eq!(check_containment(&scene, None).warnings.len(), 2);
    }

    #[test]
    fn test_dragged_element_is_reported_separately() {
        let mut scene = scene_with_room();
        let stray = scene.add_waypoint(Point::new(9.0, 9.0), 0.2);
        let dragged = scene.add_waypoint(Point::new(8.0, 8.0), 0.2);

        let report = check_containment(&scene, Some(&dragged));

        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains(stray.as_str()));
        assert!(report.dragged.as_deref().unwrap().contains(dragged.as_str()));
        assert_eq!(report.iter().count(), 2);
    }

    #[test]
    fn test_dragged_element_inside_has_no_warning() {
        let mut scene = scene_with_room();
        let dragged = scene.add_waypoint(Point::new(1.0, 1.0), 0.2);

        let report = check_containment(&scene, Some(&dragged));

        assert!(report.is_empty());
    }
}

//! Grid snapping and alignment guides for dragged elements.

use crate::types::{ElementId, Point};

/// Snaps a world position to the nearest grid point.
///
/// Both axes must be within `snap_threshold` of their rounded value; otherwise the
/// original position is returned untouched. A non-positive grid spacing disables snapping.
pub fn snap_to_grid(pos: Point, grid_spacing: f32, snap_threshold: f32) -> Point {
    if grid_spacing <= 0.0 {
        return pos;
    }
    let snapped = Point::new(
        (pos.x / grid_spacing).round() * grid_spacing,
        (pos.y / grid_spacing).round() * grid_spacing,
    );
    if (pos.x - snapped.x).abs() <= snap_threshold && (pos.y - snapped.y).abs() <= snap_threshold {
        snapped
    } else {
        pos
    }
}

/// Transient guide lines shown while dragging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlignmentGuides {
    /// World x of a vertical guide line
    pub x: Option<f32>,
    /// World y of a horizontal guide line
    pub y: Option<f32>,
}

impl AlignmentGuides {
    /// Whether no guide is active.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Computes alignment guides for a dragged element against every other element.
///
/// An element whose x (or y) is closer than `snap_threshold` to the dragged position
/// produces a vertical (or horizontal) guide at its own coordinate. When several
/// elements match, the last one in iteration order wins.
pub fn alignment_guides<'a>(
    dragged_id: &ElementId,
    dragged_pos: Point,
    others: impl IntoIterator<Item = (&'a ElementId, Point)>,
    snap_threshold: f32,
) -> AlignmentGuides {
    let mut guides = AlignmentGuides::default();
    for (id, pos) in others {
        if id == dragged_id {
            continue;
        }
        if (pos.x - dragged_pos.x).abs() < snap_threshold {
            guides.x = Some(pos.x);
        }
        if (pos.y - dragged_pos.y).abs() < snap_threshold {
            guides.y = Some(pos.y);
        }
    }
    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_when_both_axes_are_close() {
        let snapped = snap_to_grid(Point::new(2.1, 3.95), 1.0, 0.2);

        assert_eq!(snapped, Point::new(2.0, 4.0));
    }

    #[test]
    fn test_snap_is_all_or_nothing() {
        // x is close to 2.0 but y is halfway between grid lines.
        let pos = Point::new(2.1, 3.5);

        assert_eq!(snap_to_grid(pos, 1.0, 0.2), pos);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let samples = [
            Point::new(2.1, 3.95),
            Point::new(2.1, 3.5),
            Point::new(-0.49, 7.01),
            Point::new(12.3, 0.04),
        ];
        for spacing in [0.5_f32, 1.0, 2.5] {
            for pos in samples {
                let once = snap_to_grid(pos, spacing, 0.2);
                assert_eq!(snap_to_grid(once, spacing, 0.2), once);
            }
        }
    }

    #[test]
    fn test_snap_disabled_for_non_positive_spacing() {
        let pos = Point::new(1.01, 1.01);

        assert_eq!(snap_to_grid(pos, 0.0, 1.0), pos);
    }

    #[test]
    fn test_alignment_guides_skip_the_dragged_element() {
        let dragged = ElementId::from("w-1");
        let other = ElementId::from("w-2");
        let elements = vec![(&dragged, Point::new(5.0, 5.0)), (&other, Point::new(5.1, 9.0))];

        let guides = alignment_guides(&dragged, Point::new(5.0, 5.0), elements, 0.2);

        assert_eq!(guides.x, Some(5.1));
        assert_eq!(guides.y, None);
    }

    #[test]
    fn test_alignment_guides_last_match_wins() {
        let dragged = ElementId::from("e-1");
        let a = ElementId::from("e-2");
        let b = ElementId::from("e-3");
        let elements = vec![(&a, Point::new(1.05, 1.0)), (&b, Point::new(0.95, 3.0))];

        let guides = alignment_guides(&dragged, Point::new(1.0, 8.0), elements, 0.2);

        assert_eq!(guides.x, Some(0.95));
        assert!(guides.y.is_none());
        assert!(!guides.is_empty());
    }
}

//! Keeps cached connection endpoints in sync with the elements they reference.

use crate::scene::Scene;
use crate::types::ElementId;

impl Scene {
    /// Re-projects every connection endpoint that references `id`.
    ///
    /// The source end gets the first coordinate pair, the destination end the second,
    /// both set to the element's current center in pixel space. Polygon endpoints keep
    /// the point that was clicked when the connection was made.
    pub(crate) fn recompute_endpoints(&mut self, id: &ElementId, scale: f32) {
        let Some(anchor) = self.anchor_of(id) else {
            return;
        };
        for connection in self.connections.iter_mut().filter(|c| c.touches(id)) {
            if connection.from == *id {
                connection.from_anchor = anchor;
            }
            if connection.to == *id {
                connection.to_anchor = anchor;
            }
            connection.project(scale);
        }
    }

    /// Re-projects every connection with a new scale.
    pub fn rescale_connections(&mut self, scale: f32) {
        for connection in &mut self.connections {
            connection.project(scale);
        }
    }
}

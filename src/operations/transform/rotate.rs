use std::sync::Arc;

use tracing::debug;

use crate::component::PatchCollection;
use crate::geometry::surface::{RotatedPatch, SharedSurface};
use crate::math::Axis;

/// Rotates every patch about a coordinate axis through the origin.
#[derive(Debug, Clone, Copy)]
pub struct Rotate {
    angle: f64,
    axis: Axis,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    ///
    /// * `angle` - Rotation angle in radians.
    #[must_use]
    pub fn new(angle: f64, axis: Axis) -> Self {
        Self { angle, axis }
    }

    /// Executes the rotation, returning the wrapped collection.
    #[must_use]
    pub fn execute(&self, patches: &PatchCollection) -> PatchCollection {
        debug!(angle = self.angle, axis = %self.axis, patches = patches.len(), "rotating patches");
        patches
            .iter()
            .map(|(key, surface)| {
                let rotated: SharedSurface =
                    Arc::new(RotatedPatch::new(surface.clone(), self.angle, self.axis));
                (key.clone(), rotated)
            })
            .collect()
    }
}

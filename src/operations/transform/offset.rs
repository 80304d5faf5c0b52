use std::sync::Arc;

use tracing::debug;

use crate::component::PatchCollection;
use crate::geometry::surface::{Offset, OffsetPatch, SharedSurface};

/// Displaces every patch by the same [`Offset`].
#[derive(Debug, Clone)]
pub struct ApplyOffset {
    offset: Offset,
}

impl ApplyOffset {
    /// Creates a new `ApplyOffset` operation.
    #[must_use]
    pub fn new(offset: Offset) -> Self {
        Self { offset }
    }

    /// Executes the offset, returning the wrapped collection.
    #[must_use]
    pub fn execute(&self, patches: &PatchCollection) -> PatchCollection {
        debug!(offset = ?self.offset, patches = patches.len(), "offsetting patches");
        patches
            .iter()
            .map(|(key, surface)| {
                let shifted: SharedSurface =
                    Arc::new(OffsetPatch::new(surface.clone(), self.offset.clone()));
                (key.clone(), shifted)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::transform::test_support::two_squares;

    #[test]
    fn function_offset_applies_to_all() {
        let shift = Offset::function(|_| Vector3::new(1.0, 0.0, 0.0));
        let out = ApplyOffset::new(shift).execute(&two_squares());
        let p = out["upper"].evaluate(0.0, 0.0).unwrap();
        assert!((p - Point3::new(1.0, 0.0, 1.0)).norm() < 1e-15);
    }
}

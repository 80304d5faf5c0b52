use std::sync::Arc;

use tracing::debug;

use crate::component::PatchCollection;
use crate::error::{ComponentError, Result};
use crate::geometry::surface::{MirroredPatch, SharedSurface};
use crate::math::Axis;

/// Suffix appended to the key of a reflected patch.
pub const MIRRORED_SUFFIX: &str = "_mirrored";

/// Reflects every patch through the coordinate plane normal to an axis.
#[derive(Debug, Clone, Copy)]
pub struct Mirror {
    axis: Axis,
    append: bool,
}

impl Mirror {
    /// Creates a new `Mirror` operation.
    ///
    /// With `append`, the reflected patches are added after the originals
    /// (e.g. to complete a symmetric half body); otherwise they replace them.
    #[must_use]
    pub fn new(axis: Axis, append: bool) -> Self {
        Self { axis, append }
    }

    /// Executes the reflection, returning the new collection.
    ///
    /// Reflected patches are keyed `<original>_mirrored`.
    ///
    /// # Errors
    ///
    /// Returns an error if, when appending, a derived key collides with an
    /// existing one.
    pub fn execute(&self, patches: &PatchCollection) -> Result<PatchCollection> {
        debug!(axis = %self.axis, append = self.append, patches = patches.len(), "reflecting patches");
        let mut out = if self.append {
            patches.clone()
        } else {
            PatchCollection::with_capacity(patches.len())
        };
        for (key, surface) in patches {
            let mirrored_key = format!("{key}{MIRRORED_SUFFIX}");
            let mirrored: SharedSurface = Arc::new(MirroredPatch::new(surface.clone(), self.axis));
            if out.insert(mirrored_key.clone(), mirrored).is_some() {
                return Err(ComponentError::DuplicatePatch(mirrored_key).into());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::transform::test_support::two_squares;

    #[test]
    fn append_doubles_collection() {
        let out = Mirror::new(Axis::Y, true).execute(&two_squares()).unwrap();
        assert_eq!(
            out.keys().collect::<Vec<_>>(),
            ["lower", "upper", "lower_mirrored", "upper_mirrored"]
        );
        assert!(!out["lower"].reverses_orientation());
        assert!(out["lower_mirrored"].reverses_orientation());
    }

    #[test]
    fn replace_keeps_size() {
        let out = Mirror::new(Axis::Z, false).execute(&two_squares()).unwrap();
        assert_eq!(out.keys().collect::<Vec<_>>(), ["lower_mirrored", "upper_mirrored"]);
        let p = out["upper_mirrored"].evaluate(0.5, 0.5).unwrap();
        assert!((p - Point3::new(0.5, 0.5, -1.0)).norm() < 1e-15);
    }

    #[test]
    fn colliding_key_rejected() {
        let mut patches = two_squares();
        let lower = patches["lower"].clone();
        patches.insert("lower_mirrored".into(), lower);
        assert!(Mirror::new(Axis::Y, true).execute(&patches).is_err());
    }
}

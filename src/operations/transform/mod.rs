mod curve;
mod mirror;
mod offset;
mod rotate;

pub use curve::Curve;
pub use mirror::{Mirror, MIRRORED_SUFFIX};
pub use offset::ApplyOffset;
pub use rotate::Rotate;

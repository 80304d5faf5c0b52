pub mod path;
pub mod surface;

pub use path::{Bezier, Line, Path, Polyline};
pub use surface::{
    ConePatch, CoonsPatch, Curvature, CurvatureAxis, CurvedPatch, FnSurface, MirroredPatch,
    Offset, OffsetPatch, RevolvedPatch, RotatedPatch, SharedSurface, Surface, SweptPatch,
};

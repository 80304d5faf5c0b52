pub mod component;
pub mod error;
pub mod geometry;
pub mod inertia;
pub mod io;
pub mod math;
pub mod operations;
pub mod sensitivity;
pub mod tessellation;

pub use error::{GeosensError, Result};

use thiserror::Error;

/// Top-level error type for the geosens crate.
#[derive(Debug, Error)]
pub enum GeosensError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Sensitivity(#[from] SensitivityError),

    #[error(transparent)]
    Inertia(#[from] InertiaError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors related to surface and path evaluation.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("value set for {option} = '{value}' is not supported")]
    UnsupportedOption { option: &'static str, value: String },
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation resolution is not set, define it component-wise or for the entire vehicle")]
    MissingResolution,

    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Errors related to component and vehicle bookkeeping.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("duplicate patch key: {0}")]
    DuplicatePatch(String),

    #[error("duplicate component name: {0}")]
    DuplicateComponent(String),

    #[error("component {0} has not been tessellated")]
    NotTessellated(String),
}

/// Errors raised while differencing nominal and perturbed geometry.
#[derive(Debug, Error)]
pub enum SensitivityError {
    #[error(
        "mesh topology of {component}/{patch} changed under perturbation \
         ({nominal} nominal vs {perturbed} perturbed vertices)"
    )]
    TopologyMismatch {
        component: String,
        patch: String,
        nominal: usize,
        perturbed: usize,
    },

    #[error("perturbed geometry is missing mesh {component}/{patch}")]
    MissingMesh { component: String, patch: String },

    #[error("perturbing parameter {parameter} produced a zero change")]
    ZeroPerturbation { parameter: String },

    #[error("no design parameters to perturb")]
    EmptyParameters,
}

/// Errors related to composite mass properties.
#[derive(Debug, Error)]
pub enum InertiaError {
    #[error("total mass is zero, composite centre of gravity is undefined")]
    ZeroTotalMass,

    #[error("no density given for class {class} of component {component}")]
    MissingDensity { component: String, class: String },
}

/// Errors related to reading and writing exported artifacts.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("sensitivity table line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("malformed tri document: {0}")]
    Tri(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for GeosensError {
    fn from(err: std::io::Error) -> Self {
        Self::Format(FormatError::Io(err))
    }
}

impl From<quick_xml::Error> for GeosensError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Format(FormatError::Xml(err))
    }
}

/// Convenience type alias for results using [`GeosensError`].
pub type Result<T> = std::result::Result<T, GeosensError>;

use thiserror::Error;

/// Top-level error type for the wire network engine.
#[derive(Debug, Error)]
pub enum WireNetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors related to geometric values and settings.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },
}

/// Errors related to the wire network.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("wire not found")]
    WireNotFound,

    #[error("point index {index} is out of range for a wire with {len} points")]
    PointIndexOutOfRange { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("wire lists a connection to a wire that no longer exists")]
    DanglingConnection,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Convenience type alias for results using [`WireNetError`].
pub type Result<T> = std::result::Result<T, WireNetError>;

mod junction_anchors;
mod validate_network;

pub use junction_anchors::JunctionAnchors;
pub use validate_network::ValidateNetwork;

pub mod segment;
pub mod wire_point;

pub use segment::Segment;
pub use wire_point::WirePoint;

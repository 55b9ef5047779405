mod append_point;
mod insert_point;
mod merge_wires;
mod move_junctions;
mod move_point;
mod move_segment;
mod prepend_point;
mod remove_point;
mod split_wire;
mod translate_wire;

pub use append_point::AppendPoint;
pub use insert_point::InsertPoint;
pub use merge_wires::MergeWires;
pub use move_junctions::MoveJunctionsToNewSegment;
pub use move_point::MovePoint;
pub use move_segment::MoveSegment;
pub use prepend_point::PrependPoint;
pub use remove_point::RemovePoint;
pub use split_wire::SplitWire;
pub use translate_wire::TranslateWire;

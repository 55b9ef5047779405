pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

#[cfg(test)]
mod test_support;

pub use error::{Result, WireNetError};

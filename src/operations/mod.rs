pub mod edit;
pub mod query;

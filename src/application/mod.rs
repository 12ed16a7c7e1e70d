pub mod cache;
pub mod monitor;
pub mod offline;
pub mod query;

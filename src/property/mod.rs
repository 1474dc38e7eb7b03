//! Property snapshots and portfolio loading

mod data;
pub mod loader;

pub use data::{PropertyRecord, PropertySnapshot};
pub use loader::{load_properties, load_properties_from_reader};

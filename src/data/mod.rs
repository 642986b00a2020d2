//! Data module: id-keyed entity storage
#![warn(missing_docs)]

pub mod entity_store;

pub use entity_store::EntityStore;

//! Utility implementations: in-memory dataset source and input shape checks

pub mod memory_dataset;
pub mod shape;

pub use memory_dataset::MemoryDataset;

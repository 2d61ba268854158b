// src/extractors/mod.rs
pub mod detectors;
pub mod generic;
pub mod locator;
pub mod matches;
pub mod resolver;

// Re-export key extraction types for convenience
pub use matches::Match;
pub use resolver::{PointerCategory, PointerResolver};

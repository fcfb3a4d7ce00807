//! Tag indexing for semantic discovery.

pub mod index;

pub use index::{TagIndex, WILDCARD_VALUE};

//! # cairn-classify
//!
//! Classification pipeline for job artifacts:
//!
//! - [`classify_context`] walks an arbitrarily nested evidence document,
//!   extracts leaf chunks, derives structural metadata (activity /
//!   sub-activity / question) from the traversal path, and buckets each
//!   chunk by category heuristics.
//! - [`classify_findings`] partitions a flat map of named findings into the
//!   PD / AE buckets by key-name heuristics.
//! - [`CategoryRegistry`] holds the category heuristics as an explicit
//!   value the caller owns and passes by reference; rules can be appended
//!   without touching any global state.
//!
//! Both classifiers are pure functions over their inputs: identical inputs
//! always yield identical outputs.

mod context;
mod document;
mod findings;
mod registry;

pub use context::classify_context;
pub use document::{DocNode, RawLeaf};
pub use findings::classify_findings;
pub use registry::{CategoryRegistry, CategoryRule};

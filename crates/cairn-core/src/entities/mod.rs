//! Entity structs for the Cairn review domain.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation. Entities are immutable once produced:
//! jobs are snapshots of the roster, chunks are produced only by the context
//! classifier, and bundles are rebuilt from cache or network per selection.

mod bundle;
mod chunk;
mod finding;
mod job;

pub use bundle::JobArtifactBundle;
pub use chunk::{ContextChunk, ProcessedContext};
pub use finding::{Finding, FindingsBundle, Row};
pub use job::Job;

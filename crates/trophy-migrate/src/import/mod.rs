//! Import handoff targets.
//!
//! - [`JsonLinesImportHandler`]: appends every handoff to a JSON Lines file
//! - [`StaticLanguages`]: target languages listed in the configuration

mod jsonl;
mod languages;

pub use jsonl::{HandoffLine, JsonLinesImportHandler};
pub use languages::StaticLanguages;

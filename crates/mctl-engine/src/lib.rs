mod error;
mod kind;
mod orchestrator;
mod parse;
mod pipeline;
mod reader;
mod splitter;

#[cfg(test)]
mod test_support;

pub use error::{EngineError, ManifestError};
pub use kind::extract_kind;
pub use orchestrator::{Mode, execute};
pub use parse::{parse_documents, parse_manifest};
pub use pipeline::{load_manifest, run_manifest};
pub use reader::read_manifest;
pub use splitter::{DOCUMENT_SEPARATOR, Document, split_documents};

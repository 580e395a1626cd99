use std::io;
use std::path::PathBuf;

use mctl_resources::ResourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("content cannot be empty")]
    EmptyContent,
    #[error("document {document}: property kind is missing")]
    MissingKind { document: usize },
    #[error("document {document}: unknown kind \"{kind}\" (known kinds: {known})")]
    UnknownKind {
        document: usize,
        kind: String,
        known: String,
    },
    #[error("document {document}: failed to decode {kind}: {source}")]
    Decode {
        document: usize,
        kind: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Execution(#[from] ResourceError),
}

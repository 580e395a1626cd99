use std::fmt;
use std::path::Path;

use mctl_client::RemoteApi;
use mctl_resources::{ManagedResource, ResourceRegistry};
use tracing::debug;

use crate::{
    EngineError, ManifestError, Mode, execute, parse_documents, read_manifest, split_documents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reading,
    Splitting,
    ParsingAll,
    Executing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Reading => "reading",
            Self::Splitting => "splitting",
            Self::ParsingAll => "parsing",
            Self::Executing => "executing",
            Self::Done => "done",
        })
    }
}

fn enter(phase: Phase, path: &Path) {
    debug!(%phase, manifest = %path.display(), "manifest phase");
}

/// Read, split and decode a manifest file without touching the remote API.
///
/// # Errors
///
/// Returns an error when the file is unreadable or empty, or when any
/// document fails to parse.
pub fn load_manifest(
    path: &Path,
    registry: &ResourceRegistry,
) -> Result<Vec<Box<dyn ManagedResource>>, ManifestError> {
    enter(Phase::Reading, path);
    let content = read_manifest(path)?;

    enter(Phase::Splitting, path);
    let documents = split_documents(&content);

    enter(Phase::ParsingAll, path);
    let resources = parse_documents(&documents, registry)?;
    debug!(documents = resources.len(), "manifest parsed");
    Ok(resources)
}

/// Parse a whole manifest, then run `mode` against every resource in order.
///
/// Nothing is sent to the remote API unless every document parsed.
///
/// # Errors
///
/// Returns the first read, parse or execution error.
pub fn run_manifest(
    path: &Path,
    mode: Mode,
    registry: &ResourceRegistry,
    remote: &dyn RemoteApi,
) -> Result<(), EngineError> {
    let resources = load_manifest(path, registry)?;

    enter(Phase::Executing, path);
    execute(&resources, mode, remote)?;

    enter(Phase::Done, path);
    Ok(())
}

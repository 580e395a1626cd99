use mctl_resources::{ManagedResource, ResourceRegistry};
use tracing::debug;

use crate::error::ManifestError;
use crate::kind::extract_kind;
use crate::splitter::{Document, split_documents};

/// Split and decode a whole manifest.
///
/// # Errors
///
/// Returns the first document error; no partial list is ever returned.
pub fn parse_manifest(
    content: &str,
    registry: &ResourceRegistry,
) -> Result<Vec<Box<dyn ManagedResource>>, ManifestError> {
    parse_documents(&split_documents(content), registry)
}

/// Decode every document into its concrete resource kind, in order.
///
/// # Errors
///
/// Returns an error when a document has no kind, names a kind the registry
/// does not know, or does not match its kind's schema.
pub fn parse_documents(
    documents: &[Document<'_>],
    registry: &ResourceRegistry,
) -> Result<Vec<Box<dyn ManagedResource>>, ManifestError> {
    documents
        .iter()
        .map(|document| parse_document(document, registry))
        .collect()
}

fn parse_document(
    document: &Document<'_>,
    registry: &ResourceRegistry,
) -> Result<Box<dyn ManagedResource>, ManifestError> {
    let Some(kind) = extract_kind(document.body) else {
        return Err(ManifestError::MissingKind {
            document: document.index,
        });
    };

    let Some(constructor) = registry.lookup(kind) else {
        return Err(ManifestError::UnknownKind {
            document: document.index,
            kind: kind.to_string(),
            known: registry.kinds().join(", "),
        });
    };

    let resource = constructor
        .construct(document.body)
        .map_err(|source| ManifestError::Decode {
            document: document.index,
            kind: constructor.kind(),
            source,
        })?;
    debug!(
        document = document.index,
        kind = resource.kind(),
        name = resource.name(),
        "decoded document"
    );
    Ok(resource)
}

/// Literal token separating documents. This is a plain text split: a
/// separator inside a quoted scalar still splits the document.
pub const DOCUMENT_SEPARATOR: &str = "\n---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    /// 1-based position among the non-blank documents of the manifest.
    pub index: usize,
    pub body: &'a str,
}

/// Split manifest text into documents, dropping whitespace-only chunks.
#[must_use]
pub fn split_documents(content: &str) -> Vec<Document<'_>> {
    content
        .split(DOCUMENT_SEPARATOR)
        .filter(|chunk| !chunk.trim().is_empty())
        .enumerate()
        .map(|(offset, body)| Document {
            index: offset + 1,
            body,
        })
        .collect()
}

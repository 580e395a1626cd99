use std::sync::LazyLock;

use regex::Regex;

// Matches indented keys too, so a nested `kind:` that precedes the top-level
// one is what gets picked up. Lines with a blank value never match.
#[allow(clippy::expect_used)]
static KIND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*kind[ \t]*:[ \t]*([^ \t\r\n].*?)[ \t]*\r?$")
        .expect("valid kind regex")
});

/// Find the kind discriminator of a document by scanning its raw text.
///
/// Returns the value of the first `kind: <value>` line, trimmed and with one
/// pair of surrounding quotes removed, or `None` when there is no such line
/// or its value is blank.
#[must_use]
pub fn extract_kind(document: &str) -> Option<&str> {
    let captures = KIND_PATTERN.captures(document)?;
    let value = strip_quotes(captures.get(1)?.as_str().trim());
    (!value.is_empty()).then_some(value)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}

use std::fmt;

use mctl_client::RemoteApi;
use mctl_resources::{ManagedResource, ResourceError};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    Delete,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Run the capability matching `mode` on every resource, strictly in order.
///
/// Stops at the first failure and returns that error unchanged. Resources
/// processed before the failure keep their remote changes.
///
/// # Errors
///
/// Returns the first error raised by a resource's capability call.
pub fn execute(
    resources: &[Box<dyn ManagedResource>],
    mode: Mode,
    remote: &dyn RemoteApi,
) -> Result<(), ResourceError> {
    for (index, resource) in resources.iter().enumerate() {
        info!(
            kind = resource.kind(),
            name = resource.name(),
            position = index + 1,
            total = resources.len(),
            "{mode}"
        );
        let outcome = match mode {
            Mode::Apply => resource.upsert(remote),
            Mode::Delete => resource.delete(remote),
        };
        if let Err(error) = outcome {
            let remaining = resources.len().saturating_sub(index + 1);
            warn!(
                kind = resource.kind(),
                name = resource.name(),
                remaining,
                "{mode} aborted after first failure ({remaining} resource(s) not attempted)"
            );
            return Err(error);
        }
    }

    Ok(())
}

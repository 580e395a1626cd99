use std::fmt;
use std::ops::Deref;

use mctl_client::{ClientError, RemoteApi};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod kinds;
mod registry;

pub use kinds::{Environment, Project, Variable, Webhook, WebhookEvent};
pub use registry::{KindConstructor, ResourceRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainValidationError {
    #[error("resource name must not be empty")]
    EmptyName,
    #[error("resource name must not contain '/': {name}")]
    NameContainsSlash { name: String },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Remote(#[from] ClientError),
    #[error("{kind} \"{name}\" requires {parent_kind} \"{parent_name}\", which does not exist")]
    MissingParent {
        kind: &'static str,
        name: String,
        parent_kind: &'static str,
        parent_name: String,
    },
    #[error("failed to encode {kind} \"{name}\" as JSON")]
    Encode {
        kind: &'static str,
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Capability contract shared by every resource kind.
///
/// The engine only ever holds `Box<dyn ManagedResource>` and never branches on
/// the concrete kind behind it.
pub trait ManagedResource: fmt::Debug {
    fn kind(&self) -> &'static str;

    fn name(&self) -> &str;

    /// Create the resource remotely, or bring the existing one in line with
    /// this definition.
    ///
    /// # Errors
    ///
    /// Returns an error when a prerequisite is missing or the remote call fails.
    fn upsert(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError>;

    /// Remove the resource remotely. Removing a resource that is already gone
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote call fails.
    fn delete(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError>;
}

/// Discriminator a concrete kind is registered under.
pub trait ResourceKind {
    const KIND: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a resource name wrapper, rejecting blank names and names that
    /// would escape their path segment.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is empty after trimming or contains `/`.
    pub fn new(name: String) -> Result<Self, DomainValidationError> {
        if name.trim().is_empty() {
            Err(DomainValidationError::EmptyName)
        } else if name.contains('/') {
            Err(DomainValidationError::NameContainsSlash { name })
        } else {
            Ok(Self(name))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use as a URL path segment.
    #[must_use]
    pub fn segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl TryFrom<String> for ResourceName {
    type Error = DomainValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceName {
    type Error = DomainValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for ResourceName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl From<ResourceName> for String {
    fn from(value: ResourceName) -> Self {
        value.0
    }
}

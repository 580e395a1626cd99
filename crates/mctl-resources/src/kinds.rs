use std::collections::BTreeMap;
use std::fmt;

use mctl_client::RemoteApi;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{ManagedResource, ResourceError, ResourceKind, ResourceName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: ResourceName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: ResourceName,
    pub project: ResourceName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub protected: bool,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: ResourceName,
    pub project: ResourceName,
    pub environment: ResourceName,
    pub value: String,
    #[serde(default)]
    pub sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub name: ResourceName,
    pub project: ResourceName,
    pub url: String,
    #[serde(deserialize_with = "non_empty_events")]
    pub events: Vec<WebhookEvent>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    DeploymentStarted,
    DeploymentSucceeded,
    DeploymentFailed,
    VariableChanged,
}

const fn default_active() -> bool {
    true
}

fn non_empty_events<'de, D>(deserializer: D) -> Result<Vec<WebhookEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let events = Vec::<WebhookEvent>::deserialize(deserializer)?;
    if events.is_empty() {
        return Err(serde::de::Error::custom(
            "webhook events must list at least one event",
        ));
    }
    Ok(events)
}

impl fmt::Debug for Variable {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.sensitive {
            "[REDACTED]"
        } else {
            self.value.as_str()
        };
        formatter
            .debug_struct("Variable")
            .field("name", &self.name)
            .field("project", &self.project)
            .field("environment", &self.environment)
            .field("value", &value)
            .field("sensitive", &self.sensitive)
            .finish()
    }
}

fn json_body<T>(resource: &T) -> Result<Value, ResourceError>
where
    T: Serialize + ManagedResource,
{
    serde_json::to_value(resource).map_err(|source| ResourceError::Encode {
        kind: resource.kind(),
        name: resource.name().to_string(),
        source,
    })
}

fn require_parent(
    remote: &dyn RemoteApi,
    child: &dyn ManagedResource,
    parent_kind: &'static str,
    parent_name: &ResourceName,
    parent_path: &str,
) -> Result<(), ResourceError> {
    if remote.get(parent_path)?.is_some() {
        return Ok(());
    }
    Err(ResourceError::MissingParent {
        kind: child.kind(),
        name: child.name().to_string(),
        parent_kind,
        parent_name: parent_name.to_string(),
    })
}

fn project_path(project: &ResourceName) -> String {
    format!("/projects/{}", project.segment())
}

fn environment_path(project: &ResourceName, environment: &ResourceName) -> String {
    format!(
        "{}/environments/{}",
        project_path(project),
        environment.segment()
    )
}

impl ResourceKind for Project {
    const KIND: &'static str = "Project";
}

impl ManagedResource for Project {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn upsert(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        remote.create_or_update(&project_path(&self.name), &json_body(self)?)?;
        Ok(())
    }

    fn delete(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        remote.delete(&project_path(&self.name))?;
        Ok(())
    }
}

impl ResourceKind for Environment {
    const KIND: &'static str = "Environment";
}

impl Environment {
    fn path(&self) -> String {
        environment_path(&self.project, &self.name)
    }
}

impl ManagedResource for Environment {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn upsert(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        require_parent(
            remote,
            self,
            Project::KIND,
            &self.project,
            &project_path(&self.project),
        )?;
        remote.create_or_update(&self.path(), &json_body(self)?)?;
        Ok(())
    }

    fn delete(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        remote.delete(&self.path())?;
        Ok(())
    }
}

impl ResourceKind for Variable {
    const KIND: &'static str = "Variable";
}

impl Variable {
    fn path(&self) -> String {
        format!(
            "{}/variables/{}",
            environment_path(&self.project, &self.environment),
            self.name.segment()
        )
    }
}

impl ManagedResource for Variable {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn upsert(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        require_parent(
            remote,
            self,
            Environment::KIND,
            &self.environment,
            &environment_path(&self.project, &self.environment),
        )?;
        remote.create_or_update(&self.path(), &json_body(self)?)?;
        Ok(())
    }

    fn delete(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        remote.delete(&self.path())?;
        Ok(())
    }
}

impl ResourceKind for Webhook {
    const KIND: &'static str = "Webhook";
}

impl Webhook {
    fn path(&self) -> String {
        format!(
            "{}/webhooks/{}",
            project_path(&self.project),
            self.name.segment()
        )
    }
}

impl ManagedResource for Webhook {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn upsert(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        require_parent(
            remote,
            self,
            Project::KIND,
            &self.project,
            &project_path(&self.project),
        )?;
        remote.create_or_update(&self.path(), &json_body(self)?)?;
        Ok(())
    }

    fn delete(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
        remote.delete(&self.path())?;
        Ok(())
    }
}

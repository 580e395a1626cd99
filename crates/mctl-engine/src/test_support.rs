use std::cell::RefCell;
use std::collections::BTreeSet;

use mctl_client::{ClientError, RemoteApi};
use mctl_resources::{ManagedResource, ResourceError, ResourceKind, ResourceRegistry};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Get(String),
    Put(String),
    Delete(String),
}

/// Remote double that records every call and fails on configured paths.
///
/// Every `GET` finds an object unless its path was marked absent.
#[derive(Debug, Default)]
pub struct RecordingRemote {
    calls: RefCell<Vec<RemoteCall>>,
    failing: BTreeSet<String>,
    absent: BTreeSet<String>,
}

fn path_set(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|path| (*path).to_string()).collect()
}

impl RecordingRemote {
    pub fn failing_on(paths: &[&str]) -> Self {
        Self {
            failing: path_set(paths),
            ..Self::default()
        }
    }

    pub fn with_absent(paths: &[&str]) -> Self {
        Self {
            absent: path_set(paths),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.borrow().clone()
    }

    fn check(&self, method: &'static str, path: &str) -> Result<(), ClientError> {
        if self.failing.contains(path) {
            return Err(conflict(method, path));
        }
        Ok(())
    }
}

pub fn conflict(method: &'static str, path: &str) -> ClientError {
    ClientError::Status {
        method,
        url: path.to_string(),
        status: 409,
        body: "conflict".to_string(),
    }
}

impl RemoteApi for RecordingRemote {
    fn get(&self, path: &str) -> Result<Option<Value>, ClientError> {
        self.calls.borrow_mut().push(RemoteCall::Get(path.to_string()));
        self.check("GET", path)?;
        Ok((!self.absent.contains(path)).then(|| json!({})))
    }

    fn create_or_update(&self, path: &str, _body: &Value) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(RemoteCall::Put(path.to_string()));
        self.check("PUT", path)
    }

    fn delete(&self, path: &str) -> Result<bool, ClientError> {
        self.calls
            .borrow_mut()
            .push(RemoteCall::Delete(path.to_string()));
        self.check("DELETE", path)?;
        Ok(true)
    }
}

macro_rules! fake_kind {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
        pub struct $name {
            pub name: String,
            #[serde(default)]
            pub value: Option<i64>,
        }

        impl ResourceKind for $name {
            const KIND: &'static str = $kind;
        }

        impl ManagedResource for $name {
            fn kind(&self) -> &'static str {
                Self::KIND
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn upsert(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
                remote.create_or_update(&format!("/{}/{}", $kind, self.name), &json!({}))?;
                Ok(())
            }

            fn delete(&self, remote: &dyn RemoteApi) -> Result<(), ResourceError> {
                remote.delete(&format!("/{}/{}", $kind, self.name))?;
                Ok(())
            }
        }
    };
}

fake_kind!(FakeA, "A");
fake_kind!(FakeB, "B");
fake_kind!(FakeC, "C");

pub fn fake_registry() -> ResourceRegistry {
    ResourceRegistry::default()
        .with::<FakeA>()
        .with::<FakeB>()
        .with::<FakeC>()
}

pub fn get(path: &str) -> RemoteCall {
    RemoteCall::Get(path.to_string())
}

pub fn put(path: &str) -> RemoteCall {
    RemoteCall::Put(path.to_string())
}

pub fn delete(path: &str) -> RemoteCall {
    RemoteCall::Delete(path.to_string())
}

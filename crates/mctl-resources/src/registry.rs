use serde::de::DeserializeOwned;

use crate::{Environment, ManagedResource, Project, ResourceKind, Variable, Webhook};

type Construct = fn(&str) -> Result<Box<dyn ManagedResource>, serde_yaml::Error>;

/// Builds one concrete kind from a YAML document and hands it back behind the
/// capability contract.
#[derive(Debug, Clone, Copy)]
pub struct KindConstructor {
    kind: &'static str,
    construct: Construct,
}

impl KindConstructor {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Decode `document` into the concrete type this constructor was registered for.
    ///
    /// # Errors
    ///
    /// Returns an error when the document does not match the kind's schema.
    pub fn construct(
        &self,
        document: &str,
    ) -> Result<Box<dyn ManagedResource>, serde_yaml::Error> {
        (self.construct)(document)
    }
}

fn decode_as<T>(document: &str) -> Result<Box<dyn ManagedResource>, serde_yaml::Error>
where
    T: ManagedResource + DeserializeOwned + 'static,
{
    let resource: T = serde_yaml::from_str(document)?;
    Ok(Box::new(resource))
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    constructors: Vec<KindConstructor>,
}

impl ResourceRegistry {
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
            .with::<Project>()
            .with::<Environment>()
            .with::<Variable>()
            .with::<Webhook>()
    }

    #[must_use]
    pub fn with<T>(mut self) -> Self
    where
        T: ResourceKind + ManagedResource + DeserializeOwned + 'static,
    {
        self.register::<T>();
        self
    }

    /// Register `T` under its kind, replacing any previous registration with
    /// the same (case-insensitive) name.
    pub fn register<T>(&mut self)
    where
        T: ResourceKind + ManagedResource + DeserializeOwned + 'static,
    {
        let constructor = KindConstructor {
            kind: T::KIND,
            construct: decode_as::<T>,
        };
        match self
            .constructors
            .iter_mut()
            .find(|existing| existing.kind.eq_ignore_ascii_case(T::KIND))
        {
            Some(existing) => *existing = constructor,
            None => self.constructors.push(constructor),
        }
    }

    #[must_use]
    pub fn lookup(&self, kind: &str) -> Option<KindConstructor> {
        self.constructors
            .iter()
            .find(|constructor| constructor.kind.eq_ignore_ascii_case(kind))
            .copied()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.constructors
            .iter()
            .map(|constructor| constructor.kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::ResourceRegistry;

    #[test]
    fn builtin_registers_every_kind() {
        let registry = ResourceRegistry::builtin();
        assert_eq!(
            registry.kinds(),
            vec!["Project", "Environment", "Variable", "Webhook"]
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = ResourceRegistry::builtin();
        let constructor = registry.lookup("project").expect("project is registered");
        assert_eq!(constructor.kind(), "Project");
    }

    #[test]
    fn lookup_rejects_unknown_kinds() {
        let registry = ResourceRegistry::builtin();
        assert!(registry.lookup("Cluster").is_none());
        assert!(ResourceRegistry::default().lookup("Project").is_none());
    }

    #[test]
    fn constructor_decodes_into_concrete_kind() {
        let registry = ResourceRegistry::builtin();
        let constructor = registry.lookup("Environment").expect("registered");
        let resource = constructor
            .construct("kind: Environment\nname: staging\nproject: web\n")
            .expect("decode environment");
        assert_eq!(resource.kind(), "Environment");
        assert_eq!(resource.name(), "staging");
    }

    #[test]
    fn constructor_reports_schema_mismatch() {
        let registry = ResourceRegistry::builtin();
        let constructor = registry.lookup("Environment").expect("registered");
        let error = constructor
            .construct("kind: Environment\nname: staging\n")
            .expect_err("project is required");
        assert!(error.to_string().contains("project"), "{error}");
    }

    #[test]
    fn re_registering_a_kind_replaces_it() {
        let mut registry = ResourceRegistry::builtin();
        registry.register::<crate::Project>();
        assert_eq!(registry.kinds().len(), 4);
    }
}

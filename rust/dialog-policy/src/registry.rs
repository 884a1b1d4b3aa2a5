use crate::{DialogPolicyError, Domain, Policy, construct, policy_name};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Default suffix appended to derived policy names.
pub const DEFAULT_POLICY_SUFFIX: &str = "Policy";

/// Configuration for a [`PolicyRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Appended to the Pascal cased, singular resource name.
    pub suffix: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_POLICY_SUFFIX.into(),
        }
    }
}

type Factory<D> = fn(
    Option<Arc<<D as Domain>::Actor>>,
    &str,
    Option<<D as Domain>::Qualifier>,
) -> Result<Box<dyn Policy<D>>, DialogPolicyError>;

fn factory<D, P>(
    actor: Option<Arc<D::Actor>>,
    action: &str,
    qualifier: Option<D::Qualifier>,
) -> Result<Box<dyn Policy<D>>, DialogPolicyError>
where
    D: Domain,
    P: Policy<D> + 'static,
{
    Ok(Box::new(construct::<D, P>(actor, action, qualifier)?))
}

/// Maps resource types to the policies guarding them.
///
/// Policies are registered up front, keyed by the name derived from the
/// resource type, so `sample` and `samples` resolve to the same policy.
/// Every resolution builds a fresh policy instance.
pub struct PolicyRegistry<D: Domain> {
    settings: RegistrySettings,
    factories: HashMap<String, Factory<D>>,
}

impl<D: Domain> PolicyRegistry<D> {
    /// An empty registry with default settings.
    pub fn new() -> Self {
        Self::with_settings(RegistrySettings::default())
    }

    /// An empty registry using `settings`.
    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            settings,
            factories: HashMap::new(),
        }
    }

    /// The settings this registry was built with.
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// The policy name `resource` resolves to.
    pub fn policy_name(&self, resource: &str) -> String {
        policy_name(resource, &self.settings.suffix)
    }

    fn derive(&self, resource: &str) -> Result<String, DialogPolicyError> {
        if resource.trim().is_empty() {
            return Err(DialogPolicyError::InvalidIdentifier(format!(
                "resource '{resource}' is blank"
            )));
        }
        Ok(self.policy_name(resource))
    }

    /// Register `P` as the policy for `resource`.
    pub fn register<P>(&mut self, resource: &str) -> Result<(), DialogPolicyError>
    where
        P: Policy<D> + 'static,
    {
        let policy = self.derive(resource)?;
        if self.factories.contains_key(&policy) {
            return Err(DialogPolicyError::DuplicatePolicy { policy });
        }
        tracing::debug!(resource, policy = %policy, "registered policy");
        self.factories.insert(policy, factory::<D, P>);
        Ok(())
    }

    /// Builder form of [`PolicyRegistry::register`].
    pub fn with<P>(mut self, resource: &str) -> Result<Self, DialogPolicyError>
    where
        P: Policy<D> + 'static,
    {
        self.register::<P>(resource)?;
        Ok(self)
    }

    /// Whether a policy is registered for `resource`.
    pub fn contains(&self, resource: &str) -> bool {
        self.factories.contains_key(&self.policy_name(resource))
    }

    /// Build the policy for `resource`, constructed for `actor` attempting
    /// `action` within `qualifier`.
    pub fn resolve(
        &self,
        resource: &str,
        actor: Option<Arc<D::Actor>>,
        action: &str,
        qualifier: Option<D::Qualifier>,
    ) -> Result<Box<dyn Policy<D>>, DialogPolicyError> {
        let policy = self.derive(resource)?;
        let Some(factory) = self.factories.get(&policy) else {
            tracing::warn!(resource, policy = %policy, "no policy registered");
            return Err(DialogPolicyError::PolicyNotFound {
                resource: resource.into(),
                policy,
            });
        };
        tracing::debug!(resource, policy = %policy, action, "resolved policy");
        factory(actor, action, qualifier)
    }
}

impl<D: Domain> Default for PolicyRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Domain> Debug for PolicyRegistry<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut policies: Vec<&String> = self.factories.keys().collect();
        policies.sort();
        f.debug_struct("PolicyRegistry")
            .field("settings", &self.settings)
            .field("policies", &policies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Actor, PolicyContext, Role};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    struct Nobody;

    impl Actor for Nobody {
        fn roles(&self) -> Vec<Role> {
            vec![]
        }
    }

    struct App;

    impl Domain for App {
        type Actor = Nobody;
        type Qualifier = u32;
        type Target = ();
        type Scope = ();
    }

    struct SamplePolicy(PolicyContext<App>);

    impl Policy<App> for SamplePolicy {
        fn can_access(&self) -> Result<bool, DialogPolicyError> {
            self.0.is_action("index")
        }

        fn build(context: PolicyContext<App>) -> Self {
            SamplePolicy(context)
        }
    }

    #[test_log::test]
    fn it_resolves_singular_and_plural_resources() -> TestResult {
        let registry = PolicyRegistry::<App>::new().with::<SamplePolicy>("sample")?;

        assert!(registry.resolve("sample", None, "index", None)?.can_access()?);
        assert!(registry.resolve("samples", None, "index", Some(7))?.can_access()?);
        assert!(!registry.resolve("samples", None, "destroy", None)?.can_access()?);
        Ok(())
    }

    #[test_log::test]
    fn it_fails_for_unregistered_resources() {
        let registry = PolicyRegistry::<App>::new();
        match registry.resolve("sample", None, "index", None) {
            Err(DialogPolicyError::PolicyNotFound { resource, policy }) => {
                assert_eq!(resource, "sample");
                assert_eq!(policy, "SamplePolicy");
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected resolution to fail"),
        }
    }

    #[test]
    fn it_rejects_duplicate_registrations() -> TestResult {
        let mut registry = PolicyRegistry::<App>::new();
        registry.register::<SamplePolicy>("samples")?;

        assert_eq!(
            registry.register::<SamplePolicy>("sample"),
            Err(DialogPolicyError::DuplicatePolicy {
                policy: "SamplePolicy".into()
            })
        );
        Ok(())
    }

    #[test]
    fn it_rejects_blank_resources() {
        let mut registry = PolicyRegistry::<App>::new();

        assert!(matches!(
            registry.register::<SamplePolicy>("  "),
            Err(DialogPolicyError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            registry.resolve("", None, "index", None),
            Err(DialogPolicyError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn it_uses_the_configured_suffix() -> TestResult {
        let settings: RegistrySettings = serde_json::from_str(r#"{ "suffix": "Perm" }"#)?;
        let registry = PolicyRegistry::<App>::with_settings(settings).with::<SamplePolicy>("sample")?;

        assert_eq!(registry.policy_name("samples"), "SamplePerm");
        assert!(registry.contains("sample"));
        assert!(!registry.contains("customer"));
        Ok(())
    }

    #[test]
    fn it_defaults_missing_settings() -> TestResult {
        let settings: RegistrySettings = serde_json::from_str("{}")?;
        assert_eq!(settings, RegistrySettings::default());
        assert_eq!(settings.suffix, DEFAULT_POLICY_SUFFIX);
        Ok(())
    }
}

//! Request-scoped authorization checks and their usage bookkeeping.

use crate::{DialogPolicyError, Domain, Policy, PolicyRegistry, humanize};
use std::sync::Arc;

/// What a request handler exposes to the authorization layer.
///
/// Implemented by whatever object carries the request: a controller, an
/// extractor or a plain context struct.
pub trait Handler<D: Domain> {
    /// The signed in actor, or `None` for anonymous requests.
    fn current_actor(&self) -> Option<Arc<D::Actor>>;

    /// The branch, tenant or similar dimension the request applies to.
    fn current_qualifier(&self) -> Option<D::Qualifier> {
        None
    }

    /// Whether this handler is exempt from enforcement, e.g. a login
    /// action.
    fn is_auth_exempt(&self) -> bool {
        false
    }
}

/// Which authorization operations a handler has exercised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    /// `can` was called.
    pub auth_used: bool,
    /// `scope` was called.
    pub scope_used: bool,
    /// `instance_can` was called.
    pub instance_checked: bool,
}

/// The subset of enforcement checks that applies to a handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    auth: bool,
    scope: bool,
    instance: bool,
}

impl Requirements {
    /// No checks.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every check.
    pub fn all() -> Self {
        Self {
            auth: true,
            scope: true,
            instance: true,
        }
    }

    /// Require `can`.
    pub fn auth(mut self) -> Self {
        self.auth = true;
        self
    }

    /// Require `scope`.
    pub fn scope(mut self) -> Self {
        self.scope = true;
        self
    }

    /// Require `instance_can`.
    pub fn instance(mut self) -> Self {
        self.instance = true;
        self
    }
}

/// Authorization entry point for a single request.
///
/// A guard is created at the start of a request and dropped at its end.
/// It records which checks the handler performed so the framework can
/// verify afterwards that none were skipped.
pub struct RequestGuard<'r, D: Domain> {
    registry: &'r PolicyRegistry<D>,
    actor: Option<Arc<D::Actor>>,
    qualifier: Option<D::Qualifier>,
    exempt: bool,
    usage: Usage,
}

impl<'r, D: Domain> RequestGuard<'r, D> {
    /// Create a guard for the request carried by `handler`.
    pub fn new(registry: &'r PolicyRegistry<D>, handler: &impl Handler<D>) -> Self {
        Self {
            registry,
            actor: handler.current_actor(),
            qualifier: handler.current_qualifier(),
            exempt: handler.is_auth_exempt(),
            usage: Usage::default(),
        }
    }

    /// Whether `action` is permitted on `resource` in general.
    ///
    /// The attempt is recorded even when it fails.
    pub fn can(&mut self, action: impl AsRef<str>, resource: &str) -> Result<bool, DialogPolicyError> {
        self.usage.auth_used = true;
        let action = action.as_ref();
        if self.resolve_policy(action, resource)?.can_access()? {
            return Ok(true);
        }
        Err(denied(
            action,
            resource,
            format!(
                "You are not authorized to perform this action on {}.",
                humanize(resource)
            ),
        ))
    }

    /// Whether `action` is permitted on `target`, an instance of
    /// `resource`.
    ///
    /// The attempt is recorded even when it fails.
    pub fn instance_can(
        &mut self,
        action: impl AsRef<str>,
        resource: &str,
        target: &D::Target,
    ) -> Result<bool, DialogPolicyError> {
        self.usage.instance_checked = true;
        let action = action.as_ref();
        if self
            .resolve_policy(action, resource)?
            .can_access_instance(target)?
        {
            return Ok(true);
        }
        Err(denied(
            action,
            resource,
            format!("You do not have access to this {}.", humanize(resource)),
        ))
    }

    /// The records of `resource` visible for `action`, exactly as the
    /// policy describes them.
    pub fn scope(&mut self, action: impl AsRef<str>, resource: &str) -> Result<D::Scope, DialogPolicyError> {
        self.usage.scope_used = true;
        self.resolve_policy(action.as_ref(), resource)?.scope()
    }

    /// Build the policy for `resource` without recording usage.
    pub fn resolve_policy(
        &self,
        action: &str,
        resource: &str,
    ) -> Result<Box<dyn Policy<D>>, DialogPolicyError> {
        self.registry
            .resolve(resource, self.actor.clone(), action, self.qualifier.clone())
    }

    /// Fail with [`DialogPolicyError::AuthNotUsed`] unless `can` was
    /// called.
    pub fn ensure_auth_used(&self) -> Result<(), DialogPolicyError> {
        self.ensure(self.usage.auth_used, DialogPolicyError::AuthNotUsed)
    }

    /// Fail with [`DialogPolicyError::ScopeNotUsed`] unless `scope` was
    /// called.
    pub fn ensure_scope_used(&self) -> Result<(), DialogPolicyError> {
        self.ensure(self.usage.scope_used, DialogPolicyError::ScopeNotUsed)
    }

    /// Fail with [`DialogPolicyError::InstanceNotProtected`] unless
    /// `instance_can` was called.
    pub fn ensure_instance_checked(&self) -> Result<(), DialogPolicyError> {
        self.ensure(
            self.usage.instance_checked,
            DialogPolicyError::InstanceNotProtected,
        )
    }

    /// Run the checks selected by `requirements`, in the order auth,
    /// scope, instance, stopping at the first failure.
    pub fn finish(&self, requirements: Requirements) -> Result<(), DialogPolicyError> {
        if requirements.auth {
            self.ensure_auth_used()?;
        }
        if requirements.scope {
            self.ensure_scope_used()?;
        }
        if requirements.instance {
            self.ensure_instance_checked()?;
        }
        Ok(())
    }

    /// Operations exercised so far.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Forget recorded usage, for hosts that reuse a guard across handler
    /// invocations.
    pub fn reset(&mut self) {
        self.usage = Usage::default();
    }

    fn ensure(&self, used: bool, error: DialogPolicyError) -> Result<(), DialogPolicyError> {
        if used || self.exempt {
            return Ok(());
        }
        tracing::error!(%error, "handler completed without authorization");
        Err(error)
    }
}

fn denied(action: &str, resource: &str, message: String) -> DialogPolicyError {
    tracing::warn!(action, resource, "access denied");
    DialogPolicyError::NotAuthorized {
        action: action.into(),
        resource: resource.into(),
        message,
    }
}

//! The policy contract and the state every policy is built from.

use crate::{Actor, DialogPolicyError, Identifier, IntoIdentifiers, Role, normalize};
use std::sync::Arc;

/// The types an application threads through its policies.
///
/// An application implements this once on a marker type. Every policy in a
/// [`PolicyRegistry`](crate::PolicyRegistry) shares the same domain.
pub trait Domain: 'static {
    /// Who is making the request.
    type Actor: Actor;

    /// A secondary dimension such as a branch or tenant.
    type Qualifier: Clone;

    /// The record type handed to instance checks.
    type Target: ?Sized;

    /// Description of the records visible to the actor. The core passes
    /// it through without looking at it.
    type Scope;
}

/// The state a policy is constructed from: actor, action, qualifier and
/// the roles fetched for the actor.
pub struct PolicyContext<D: Domain> {
    actor: Option<Arc<D::Actor>>,
    action: Identifier,
    qualifier: Option<D::Qualifier>,
    roles: Vec<Role>,
}

impl<D: Domain> PolicyContext<D> {
    /// Create a context for `actor` attempting `action` within `qualifier`.
    pub fn new(
        actor: Option<Arc<D::Actor>>,
        action: Identifier,
        qualifier: Option<D::Qualifier>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            actor,
            action,
            qualifier,
            roles,
        }
    }

    /// The actor, if the request is not anonymous.
    pub fn actor(&self) -> Option<&D::Actor> {
        self.actor.as_deref()
    }

    /// The action being attempted.
    pub fn action(&self) -> &Identifier {
        &self.action
    }

    /// The scope qualifier, if any.
    pub fn qualifier(&self) -> Option<&D::Qualifier> {
        self.qualifier.as_ref()
    }

    /// Roles fetched when the policy was constructed.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Whether the actor holds any of `requested`.
    ///
    /// Returns `Ok(false)` for an actor with no roles. A role whose
    /// identifier cannot be read is a configuration problem and is
    /// reported as [`DialogPolicyError::RoleFetch`].
    pub fn has_any_role(&self, requested: impl IntoIdentifiers) -> Result<bool, DialogPolicyError> {
        let requested = normalize(requested)?;
        for role in &self.roles {
            let identifier = role
                .identifier()
                .map_err(|error| DialogPolicyError::RoleFetch(error.to_string()))?;
            if requested.contains(&identifier) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the attempted action is one of `candidates`.
    pub fn is_action(&self, candidates: impl IntoIdentifiers) -> Result<bool, DialogPolicyError> {
        Ok(normalize(candidates)?.contains(&self.action))
    }
}

impl<D: Domain> Clone for PolicyContext<D> {
    fn clone(&self) -> Self {
        Self {
            actor: self.actor.clone(),
            action: self.action.clone(),
            qualifier: self.qualifier.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Permission rules for one resource type.
///
/// Only [`Policy::can_access`] is required. Resource types that never
/// expose instance checks or scopes can leave those out, and calling them
/// reports [`DialogPolicyError::Unsupported`].
pub trait Policy<D: Domain> {
    /// Whether the actor may perform the action on the resource type in
    /// general.
    fn can_access(&self) -> Result<bool, DialogPolicyError>;

    /// Whether the actor may perform the action on `target`.
    fn can_access_instance(&self, _target: &D::Target) -> Result<bool, DialogPolicyError> {
        Err(DialogPolicyError::Unsupported {
            policy: self.name().into(),
            operation: "instance checks",
        })
    }

    /// Which records the actor may see for the action.
    fn scope(&self) -> Result<D::Scope, DialogPolicyError> {
        Err(DialogPolicyError::Unsupported {
            policy: self.name().into(),
            operation: "scopes",
        })
    }

    /// Name used when reporting errors. Defaults to the type name without
    /// its module path.
    fn name(&self) -> &'static str {
        let path = std::any::type_name::<Self>();
        let path = path.split('<').next().unwrap_or(path);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Build the policy from its context.
    fn build(context: PolicyContext<D>) -> Self
    where
        Self: Sized;

    /// Fetch the roles of `actor`. Override when roles are not stored on
    /// the actor itself.
    fn fetch_roles(actor: Option<&D::Actor>) -> Result<Vec<Role>, DialogPolicyError>
    where
        Self: Sized,
    {
        Ok(actor.map(Actor::roles).unwrap_or_default())
    }
}

/// Construct `P` for `actor` attempting `action` within `qualifier`.
///
/// Roles are fetched exactly once, after the action is normalized. A
/// failure to fetch them fails construction.
pub fn construct<D, P>(
    actor: Option<Arc<D::Actor>>,
    action: &str,
    qualifier: Option<D::Qualifier>,
) -> Result<P, DialogPolicyError>
where
    D: Domain,
    P: Policy<D>,
{
    let action = Identifier::new(action)?;
    let roles = P::fetch_roles(actor.as_deref())?;
    Ok(P::build(PolicyContext::new(actor, action, qualifier, roles)))
}

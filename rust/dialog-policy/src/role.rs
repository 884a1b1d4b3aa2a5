use crate::{DialogPolicyError, Identifier, IntoIdentifiers, RoleSet};
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A role record that exposes its name, such as a row loaded from a
/// `roles` table.
pub trait NamedRole: Send + Sync {
    /// The role's name.
    fn name(&self) -> Cow<'_, str>;
}

/// A role as held by an [`Actor`].
///
/// Both representations go through [`Role::identifier`] so policies never
/// need to care which one an actor uses.
#[derive(Clone)]
pub enum Role {
    /// A bare identifier such as `admin`.
    Identifier(Identifier),
    /// A role record exposing a name.
    Named(Arc<dyn NamedRole>),
}

impl Role {
    /// Wrap a role record.
    pub fn named(record: impl NamedRole + 'static) -> Self {
        Self::Named(Arc::new(record))
    }

    /// The comparable identifier for this role.
    pub fn identifier(&self) -> Result<Identifier, DialogPolicyError> {
        match self {
            Role::Identifier(identifier) => Ok(identifier.clone()),
            Role::Named(record) => Identifier::new(record.name()),
        }
    }
}

impl Debug for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Identifier(identifier) => f.debug_tuple("Identifier").field(identifier).finish(),
            Role::Named(record) => f.debug_tuple("Named").field(&record.name()).finish(),
        }
    }
}

impl From<Identifier> for Role {
    fn from(value: Identifier) -> Self {
        Role::Identifier(value)
    }
}

impl TryFrom<&str> for Role {
    type Error = DialogPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Role::Identifier(Identifier::new(value)?))
    }
}

impl IntoIdentifiers for Role {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.insert(self.identifier()?);
        Ok(())
    }
}

impl IntoIdentifiers for &Role {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.insert(self.identifier()?);
        Ok(())
    }
}

/// The entity whose permissions are being evaluated.
pub trait Actor {
    /// Roles assigned to this actor.
    fn roles(&self) -> Vec<Role>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use testresult::TestResult;

    struct Record(&'static str);

    impl NamedRole for Record {
        fn name(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.0)
        }
    }

    #[test]
    fn it_extracts_identifiers_from_either_shape() -> TestResult {
        let bare = Role::try_from("admin")?;
        let record = Role::named(Record("admin"));

        assert_eq!(bare.identifier()?, record.identifier()?);
        Ok(())
    }

    #[test]
    fn it_fails_when_a_record_has_no_usable_name() {
        let record = Role::named(Record(""));
        assert!(matches!(
            record.identifier(),
            Err(DialogPolicyError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn it_normalizes_roles_alongside_strings() -> TestResult {
        let roles = vec![Role::named(Record("user")), Role::try_from("admin")?];
        assert_eq!(normalize(&roles)?, normalize(["admin", "user"])?);
        Ok(())
    }
}

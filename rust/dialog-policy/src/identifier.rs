use crate::DialogPolicyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A normalized, comparable name for an action or a role.
///
/// Identifiers compare exactly: `Admin` and `admin` are different
/// identifiers. The only requirement is that the name is not blank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Normalize `name` into an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, DialogPolicyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DialogPolicyError::InvalidIdentifier(format!(
                "'{name}' is blank"
            )));
        }
        Ok(Self(name))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for Identifier {
    type Err = DialogPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = DialogPolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = DialogPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

/// A flat set of normalized identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<Identifier>);

impl RoleSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier, returning whether it was new.
    pub fn insert(&mut self, identifier: Identifier) -> bool {
        self.0.insert(identifier)
    }

    /// Whether `identifier` is a member of this set.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.0.contains(identifier)
    }

    /// Whether this set shares at least one member with `other`.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Number of identifiers in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.0.iter()
    }
}

impl FromIterator<Identifier> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RoleSet {
    type Item = Identifier;
    type IntoIter = std::collections::btree_set::IntoIter<Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Any shape that can be flattened into identifiers: nothing, a single
/// name, a sequence of names, or sequences nested to any depth.
pub trait IntoIdentifiers {
    /// Add every identifier in `self` to `set`.
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError>;
}

/// Flatten `input` into a [`RoleSet`].
///
/// Normalizing an already normalized set yields the same set.
pub fn normalize(input: impl IntoIdentifiers) -> Result<RoleSet, DialogPolicyError> {
    let mut set = RoleSet::new();
    input.collect_into(&mut set)?;
    Ok(set)
}

impl IntoIdentifiers for () {
    fn collect_into(self, _set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        Ok(())
    }
}

impl<T: IntoIdentifiers> IntoIdentifiers for Option<T> {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        match self {
            Some(value) => value.collect_into(set),
            None => Ok(()),
        }
    }
}

impl IntoIdentifiers for Identifier {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.insert(self);
        Ok(())
    }
}

impl IntoIdentifiers for &Identifier {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.insert(self.clone());
        Ok(())
    }
}

impl IntoIdentifiers for &str {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.insert(Identifier::new(self)?);
        Ok(())
    }
}

impl IntoIdentifiers for String {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.insert(Identifier::new(self)?);
        Ok(())
    }
}

impl IntoIdentifiers for &String {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        self.as_str().collect_into(set)
    }
}

impl IntoIdentifiers for RoleSet {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.0.extend(self.0);
        Ok(())
    }
}

impl IntoIdentifiers for &RoleSet {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        set.0.extend(self.0.iter().cloned());
        Ok(())
    }
}

impl<T: IntoIdentifiers> IntoIdentifiers for Vec<T> {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        self.into_iter().try_for_each(|item| item.collect_into(set))
    }
}

impl<T: IntoIdentifiers, const N: usize> IntoIdentifiers for [T; N] {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        self.into_iter().try_for_each(|item| item.collect_into(set))
    }
}

impl<T: IntoIdentifiers + Clone> IntoIdentifiers for &[T] {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        self.iter().try_for_each(|item| item.clone().collect_into(set))
    }
}

impl<T: IntoIdentifiers + Clone, const N: usize> IntoIdentifiers for &[T; N] {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        self.as_slice().collect_into(set)
    }
}

impl<T: IntoIdentifiers + Clone> IntoIdentifiers for &Vec<T> {
    fn collect_into(self, set: &mut RoleSet) -> Result<(), DialogPolicyError> {
        self.as_slice().collect_into(set)
    }
}

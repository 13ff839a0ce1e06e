//! Opaque type identifiers and conjunctive type sets.
//!
//! A [`TypeId`] names a category of knowledge-graph entity ("/people/person",
//! "/book/written_work"). Types carry no structure of their own: two types are
//! related only through the pairwise intersection counts in the
//! [`CompatibilityMatrix`](crate::compat::CompatibilityMatrix), never by
//! subtyping.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque identifier for a knowledge-graph entity category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(String);

impl TypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TypeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A conjunctive type constraint: an entity must belong to *all* member types.
///
/// The empty set is the unconstrained constraint. Backed by an ordered set so
/// iteration (and everything derived from it, such as composed wire queries)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSet(BTreeSet<TypeId>);

impl TypeSet {
    /// The unconstrained (empty) type set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set containing a single type.
    pub fn single(ty: impl Into<TypeId>) -> Self {
        let mut set = BTreeSet::new();
        set.insert(ty.into());
        Self(set)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, ty: &TypeId) -> bool {
        self.0.contains(ty)
    }

    pub fn insert(&mut self, ty: impl Into<TypeId>) {
        self.0.insert(ty.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeId> {
        self.0.iter()
    }

    /// The union of two constraints: an entity satisfying the result belongs
    /// to every type of both inputs.
    pub fn union(&self, other: &TypeSet) -> TypeSet {
        let mut set = self.0.clone();
        set.extend(other.0.iter().cloned());
        TypeSet(set)
    }
}

impl FromIterator<TypeId> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for TypeSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(TypeId::from).collect())
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_unconstrained() {
        let set = TypeSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn union_merges_and_dedups() {
        let a: TypeSet = ["/people/person", "/book/author"].into_iter().collect();
        let b: TypeSet = ["/book/author", "/film/director"].into_iter().collect();
        let u = a.union(&b);
        assert_eq!(u.len(), 3);
        assert!(u.contains(&TypeId::from("/people/person")));
        assert!(u.contains(&TypeId::from("/film/director")));
    }

    #[test]
    fn iteration_is_ordered() {
        let set: TypeSet = ["/b", "/a", "/c"].into_iter().collect();
        let ids: Vec<&str> = set.iter().map(TypeId::as_str).collect();
        assert_eq!(ids, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn display_renders_braces() {
        let set = TypeSet::single("/people/person");
        assert_eq!(format!("{set}"), "{/people/person}");
    }
}

//! Compound resolver chains
//!
//! [`compact`] merges resolvers into one first-hit-wins chain. Chains are
//! kept flat and free of duplicate members so that repeatedly re-wrapping a
//! tree does not grow them.

use crate::resolver::{same_resolver, PropertyResolver, SharedResolver};
use smallvec::SmallVec;
use std::sync::Arc;

/// Ordered chain of resolvers, queried strictly in order
///
/// # Invariants
/// - No member is itself a chain
/// - No two members are the same resolver instance
#[derive(Debug, Clone, Default)]
pub struct CompoundResolver {
    resolvers: SmallVec<[SharedResolver; 4]>,
}

impl CompoundResolver {
    /// Build a flat, deduplicated chain
    #[must_use]
    pub fn new<I>(resolvers: I) -> Self
    where
        I: IntoIterator<Item = SharedResolver>,
    {
        let mut flat: SmallVec<[SharedResolver; 4]> = SmallVec::new();
        for resolver in resolvers {
            match resolver.members() {
                Some(members) => {
                    for member in members {
                        push_unique(&mut flat, member);
                    }
                }
                None => push_unique(&mut flat, &resolver),
            }
        }
        Self { resolvers: flat }
    }

    /// Members in query order
    #[inline]
    #[must_use]
    pub fn resolvers(&self) -> &[SharedResolver] {
        &self.resolvers
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Check if chain has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

fn push_unique(chain: &mut SmallVec<[SharedResolver; 4]>, resolver: &SharedResolver) {
    if !chain.iter().any(|existing| same_resolver(existing, resolver)) {
        chain.push(Arc::clone(resolver));
    }
}

impl PropertyResolver for CompoundResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        self.resolvers.iter().find_map(|r| r.resolve(key))
    }

    fn members(&self) -> Option<&[SharedResolver]> {
        Some(&self.resolvers)
    }
}

/// Merge resolvers into a single chain
///
/// Inputs that are chains are flattened one level, duplicate instances
/// collapse onto their earliest position. A chain that ends up with exactly
/// one member is returned as that member.
#[must_use]
pub fn compact<I>(resolvers: I) -> SharedResolver
where
    I: IntoIterator<Item = SharedResolver>,
{
    let mut chain = CompoundResolver::new(resolvers);
    if chain.resolvers.len() == 1 {
        if let Some(only) = chain.resolvers.pop() {
            return only;
        }
    }
    Arc::new(chain)
}

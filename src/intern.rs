use std::{collections::HashSet, hash::Hash, sync::Arc};

use log::debug;

use crate::model::{
    GroupArtifact, GroupArtifactVersion, RequestedDependency, ResolvedDependency,
    ResolvedGroupArtifactVersion,
};

/// Content-addressed cache handing out one shared instance per distinct value.
///
/// Equality of the stored values decides identity; `Arc::ptr_eq` on the
/// results is only a shortcut for it.
#[derive(Debug)]
pub struct Interner<T> {
    values: HashSet<Arc<T>>,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Interner {
            values: HashSet::new(),
        }
    }
}

impl<T> Interner<T>
where
    T: Eq + Hash,
{
    /// Returns the stored instance equal to `candidate`, storing `candidate` if there is none.
    pub fn intern(&mut self, candidate: T) -> Arc<T> {
        if let Some(existing) = self.values.get(&candidate) {
            return existing.clone();
        }
        let value = Arc::new(candidate);
        self.values.insert(value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Interning state for model builds, one cache per entity kind.
///
/// A context is owned by its caller and passed to every build. Builds that
/// share a context share identities; unrelated builds should either use a
/// fresh context or call [`ModelContext::reset_caches`] in between.
#[derive(Debug, Default)]
pub struct ModelContext {
    group_artifacts: Interner<GroupArtifact>,
    group_artifact_versions: Interner<GroupArtifactVersion>,
    resolved_group_artifact_versions: Interner<ResolvedGroupArtifactVersion>,
    requested: Interner<RequestedDependency>,
    resolved: Interner<ResolvedDependency>,
}

impl ModelContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_artifact(&mut self, candidate: GroupArtifact) -> Arc<GroupArtifact> {
        self.group_artifacts.intern(candidate)
    }

    pub fn group_artifact_version(
        &mut self,
        candidate: GroupArtifactVersion,
    ) -> Arc<GroupArtifactVersion> {
        self.group_artifact_versions.intern(candidate)
    }

    pub fn resolved_group_artifact_version(
        &mut self,
        candidate: ResolvedGroupArtifactVersion,
    ) -> Arc<ResolvedGroupArtifactVersion> {
        self.resolved_group_artifact_versions.intern(candidate)
    }

    pub fn requested(&mut self, candidate: RequestedDependency) -> Arc<RequestedDependency> {
        self.requested.intern(candidate)
    }

    pub fn resolved(&mut self, candidate: ResolvedDependency) -> Arc<ResolvedDependency> {
        self.resolved.intern(candidate)
    }

    /// Total number of interned instances across all caches.
    pub fn len(&self) -> usize {
        self.group_artifacts.len()
            + self.group_artifact_versions.len()
            + self.resolved_group_artifact_versions.len()
            + self.requested.len()
            + self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every interned instance. Models already built keep their own references.
    pub fn reset_caches(&mut self) {
        debug!("Clearing {} interned model instances", self.len());
        self.group_artifacts.clear();
        self.group_artifact_versions.clear();
        self.resolved_group_artifact_versions.clear();
        self.requested.clear();
        self.resolved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gav(version: &str) -> GroupArtifactVersion {
        GroupArtifactVersion::new("com.foo", "bar", Some(version))
    }

    #[test]
    fn equal_values_share_an_instance() {
        let mut context = ModelContext::new();
        let first = context.group_artifact_version(gav("1.0"));
        let second = context.group_artifact_version(gav("1.0"));
        let other = context.group_artifact_version(gav("1.1"));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn unspecified_and_absent_versions_collapse() {
        let mut context = ModelContext::new();
        let unspecified = context.group_artifact_version(gav("unspecified"));
        let absent =
            context.group_artifact_version(GroupArtifactVersion::new("com.foo", "bar", None));
        assert!(Arc::ptr_eq(&unspecified, &absent));
    }

    #[test]
    fn caches_are_independent_per_kind() {
        let mut context = ModelContext::new();
        context.group_artifact(GroupArtifact::new("com.foo", "bar"));
        context.resolved_group_artifact_version(ResolvedGroupArtifactVersion::new(
            "com.foo", "bar", "1.0",
        ));
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn reset_forgets_identities() {
        let mut context = ModelContext::new();
        let before = context.group_artifact(GroupArtifact::new("com.foo", "bar"));
        context.reset_caches();
        assert!(context.is_empty());

        let after = context.group_artifact(GroupArtifact::new("com.foo", "bar"));
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before, after);
    }
}

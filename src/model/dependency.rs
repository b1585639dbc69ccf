use std::sync::Arc;

use serde::Serialize;

use super::{GroupArtifact, GroupArtifactVersion, ResolvedGroupArtifactVersion};

/// Where a requested dependency came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestOrigin {
    /// Read from the project's own declarations.
    Declared,
    /// Reconstructed from a resolved node because no declaration matched it.
    /// Such a request carries the resolved version and cannot reflect
    /// exclusions or classifiers that only exist on the true declaration.
    Inferred,
}

/// A dependency edge as declared by a configuration, before resolution.
///
/// Exclusions are always empty: the declaration API for exclusions is not read yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestedDependency {
    pub gav: Arc<GroupArtifactVersion>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<String>,
    pub origin: RequestOrigin,
    pub exclusions: Vec<Arc<GroupArtifact>>,
}

impl RequestedDependency {
    pub fn group(&self) -> &str {
        &self.gav.group
    }

    pub fn artifact(&self) -> &str {
        &self.gav.artifact
    }

    pub fn version(&self) -> Option<&str> {
        self.gav.version.as_deref()
    }

    pub fn is_inferred(&self) -> bool {
        self.origin == RequestOrigin::Inferred
    }
}

/// License placeholder; the resolver does not report licenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A node of a configuration's resolved tree. Roots have depth 0 and each
/// child sits exactly one level below its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedDependency {
    pub gav: Arc<ResolvedGroupArtifactVersion>,
    pub depth: usize,
    pub requested: Arc<RequestedDependency>,
    pub licenses: Vec<License>,
    pub dependencies: Vec<Arc<ResolvedDependency>>,
}

impl ResolvedDependency {
    pub fn group(&self) -> &str {
        &self.gav.group
    }

    pub fn artifact(&self) -> &str {
        &self.gav.artifact
    }

    pub fn version(&self) -> &str {
        &self.gav.version
    }

    /// Depth-first search of this node and its descendants.
    pub fn find_dependency(&self, group: &str, artifact: &str) -> Option<&ResolvedDependency> {
        if self.group() == group && self.artifact() == artifact {
            return Some(self);
        }
        self.dependencies
            .iter()
            .find_map(|child| child.find_dependency(group, artifact))
    }

    /// Number of nodes in this subtree, counting repeated subtrees every time they appear.
    pub fn tree_size(&self) -> usize {
        1 + self
            .dependencies
            .iter()
            .map(|child| child.tree_size())
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(
        coordinate: &str,
        depth: usize,
        children: Vec<Arc<ResolvedDependency>>,
    ) -> Arc<ResolvedDependency> {
        let gav = ResolvedGroupArtifactVersion::from_coordinate(coordinate).unwrap();
        let requested = RequestedDependency {
            gav: Arc::new(GroupArtifactVersion::new(
                gav.group.as_str(),
                gav.artifact.as_str(),
                Some(gav.version.as_str()),
            )),
            artifact_type: Some("jar".to_string()),
            classifier: None,
            scope: "runtime".to_string(),
            optional: None,
            origin: RequestOrigin::Inferred,
            exclusions: vec![],
        };
        Arc::new(ResolvedDependency {
            gav: Arc::new(gav),
            depth,
            requested: Arc::new(requested),
            licenses: vec![],
            dependencies: children,
        })
    }

    #[test]
    fn find_dependency_in_subtree() {
        let leaf = node("org.leaf:leaf:3.0", 2, vec![]);
        let middle = node("org.mid:mid:2.0", 1, vec![leaf]);
        let root = node("org.root:root:1.0", 0, vec![middle]);

        assert_eq!(root.find_dependency("org.leaf", "leaf").map(|d| d.depth), Some(2));
        assert_eq!(root.find_dependency("org.root", "root").map(|d| d.depth), Some(0));
        assert!(root.find_dependency("org.none", "none").is_none());
        assert_eq!(root.tree_size(), 3);
    }

    #[test]
    fn inferred_request_accessors() {
        let root = node("org.root:root:1.0", 0, vec![]);
        assert!(root.requested.is_inferred());
        assert_eq!(root.requested.version(), Some("1.0"));
        assert_eq!(root.version(), "1.0");
    }
}

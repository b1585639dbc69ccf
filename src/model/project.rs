use std::{
    collections::{BTreeMap, HashSet, VecDeque},
    sync::Arc,
};

use serde::{Serialize, Serializer};

use super::{RequestedDependency, ResolvedDependency};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PluginDescriptor {
    /// Fully qualified name of the type implementing the plugin.
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A repository the project resolves from. Releases and snapshots are both
/// reported as enabled regardless of the actual repository settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryDescriptor {
    pub id: String,
    pub uri: String,
    pub releases: bool,
    pub snapshots: bool,
}

impl RepositoryDescriptor {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        RepositoryDescriptor {
            id: id.into(),
            uri: uri.into(),
            releases: true,
            snapshots: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyConfiguration {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transitive: bool,
    pub resolvable: bool,
    #[serde(serialize_with = "serialize_configuration_names")]
    pub extends_from: Vec<Arc<DependencyConfiguration>>,
    pub requested: Vec<Arc<RequestedDependency>>,
    pub resolved: Vec<Arc<ResolvedDependency>>,
}

impl DependencyConfiguration {
    pub fn find_requested(&self, group: &str, artifact: &str) -> Option<&Arc<RequestedDependency>> {
        self.requested
            .iter()
            .find(|requested| requested.group() == group && requested.artifact() == artifact)
    }

    /// Searches every resolved tree of this configuration, first levels first.
    pub fn find_resolved(&self, group: &str, artifact: &str) -> Option<&ResolvedDependency> {
        self.resolved
            .iter()
            .find(|resolved| resolved.group() == group && resolved.artifact() == artifact)
            .map(|resolved| resolved.as_ref())
            .or_else(|| {
                self.resolved
                    .iter()
                    .find_map(|resolved| resolved.find_dependency(group, artifact))
            })
    }

    /// Transitive closure of extends-from, nearest configurations first, each listed once.
    pub fn all_extends_from(&self) -> Vec<Arc<DependencyConfiguration>> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut queue: VecDeque<&Arc<DependencyConfiguration>> =
            self.extends_from.iter().collect();
        while let Some(configuration) = queue.pop_front() {
            if !seen.insert(configuration.name.as_str()) {
                continue;
            }
            result.push(configuration.clone());
            queue.extend(configuration.extends_from.iter());
        }
        result
    }
}

fn serialize_configuration_names<S>(
    configurations: &[Arc<DependencyConfiguration>],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(configurations.iter().map(|c| c.name.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectModel {
    pub id: String,
    pub path: String,
    pub plugins: Vec<PluginDescriptor>,
    pub repositories: Vec<RepositoryDescriptor>,
    pub configurations: BTreeMap<String, Arc<DependencyConfiguration>>,
}

impl ProjectModel {
    pub fn configuration(&self, name: &str) -> Option<&Arc<DependencyConfiguration>> {
        self.configurations.get(name)
    }

    /// Every configuration whose resolved trees contain the coordinate.
    pub fn configurations_for(
        &self,
        group: &str,
        artifact: &str,
    ) -> Vec<&Arc<DependencyConfiguration>> {
        self.configurations
            .values()
            .filter(|configuration| configuration.find_resolved(group, artifact).is_some())
            .collect()
    }

    /// Matches either the plugin id or the implementing type name.
    pub fn has_plugin(&self, id_or_type: &str) -> bool {
        self.plugins
            .iter()
            .any(|p| p.id.as_deref() == Some(id_or_type) || p.type_name == id_or_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{GroupArtifactVersion, RequestOrigin};

    fn configuration(
        name: &str,
        extends_from: Vec<Arc<DependencyConfiguration>>,
    ) -> Arc<DependencyConfiguration> {
        Arc::new(DependencyConfiguration {
            name: name.to_string(),
            description: None,
            transitive: true,
            resolvable: false,
            extends_from,
            requested: vec![],
            resolved: vec![],
        })
    }

    #[test]
    fn all_extends_from_is_breadth_first_and_unique() {
        let api = configuration("api", vec![]);
        let implementation = configuration("implementation", vec![api.clone()]);
        let runtime_only = configuration("runtimeOnly", vec![api.clone()]);
        let runtime = configuration("runtimeClasspath", vec![implementation, runtime_only]);

        let names: Vec<String> = runtime
            .all_extends_from()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["implementation", "runtimeOnly", "api"]);
    }

    fn request(coordinate: &str) -> Arc<RequestedDependency> {
        Arc::new(RequestedDependency {
            gav: Arc::new(GroupArtifactVersion::from_coordinate(coordinate).unwrap()),
            artifact_type: Some("jar".to_string()),
            classifier: None,
            scope: "implementation".to_string(),
            optional: None,
            origin: RequestOrigin::Declared,
            exclusions: vec![],
        })
    }

    #[test]
    fn find_requested_by_group_and_artifact() {
        let implementation = DependencyConfiguration {
            requested: vec![
                request("com.foo:bar:1.0"),
                request("com.foo:baz:2.0"),
                request("com.foo:bar:1.1"),
            ],
            ..(*configuration("implementation", vec![])).clone()
        };

        let bar = implementation.find_requested("com.foo", "bar").unwrap();
        assert_eq!(bar.version(), Some("1.0"));
        assert_eq!(
            implementation.find_requested("com.foo", "baz").unwrap().version(),
            Some("2.0")
        );
        assert!(implementation.find_requested("com.foo", "qux").is_none());
        assert!(implementation.find_requested("org.foo", "bar").is_none());
    }

    #[test]
    fn plugin_lookup_by_id_or_type() {
        let model = ProjectModel {
            id: "app".to_string(),
            path: ":app".to_string(),
            plugins: vec![PluginDescriptor {
                type_name: "org.gradle.api.plugins.JavaPlugin".to_string(),
                id: Some("java".to_string()),
            }],
            repositories: vec![RepositoryDescriptor::new(
                "central",
                "https://repo1.maven.org/maven2",
            )],
            configurations: BTreeMap::new(),
        };
        assert!(model.has_plugin("java"));
        assert!(model.has_plugin("org.gradle.api.plugins.JavaPlugin"));
        assert!(!model.has_plugin("application"));
        assert!(model.repositories[0].releases && model.repositories[0].snapshots);
    }
}

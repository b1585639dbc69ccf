//! File-backed host: a TOML document recording what a build tool reported
//! about one project, its declarations, and its resolution results.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
};

use anyhow::bail;
use log::{debug, trace};
use serde::Deserialize;

use crate::{
    host::{
        DependencyResolver, PluginIdLookup, ProjectIdentity, ProjectSource, RawConfiguration,
        RawDeclaredDependency, RawPlugin, RawRepository, RawResolvedEntry, RepositoryKind,
    },
    model::{GroupArtifactVersion, ParseError, ResolvedGroupArtifactVersion},
};

/// Prefix of the configurations created by [`DependencyResolver::derive_resolvable`].
pub const DERIVED_PREFIX: &str = "resolvable";

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    name: String,
    path: Option<String>,
    #[serde(default)]
    plugins: Vec<PluginEntry>,
    #[serde(default)]
    repositories: Vec<RepositoryEntry>,
    #[serde(default)]
    configurations: Vec<ConfigurationEntry>,
}

#[derive(Debug, Deserialize)]
struct PluginEntry {
    #[serde(rename = "type")]
    type_name: String,
    id: Option<String>,
    #[serde(default = "default_true")]
    id_supported: bool,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RepositoryKindEntry {
    #[default]
    Maven,
    Ivy,
    FlatDir,
}

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    name: String,
    url: Option<String>,
    #[serde(default)]
    kind: RepositoryKindEntry,
}

#[derive(Debug, Deserialize)]
struct ConfigurationEntry {
    name: String,
    description: Option<String>,
    #[serde(default = "default_true")]
    transitive: bool,
    #[serde(default = "default_true")]
    resolvable: bool,
    #[serde(default)]
    extends_from: Vec<String>,
    #[serde(default)]
    dependencies: Vec<DeclarationEntry>,
    failure: Option<String>,
    #[serde(default)]
    resolved: Vec<ResolvedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeclarationEntry {
    Coordinate(String),
    Detailed {
        coordinate: String,
        #[serde(rename = "type")]
        artifact_type: Option<String>,
        classifier: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ResolvedEntry {
    coordinate: String,
    configuration: Option<String>,
    #[serde(default)]
    children: Vec<ResolvedEntry>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedEntry {
    gav: ResolvedGroupArtifactVersion,
    configuration: Option<String>,
    children: Vec<RecordedEntry>,
}

impl RecordedEntry {
    fn parse(entry: ResolvedEntry) -> Result<Self, ParseError> {
        Ok(RecordedEntry {
            gav: ResolvedGroupArtifactVersion::from_coordinate(&entry.coordinate)?,
            configuration: entry.configuration,
            children: entry
                .children
                .into_iter()
                .map(RecordedEntry::parse)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn to_raw(&self, resolved_through: &str) -> RawResolvedEntry {
        RawResolvedEntry {
            group: self.gav.group.clone(),
            name: self.gav.artifact.clone(),
            version: self.gav.version.clone(),
            configuration: self
                .configuration
                .clone()
                .unwrap_or_else(|| resolved_through.to_string()),
            children: self
                .children
                .iter()
                .map(|child| child.to_raw(resolved_through))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    Resolved(Vec<RecordedEntry>),
    Failed(String),
}

/// Host adapter answering from a recorded project snapshot.
///
/// Derived resolvable configurations are registered on demand and resolve to
/// the recording of the configuration they extend.
#[derive(Debug)]
pub struct SnapshotHost {
    identity: ProjectIdentity,
    plugins: Vec<RawPlugin>,
    repositories: Vec<RawRepository>,
    configurations: Vec<RawConfiguration>,
    resolutions: HashMap<String, Resolution>,
    derived: RefCell<HashSet<String>>,
}

impl SnapshotHost {
    pub fn from_file(path: &Path) -> Result<SnapshotHost, ParseError> {
        debug!("Reading project snapshot from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        SnapshotHost::from_toml_str(&contents)
    }

    pub fn from_toml_str(data: &str) -> Result<SnapshotHost, ParseError> {
        let project = toml::from_str::<ProjectEntry>(data)?;

        let identity = ProjectIdentity {
            path: project
                .path
                .unwrap_or_else(|| format!(":{}", project.name)),
            name: project.name,
        };

        let plugins = project
            .plugins
            .into_iter()
            .map(|plugin| RawPlugin {
                type_name: plugin.type_name,
                plugin_id: match (plugin.id_supported, plugin.id) {
                    (false, _) => PluginIdLookup::Unsupported,
                    (true, Some(id)) => PluginIdLookup::Found(id),
                    (true, None) => PluginIdLookup::NotFound,
                },
            })
            .collect();

        let repositories = project
            .repositories
            .into_iter()
            .map(|repository| RawRepository {
                name: repository.name,
                url: repository.url,
                kind: match repository.kind {
                    RepositoryKindEntry::Maven => RepositoryKind::Maven,
                    RepositoryKindEntry::Ivy => RepositoryKind::Ivy,
                    RepositoryKindEntry::FlatDir => RepositoryKind::FlatDir,
                },
            })
            .collect();

        let mut configurations = Vec::with_capacity(project.configurations.len());
        let mut resolutions = HashMap::new();
        for entry in project.configurations {
            if resolutions.contains_key(&entry.name) {
                return Err(ParseError::DuplicateConfiguration(entry.name));
            }
            let dependencies = entry
                .dependencies
                .into_iter()
                .map(parse_declaration)
                .collect::<Result<Vec<_>, _>>()?;
            let resolution = match entry.failure {
                Some(message) => Resolution::Failed(message),
                None => Resolution::Resolved(
                    entry
                        .resolved
                        .into_iter()
                        .map(RecordedEntry::parse)
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            };
            resolutions.insert(entry.name.clone(), resolution);
            configurations.push(RawConfiguration {
                name: entry.name,
                description: entry.description,
                transitive: entry.transitive,
                resolvable: entry.resolvable,
                extends_from: entry.extends_from,
                dependencies,
            });
        }
        inherit_declarations(&mut configurations);

        Ok(SnapshotHost {
            identity,
            plugins,
            repositories,
            configurations,
            resolutions,
            derived: RefCell::new(HashSet::new()),
        })
    }

    fn configuration(&self, name: &str) -> Option<&RawConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    fn recorded(
        &self,
        base: &str,
        resolved_through: &str,
    ) -> anyhow::Result<Vec<RawResolvedEntry>> {
        match self.resolutions.get(base) {
            Some(Resolution::Resolved(entries)) => Ok(entries
                .iter()
                .map(|entry| entry.to_raw(resolved_through))
                .collect()),
            Some(Resolution::Failed(message)) => bail!("{}", message),
            None => bail!("Configuration with name '{}' not found", base),
        }
    }
}

fn parse_declaration(entry: DeclarationEntry) -> Result<RawDeclaredDependency, ParseError> {
    let (coordinate, artifact_type, classifier) = match entry {
        DeclarationEntry::Coordinate(coordinate) => (coordinate, None, None),
        DeclarationEntry::Detailed {
            coordinate,
            artifact_type,
            classifier,
        } => (coordinate, artifact_type, classifier),
    };
    let gav = GroupArtifactVersion::from_coordinate(&coordinate)?;
    Ok(RawDeclaredDependency {
        group: gav.group,
        name: gav.artifact,
        version: gav.version,
        artifact_type,
        classifier,
    })
}

/// Appends the declarations inherited through extends-from to each
/// configuration, after its own and without repeats. Unknown parents and
/// cycles are skipped.
fn inherit_declarations(configurations: &mut [RawConfiguration]) {
    let own: HashMap<String, (Vec<String>, Vec<RawDeclaredDependency>)> = configurations
        .iter()
        .map(|c| (c.name.clone(), (c.extends_from.clone(), c.dependencies.clone())))
        .collect();

    for configuration in configurations.iter_mut() {
        let mut seen = HashSet::from([configuration.name.as_str()]);
        let mut queue: VecDeque<&str> = own
            .get(&configuration.name)
            .map(|(parents, _)| parents.iter().map(String::as_str).collect())
            .unwrap_or_default();
        while let Some(name) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            let Some((parents, dependencies)) = own.get(name) else {
                trace!("{} extends unknown configuration {}", configuration.name, name);
                continue;
            };
            for dependency in dependencies {
                if !configuration.dependencies.contains(dependency) {
                    configuration.dependencies.push(dependency.clone());
                }
            }
            queue.extend(parents.iter().map(String::as_str));
        }
    }
}

impl ProjectSource for SnapshotHost {
    fn project(&self) -> anyhow::Result<ProjectIdentity> {
        Ok(self.identity.clone())
    }

    fn plugins(&self) -> anyhow::Result<Vec<RawPlugin>> {
        Ok(self.plugins.clone())
    }

    fn repositories(&self) -> anyhow::Result<Vec<RawRepository>> {
        Ok(self.repositories.clone())
    }

    fn configurations(&self) -> anyhow::Result<Vec<RawConfiguration>> {
        Ok(self.configurations.clone())
    }
}

impl DependencyResolver for SnapshotHost {
    fn resolve(&self, configuration: &str) -> anyhow::Result<Vec<RawResolvedEntry>> {
        if let Some(raw) = self.configuration(configuration) {
            if !raw.resolvable {
                bail!(
                    "Resolving dependency configuration '{}' is not allowed",
                    configuration
                );
            }
            trace!("Answering {} from its recording", configuration);
            return self.recorded(configuration, configuration);
        }
        if self.derived.borrow().contains(configuration) {
            if let Some(base) = configuration.strip_prefix(DERIVED_PREFIX) {
                trace!("Answering {} from the recording of {}", configuration, base);
                return self.recorded(base, configuration);
            }
        }
        bail!("Configuration with name '{}' not found", configuration)
    }

    fn derive_resolvable(&self, configuration: &str) -> anyhow::Result<String> {
        if self.configuration(configuration).is_none() {
            bail!("Configuration with name '{}' not found", configuration);
        }
        let derived = format!("{}{}", DERIVED_PREFIX, configuration);
        self.derived.borrow_mut().insert(derived.clone());
        Ok(derived)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"
        name = "app"

        [[plugins]]
        type = "org.gradle.api.plugins.JavaPlugin"
        id = "java"

        [[plugins]]
        type = "com.example.LegacyPlugin"
        id_supported = false

        [[repositories]]
        name = "MavenRepo"
        url = "https://repo.maven.apache.org/maven2/"

        [[repositories]]
        name = "libs"
        kind = "flat-dir"

        [[configurations]]
        name = "implementation"
        resolvable = false
        dependencies = ["com.foo:bar:1.0", { coordinate = "com.foo:bom:1.0", type = "pom" }]

        [[configurations.resolved]]
        coordinate = "com.foo:bar:1.2"
        children = [{ coordinate = "com.baz:qux:2.0" }]

        [[configurations]]
        name = "runtimeClasspath"
        extends_from = ["implementation"]
        failure = "Could not resolve com.foo:bar:1.2"
    "#;

    #[test]
    fn load_project_declarations() {
        let host = SnapshotHost::from_toml_str(SNAPSHOT).unwrap();

        assert_eq!(
            host.project().unwrap(),
            ProjectIdentity {
                name: "app".to_string(),
                path: ":app".to_string(),
            }
        );
        let plugins = host.plugins().unwrap();
        assert_eq!(plugins[0].plugin_id, PluginIdLookup::Found("java".to_string()));
        assert_eq!(plugins[1].plugin_id, PluginIdLookup::Unsupported);

        let repositories = host.repositories().unwrap();
        assert_eq!(repositories[0].kind, RepositoryKind::Maven);
        assert_eq!(repositories[1].kind, RepositoryKind::FlatDir);

        let configurations = host.configurations().unwrap();
        assert_eq!(configurations.len(), 2);
        let implementation = &configurations[0];
        assert!(!implementation.resolvable);
        assert!(implementation.transitive);
        assert_eq!(
            implementation.dependencies[1],
            RawDeclaredDependency {
                group: "com.foo".to_string(),
                name: "bom".to_string(),
                version: Some("1.0".to_string()),
                artifact_type: Some("pom".to_string()),
                classifier: None,
            }
        );
        assert_eq!(configurations[1].extends_from, vec!["implementation".to_string()]);
    }

    #[test]
    fn derived_configuration_answers_for_its_base() {
        let host = SnapshotHost::from_toml_str(SNAPSHOT).unwrap();

        host.resolve("implementation")
            .expect_err("implementation is not resolvable");
        host.resolve("resolvableimplementation")
            .expect_err("not derived yet");

        let derived = host.derive_resolvable("implementation").unwrap();
        assert_eq!(derived, "resolvableimplementation");

        let entries = host.resolve(&derived).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version, "1.2");
        assert_eq!(entries[0].configuration, "resolvableimplementation");
        assert_eq!(entries[0].children[0].name, "qux");
    }

    #[test]
    fn recorded_failure_is_returned() {
        let host = SnapshotHost::from_toml_str(SNAPSHOT).unwrap();
        let error = host.resolve("runtimeClasspath").unwrap_err();
        assert_eq!(error.to_string(), "Could not resolve com.foo:bar:1.2");
    }

    #[test]
    fn declarations_are_inherited_through_extends_from() {
        let snapshot = r#"
            name = "app"
            [[configurations]]
            name = "api"
            extends_from = ["testImplementation"]
            dependencies = ["com.foo:api:1.0"]
            [[configurations]]
            name = "implementation"
            extends_from = ["api", "missing"]
            dependencies = ["com.foo:bar:1.0", "com.foo:api:1.0"]
            [[configurations]]
            name = "testImplementation"
            extends_from = ["implementation"]
            dependencies = ["junit:junit:4.13.2"]
        "#;
        let host = SnapshotHost::from_toml_str(snapshot).unwrap();
        let configurations = host.configurations().unwrap();
        let coordinates = |name: &str| -> Vec<String> {
            configurations
                .iter()
                .find(|c| c.name == name)
                .unwrap()
                .dependencies
                .iter()
                .map(|d| format!("{}:{}", d.group, d.name))
                .collect()
        };

        assert_eq!(
            coordinates("implementation"),
            vec!["com.foo:bar", "com.foo:api", "junit:junit"]
        );
        assert_eq!(
            coordinates("testImplementation"),
            vec!["junit:junit", "com.foo:bar", "com.foo:api"]
        );
        assert_eq!(coordinates("api"), vec!["com.foo:api", "junit:junit", "com.foo:bar"]);
    }

    #[test]
    fn reject_invalid_coordinates() {
        let snapshot = r#"
            name = "app"
            [[configurations]]
            name = "compile"
            dependencies = ["not-a-coordinate"]
        "#;
        assert!(matches!(
            SnapshotHost::from_toml_str(snapshot),
            Err(ParseError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn reject_duplicate_configurations() {
        let snapshot = r#"
            name = "app"
            [[configurations]]
            name = "compile"
            [[configurations]]
            name = "compile"
        "#;
        assert!(matches!(
            SnapshotHost::from_toml_str(snapshot),
            Err(ParseError::DuplicateConfiguration(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let host = SnapshotHost::from_file(file.path()).unwrap();
        assert_eq!(host.configurations().unwrap().len(), 2);
    }

    #[test]
    fn load_sample_project() {
        let path = project_root::get_project_root()
            .unwrap()
            .join("resources/sample-project.toml");
        let host = SnapshotHost::from_file(&path).unwrap();
        assert_eq!(host.project().unwrap().path, ":app");
        assert!(!host.configurations().unwrap().is_empty());
    }
}

//! Boundary to the build tool that owns the project.
//!
//! The core never talks to a build tool directly: adapters implement
//! [`ProjectSource`] for declarations and [`DependencyResolver`] for
//! resolution results, and hand over the raw shapes defined here.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub name: String,
    pub path: String,
}

/// Result of asking the host which plugin id belongs to a plugin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginIdLookup {
    Found(String),
    NotFound,
    /// The host version cannot map plugin types to ids.
    Unsupported,
}

impl PluginIdLookup {
    pub fn into_id(self) -> Option<String> {
        match self {
            PluginIdLookup::Found(id) => Some(id),
            PluginIdLookup::NotFound | PluginIdLookup::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlugin {
    pub type_name: String,
    pub plugin_id: PluginIdLookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    Maven,
    Ivy,
    FlatDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRepository {
    pub name: String,
    pub url: Option<String>,
    pub kind: RepositoryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaredDependency {
    pub group: String,
    pub name: String,
    /// May carry the host's "unspecified" marker.
    pub version: Option<String>,
    pub artifact_type: Option<String>,
    pub classifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawConfiguration {
    pub name: String,
    pub description: Option<String>,
    pub transitive: bool,
    pub resolvable: bool,
    pub extends_from: Vec<String>,
    /// All declarations visible to the configuration: its own first, then
    /// those inherited through extends-from.
    pub dependencies: Vec<RawDeclaredDependency>,
}

/// A node of the resolver's result graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResolvedEntry {
    pub group: String,
    pub name: String,
    pub version: String,
    /// Configuration the node was resolved through.
    pub configuration: String,
    pub children: Vec<RawResolvedEntry>,
}

pub trait ProjectSource {
    fn project(&self) -> anyhow::Result<ProjectIdentity>;

    fn plugins(&self) -> anyhow::Result<Vec<RawPlugin>>;

    fn repositories(&self) -> anyhow::Result<Vec<RawRepository>>;

    fn configurations(&self) -> anyhow::Result<Vec<RawConfiguration>>;
}

/// Resolution results. Calls may block on network or file system work.
pub trait DependencyResolver {
    /// First-level resolved entries of a resolvable configuration.
    fn resolve(&self, configuration: &str) -> anyhow::Result<Vec<RawResolvedEntry>>;

    /// Creates a resolvable configuration extending `configuration` and returns its name.
    fn derive_resolvable(&self, configuration: &str) -> anyhow::Result<String>;
}

use thiserror::Error;

pub mod coordinate;
pub mod dependency;
pub mod project;

pub use coordinate::{GroupArtifact, GroupArtifactVersion, ResolvedGroupArtifactVersion};
pub use dependency::{License, RequestOrigin, RequestedDependency, ResolvedDependency};
pub use project::{DependencyConfiguration, PluginDescriptor, ProjectModel, RepositoryDescriptor};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading project snapshot: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid coordinate `{0}`, expected `group:artifact[:version]`")]
    InvalidCoordinate(String),
    #[error("Missing version in resolved coordinate `{0}`")]
    MissingVersion(String),
    #[error("Configuration `{0}` is listed more than once")]
    DuplicateConfiguration(String),
}

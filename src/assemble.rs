use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    configuration::{resolve_configuration, ResolveOptions},
    graph::link_configurations,
    host::{
        DependencyResolver, PluginIdLookup, ProjectSource, RawConfiguration, RawPlugin,
        RawRepository, RepositoryKind,
    },
    intern::ModelContext,
    model::{DependencyConfiguration, PluginDescriptor, ProjectModel, RepositoryDescriptor},
};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Could not read project identity: {0:#}")]
    Project(#[source] anyhow::Error),
    #[error("Could not enumerate plugins: {0:#}")]
    Plugins(#[source] anyhow::Error),
    #[error("Could not enumerate repositories: {0:#}")]
    Repositories(#[source] anyhow::Error),
    #[error("Could not enumerate configurations: {0:#}")]
    Configurations(#[source] anyhow::Error),
}

/// Builds the model of one project.
///
/// A configuration that fails to resolve is left out of the model and the
/// build carries on. Failing to read the project itself fails the whole build.
pub fn build_project_model<S, R>(
    context: &mut ModelContext,
    source: &S,
    resolver: &R,
    options: &ResolveOptions,
) -> Result<ProjectModel, ModelError>
where
    S: ProjectSource + ?Sized,
    R: DependencyResolver + ?Sized,
{
    let identity = source.project().map_err(ModelError::Project)?;
    info!("Building dependency model for {} ({})", identity.name, identity.path);

    let plugins = plugin_descriptors(source.plugins().map_err(ModelError::Plugins)?);
    let repositories =
        repository_descriptors(source.repositories().map_err(ModelError::Repositories)?);
    let raw_configurations = source.configurations().map_err(ModelError::Configurations)?;

    let configurations = dependency_configurations(context, resolver, &raw_configurations, options);

    info!(
        "Built {} of {} configurations for {}",
        configurations.len(),
        raw_configurations.len(),
        identity.path
    );

    Ok(ProjectModel {
        id: identity.name,
        path: identity.path,
        plugins,
        repositories,
        configurations,
    })
}

/// Resolves every configuration, then wires their extends-from edges.
pub fn dependency_configurations<R>(
    context: &mut ModelContext,
    resolver: &R,
    raw: &[RawConfiguration],
    options: &ResolveOptions,
) -> BTreeMap<String, Arc<DependencyConfiguration>>
where
    R: DependencyResolver + ?Sized,
{
    let mut built: HashMap<String, DependencyConfiguration> = HashMap::new();
    for configuration in raw {
        debug!("Resolving configuration {}", configuration.name);
        match resolve_configuration(context, resolver, configuration, options) {
            Ok(resolved) => {
                built.insert(configuration.name.clone(), resolved);
            }
            Err(err) => warn!(
                "Leaving configuration {} out of the model: {}",
                configuration.name, err
            ),
        }
    }
    link_configurations(raw, built)
}

fn plugin_descriptors(plugins: Vec<RawPlugin>) -> Vec<PluginDescriptor> {
    plugins
        .into_iter()
        .map(|plugin| {
            if plugin.plugin_id == PluginIdLookup::Unsupported {
                debug!(
                    "Host cannot map {} to a plugin id, leaving it empty",
                    plugin.type_name
                );
            }
            PluginDescriptor {
                type_name: plugin.type_name,
                id: plugin.plugin_id.into_id(),
            }
        })
        .collect()
}

fn repository_descriptors(repositories: Vec<RawRepository>) -> Vec<RepositoryDescriptor> {
    repositories
        .into_iter()
        .filter_map(|repository| match (repository.kind, repository.url) {
            (RepositoryKind::Maven, Some(url)) => {
                Some(RepositoryDescriptor::new(repository.name, url))
            }
            (kind, _) => {
                debug!(
                    "Skipping {:?} repository {} without a Maven layout URL",
                    kind, repository.name
                );
                None
            }
        })
        .collect()
}

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    host::{DependencyResolver, RawConfiguration, RawDeclaredDependency, RawResolvedEntry},
    intern::ModelContext,
    model::{
        DependencyConfiguration, GroupArtifact, GroupArtifactVersion, RequestOrigin,
        RequestedDependency, ResolvedDependency, ResolvedGroupArtifactVersion,
    },
};

pub const DEFAULT_MAX_DEPTH: usize = 512;
pub const DEFAULT_ARTIFACT_TYPE: &str = "jar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Deepest level a resolved tree may reach before the configuration is rejected.
    pub max_depth: usize,
    /// Artifact type recorded for requests that do not state one.
    pub default_type: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            default_type: DEFAULT_ARTIFACT_TYPE.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Could not resolve configuration {configuration}: {source:#}")]
    Resolver {
        configuration: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Could not derive a resolvable configuration from {configuration}: {source:#}")]
    Derive {
        configuration: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Resolved tree of {configuration} is deeper than {max_depth} levels at {coordinate}")]
    DepthExceeded {
        configuration: String,
        coordinate: String,
        max_depth: usize,
    },
}

/// Builds the requested and resolved views of one configuration.
///
/// Declared and resolved first-level dependencies are matched on group and
/// artifact only, since resolution may change the version. Resolved nodes
/// without a matching declaration, and every node below the first level, get
/// an [`RequestOrigin::Inferred`] request built from the resolved coordinate.
/// The returned record has no extends-from edges yet.
pub fn resolve_configuration<R>(
    context: &mut ModelContext,
    resolver: &R,
    configuration: &RawConfiguration,
    options: &ResolveOptions,
) -> Result<DependencyConfiguration, ResolutionError>
where
    R: DependencyResolver + ?Sized,
{
    let requested = configuration
        .dependencies
        .iter()
        .map(|dependency| declared(context, dependency, &configuration.name, options))
        .collect::<Vec<_>>();

    let first_level = resolve_first_level(resolver, configuration)?;

    let mut ga_to_requested: HashMap<Arc<GroupArtifact>, Arc<RequestedDependency>> = HashMap::new();
    for dependency in &requested {
        let ga = context.group_artifact(dependency.gav.group_artifact());
        ga_to_requested.entry(ga).or_insert_with(|| dependency.clone());
    }

    let mut seen: HashSet<Arc<GroupArtifact>> = HashSet::new();
    let mut resolved = Vec::with_capacity(first_level.len());
    for entry in &first_level {
        let ga = context.group_artifact(GroupArtifact::new(
            entry.group.as_str(),
            entry.name.as_str(),
        ));
        if !seen.insert(ga.clone()) {
            trace!(
                "Ignoring duplicate first level entry {}:{} in {}",
                entry.group,
                entry.name,
                configuration.name
            );
            continue;
        }
        let requested = match ga_to_requested.get(&ga) {
            Some(requested) => requested.clone(),
            None => {
                debug!(
                    "No declaration in {} matches resolved {}:{}:{}, inferring one",
                    configuration.name, entry.group, entry.name, entry.version
                );
                inferred(context, entry, options)
            }
        };
        resolved.push(build_tree(context, entry, requested, 0, &configuration.name, options)?);
    }

    Ok(DependencyConfiguration {
        name: configuration.name.clone(),
        description: configuration.description.clone(),
        transitive: configuration.transitive,
        resolvable: configuration.resolvable,
        extends_from: vec![],
        requested,
        resolved,
    })
}

/// Resolves the configuration itself, or a derived resolvable one when the
/// configuration only exists to be extended.
fn resolve_first_level<R>(
    resolver: &R,
    configuration: &RawConfiguration,
) -> Result<Vec<RawResolvedEntry>, ResolutionError>
where
    R: DependencyResolver + ?Sized,
{
    let target = if configuration.resolvable {
        configuration.name.clone()
    } else {
        let derived = resolver
            .derive_resolvable(&configuration.name)
            .map_err(|source| ResolutionError::Derive {
                configuration: configuration.name.clone(),
                source,
            })?;
        debug!(
            "Resolving {} through derived configuration {}",
            configuration.name, derived
        );
        derived
    };

    resolver
        .resolve(&target)
        .map_err(|source| ResolutionError::Resolver {
            configuration: configuration.name.clone(),
            source,
        })
}

fn build_tree(
    context: &mut ModelContext,
    entry: &RawResolvedEntry,
    requested: Arc<RequestedDependency>,
    depth: usize,
    owner: &str,
    options: &ResolveOptions,
) -> Result<Arc<ResolvedDependency>, ResolutionError> {
    if depth > options.max_depth {
        return Err(ResolutionError::DepthExceeded {
            configuration: owner.to_string(),
            coordinate: format!("{}:{}:{}", entry.group, entry.name, entry.version),
            max_depth: options.max_depth,
        });
    }

    let gav = context.resolved_group_artifact_version(ResolvedGroupArtifactVersion::new(
        entry.group.as_str(),
        entry.name.as_str(),
        entry.version.as_str(),
    ));

    let mut dependencies = Vec::with_capacity(entry.children.len());
    for child in &entry.children {
        let child_requested = inferred(context, child, options);
        dependencies.push(build_tree(
            context,
            child,
            child_requested,
            depth + 1,
            owner,
            options,
        )?);
    }

    Ok(context.resolved(ResolvedDependency {
        gav,
        depth,
        requested,
        licenses: vec![],
        dependencies,
    }))
}

fn declared(
    context: &mut ModelContext,
    dependency: &RawDeclaredDependency,
    configuration: &str,
    options: &ResolveOptions,
) -> Arc<RequestedDependency> {
    let gav = context.group_artifact_version(GroupArtifactVersion::new(
        dependency.group.as_str(),
        dependency.name.as_str(),
        dependency.version.as_deref(),
    ));
    context.requested(RequestedDependency {
        gav,
        artifact_type: Some(
            dependency
                .artifact_type
                .clone()
                .unwrap_or_else(|| options.default_type.clone()),
        ),
        classifier: dependency.classifier.clone(),
        scope: configuration.to_string(),
        optional: None,
        origin: RequestOrigin::Declared,
        exclusions: vec![],
    })
}

/// Stand-in request for a resolved node, pinned to the resolved version.
/// It approximates the real declaration and cannot carry its exclusions or classifier.
fn inferred(
    context: &mut ModelContext,
    entry: &RawResolvedEntry,
    options: &ResolveOptions,
) -> Arc<RequestedDependency> {
    let gav = context.group_artifact_version(GroupArtifactVersion::new(
        entry.group.as_str(),
        entry.name.as_str(),
        Some(entry.version.as_str()),
    ));
    context.requested(RequestedDependency {
        gav,
        artifact_type: Some(options.default_type.clone()),
        classifier: None,
        scope: entry.configuration.clone(),
        optional: None,
        origin: RequestOrigin::Inferred,
        exclusions: vec![],
    })
}

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use log::warn;

use crate::{host::RawConfiguration, model::DependencyConfiguration};

/// Wires extends-from edges between configurations built by the first pass.
///
/// Parents are finalized before their children, so every extends-from entry is
/// the same `Arc` stored in the returned map. An edge to a configuration that is
/// missing from `built` (typically because its resolution failed) is omitted, as
/// is an edge that would close a cycle. Requested and resolved lists are moved
/// through untouched.
pub fn link_configurations(
    raw: &[RawConfiguration],
    mut built: HashMap<String, DependencyConfiguration>,
) -> BTreeMap<String, Arc<DependencyConfiguration>> {
    let parents: HashMap<&str, &[String]> = raw
        .iter()
        .map(|configuration| (configuration.name.as_str(), configuration.extends_from.as_slice()))
        .collect();

    let mut linked = BTreeMap::new();
    let mut in_progress = HashSet::new();
    for configuration in raw {
        link(
            &configuration.name,
            &parents,
            &mut built,
            &mut linked,
            &mut in_progress,
        );
    }

    // Records the host never enumerated have no edges to wire.
    for (name, configuration) in built {
        linked.insert(name, Arc::new(configuration));
    }

    linked
}

fn link(
    name: &str,
    parents: &HashMap<&str, &[String]>,
    built: &mut HashMap<String, DependencyConfiguration>,
    linked: &mut BTreeMap<String, Arc<DependencyConfiguration>>,
    in_progress: &mut HashSet<String>,
) -> Option<Arc<DependencyConfiguration>> {
    if let Some(configuration) = linked.get(name) {
        return Some(configuration.clone());
    }
    let mut configuration = built.remove(name)?;

    in_progress.insert(name.to_string());
    let mut extends_from = Vec::new();
    for parent in parents.get(name).copied().unwrap_or_default() {
        if in_progress.contains(parent.as_str()) {
            warn!(
                "Ignoring extends-from edge {} -> {}: it closes a cycle",
                name, parent
            );
            continue;
        }
        match link(parent, parents, built, linked, in_progress) {
            Some(parent) => extends_from.push(parent),
            None => warn!(
                "Ignoring extends-from edge {} -> {}: {} is not part of the model",
                name, parent, parent
            ),
        }
    }
    in_progress.remove(name);

    configuration.extends_from = extends_from;
    let configuration = Arc::new(configuration);
    linked.insert(name.to_string(), configuration.clone());
    Some(configuration)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::configuration::tests::raw_configuration;

    use pretty_assertions::assert_eq;

    fn record(name: &str) -> DependencyConfiguration {
        DependencyConfiguration {
            name: name.to_string(),
            description: None,
            transitive: true,
            resolvable: true,
            extends_from: vec![],
            requested: vec![],
            resolved: vec![],
        }
    }

    fn built(names: &[&str]) -> HashMap<String, DependencyConfiguration> {
        names
            .iter()
            .map(|name| (name.to_string(), record(name)))
            .collect()
    }

    fn parent_names(configuration: &DependencyConfiguration) -> Vec<&str> {
        configuration
            .extends_from
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn extends_from_points_at_the_stored_record() {
        // children are listed before their parents on purpose
        let raw = vec![
            raw_configuration("testImplementation", false, &["implementation"], vec![]),
            raw_configuration("implementation", false, &["api"], vec![]),
            raw_configuration("api", false, &[], vec![]),
        ];
        let linked = link_configurations(
            &raw,
            built(&["api", "implementation", "testImplementation"]),
        );

        let test_implementation = &linked["testImplementation"];
        assert_eq!(parent_names(test_implementation), vec!["implementation"]);
        assert!(Arc::ptr_eq(
            &test_implementation.extends_from[0],
            &linked["implementation"]
        ));
        assert!(Arc::ptr_eq(
            &linked["implementation"].extends_from[0],
            &linked["api"]
        ));
    }

    #[test]
    fn dangling_edges_are_omitted() {
        let raw = vec![
            raw_configuration("implementation", false, &[], vec![]),
            raw_configuration("broken", true, &[], vec![]),
            raw_configuration("runtimeClasspath", true, &["implementation", "broken"], vec![]),
        ];
        let linked = link_configurations(&raw, built(&["implementation", "runtimeClasspath"]));

        assert_eq!(linked.len(), 2);
        assert_eq!(parent_names(&linked["runtimeClasspath"]), vec!["implementation"]);
        assert!(!linked.contains_key("broken"));
    }

    #[test]
    fn cycles_are_broken() {
        let raw = vec![
            raw_configuration("a", true, &["b"], vec![]),
            raw_configuration("b", true, &["a"], vec![]),
        ];
        let linked = link_configurations(&raw, built(&["a", "b"]));

        assert_eq!(parent_names(&linked["a"]), vec!["b"]);
        assert!(linked["b"].extends_from.is_empty());
    }

    #[test]
    fn records_without_raw_entry_are_kept() {
        let raw = vec![raw_configuration("compile", true, &[], vec![])];
        let linked = link_configurations(&raw, built(&["compile", "extra"]));
        assert_eq!(linked.keys().collect::<Vec<_>>(), vec!["compile", "extra"]);
    }
}

use std::{error::Error, fmt::Write, path::Path};

use log::{debug, info};

use crate::{
    model::{DependencyConfiguration, ProjectModel, ResolvedDependency},
    snapshot::SnapshotHost,
    DepModel,
};

/// Handler to model command
pub fn do_model(depmodel: &mut DepModel, snapshot: &Path) -> Result<(), Box<dyn Error>> {
    let model = load_model(depmodel, snapshot)?;
    print!("{}", toml::to_string_pretty(&model)?);
    Ok(())
}

/// Handler to tree command
pub fn do_tree(
    depmodel: &mut DepModel,
    snapshot: &Path,
    configuration: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let model = load_model(depmodel, snapshot)?;
    print!("{}", render_trees(&model, configuration)?);
    Ok(())
}

/// Handler to configurations command
pub fn do_configurations(depmodel: &mut DepModel, snapshot: &Path) -> Result<(), Box<dyn Error>> {
    let model = load_model(depmodel, snapshot)?;
    print!("{}", render_configurations(&model)?);
    Ok(())
}

fn load_model(depmodel: &mut DepModel, snapshot: &Path) -> Result<ProjectModel, Box<dyn Error>> {
    let host = SnapshotHost::from_file(snapshot)?;
    let model = depmodel.build_model(&host)?;
    debug!("Built model: {:?}", model);
    info!(
        "Loaded {} configurations of {} from {}",
        model.configurations.len(),
        model.path,
        snapshot.display()
    );
    Ok(model)
}

fn render_trees(model: &ProjectModel, only: Option<&str>) -> Result<String, Box<dyn Error>> {
    let configurations: Vec<&DependencyConfiguration> = match only {
        Some(name) => match model.configuration(name) {
            Some(configuration) => vec![configuration.as_ref()],
            None => {
                return Err(format!("Configuration {} is not part of the model", name).into())
            }
        },
        None => model.configurations.values().map(|c| c.as_ref()).collect(),
    };

    let mut out = String::new();
    for (index, configuration) in configurations.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        match &configuration.description {
            Some(description) => writeln!(out, "{} - {}", configuration.name, description)?,
            None => writeln!(out, "{}", configuration.name)?,
        }
        if configuration.resolved.is_empty() {
            writeln!(out, "No dependencies")?;
        }
        let last = configuration.resolved.len().saturating_sub(1);
        for (position, resolved) in configuration.resolved.iter().enumerate() {
            render_node(&mut out, resolved, "", position == last)?;
        }
    }
    Ok(out)
}

fn render_node(
    out: &mut String,
    node: &ResolvedDependency,
    prefix: &str,
    last: bool,
) -> std::fmt::Result {
    let branch = if last { "\\--- " } else { "+--- " };
    write!(out, "{}{}", prefix, branch)?;
    match node.requested.version() {
        Some(requested) if requested != node.version() => write!(
            out,
            "{}:{}:{} -> {}",
            node.group(),
            node.artifact(),
            requested,
            node.version()
        )?,
        _ => write!(out, "{}", node.gav)?,
    }
    if node.requested.is_inferred() {
        out.push_str(" (inferred)");
    }
    out.push('\n');

    let child_prefix = format!("{}{}", prefix, if last { "     " } else { "|    " });
    let last_child = node.dependencies.len().saturating_sub(1);
    for (position, child) in node.dependencies.iter().enumerate() {
        render_node(out, child, &child_prefix, position == last_child)?;
    }
    Ok(())
}

fn render_configurations(model: &ProjectModel) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for configuration in model.configurations.values() {
        write!(out, "{}", configuration.name)?;
        if !configuration.resolvable {
            out.push_str(" (not resolvable)");
        }
        if !configuration.transitive {
            out.push_str(" (intransitive)");
        }
        write!(
            out,
            " - {} requested, {} resolved",
            configuration.requested.len(),
            configuration.resolved.len()
        )?;
        if !configuration.extends_from.is_empty() {
            let parents: Vec<&str> = configuration
                .extends_from
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            write!(out, ", extends {}", parents.join(", "))?;
        }
        out.push('\n');
    }
    Ok(out)
}

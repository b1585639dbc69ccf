use clap::{Parser, Subcommand};

/// Builds a normalized model of a project's dependency configurations.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    #[clap(short, long, default_value = "depmodel.toml", env = "DEPMODEL_SNAPSHOT")]
    /// Location of the project snapshot recorded from the build tool
    pub snapshot: String,
    #[clap(long)]
    /// Deepest resolved tree level accepted before a configuration is left out.
    /// Overrides DEPMODEL_RESOLVE_DEPTH
    pub max_depth: Option<usize>,
    #[clap(long)]
    /// Artifact type recorded for requests that do not state one.
    /// Overrides DEPMODEL_DEFAULT_TYPE
    pub default_type: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the complete project model as TOML
    Model,
    /// Prints the resolved dependency tree of each configuration
    Tree {
        #[clap(short, long)]
        /// Only print this configuration
        configuration: Option<String>,
    },
    /// Lists configurations with their flags and extends-from edges
    Configurations,
}

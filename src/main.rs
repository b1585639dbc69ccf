use std::{error::Error, path::Path};

use clap::Parser;
use depmodel::{
    cli::{
        args::{CliArgs, Command},
        command_handlers::{do_configurations, do_model, do_tree},
    },
    DepModel,
};
use env_logger::Target;
use log::error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let mut builder = DepModel::builder();
    if let Some(depth) = cli_args.max_depth {
        builder = builder.max_depth(depth);
    }
    if let Some(artifact_type) = cli_args.default_type {
        builder = builder.default_type(artifact_type);
    }
    let mut depmodel = builder.try_build()?;
    let snapshot = Path::new(&cli_args.snapshot);

    match cli_args.cmd {
        Command::Model => do_model(&mut depmodel, snapshot),
        Command::Tree { configuration } => {
            do_tree(&mut depmodel, snapshot, configuration.as_deref())
        }
        Command::Configurations => do_configurations(&mut depmodel, snapshot),
    }
}

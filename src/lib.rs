pub mod assemble;
pub mod cli;
pub mod configuration;
pub mod graph;
pub mod host;
pub mod intern;
pub mod model;
pub mod snapshot;

mod api;
mod config;

pub use api::{DepModel, DepModelBuilder};

//! CLI command handlers. Each command is in its own file.

mod build;
mod instant;
mod tail;
mod time;

pub use build::run_build;
pub use instant::{run_instant, InstantOptions};
pub use tail::run_tail;

/// Datasource after merging command-line overrides with the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datasource {
    pub url: String,
    pub params: String,
}

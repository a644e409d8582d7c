//! CLI for building LogsQL query URLs.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vlq_core::config::{self, DatasourceConfig};
use vlq_core::query::QueryMode;

use commands::{run_build, run_instant, run_tail, Datasource, InstantOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vlq")]
#[command(about = "Build request URLs for LogsQL instant and tail queries", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/vlq/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Overrides for the configured datasource.
#[derive(Debug, Clone, Default, Args)]
pub struct DatasourceArgs {
    /// Base URL of the log-search service.
    #[arg(long)]
    pub url: Option<String>,
    /// Query-string parameters forwarded verbatim (e.g. "AccountID=1&ProjectID=0").
    #[arg(long)]
    pub params: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Instant,
    Tail,
}

impl From<ModeArg> for QueryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Instant => QueryMode::Instant,
            ModeArg::Tail => QueryMode::Tail,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the URL of a bounded query over a time window.
    Instant {
        /// LogsQL expression.
        expr: String,
        #[command(flatten)]
        datasource: DatasourceArgs,
        /// Maximum number of lines (<= 0 means the default of 1000).
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        max_lines: Option<i64>,
        /// Window start: Unix seconds or RFC 3339 (default: five minutes ago).
        #[arg(long, value_name = "TIME")]
        from: Option<String>,
        /// Window end: Unix seconds or RFC 3339 (default: now).
        #[arg(long, value_name = "TIME")]
        to: Option<String>,
        /// Interval substituted for $__interval / $__interval_ms.
        #[arg(long, default_value = "0", value_name = "MS")]
        interval_ms: i64,
    },

    /// Print the URL of a streaming tail query.
    Tail {
        /// LogsQL expression.
        expr: String,
        #[command(flatten)]
        datasource: DatasourceArgs,
        /// Interval substituted for $__interval / $__interval_ms.
        #[arg(long, default_value = "0", value_name = "MS")]
        interval_ms: i64,
    },

    /// Print the URL for a query read from a JSON file (refId, expr, maxLines, ...).
    Build {
        /// Path to the JSON query.
        path: PathBuf,
        #[arg(long, value_enum, default_value = "instant")]
        mode: ModeArg,
        #[command(flatten)]
        datasource: DatasourceArgs,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let built = match cli.command {
            CliCommand::Instant {
                expr,
                datasource,
                max_lines,
                from,
                to,
                interval_ms,
            } => {
                let opts = InstantOptions {
                    max_lines: max_lines.or(cfg.max_lines),
                    from,
                    to,
                    interval_ms,
                };
                run_instant(&resolve(&datasource, &cfg), &expr, &opts)?
            }
            CliCommand::Tail {
                expr,
                datasource,
                interval_ms,
            } => run_tail(&resolve(&datasource, &cfg), &expr, interval_ms)?,
            CliCommand::Build {
                path,
                mode,
                datasource,
            } => run_build(&resolve(&datasource, &cfg), &path, mode.into())?,
        };

        println!("{}", built.url);
        Ok(())
    }
}

/// Command-line values win over the config file.
fn resolve(args: &DatasourceArgs, cfg: &DatasourceConfig) -> Datasource {
    Datasource {
        url: args.url.clone().unwrap_or_else(|| cfg.url.clone()),
        params: args
            .params
            .clone()
            .unwrap_or_else(|| cfg.query_params.clone()),
    }
}

#[cfg(test)]
mod tests;

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Folio content indexer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: folio.toml, searched upward from cwd)
    #[arg(short = 'C', long, default_value = "folio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan the content root and write the table and search index
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Look up records in previously built artifacts
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Content root directory (overrides `[build] content`)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Table artifact path (overrides `[build] table`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub table: Option<PathBuf>,

    /// Search index artifact path (overrides `[build] index`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub index: Option<PathBuf>,

    /// Pretty-print both artifacts
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub pretty: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Query command arguments.
#[derive(clap::Args, Debug, Clone)]
#[command(group(clap::ArgGroup::new("mode").required(true).args(["search", "tag", "route"])))]
pub struct QueryArgs {
    /// Free-text search over title, description and content
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Exact tag match (case-insensitive)
    #[arg(short = 'g', long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Print one record and its resolved children
    #[arg(short, long, value_name = "ROUTE")]
    pub route: Option<String>,

    /// Drop search hits scoring below this value (overrides `[search] min_score`)
    #[arg(short = 'm', long)]
    pub min_score: Option<f64>,

    /// Skip this many results
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Return at most this many results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Table artifact path (overrides `[build] table`)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub table: Option<PathBuf>,

    /// Search index artifact path (overrides `[build] index`)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub index: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_query(&self) -> bool {
        matches!(self.command, Commands::Query { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["folio", "build"]).unwrap();
        assert!(cli.is_build());
        assert_eq!(cli.config, PathBuf::from("folio.toml"));
        let Commands::Build { build_args } = cli.command else {
            unreachable!()
        };
        assert!(build_args.content.is_none());
        assert!(build_args.pretty.is_none());
    }

    #[test]
    fn test_build_overrides() {
        let cli = Cli::try_parse_from([
            "folio", "b", "posts", "-t", "out/t.json", "-i", "out/i.json", "--pretty",
        ])
        .unwrap();
        let Commands::Build { build_args } = cli.command else {
            unreachable!()
        };
        assert_eq!(build_args.content, Some(PathBuf::from("posts")));
        assert_eq!(build_args.table, Some(PathBuf::from("out/t.json")));
        assert_eq!(build_args.index, Some(PathBuf::from("out/i.json")));
        assert_eq!(build_args.pretty, Some(true));
    }

    #[test]
    fn test_query_requires_exactly_one_mode() {
        assert!(Cli::try_parse_from(["folio", "query"]).is_err());
        assert!(Cli::try_parse_from(["folio", "query", "-s", "rust", "-g", "ai"]).is_err());

        let cli = Cli::try_parse_from(["folio", "q", "--tag", "RAG"]).unwrap();
        assert!(cli.is_query());
    }
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Build RSS, Atom and sitemap documents from a feed definition
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug records to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Feed definition path (default: feed.toml)
    #[arg(short = 'C', long, global = true, default_value = "feed.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the feed as rss, atom or sitemap
    #[command(visible_alias = "r")]
    Render {
        /// Output dialect (rss, atom, sitemap)
        #[arg(short, long, default_value = "rss")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Check the channel and every item, listing all problems found
    #[command(visible_alias = "v")]
    Validate {
        /// Print the errors as a JSON array on stdout
        #[arg(long)]
        json: bool,
    },

    /// Print item counts and size estimate as JSON
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["feedkit", "render"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("feed.toml"));
        assert!(!cli.verbose);
        let Commands::Render { format, output } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(format, "rss");
        assert_eq!(output, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["feedkit", "validate", "--verbose", "-C", "site/feed.toml"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site/feed.toml"));
        assert!(matches!(cli.command, Commands::Validate { json: false }));
    }

    #[test]
    fn test_validate_json_flag() {
        let cli = Cli::try_parse_from(["feedkit", "v", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { json: true }));
    }

    #[test]
    fn test_render_with_output() {
        let cli =
            Cli::try_parse_from(["feedkit", "r", "--format", "atom", "-o", "atom.xml"]).unwrap();
        let Commands::Render { format, output } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(format, "atom");
        assert_eq!(output, Some(PathBuf::from("atom.xml")));
    }
}

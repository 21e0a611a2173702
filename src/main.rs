//! feedkit - render RSS, Atom and sitemap documents from a feed definition.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    feedkit::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Render { format, output } => {
            cli::render::render_feed(&cli, format, output.as_deref())
        }
        Commands::Validate { json } => cli::validate::validate_feed(&cli, *json),
        Commands::Stats => cli::stats::print_stats(&cli),
    }
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::FormatHint;

/// Normalize flat dot-path records into a hierarchy and prepare layout panels
#[derive(Parser, Debug)]
#[command(name = "hiermap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .hiermap.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Record format, overrides config (auto, id, population)
    #[arg(short, long, global = true)]
    pub format: Option<FormatHint>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the normalized tree as JSON
    Build {
        /// Dataset JSON file, "-" for stdin (default: configured input)
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show hierarchy as tree
    Tree {
        /// Dataset JSON file, "-" for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Show aggregated values in descending order instead of raw values
        #[arg(short, long)]
        sorted: bool,
    },

    /// List leaf paths with their values
    Leaves {
        /// Dataset JSON file, "-" for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Write one panel per layout (treemap, radial, partition, circlePacking, sunburst)
    Render {
        /// Dataset JSON file, "-" for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Output directory, overrides config
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
        /// Canvas width, overrides config
        #[arg(long)]
        width: Option<f64>,
        /// Canvas height, overrides config
        #[arg(long)]
        height: Option<f64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_render_flags_when_parsing_then_populates_overrides() {
        let cli = Cli::try_parse_from([
            "hiermap", "-dd", "--format", "population", "render", "data.json", "-o", "out",
            "--width", "800",
        ])
        .unwrap();

        assert_eq!(cli.debug, 2);
        assert_eq!(cli.format, Some(FormatHint::Population));
        match cli.command {
            Some(Commands::Render {
                input,
                output_dir,
                width,
                height,
            }) => {
                assert_eq!(input, Some(PathBuf::from("data.json")));
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(width, Some(800.0));
                assert_eq!(height, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Canonical URL builder for static site builds
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: canonical.toml, skipped when absent)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fill in canonical URLs for a file registry (JSON object of path → metadata)
    #[command(visible_alias = "a")]
    Apply {
        #[command(flatten)]
        options: CanonicalArgs,

        /// Registry JSON file. Use `-` to read from stdin.
        #[arg(value_name = "REGISTRY", value_hint = clap::ValueHint::FilePath)]
        registry: PathBuf,

        /// Write the updated registry to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Rewrite the registry file in place
        #[arg(short, long)]
        in_place: bool,
    },

    /// Print the canonical URL for each given relative path
    #[command(visible_alias = "u")]
    Url {
        #[command(flatten)]
        options: CanonicalArgs,

        /// Relative paths, as the build stores them
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,
    },
}

/// Option overrides shared by all subcommands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CanonicalArgs {
    /// Absolute base URL, scheme included (e.g. https://example.com)
    #[arg(short = 'H', long, value_hint = clap::ValueHint::Url)]
    pub hostname: Option<String>,

    /// Glob selecting files; repeat for several, prefix with `!` to exclude
    #[arg(short, long, value_name = "GLOB")]
    pub pattern: Vec<String>,

    /// Drop a trailing `index.html`
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub omit_index: Option<bool>,

    /// Strip trailing slashes from the final URL
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub omit_trailing_slashes: Option<bool>,

    /// Extension to strip (must start with `.`); repeat for several
    #[arg(short = 'x', long, value_name = "EXT")]
    pub omit_extension: Vec<String>,
}

impl Cli {
    pub const fn is_apply(&self) -> bool {
        matches!(self.command, Commands::Apply { .. })
    }

    /// Option overrides of the active subcommand.
    pub fn options(&self) -> &CanonicalArgs {
        match &self.command {
            Commands::Apply { options, .. } | Commands::Url { options, .. } => options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "tola-canonical",
            "apply",
            "files.json",
            "--hostname",
            "https://example.com",
            "--omit-index",
            "-x",
            ".html",
            "-p",
            "**/*.html",
            "-p",
            "!drafts/**",
        ])
        .unwrap();

        assert!(cli.is_apply());
        let options = cli.options();
        assert_eq!(options.hostname.as_deref(), Some("https://example.com"));
        assert_eq!(options.omit_index, Some(true));
        assert_eq!(options.omit_trailing_slashes, None);
        assert_eq!(options.omit_extension, [".html"]);
        assert_eq!(options.pattern, ["**/*.html", "!drafts/**"]);
    }

    #[test]
    fn test_parse_explicit_false() {
        let cli = Cli::try_parse_from([
            "tola-canonical",
            "url",
            "--omit-trailing-slashes",
            "false",
            "index.html",
        ])
        .unwrap();
        assert_eq!(cli.options().omit_trailing_slashes, Some(false));
        assert!(matches!(cli.command, Commands::Url { ref paths, .. } if paths == &["index.html"]));
    }

    #[test]
    fn test_output_conflicts_with_in_place() {
        let result = Cli::try_parse_from([
            "tola-canonical",
            "apply",
            "files.json",
            "--in-place",
            "--output",
            "out.json",
        ]);
        assert!(result.is_err());
    }
}

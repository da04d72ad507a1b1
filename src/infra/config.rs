use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::core::options::LinkOptions;

/// File-backed defaults. Every key is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Overwrite existing destination entries
    pub force: bool,

    /// Prune dead links after mirroring
    pub clean: bool,

    /// File-name prefix for created links
    pub prefix: String,

    /// Globs skipped in every source
    pub exclude: Vec<String>,

    /// Descend into symlinked source directories
    pub follow_links: bool,

    /// Make source roots absolute before linking
    pub absolute: bool,
}

impl Config
{
    /// Layer command-line flags over file defaults.
    /// Booleans are OR'ed, `--prefix` replaces, `--exclude` extends.
    pub fn merge_cli(
        mut self,
        cli: &Cli,
    ) -> Self
    {
        self.force |= cli.force;
        self.clean |= cli.clean;
        self.follow_links |= cli.follow;
        self.absolute |= cli.absolute;

        if let Some(prefix) = &cli.prefix
        {
            self.prefix = prefix.clone();
        }

        self.exclude
            .extend(
                cli.exclude
                    .iter()
                    .cloned(),
            );
        self
    }

    /// Settings handed to the builder and pruner
    pub fn link_options(
        &self,
        dry_run: bool,
    ) -> LinkOptions
    {
        LinkOptions {
            overwrite: self.force,
            prefix: self
                .prefix
                .clone(),
            exclude: self
                .exclude
                .clone(),
            follow_links: self.follow_links,
            dry_run,
        }
    }

    pub fn to_toml(&self) -> Result<String>
    {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Load defaults from `path`, or return built-in defaults when no file
/// was given. The format follows the file extension.
pub fn load_config(path: Option<&Path>) -> Result<Config>
{
    let Some(path) = path
    else
    {
        return Ok(Config::default());
    };

    if !path.is_file()
    {
        anyhow::bail!("Config file {} does not exist", path.display());
    }

    let cfg = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

//! Filepath: src/core/driver.rs
//! Runs one invocation: validate every argument, mirror each source in
//! order into the shared destination, then optionally prune.

use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::info;

use crate::cli::{AppContext, Cli};
use crate::core::{
    error::{LinkError, Role},
    mirror::{MirrorBuilder, MirrorStats},
    options::LinkOptions,
    prune::{DeadLinkPruner, PruneStats},
};
use crate::infra::{
    config::{Config, load_config},
    utils::{FsUtils, PathUtils},
};

/// Everything a finished run did, for summaries and tests
#[derive(Debug, Default)]
pub struct RunReport
{
    pub mirrored: Vec<(PathBuf, MirrorStats)>,
    pub pruned: Option<PruneStats>,
}

/// Split positionals into sources and the trailing destination
pub fn split_paths(paths: &[PathBuf]) -> Result<(&[PathBuf], &Path), LinkError>
{
    match paths.split_last()
    {
        Some((destination, sources)) if !sources.is_empty() => Ok((sources, destination.as_path())),
        _ => Err(LinkError::MissingArguments),
    }
}

/// Check every root before anything is mutated
pub fn validate_roots(
    sources: &[PathBuf],
    destination: &Path,
) -> Result<(), LinkError>
{
    if !FsUtils::is_dir(destination)
    {
        return Err(LinkError::NotADirectory {
            role: Role::Destination,
            path: destination.to_path_buf(),
        });
    }

    if let Some(bad) = sources
        .iter()
        .find(|s| !FsUtils::is_dir(s))
    {
        return Err(LinkError::NotADirectory {
            role: Role::Source,
            path: bad.clone(),
        });
    }

    Ok(())
}

/// Mirror all sources, then prune when asked. Stops at the first
/// fatal error; earlier sources stay mirrored.
pub fn execute(
    sources: &[PathBuf],
    destination: &Path,
    options: &LinkOptions,
    absolute: bool,
    clean: bool,
) -> Result<RunReport, LinkError>
{
    validate_roots(sources, destination)?;

    let builder = MirrorBuilder::new(options)?;
    let mut report = RunReport::default();

    for source in sources
    {
        let source = if absolute
        {
            PathUtils::absolute(source).map_err(|err| LinkError::Absolutize {
                path: source.clone(),
                source: err,
            })?
        }
        else
        {
            source.clone()
        };

        let stats = builder.mirror(&source, destination)?;
        report
            .mirrored
            .push((source, stats));
    }

    if clean
    {
        let pruner = DeadLinkPruner::new(options);
        report.pruned = Some(pruner.prune(&PathUtils::with_trailing_separator(destination)));
    }

    Ok(report)
}

/// CLI entry point
pub fn run(
    cli: Cli,
    ctx: &AppContext,
) -> Result<()>
{
    let config = load_config(
        cli.config
            .as_deref(),
    )?
    .merge_cli(&cli);

    if cli.print_config
    {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    run_with_config(&cli.paths, &config, ctx)
}

/// Run against already-merged settings
pub fn run_with_config(
    paths: &[PathBuf],
    config: &Config,
    ctx: &AppContext,
) -> Result<()>
{
    let (sources, destination) = split_paths(paths)?;
    let options = config.link_options(ctx.dry_run);

    info!(sources = sources.len(), destination = %destination.display(), "starting run");

    let report = execute(sources, destination, &options, config.absolute, config.clean)?;

    if !ctx.quiet
    {
        print_summary(&report, destination, ctx);
    }

    Ok(())
}

fn print_summary(
    report: &RunReport,
    destination: &Path,
    ctx: &AppContext,
)
{
    let tag = if ctx.dry_run { "[dry-run] " } else { "" };

    for (source, stats) in &report.mirrored
    {
        let line = format!(
            "{tag}mirrored {} -> {}: {} dirs created, {} links created, {} replaced, {} skipped",
            source.display(),
            destination.display(),
            stats.dirs_created,
            stats.links_created,
            stats.links_replaced,
            stats.skipped
        );
        if ctx.no_color
        {
            println!("{line}");
        }
        else
        {
            println!("{}", line.green());
        }
    }

    if let Some(stats) = report.pruned
    {
        let line = format!(
            "{tag}pruned {}: {} dead links removed, {} kept, {} failed",
            destination.display(),
            stats.removed,
            stats.kept,
            stats.failed
        );
        if ctx.no_color
        {
            println!("{line}");
        }
        else if stats.failed > 0
        {
            println!("{}", line.yellow());
        }
        else
        {
            println!("{}", line.green());
        }
    }
}

/// Convert the run result to an exit code and diagnostic.
/// Keep the mapping centralized for CI predictability.
pub fn exit_code_for(err: &anyhow::Error) -> i32
{
    err.downcast_ref::<LinkError>()
        .map(LinkError::exit_code)
        .unwrap_or(2)
}

pub fn finish_with_exit(result: Result<()>) -> !
{
    match result
    {
        Ok(()) => std::process::exit(0),
        Err(err) =>
        {
            eprintln!("symlinkit: {err:#}");
            let code = exit_code_for(&err);
            if err
                .downcast_ref::<LinkError>()
                .is_some_and(LinkError::is_precondition)
            {
                eprintln!("Usage: symlinkit [OPTIONS] <SOURCE>... <DESTINATION>");
            }
            std::process::exit(code);
        }
    }
}

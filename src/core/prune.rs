//! Filepath: src/core/prune.rs
//! Dead-link pruner: remove symlinks under a destination root whose
//! target is neither a directory nor a plain file.
//!
//! Only symlinks are ever deleted. The stored target is checked as-is,
//! so relative targets resolve against the working directory, the same
//! base the builder used when it wrote them.
//! Removal failures are logged and counted, never escalated.

use std::{convert::Infallible, fs, io, path::Path};

use tracing::{debug, info, instrument, warn};

use crate::core::options::LinkOptions;
use crate::infra::{
    utils::FsUtils,
    walk::{Step, TreeVisitor, TreeWalker},
};

/// Counters for one pruning pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats
{
    /// Links whose target is live
    pub kept: usize,
    /// Dead links removed (or that would be, in dry-run)
    pub removed: usize,
    /// Dead links that could not be removed
    pub failed: usize,
}

pub struct DeadLinkPruner
{
    dry_run: bool,
    walker: TreeWalker,
}

impl DeadLinkPruner
{
    pub fn new(options: &LinkOptions) -> Self
    {
        Self {
            dry_run: options.dry_run,
            walker: TreeWalker::default()
                .with_resolve_links(false)
                .with_follow_links(false),
        }
    }

    /// Walk `destination` and drop every dead link. The caller has
    /// already checked that `destination` is a directory.
    #[instrument(skip_all, fields(destination = %destination.display()))]
    pub fn prune(
        &self,
        destination: &Path,
    ) -> PruneStats
    {
        let mut pass = PrunePass {
            dry_run: self.dry_run,
            stats: PruneStats::default(),
        };

        let Ok(()) = self
            .walker
            .walk(destination, &mut pass);

        info!(
            kept = pass.stats.kept,
            removed = pass.stats.removed,
            failed = pass.stats.failed,
            "pruned dead links"
        );

        pass.stats
    }
}

/// Decide whether the link at `link` points at something live.
/// Unreadable links are dead.
pub fn is_dead_link(link: &Path) -> bool
{
    let target = match fs::read_link(link)
    {
        Ok(target) => target,
        Err(err) =>
        {
            debug!(path = %link.display(), error = %err, "unreadable link");
            return true;
        }
    };

    !FsUtils::is_live_target(&target)
}

struct PrunePass
{
    dry_run: bool,
    stats: PruneStats,
}

impl TreeVisitor for PrunePass
{
    type Error = Infallible;

    fn visit_directory(
        &mut self,
        _path: &Path,
        _rel: &Path,
    ) -> Result<Step, Infallible>
    {
        Ok(Step::Continue)
    }

    /// Regular files (and other non-links) are never touched
    fn visit_file(
        &mut self,
        _path: &Path,
        _rel: &Path,
    ) -> Result<Step, Infallible>
    {
        Ok(Step::Continue)
    }

    fn visit_symlink(
        &mut self,
        path: &Path,
        _rel: &Path,
    ) -> Result<Step, Infallible>
    {
        if !is_dead_link(path)
        {
            self.stats.kept += 1;
            return Ok(Step::Continue);
        }

        if self.dry_run
        {
            debug!(path = %path.display(), "would remove dead link");
            self.stats.removed += 1;
            return Ok(Step::Continue);
        }

        match fs::remove_file(path)
        {
            Ok(()) =>
            {
                debug!(path = %path.display(), "removed dead link");
                self.stats.removed += 1;
            }
            Err(err) =>
            {
                warn!(path = %path.display(), error = %err, "could not remove dead link");
                self.stats.failed += 1;
            }
        }
        Ok(Step::Continue)
    }

    fn visit_unresolved(
        &mut self,
        path: &Path,
        err: &io::Error,
    )
    {
        // Literal mode never stats through links, so this is rare
        warn!(path = %path.display(), error = %err, "skipping unreadable destination entry");
    }
}

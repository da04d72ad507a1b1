//! Filepath: src/core/mirror.rs
//! Mirror builder: replicate a source tree's directory skeleton under a
//! destination root and create one symlink per source file.
//!
//! Mapping for a file at `Rd/Rf` below the source root:
//!   link   = destination + Rd + prefix + Rf
//!   target = source + Rd/Rf   (stored literally, never canonicalized)
//!
//! Directories are created with mode 0755 and skipped when present.
//! Any mkdir or symlink failure aborts the run; nothing is rolled back.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, warn};

use crate::core::{
    error::{LinkError, Role},
    options::LinkOptions,
};
use crate::infra::{
    utils::{FsUtils, PathUtils},
    walk::{Step, TreeVisitor, TreeWalker},
};

/// Counters for one source root pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats
{
    pub dirs_created: usize,
    pub dirs_existing: usize,
    pub links_created: usize,
    /// Links created after removing an entry at the same path
    pub links_replaced: usize,
    /// Entries that could not be resolved and were left out
    pub skipped: usize,
}

/// Builds link mirrors; one instance serves every source root of a run.
pub struct MirrorBuilder<'a>
{
    options: &'a LinkOptions,
    walker: TreeWalker,
}

impl<'a> MirrorBuilder<'a>
{
    /// Compile the exclude globs up front so bad patterns fail before
    /// any source is touched.
    pub fn new(options: &'a LinkOptions) -> Result<Self, LinkError>
    {
        let walker = TreeWalker::new(&options.exclude)?
            .with_resolve_links(true)
            .with_follow_links(options.follow_links);

        Ok(Self { options, walker })
    }

    /// Mirror `source` into `destination`. Both must be existing
    /// directories; otherwise nothing is walked.
    #[instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
    pub fn mirror(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<MirrorStats, LinkError>
    {
        if !FsUtils::is_dir(source)
        {
            return Err(LinkError::NotADirectory {
                role: Role::Source,
                path: source.to_path_buf(),
            });
        }
        if !FsUtils::is_dir(destination)
        {
            return Err(LinkError::NotADirectory {
                role: Role::Destination,
                path: destination.to_path_buf(),
            });
        }

        let source = PathUtils::with_trailing_separator(source);
        let destination = PathUtils::with_trailing_separator(destination);

        let mut pass = MirrorPass {
            source: &source,
            destination: &destination,
            options: self.options,
            stats: MirrorStats::default(),
        };

        self.walker
            .walk(&source, &mut pass)?;

        info!(
            dirs_created = pass.stats.dirs_created,
            links_created = pass.stats.links_created,
            links_replaced = pass.stats.links_replaced,
            skipped = pass.stats.skipped,
            "mirrored source root"
        );

        Ok(pass.stats)
    }
}

/// Visitor state for a single source root
struct MirrorPass<'p>
{
    source: &'p Path,
    destination: &'p Path,
    options: &'p LinkOptions,
    stats: MirrorStats,
}

impl MirrorPass<'_>
{
    /// Create `dir` unless a directory is already there
    fn ensure_directory(
        &mut self,
        dir: &Path,
    ) -> Result<(), LinkError>
    {
        if FsUtils::is_dir(dir)
        {
            self.stats.dirs_existing += 1;
            return Ok(());
        }

        if self.options.dry_run
        {
            debug!(path = %dir.display(), "would create directory");
            self.stats.dirs_created += 1;
            return Ok(());
        }

        match FsUtils::create_dir(dir)
        {
            Ok(()) =>
            {
                debug!(path = %dir.display(), "created directory");
                self.stats.dirs_created += 1;
                Ok(())
            }
            // Lost a race against another creator; fine if it is a dir now
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists && FsUtils::is_dir(dir) =>
            {
                self.stats.dirs_existing += 1;
                Ok(())
            }
            Err(source) => Err(LinkError::CreateDir {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }

    /// Best-effort removal of whatever occupies `link`.
    /// Returns true when something was (or would be) removed.
    fn clear_link_path(
        &self,
        link: &Path,
    ) -> bool
    {
        if !FsUtils::exists_no_follow(link)
        {
            return false;
        }

        if self.options.dry_run
        {
            debug!(path = %link.display(), "would remove existing entry");
            return true;
        }

        match FsUtils::remove_entry(link)
        {
            Ok(()) => true,
            Err(err) =>
            {
                debug!(path = %link.display(), error = %err, "could not remove existing entry");
                false
            }
        }
    }

    fn create_link(
        &mut self,
        target: PathBuf,
        link: PathBuf,
        replaced: bool,
    ) -> Result<(), LinkError>
    {
        if self.options.dry_run
        {
            // Predict the collision the real run would hit
            if !replaced && FsUtils::exists_no_follow(&link)
            {
                return Err(LinkError::CreateLink {
                    link,
                    target,
                    source: io::Error::from(io::ErrorKind::AlreadyExists),
                });
            }
            debug!(link = %link.display(), target = %target.display(), "would create link");
        }
        else
        {
            if let Err(source) = FsUtils::symlink(&target, &link)
            {
                return Err(LinkError::CreateLink {
                    link,
                    target,
                    source,
                });
            }
            debug!(link = %link.display(), target = %target.display(), "created link");
        }

        if replaced
        {
            self.stats.links_replaced += 1;
        }
        else
        {
            self.stats.links_created += 1;
        }
        Ok(())
    }
}

impl TreeVisitor for MirrorPass<'_>
{
    type Error = LinkError;

    fn visit_directory(
        &mut self,
        _path: &Path,
        rel: &Path,
    ) -> Result<Step, LinkError>
    {
        // The source root itself maps onto the destination root
        if rel
            .as_os_str()
            .is_empty()
        {
            return Ok(Step::Continue);
        }

        let dir = self
            .destination
            .join(rel);
        self.ensure_directory(&dir)?;
        Ok(Step::Continue)
    }

    fn visit_file(
        &mut self,
        _path: &Path,
        rel: &Path,
    ) -> Result<Step, LinkError>
    {
        let link = PathUtils::link_path(self.destination, rel, &self.options.prefix);
        let target = self
            .source
            .join(rel);

        let replaced = self.options.overwrite && self.clear_link_path(&link);
        self.create_link(target, link, replaced)?;
        Ok(Step::Continue)
    }

    fn visit_unresolved(
        &mut self,
        path: &Path,
        err: &io::Error,
    )
    {
        warn!(path = %path.display(), error = %err, "skipping unresolvable source entry");
        self.stats.skipped += 1;
    }
}

//! Filepath: src/infra/walk.rs
//! Depth-first tree walker driving a visitor.
//! - Parents are always visited before their children
//! - Entries inside a directory are visited in file-name order
//! - Callbacks steer traversal: continue, skip the subtree, or abort
//!   the whole walk by returning an error
//! - Optional exclude globs (matched on paths relative to the root)
//!
//! Backed by the `walkdir` crate and `globset`.
//!
//! Two entry-typing modes:
//!   1) Resolving: every path is re-stat'ed following links, so a symlink
//!      shows up as whatever it points at. Unresolvable paths are handed to
//!      `visit_unresolved` and skipped.
//!   2) Literal: entry types come from `lstat`; symlinks are reported via
//!      `visit_symlink` and never followed.

use std::{fs, io, path::Path};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What the walker should do after a callback returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step
{
    /// Keep going (descend if this was a directory)
    Continue,

    /// Do not descend into this directory; siblings are still visited
    SkipSubtree,
}

/// Capability interface implemented by each tree pass.
/// `path` is the full walked path, `rel` is relative to the walk root
/// (empty for the root itself). Returning `Err` aborts the walk.
pub trait TreeVisitor
{
    type Error;

    fn visit_directory(
        &mut self,
        path: &Path,
        rel: &Path,
    ) -> Result<Step, Self::Error>;

    fn visit_file(
        &mut self,
        path: &Path,
        rel: &Path,
    ) -> Result<Step, Self::Error>;

    /// Only called in literal mode
    fn visit_symlink(
        &mut self,
        _path: &Path,
        _rel: &Path,
    ) -> Result<Step, Self::Error>
    {
        Ok(Step::Continue)
    }

    /// A path could not be resolved; it is skipped either way
    fn visit_unresolved(
        &mut self,
        path: &Path,
        err: &io::Error,
    )
    {
        warn!(path = %path.display(), error = %err, "skipping unresolvable entry");
    }
}

/// Resolved type of a walked entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind
{
    Directory,
    File,
    Symlink,
}

/// Configured depth-first walker.
pub struct TreeWalker
{
    /// Compiled exclude patterns (relative paths)
    exclude: GlobSet,

    /// Re-stat every entry following links; default true
    resolve_links: bool,

    /// Descend into symlinked directories; default false
    follow_links: bool,
}

impl Default for TreeWalker
{
    fn default() -> Self
    {
        Self {
            exclude: GlobSet::empty(),
            resolve_links: true,
            follow_links: false,
        }
    }
}

impl TreeWalker
{
    /// Build a walker with exclude patterns (e.g. "**/.git", "*.tmp").
    pub fn new(exclude: &[String]) -> Result<Self, globset::Error>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in exclude
        {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            exclude: builder.build()?,
            ..Self::default()
        })
    }

    /// (Optional) Resolve entries through symlinks (default true).
    pub fn with_resolve_links(
        mut self,
        resolve: bool,
    ) -> Self
    {
        self.resolve_links = resolve;
        self
    }

    /// (Optional) Descend into symlinked directories (default false).
    /// Loops are reported by walkdir as errors and skipped.
    pub fn with_follow_links(
        mut self,
        follow: bool,
    ) -> Self
    {
        self.follow_links = follow;
        self
    }

    /// Walk `root`, handing every entry (root included) to `visitor`.
    pub fn walk<V: TreeVisitor>(
        &self,
        root: &Path,
        visitor: &mut V,
    ) -> Result<(), V::Error>
    {
        let mut entries = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by(|a, b| {
                a.file_name()
                    .cmp(b.file_name())
            })
            .into_iter();

        while let Some(next) = entries.next()
        {
            let entry = match next
            {
                Ok(entry) => entry,
                Err(err) =>
                {
                    // Unreadable directory or link loop; walkdir moves on
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    warn!(path = %at, error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            let rel = path
                .strip_prefix(root)
                .unwrap_or(path);

            // Only real directories get pushed by walkdir; skipping
            // anything else would drop the rest of the parent.
            let descends = entry
                .file_type()
                .is_dir();

            if entry.depth() > 0 && self.exclude.is_match(rel)
            {
                debug!(path = %path.display(), "excluded");
                if descends
                {
                    entries.skip_current_dir();
                }
                continue;
            }

            let kind = if self.resolve_links
            {
                match fs::metadata(path)
                {
                    Ok(meta) if meta.is_dir() => EntryKind::Directory,
                    Ok(_) => EntryKind::File,
                    Err(err) =>
                    {
                        visitor.visit_unresolved(path, &err);
                        if descends
                        {
                            entries.skip_current_dir();
                        }
                        continue;
                    }
                }
            }
            else
            {
                let ft = entry.file_type();
                if ft.is_symlink()
                {
                    EntryKind::Symlink
                }
                else if ft.is_dir()
                {
                    EntryKind::Directory
                }
                else
                {
                    EntryKind::File
                }
            };

            let step = match kind
            {
                EntryKind::Directory => visitor.visit_directory(path, rel)?,
                EntryKind::File => visitor.visit_file(path, rel)?,
                EntryKind::Symlink => visitor.visit_symlink(path, rel)?,
            };

            if step == Step::SkipSubtree && descends
            {
                entries.skip_current_dir();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use std::path::PathBuf;

    use anyhow::Result;
    use tempfile::TempDir;

    use super::*;

    /// Create a file with parent dirs as needed
    fn write_file(
        root: &Path,
        rel: &str,
    ) -> Result<()>
    {
        let path = root.join(rel);
        if let Some(parent) = path.parent()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, rel)?;
        Ok(())
    }

    /// Records every callback as "<kind>:<rel>"
    #[derive(Default)]
    struct Recorder
    {
        seen: Vec<String>,
        unresolved: Vec<PathBuf>,
        skip: Option<PathBuf>,
        fail_on: Option<PathBuf>,
    }

    impl TreeVisitor for Recorder
    {
        type Error = String;

        fn visit_directory(
            &mut self,
            _path: &Path,
            rel: &Path,
        ) -> Result<Step, String>
        {
            self.seen
                .push(format!("dir:{}", rel.display()));
            if self.skip.as_deref() == Some(rel)
            {
                return Ok(Step::SkipSubtree);
            }
            Ok(Step::Continue)
        }

        fn visit_file(
            &mut self,
            _path: &Path,
            rel: &Path,
        ) -> Result<Step, String>
        {
            if self.fail_on.as_deref() == Some(rel)
            {
                return Err(format!("boom at {}", rel.display()));
            }
            self.seen
                .push(format!("file:{}", rel.display()));
            Ok(Step::Continue)
        }

        fn visit_symlink(
            &mut self,
            _path: &Path,
            rel: &Path,
        ) -> Result<Step, String>
        {
            self.seen
                .push(format!("link:{}", rel.display()));
            Ok(Step::Continue)
        }

        fn visit_unresolved(
            &mut self,
            path: &Path,
            _err: &io::Error,
        )
        {
            self.unresolved
                .push(path.to_path_buf());
        }
    }

    #[test]
    fn visits_parents_before_children_in_name_order() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();
        write_file(root, "b/z.txt")?;
        write_file(root, "a/y.txt")?;
        write_file(root, "top.txt")?;

        let mut rec = Recorder::default();
        TreeWalker::default()
            .walk(root, &mut rec)
            .map_err(anyhow::Error::msg)?;

        assert_eq!(
            rec.seen,
            vec!["dir:", "dir:a", "file:a/y.txt", "dir:b", "file:b/z.txt", "file:top.txt"]
        );
        Ok(())
    }

    #[test]
    fn skip_subtree_keeps_siblings() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();
        write_file(root, "a/inner.txt")?;
        write_file(root, "b/kept.txt")?;

        let mut rec = Recorder {
            skip: Some(PathBuf::from("a")),
            ..Recorder::default()
        };
        TreeWalker::default()
            .walk(root, &mut rec)
            .map_err(anyhow::Error::msg)?;

        assert!(
            rec.seen
                .contains(&"dir:a".to_string())
        );
        assert!(
            !rec.seen
                .contains(&"file:a/inner.txt".to_string())
        );
        assert!(
            rec.seen
                .contains(&"file:b/kept.txt".to_string())
        );
        Ok(())
    }

    #[test]
    fn error_aborts_the_walk() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();
        write_file(root, "a.txt")?;
        write_file(root, "b.txt")?;
        write_file(root, "c.txt")?;

        let mut rec = Recorder {
            fail_on: Some(PathBuf::from("b.txt")),
            ..Recorder::default()
        };
        let err = TreeWalker::default()
            .walk(root, &mut rec)
            .unwrap_err();

        assert!(err.contains("b.txt"));
        assert!(
            !rec.seen
                .contains(&"file:c.txt".to_string())
        );
        Ok(())
    }

    #[test]
    fn exclude_globs_prune_directories_and_files() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();
        write_file(root, ".git/HEAD")?;
        write_file(root, "keep/a.txt")?;
        write_file(root, "keep/b.tmp")?;

        let walker = TreeWalker::new(&[".git".to_string(), "**/*.tmp".to_string()])?;
        let mut rec = Recorder::default();
        walker
            .walk(root, &mut rec)
            .map_err(anyhow::Error::msg)?;

        assert_eq!(rec.seen, vec!["dir:", "dir:keep", "file:keep/a.txt"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn resolving_mode_types_links_by_target() -> Result<()>
    {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new()?;
        let root = tmp.path();
        write_file(root, "real/f.txt")?;
        symlink(root.join("real/f.txt"), root.join("to_file"))?;
        symlink(root.join("real"), root.join("to_dir"))?;
        symlink(root.join("missing"), root.join("broken"))?;

        let mut rec = Recorder::default();
        TreeWalker::default()
            .walk(root, &mut rec)
            .map_err(anyhow::Error::msg)?;

        assert!(
            rec.seen
                .contains(&"file:to_file".to_string())
        );
        assert!(
            rec.seen
                .contains(&"dir:to_dir".to_string())
        );
        // Not descended without follow_links
        assert!(
            !rec.seen
                .contains(&"file:to_dir/f.txt".to_string())
        );
        assert_eq!(rec.unresolved, vec![root.join("broken")]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn follow_mode_descends_into_linked_dirs() -> Result<()>
    {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new()?;
        let root = tmp.path();
        write_file(root, "real/f.txt")?;
        symlink(root.join("real"), root.join("to_dir"))?;

        let mut rec = Recorder::default();
        TreeWalker::default()
            .with_follow_links(true)
            .walk(root, &mut rec)
            .map_err(anyhow::Error::msg)?;

        assert!(
            rec.seen
                .contains(&"file:to_dir/f.txt".to_string())
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn literal_mode_reports_symlinks() -> Result<()>
    {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new()?;
        let root = tmp.path();
        fs::create_dir(root.join("real"))?;
        symlink(root.join("real"), root.join("to_dir"))?;
        symlink(root.join("missing"), root.join("broken"))?;

        let mut rec = Recorder::default();
        TreeWalker::default()
            .with_resolve_links(false)
            .walk(root, &mut rec)
            .map_err(anyhow::Error::msg)?;

        assert_eq!(rec.seen, vec!["dir:", "link:broken", "dir:real", "link:to_dir"]);
        assert!(
            rec.unresolved
                .is_empty()
        );
        Ok(())
    }
}

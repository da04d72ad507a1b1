//! Filepath: src/infra/utils.rs
//! Path and file-type helpers organized by small, focused structs.
//! All functions are associated fns to keep call sites
//! ergonomic, testable, and discoverable.

use std::{
    ffi::OsString,
    fs, io,
    path::{MAIN_SEPARATOR_STR, Path, PathBuf, is_separator},
};

/// Lexical path helpers (no filesystem access)
pub struct PathUtils;

impl PathUtils
{
    /// Return `path` with a trailing separator appended if missing.
    /// An empty path becomes the current directory (`./`), never `/`.
    pub fn with_trailing_separator(path: &Path) -> PathBuf
    {
        if path
            .as_os_str()
            .is_empty()
        {
            return PathBuf::from(format!(".{MAIN_SEPARATOR_STR}"));
        }

        if Self::ends_with_separator(path)
        {
            return path.to_path_buf();
        }

        let mut raw = path
            .as_os_str()
            .to_os_string();
        raw.push(MAIN_SEPARATOR_STR);
        PathBuf::from(raw)
    }

    /// True when the last character of `path` is a separator
    pub fn ends_with_separator(path: &Path) -> bool
    {
        path.as_os_str()
            .to_string_lossy()
            .ends_with(is_separator)
    }

    /// Compute where the link for a file at `rel` (relative to its source
    /// root) lands under `destination`. Only the file name gets `prefix`.
    pub fn link_path(
        destination: &Path,
        rel: &Path,
        prefix: &str,
    ) -> PathBuf
    {
        let Some(name) = rel.file_name()
        else
        {
            return destination.join(rel);
        };

        if prefix.is_empty()
        {
            return destination.join(rel);
        }

        let mut prefixed = OsString::from(prefix);
        prefixed.push(name);

        match rel.parent()
        {
            Some(dir) => destination
                .join(dir)
                .join(prefixed),
            None => destination.join(prefixed),
        }
    }

    /// Make `path` absolute against the working directory without
    /// resolving symlinks. Keeps a trailing separator if one was present.
    pub fn absolute(path: &Path) -> io::Result<PathBuf>
    {
        let absolute = std::path::absolute(path)?;

        if Self::ends_with_separator(path)
        {
            return Ok(Self::with_trailing_separator(&absolute));
        }

        Ok(absolute)
    }
}

/// Filesystem probes and mutations used by the builder and pruner
pub struct FsUtils;

impl FsUtils
{
    /// True when `path` resolves (following links) to a directory
    pub fn is_dir(path: &Path) -> bool
    {
        fs::metadata(path).is_ok_and(|m| m.is_dir())
    }

    /// True when `path` resolves to a non-directory that is neither a
    /// named pipe nor a socket. Dangling links fail the stat and are
    /// never plain files.
    pub fn is_plain_file(path: &Path) -> bool
    {
        let Ok(meta) = fs::metadata(path)
        else
        {
            return false;
        };

        if meta.is_dir()
        {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;

            let ft = meta.file_type();
            if ft.is_fifo() || ft.is_socket()
            {
                return false;
            }
        }

        true
    }

    /// A link target counts as live if it is a directory or a plain file
    pub fn is_live_target(path: &Path) -> bool
    {
        Self::is_dir(path) || Self::is_plain_file(path)
    }

    /// Create a single directory with mode 0755 (umask applies)
    pub fn create_dir(path: &Path) -> io::Result<()>
    {
        let mut builder = fs::DirBuilder::new();

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        builder.create(path)
    }

    /// Create a symlink at `link` whose content is exactly `target`
    pub fn symlink(
        target: &Path,
        link: &Path,
    ) -> io::Result<()>
    {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_file(target, link)
        }
    }

    /// Remove whatever sits at `path` without following links.
    /// Directories are only removed when empty.
    pub fn remove_entry(path: &Path) -> io::Result<()>
    {
        let meta = fs::symlink_metadata(path)?;

        if meta.is_dir()
        {
            fs::remove_dir(path)
        }
        else
        {
            fs::remove_file(path)
        }
    }

    /// True when anything (including a dangling link) exists at `path`
    pub fn exists_no_follow(path: &Path) -> bool
    {
        fs::symlink_metadata(path).is_ok()
    }
}

#[cfg(test)]
mod tests
{
    use anyhow::Result;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn trailing_separator_is_added_once()
    {
        let once = PathUtils::with_trailing_separator(Path::new("src"));
        assert!(PathUtils::ends_with_separator(&once));

        let twice = PathUtils::with_trailing_separator(&once);
        assert_eq!(once, twice);
        assert_eq!(
            once.as_os_str(),
            format!("src{MAIN_SEPARATOR_STR}").as_str()
        );
    }

    #[test]
    fn empty_path_maps_to_current_dir()
    {
        let p = PathUtils::with_trailing_separator(Path::new(""));
        assert_eq!(p, PathBuf::from(format!(".{MAIN_SEPARATOR_STR}")));
    }

    #[test]
    fn link_path_prefixes_file_name_only()
    {
        let dst = Path::new("dst");

        assert_eq!(
            PathUtils::link_path(dst, Path::new("a/b.txt"), "pre_"),
            Path::new("dst/a/pre_b.txt")
        );
        assert_eq!(
            PathUtils::link_path(dst, Path::new("top.txt"), "pre_"),
            Path::new("dst/pre_top.txt")
        );
        assert_eq!(
            PathUtils::link_path(dst, Path::new("a/b.txt"), ""),
            Path::new("dst/a/b.txt")
        );
    }

    #[test]
    fn plain_file_and_dir_probes() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();
        fs::write(root.join("f.txt"), "x")?;
        fs::create_dir(root.join("d"))?;

        assert!(FsUtils::is_plain_file(&root.join("f.txt")));
        assert!(!FsUtils::is_plain_file(&root.join("d")));
        assert!(FsUtils::is_dir(&root.join("d")));
        assert!(!FsUtils::is_live_target(&root.join("missing")));
        assert!(FsUtils::is_live_target(&root.join("d")));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn sockets_and_dangling_links_are_not_plain() -> Result<()>
    {
        use std::os::unix::net::UnixListener;

        let tmp = TempDir::new()?;
        let root = tmp.path();

        let sock = root.join("s.sock");
        let _listener = UnixListener::bind(&sock)?;
        assert!(!FsUtils::is_plain_file(&sock));

        FsUtils::symlink(&root.join("nowhere"), &root.join("dangling"))?;
        assert!(!FsUtils::is_plain_file(&root.join("dangling")));
        assert!(FsUtils::exists_no_follow(&root.join("dangling")));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn named_pipes_are_not_plain() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let fifo = tmp
            .path()
            .join("pipe");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()?;
        assert!(status.success(), "mkfifo failed");

        assert!(!FsUtils::is_plain_file(&fifo));
        assert!(!FsUtils::is_live_target(&fifo));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn created_dirs_use_0755_under_default_umask() -> Result<()>
    {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new()?;
        let dir = tmp
            .path()
            .join("made");
        FsUtils::create_dir(&dir)?;

        let mode = fs::metadata(&dir)?
            .permissions()
            .mode()
            & 0o777;
        // umask can only clear bits
        assert_eq!(mode & !0o755, 0);
        Ok(())
    }

    #[test]
    fn remove_entry_handles_links_and_empty_dirs() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();
        fs::create_dir(root.join("empty"))?;
        fs::write(root.join("f"), "x")?;

        FsUtils::remove_entry(&root.join("empty"))?;
        FsUtils::remove_entry(&root.join("f"))?;
        assert!(!FsUtils::exists_no_follow(&root.join("empty")));
        assert!(!FsUtils::exists_no_follow(&root.join("f")));
        assert!(FsUtils::remove_entry(&root.join("f")).is_err());
        Ok(())
    }
}

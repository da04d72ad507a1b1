//! Immutable settings threaded into the builder and pruner.

/// Settings shared by every pass of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions
{
    /// Replace whatever already sits at a link path
    pub overwrite: bool,

    /// Prepended to the file name of every created link
    pub prefix: String,

    /// Globs (relative to each source root) that are not mirrored
    pub exclude: Vec<String>,

    /// Descend into symlinked source directories
    pub follow_links: bool,

    /// Log planned mutations without touching the filesystem
    pub dry_run: bool,
}

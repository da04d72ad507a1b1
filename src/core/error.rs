//! Typed failures raised by the mirror builder and the driver.
//!
//! Soft failures (stat errors mid-walk, best-effort removals) are logged
//! where they happen and never become a `LinkError`.

use std::{fmt, io, path::PathBuf};

/// Which positional argument a precondition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role
{
    Source,
    Destination,
}

impl fmt::Display for Role
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        match self
        {
            Role::Source => f.write_str("source"),
            Role::Destination => f.write_str("destination"),
        }
    }
}

/// Domain-specific error taxonomy for exit-code mapping
#[derive(Debug, thiserror::Error)]
pub enum LinkError
{
    /// Fewer than one source plus one destination
    #[error("expected at least one source and one destination directory")]
    MissingArguments,

    /// A source or destination argument is not an existing directory
    #[error("{role} {} is not a directory", path.display())]
    NotADirectory
    {
        role: Role,
        path: PathBuf,
    },

    /// An exclude glob failed to compile
    #[error("invalid exclude pattern")]
    InvalidPattern(#[from] globset::Error),

    /// Making a source root absolute failed
    #[error("cannot make {} absolute", path.display())]
    Absolutize
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// mkdir failed for a reason other than an existing directory
    #[error("failed to create directory {}", path.display())]
    CreateDir
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// symlink failed, typically a collision without overwrite
    #[error("failed to link {} -> {}", link.display(), target.display())]
    CreateLink
    {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LinkError
{
    /// Precondition problems exit with 2, mutation failures with 1
    pub fn exit_code(&self) -> i32
    {
        match self
        {
            LinkError::MissingArguments
            | LinkError::NotADirectory { .. }
            | LinkError::InvalidPattern(_)
            | LinkError::Absolutize { .. } => 2,
            LinkError::CreateDir { .. } | LinkError::CreateLink { .. } => 1,
        }
    }

    /// True for errors raised before anything was mutated
    pub fn is_precondition(&self) -> bool
    {
        self.exit_code() == 2
    }
}

//! **symlinkit** - Mirror directory trees as symlink farms
//!
//! Replicates the directory skeleton of one or more source trees into a
//! destination, links every file back to its original, and optionally
//! prunes links whose targets have gone away.

/// Command-line interface with clap integration
pub mod cli;

/// Core algorithms - mirroring, pruning, and the run driver
pub mod core {
    /// Typed errors and exit-code mapping
    pub mod error;
    pub use self::error::{LinkError, Role};

    /// Immutable settings shared by every pass
    pub mod options;
    pub use self::options::LinkOptions;

    /// Directory skeleton + per-file symlink creation
    pub mod mirror;
    pub use self::mirror::{MirrorBuilder, MirrorStats};

    /// Dead symlink removal
    pub mod prune;
    pub use self::prune::{DeadLinkPruner, PruneStats, is_dead_link};

    /// Multi-source driver, summary output, exit handling
    pub mod driver;
    pub use self::driver::{RunReport, execute, finish_with_exit, run};
}

/// Infrastructure - configuration, logging, walking, and path helpers
pub mod infra {
    /// Optional config file loading with CLI layering
    pub mod config;
    pub use self::config::{Config, load_config};

    /// tracing-subscriber initialization
    pub mod logging;

    /// Depth-first visitor walk with subtree skipping
    pub mod walk;
    pub use self::walk::{Step, TreeVisitor, TreeWalker};

    /// Path and file-type helpers
    pub mod utils;
    pub use self::utils::{FsUtils, PathUtils};
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli};
pub use crate::core::{DeadLinkPruner, LinkError, LinkOptions, MirrorBuilder, execute, run};
pub use crate::infra::{Config, TreeWalker, load_config};

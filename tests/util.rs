//! Shared test utilities for integration tests
//!
//! Provides common fixture creation and helper functions
//! used across multiple test files.

#![allow(dead_code)]

use std::path::Path;

use assert_fs::prelude::*;

/// Build the two-directory fixture used by most scenarios:
/// `src/a/b.txt`, `src/c/d.txt` and an empty `dst/`.
pub fn make_tree_fixture() -> assert_fs::TempDir
{
    // Initialize the temporary root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("src/a/b.txt")
        .write_str("b\n")
        .expect("write b.txt");
    tmp.child("src/c/d.txt")
        .write_str("d\n")
        .expect("write d.txt");

    // Destination starts empty
    tmp.child("dst")
        .create_dir_all()
        .expect("mkdir dst");

    tmp
}

/// Two sources that collide on `x.txt`, plus an empty `dst/`
pub fn make_colliding_fixture() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("src1/x.txt")
        .write_str("one\n")
        .expect("write src1");
    tmp.child("src1/only1.txt")
        .write_str("one\n")
        .expect("write only1");
    tmp.child("src2/x.txt")
        .write_str("two\n")
        .expect("write src2");
    tmp.child("dst")
        .create_dir_all()
        .expect("mkdir dst");

    tmp
}

/// True when anything, including a dangling link, sits at `path`
pub fn exists_no_follow(path: &Path) -> bool
{
    std::fs::symlink_metadata(path).is_ok()
}

/// True when `path` is a symlink (not followed)
pub fn is_symlink(path: &Path) -> bool
{
    std::fs::symlink_metadata(path).is_ok_and(|m| {
        m.file_type()
            .is_symlink()
    })
}

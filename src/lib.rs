//! Scaffolding of file trees over interchangeable storage backends.
//!
//! ### Overview
//!
//! `vfs-scaffold` writes, copies and describes whole directory trees through the generic
//! `FsBackend` trait. Two backends are provided: `MapFS`, an in-memory store, and `DirFS`,
//! which maps to a host directory.
//!
//! **Key ideas**:
//! - **Materialize**: write a file at any depth, creating its parent directories.
//! - **Populate**: build a tree from a map of relative paths to contents.
//! - **Copy**: replay every file of one backend onto another, host or memory.
//! - **Inspect**: report every entry of a tree to a pluggable sink.
//! - **Sandboxing**: backends only touch paths inside their root.
//!
//! ```
//! use vfs_scaffold::{FsBackend, MapFS, TreeContents, copy_tree, populate};
//!
//! let mut contents = TreeContents::new();
//! contents.insert("dir1/file.txt".into(), b"hello".to_vec());
//!
//! let mut src = MapFS::new();
//! populate(&mut src, &contents).unwrap();
//!
//! let mut dest = MapFS::new();
//! copy_tree(&src, &mut dest).unwrap();
//! assert_eq!(dest.read("dir1/file.txt").unwrap(), b"hello");
//! ```

pub mod config;
mod core;
pub mod error;
pub mod logging;
mod scaffold;
mod vfs;

pub use config::ScaffoldConfig;
pub use core::{DirEntry, DirEntryType, FsBackend, Metadata, Result};
pub use error::{Op, ScaffoldError};
pub use scaffold::{
    DEFAULT_DIR_MODE, Report, ReportKind, ReportSink, Scaffolder, TracingSink, TreeContents,
    copy_tree, inspect, materialize, materialize_parts, populate,
};
pub use vfs::{DirFS, DirHandle, Entry, EntryType, MapFS, MapHandle};

//! Strata: local snapshot version control
//!
//! A single-user version-control engine: it snapshots a directory tree
//! into immutable, hash-identified commits linked in a strictly linear
//! history, stores file content deduplicated in a content-addressed blob
//! store, and can restore any prior snapshot. Front-ends (graphical or
//! scripted) drive the [`repo::Repository`] operations directly; this
//! crate has no presentation layer of its own.

pub mod commit;
pub mod config;
pub mod error;
pub mod logging;
pub mod repo;
pub mod store;
pub mod tree;
pub mod types;

//! Shared pieces of the `beautygen` and `quick-check` binaries.

pub mod config;

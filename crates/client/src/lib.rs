//! `beautygen-client` -- protocol client for the Beauty Generation API.
//!
//! Wraps the three-phase job protocol (submit -> poll -> fetch) over
//! HTTP using [`reqwest`].  The entry points are:
//!
//! - [`GenerationApi`] for the individual wire operations,
//! - [`GenerationApi::wait_for_completion`] for the bounded polling loop,
//! - [`runner::run_job`] for one job end to end, producing a
//!   [`job::GenerationResult`].
//!
//! Transient conditions during polling (mangled encodings, CDN challenge
//! pages, transport blips) degrade to soft error reports and are retried
//! inside the loop; everything else surfaces as a [`ClientError`].

pub mod api;
pub mod download;
pub mod error;
pub mod job;
pub mod poll;
pub mod runner;
pub mod status;

pub use api::GenerationApi;
pub use error::ClientError;
pub use job::{DownloadedImage, GenerationJob, GenerationResult};
pub use status::{ImageRef, StatusReport};

//! `beautygen-core` -- pure domain logic for the Beauty Generation client.
//!
//! Holds everything that can be reasoned about without touching the
//! network: the request model and its wire bodies, the built-in style
//! preset table, the poll-decision state machine, the multi-encoding
//! response decoder, manifest entry types, and output naming.  All I/O
//! lives in `beautygen-client`.

pub mod decode;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod poll;
pub mod preset;
pub mod request;

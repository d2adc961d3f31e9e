#![forbid(unsafe_code)]
#![deny(missing_docs, unreachable_pub)]

//! Shared test helpers used across the herald integration suites.
//! Layout: recording.rs (capturing backend and counting factories), fixtures.rs
//! (sample types and serializers).

pub mod fixtures;
pub mod recording;

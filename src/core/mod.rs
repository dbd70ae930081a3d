#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Core primitives: types, allowlist commitment, release curve, snapshots, time.

pub mod allowlist;
pub mod release;
pub mod snapshot;
pub mod time;
pub mod types;

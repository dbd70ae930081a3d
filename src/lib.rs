// Copyright (c) 2026 Bpass
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Bpass - off-chain tooling for boarding-pass releases and allowlist mints.
//!
//! This repository provides:
//! - Keccak sorted-pair Merkle allowlists (roots, proofs, verification)
//! - Holder snapshots in the allowlist input format
//! - Linear release curves for expected ticket availability
//! - TOML configuration and structured logging for the `bpass` CLI

/// Core primitives (types, allowlist, release, snapshot, time).
pub mod core;
/// Harness configuration.
pub mod config;
/// Observability (structured logging).
pub mod monitoring;

pub use crate::core::allowlist::{verify_entry, AllowlistError, AllowlistTree};
pub use crate::core::types::{Address, Allowance, AllowlistEntry, Hash32, TreeData};

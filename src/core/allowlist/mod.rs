#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Allowlist commitment: leaf hashing, sorted Merkle tree, proofs and verification.

pub mod merkle;
pub mod tree;

pub use merkle::{hash_leaf, hash_pair, process_proof, verify_entry, verify_proof};
pub use tree::{AllowlistError, AllowlistTree};

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

//! Immutable allowlist tree built once per snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::merkle::{build_levels, hash_leaf, proof_for_index};
use crate::core::types::{hex32, Address, Allowance, AllowlistEntry, Hash32, TreeData};

/// Allowlist errors.
#[derive(Debug, Error)]
pub enum AllowlistError {
    /// The entry set cannot be committed unambiguously.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No leaf for the requested (address, allowance) pair.
    #[error("entry not found: {address} with allowance {allowance}")]
    NotFound {
        /// Requested address.
        address: Address,
        /// Requested allowance.
        allowance: Allowance,
    },
    /// Cannot read allowlist file.
    #[error("read allowlist")]
    Read(#[from] std::io::Error),
    /// Cannot parse allowlist JSON.
    #[error("parse allowlist: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Sorted Keccak Merkle tree over allowlist leaves.
#[derive(Clone, Debug)]
pub struct AllowlistTree {
    /// levels[0] holds the sorted leaves; the last level holds the root.
    levels: Vec<Vec<Hash32>>,
}

impl AllowlistTree {
    /// Build a tree from entries in any order.
    ///
    /// An address repeated with the same allowance collapses to a single leaf.
    /// An address repeated with a different allowance is rejected.
    pub fn new<I>(entries: I) -> Result<Self, AllowlistError>
    where
        I: IntoIterator<Item = AllowlistEntry>,
    {
        let mut by_address: BTreeMap<Address, Allowance> = BTreeMap::new();
        for e in entries {
            match by_address.get(&e.address) {
                Some(&prev) if prev != e.allowance => {
                    return Err(AllowlistError::InvalidInput(format!(
                        "address {} listed with allowances {} and {}",
                        e.address, prev, e.allowance
                    )));
                }
                Some(_) => {}
                None => {
                    by_address.insert(e.address, e.allowance);
                }
            }
        }
        if by_address.is_empty() {
            return Err(AllowlistError::InvalidInput("empty allowlist".to_string()));
        }

        let mut leaves: Vec<Hash32> = by_address.iter().map(|(a, n)| hash_leaf(a, *n)).collect();
        leaves.sort_unstable();

        let levels = build_levels(leaves);
        debug!(leaves = levels[0].len(), depth = levels.len() - 1, "allowlist tree built");
        Ok(Self { levels })
    }

    /// Build from a parsed [`TreeData`] document.
    pub fn from_object(data: &TreeData) -> Result<Self, AllowlistError> {
        Self::new(data.entries())
    }

    /// Build from a JSON [`TreeData`] file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AllowlistError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Build from a JSON [`TreeData`] string.
    pub fn from_json(raw: &str) -> Result<Self, AllowlistError> {
        let data: TreeData = serde_json::from_str(raw)?;
        Self::from_object(&data)
    }

    /// Root commitment.
    pub fn root(&self) -> Hash32 {
        // `new` guarantees at least one leaf, so the top level is non-empty.
        self.levels
            .last()
            .and_then(|l| l.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    /// Root as `0x` hex.
    pub fn hex_root(&self) -> String {
        hex32(&self.root())
    }

    /// Membership proof for `(address, allowance)`.
    pub fn proof(&self, address: &Address, allowance: Allowance) -> Result<Vec<Hash32>, AllowlistError> {
        let leaf = hash_leaf(address, allowance);
        let index = self.levels[0]
            .binary_search(&leaf)
            .map_err(|_| AllowlistError::NotFound {
                address: *address,
                allowance,
            })?;
        Ok(proof_for_index(&self.levels, index))
    }

    /// Membership proof as `0x` hex strings.
    pub fn hex_proof(&self, address: &Address, allowance: Allowance) -> Result<Vec<String>, AllowlistError> {
        Ok(self.proof(address, allowance)?.iter().map(hex32).collect())
    }

    /// Sorted leaves.
    pub fn leaves(&self) -> &[Hash32] {
        &self.levels[0]
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Always false; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::allowlist::merkle::verify_entry;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn conflicting_duplicate_is_rejected() {
        let err = AllowlistTree::new(vec![
            AllowlistEntry::new(addr(1), 1),
            AllowlistEntry::new(addr(1), 2),
        ])
        .unwrap_err();
        assert!(matches!(err, AllowlistError::InvalidInput(_)));
    }

    #[test]
    fn equal_duplicate_collapses() {
        let t = AllowlistTree::new(vec![
            AllowlistEntry::new(addr(1), 1),
            AllowlistEntry::new(addr(1), 1),
            AllowlistEntry::new(addr(2), 1),
        ])
        .unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = AllowlistTree::new(Vec::<AllowlistEntry>::new()).unwrap_err();
        assert!(matches!(err, AllowlistError::InvalidInput(_)));
    }

    #[test]
    fn proof_for_wrong_allowance_is_not_found() {
        let t = AllowlistTree::new(vec![
            AllowlistEntry::new(addr(1), 1),
            AllowlistEntry::new(addr(2), 2),
        ])
        .unwrap();
        let err = t.proof(&addr(1), 2).unwrap_err();
        assert!(matches!(err, AllowlistError::NotFound { allowance: 2, .. }));
    }

    #[test]
    fn proofs_are_short_for_carried_leaves() {
        let entries: Vec<_> = (1..=5u8).map(|b| AllowlistEntry::new(addr(b), b as u128)).collect();
        let t = AllowlistTree::new(entries.clone()).unwrap();
        assert_eq!(t.depth(), 3);
        for e in entries {
            let p = t.proof(&e.address, e.allowance).unwrap();
            assert!(p.len() <= t.depth());
            assert!(verify_entry(&t.root(), &e.address, e.allowance, &p));
        }
    }

    #[test]
    fn hex_outputs_are_prefixed() {
        let t = AllowlistTree::new(vec![AllowlistEntry::new(addr(9), 4)]).unwrap();
        assert!(t.hex_root().starts_with("0x"));
        assert_eq!(t.hex_root().len(), 66);
        assert!(t.hex_proof(&addr(9), 4).unwrap().is_empty());
    }
}

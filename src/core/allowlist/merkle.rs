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

//! Sorted-pair Keccak Merkle primitives, compatible with OpenZeppelin `MerkleProof`.
//!
//! leaf = keccak256( address(20) || uint256_be(allowance)(32) )
//! node = keccak256( min(a, b) || max(a, b) )

use crate::core::types::{keccak256, Address, Allowance, Hash32};

/// Hash one allowlist entry (`solidityKeccak256(["address","uint256"], ...)`).
pub fn hash_leaf(address: &Address, allowance: Allowance) -> Hash32 {
    let mut buf = [0u8; 20 + 32];
    buf[..20].copy_from_slice(address.as_bytes());
    buf[36..].copy_from_slice(&allowance.to_be_bytes());
    keccak256(&buf)
}

/// Hash two siblings in sorted order.
pub fn hash_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    keccak256(&buf)
}

/// Fold `proof` starting at `leaf`.
pub fn process_proof(leaf: Hash32, proof: &[Hash32]) -> Hash32 {
    proof.iter().fold(leaf, |cur, sibling| hash_pair(&cur, sibling))
}

/// Verify proof against root.
pub fn verify_proof(root: &Hash32, leaf: Hash32, proof: &[Hash32]) -> bool {
    process_proof(leaf, proof) == *root
}

/// Verify that `(address, allowance)` is committed under `root`.
pub fn verify_entry(root: &Hash32, address: &Address, allowance: Allowance, proof: &[Hash32]) -> bool {
    verify_proof(root, hash_leaf(address, allowance), proof)
}

/// Build every level from the sorted leaves up to the root.
/// An odd trailing node is carried to the next level unchanged.
pub(crate) fn build_levels(leaves: Vec<Hash32>) -> Vec<Vec<Hash32>> {
    let mut levels = vec![leaves];
    while levels.last().map_or(false, |l| l.len() > 1) {
        let level = &levels[levels.len() - 1];
        let mut next: Vec<Hash32> = Vec::with_capacity((level.len() + 1) / 2);
        for chunk in level.chunks(2) {
            match chunk {
                [left, right] => next.push(hash_pair(left, right)),
                [odd] => next.push(*odd),
                _ => {}
            }
        }
        levels.push(next);
    }
    levels
}

/// Sibling path for the leaf at `index`. Levels where the node is carried up add nothing.
pub(crate) fn proof_for_index(levels: &[Vec<Hash32>], index: usize) -> Vec<Hash32> {
    let mut proof = Vec::new();
    let mut idx = index;
    for level in levels.iter().take(levels.len().saturating_sub(1)) {
        let sib_idx = idx ^ 1;
        if let Some(sibling) = level.get(sib_idx) {
            proof.push(*sibling);
        }
        idx /= 2;
    }
    proof
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::hex32;

    #[test]
    fn leaf_matches_solidity_keccak() {
        // ethers.utils.solidityKeccak256(["address","uint256"], ["0x00..01", 1])
        let mut raw = [0u8; 20];
        raw[19] = 1;
        let leaf = hash_leaf(&Address::from_bytes(raw), 1);
        assert_eq!(
            hex32(&leaf),
            "0x2a5bb61d4b6540294819af4b6a2b302e0fcb2b698020f535cd8182b0a910da9f"
        );
    }

    #[test]
    fn pair_hash_is_commutative() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
        assert_ne!(hash_pair(&a, &b), hash_pair(&a, &a));
    }

    #[test]
    fn odd_node_is_carried_up() {
        let leaves = vec![[1u8; 32], [2u8; 32], [3u8; 32]];
        let levels = build_levels(leaves);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[1], vec![hash_pair(&[1u8; 32], &[2u8; 32]), [3u8; 32]]);

        let proof = proof_for_index(&levels, 2);
        assert_eq!(proof, vec![levels[1][0]]);
        assert!(verify_proof(&levels[2][0], [3u8; 32], &proof));
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let levels = build_levels(vec![[7u8; 32]]);
        assert_eq!(levels.len(), 1);
        assert!(proof_for_index(&levels, 0).is_empty());
        assert!(verify_proof(&[7u8; 32], [7u8; 32], &[]));
    }
}

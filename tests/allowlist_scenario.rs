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

use bpass::core::allowlist::{verify_entry, AllowlistError, AllowlistTree};
use bpass::core::types::{Address, TreeData};
use std::fs;

fn alice() -> Address {
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
}

fn bob() -> Address {
    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse().unwrap()
}

fn carol() -> Address {
    "0x90F79bf6EB2c4f870365E785982E1f101E93b906".parse().unwrap()
}

fn tree_of(pairs: &[(Address, u128)]) -> AllowlistTree {
    AllowlistTree::from_object(&pairs.iter().copied().collect::<TreeData>()).unwrap()
}

#[test]
fn three_holder_scenario() {
    let tree = tree_of(&[(alice(), 1), (bob(), 2), (carol(), 3)]);
    let root = tree.root();

    let proof = tree.proof(&alice(), 1).unwrap();
    assert!(verify_entry(&root, &alice(), 1, &proof));
    assert!(!verify_entry(&root, &alice(), 2, &proof));

    assert!(matches!(
        tree.proof(&alice(), 2),
        Err(AllowlistError::NotFound { .. })
    ));

    // A proof from a tree that granted alice 2 must not verify against the real root.
    let wrong = tree_of(&[(alice(), 2), (bob(), 2), (carol(), 3)]);
    let wrong_proof = wrong.proof(&alice(), 2).unwrap();
    assert!(!verify_entry(&root, &alice(), 2, &wrong_proof));

    let reordered = tree_of(&[(bob(), 2), (alice(), 1), (carol(), 3)]);
    assert_eq!(reordered.root(), root);
}

#[test]
fn every_member_proof_is_bounded_by_depth() {
    let tree = tree_of(&[(alice(), 1), (bob(), 2), (carol(), 3)]);
    assert_eq!(tree.depth(), 2);
    for (a, n) in [(alice(), 1), (bob(), 2), (carol(), 3)] {
        let p = tree.proof(&a, n).unwrap();
        assert!(!p.is_empty() && p.len() <= 2);
        assert!(verify_entry(&tree.root(), &a, n, &p));
    }
}

#[test]
fn file_and_object_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let json = format!(
        r#"{{"{}": {{"amount": 1}}, "{}": {{"amount": 2, "passIds": [3, 4]}}, "{}": {{"amount": 3}}}}"#,
        alice(),
        bob(),
        carol()
    );
    fs::write(&path, json).unwrap();

    let from_file = AllowlistTree::from_file(&path).unwrap();
    let from_object = tree_of(&[(alice(), 1), (bob(), 2), (carol(), 3)]);
    assert_eq!(from_file.hex_root(), from_object.hex_root());
}

#[test]
fn conflicting_file_entries_are_rejected() {
    let json = format!(
        r#"{{"{}": {{"amount": 1}}, "{}": {{"amount": 5}}}}"#,
        alice(),
        alice().to_string().to_uppercase().replace("0X", "0x")
    );
    assert!(matches!(
        AllowlistTree::from_json(&json),
        Err(AllowlistError::InvalidInput(_))
    ));
}

#[test]
fn missing_and_malformed_files_surface_as_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AllowlistTree::from_file(dir.path().join("absent.json")),
        Err(AllowlistError::Read(_))
    ));
    assert!(matches!(
        AllowlistTree::from_json("{not json"),
        Err(AllowlistError::Parse(_))
    ));
    assert!(matches!(
        AllowlistTree::from_json(r#"{"0x12": {"amount": 1}}"#),
        Err(AllowlistError::Parse(_))
    ));
}

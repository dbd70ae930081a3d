// Copyright (c) 2026 Bpass
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use bpass::core::allowlist::{verify_entry, AllowlistTree};
use bpass::core::snapshot::{BalanceLedger, Snapshot, Transfer, MINTS_PER_PASS};
use bpass::core::types::{Address, TreeData};

#[test]
fn snapshot_file_builds_the_same_tree() {
    let a = Address::from_bytes([0x0a; 20]);
    let b = Address::from_bytes([0x0b; 20]);
    let c = Address::from_bytes([0x0c; 20]);
    let owners = vec![(0, a), (1, b), (2, a), (3, c), (4, c), (5, c)];
    let snapshot = Snapshot::from_owners(owners);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("holders.json");
    snapshot.write_json(&path).unwrap();
    assert!(!path.with_extension("tmp").exists());

    let from_file = AllowlistTree::from_file(&path).unwrap();
    let expected: TreeData = [(a, 2u128), (b, 1), (c, 3)].into_iter().collect();
    let from_object = AllowlistTree::from_object(&expected).unwrap();
    assert_eq!(from_file.root(), from_object.root());

    let proof = from_file.proof(&c, 3).unwrap();
    assert!(verify_entry(&from_file.root(), &c, 3, &proof));
}

#[test]
fn snapshot_json_parses_back_with_pass_ids() {
    let a = Address::from_bytes([0x42; 20]);
    let json = Snapshot::from_owners(vec![(9, a), (11, a)]).to_json().unwrap();
    let data: TreeData = serde_json::from_str(&json).unwrap();
    assert_eq!(data.records().len(), 1);
    assert_eq!(data.records()[0].0, a);
    assert_eq!(data.records()[0].1.amount, 2);
    assert_eq!(data.records()[0].1.pass_ids, vec![9, 11]);
}

#[test]
fn transfer_ledger_feeds_the_allowlist_tree() {
    let zero = Address::from_bytes([0; 20]);
    let a = Address::from_bytes([0x0a; 20]);
    let b = Address::from_bytes([0x0b; 20]);
    let c = Address::from_bytes([0x0c; 20]);
    let ledger = BalanceLedger::from_transfers(vec![
        Transfer::Single { from: zero, to: a, value: 1 },
        Transfer::Batch { from: zero, to: b, values: vec![2] },
        Transfer::Single { from: b, to: c, value: 2 },
        Transfer::Single { from: a, to: a, value: 1 },
    ])
    .unwrap();
    assert_eq!(ledger.balance_of(&a), 1);
    assert_eq!(ledger.balance_of(&b), 0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("allowlist.json");
    ledger.write_allowlist(&path, MINTS_PER_PASS).unwrap();
    let tree = AllowlistTree::from_file(&path).unwrap();

    let data = ledger.to_allowlist(MINTS_PER_PASS).unwrap();
    assert_eq!(tree.root(), AllowlistTree::from_object(&data).unwrap().root());
    assert_eq!(tree.len(), 3);

    let proof = tree.proof(&c, 4).unwrap();
    assert!(verify_entry(&tree.root(), &c, 4, &proof));
    assert!(tree.proof(&b, 0).is_err());
}

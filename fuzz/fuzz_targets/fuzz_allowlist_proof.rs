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

#![no_main]
#![forbid(unsafe_code)]

use arbitrary::Arbitrary;
use bpass::core::allowlist::{verify_entry, AllowlistTree};
use bpass::core::types::{Address, AllowlistEntry};
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    entries: Vec<([u8; 20], u128)>,
    index: u16,
}

fuzz_target!(|inp: Input| {
    let entries: Vec<AllowlistEntry> = inp
        .entries
        .iter()
        .map(|(a, n)| AllowlistEntry::new(Address::from_bytes(*a), *n))
        .collect();

    let Ok(tree) = AllowlistTree::new(entries.clone()) else { return; };
    let e = entries[(inp.index as usize) % entries.len()];
    let proof = tree.proof(&e.address, e.allowance).expect("member has a proof");
    assert!(verify_entry(&tree.root(), &e.address, e.allowance, &proof));
});

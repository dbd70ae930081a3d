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

//! Core value types: addresses, hashes and the allowlist input format.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 32-byte hash.
pub type Hash32 = [u8; 32];

/// Allowance amount. Encoded as a 256-bit big-endian integer when hashed.
pub type Allowance = u128;

/// Address / hash parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Wrong number of hex digits.
    #[error("invalid length: expected {expected} hex chars, got {got}")]
    Length {
        /// Expected digit count.
        expected: usize,
        /// Actual digit count.
        got: usize,
    },
    /// Non-hex characters.
    #[error("invalid hex encoding")]
    Hex,
    /// Mixed-case input whose EIP-55 checksum does not match.
    #[error("bad checksum: expected {0}")]
    Checksum(String),
}

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], AddressError> {
    let cleaned = strip_hex_prefix(s);
    if cleaned.len() != N * 2 {
        return Err(AddressError::Length {
            expected: N * 2,
            got: cleaned.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(cleaned, &mut out).map_err(|_| AddressError::Hex)?;
    Ok(out)
}

/// Parse a `0x`-prefixed (or bare) 32-byte hex hash.
pub fn parse_hash32(s: &str) -> Result<Hash32, AddressError> {
    decode_fixed::<32>(s)
}

/// Render a hash as `0x`-prefixed lowercase hex.
pub fn hex32(h: &Hash32) -> String {
    format!("0x{}", hex::encode(h))
}

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> Hash32 {
    Keccak256::digest(data).into()
}

/// 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Construct from raw bytes.
    pub const fn from_bytes(b: [u8; 20]) -> Self {
        Self(b)
    }

    /// Return bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// All-lowercase and all-uppercase hex are accepted as-is; mixed case must be EIP-55.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = decode_fixed::<20>(s).map(Self)?;
        let digits = strip_hex_prefix(s);
        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            let expected = addr.to_checksum();
            if expected[2..] != *digits {
                return Err(AddressError::Checksum(expected));
            }
        }
        Ok(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One allowlist entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AllowlistEntry {
    /// Allowed account.
    pub address: Address,
    /// Maximum amount the account may claim/mint.
    pub allowance: Allowance,
}

impl AllowlistEntry {
    /// Create a new entry.
    pub fn new(address: Address, allowance: Allowance) -> Self {
        Self { address, allowance }
    }
}

/// Per-address record in a [`TreeData`] document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Allowance.
    pub amount: Allowance,
    /// Token ids held at snapshot time (snapshot files only).
    #[serde(default, rename = "passIds", skip_serializing_if = "Vec::is_empty")]
    pub pass_ids: Vec<u64>,
}

/// Allowlist input document: `{ "<address>": { "amount": n, ... }, ... }`.
///
/// Keys are kept in document order and repeated keys are preserved, so
/// conflicting duplicates can be rejected at tree construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeData {
    records: Vec<(Address, TreeRecord)>,
}

impl TreeData {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an address with its allowance.
    pub fn insert(&mut self, address: Address, amount: Allowance) {
        self.push(
            address,
            TreeRecord {
                amount,
                pass_ids: Vec::new(),
            },
        );
    }

    /// Append a full record.
    pub fn push(&mut self, address: Address, record: TreeRecord) {
        self.records.push((address, record));
    }

    /// Records in document order.
    pub fn records(&self) -> &[(Address, TreeRecord)] {
        &self.records
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = AllowlistEntry> + '_ {
        self.records
            .iter()
            .map(|(a, r)| AllowlistEntry::new(*a, r.amount))
    }

    /// Number of records (duplicates included).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(Address, Allowance)> for TreeData {
    fn from_iter<I: IntoIterator<Item = (Address, Allowance)>>(iter: I) -> Self {
        let mut data = TreeData::new();
        for (a, amount) in iter {
            data.insert(a, amount);
        }
        data
    }
}

impl Serialize for TreeData {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.records.len()))?;
        for (a, r) in &self.records {
            map.serialize_entry(&a.to_checksum(), r)?;
        }
        map.end()
    }
}

struct TreeDataVisitor;

impl<'de> Visitor<'de> for TreeDataVisitor {
    type Value = TreeData;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of address to {amount}")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<TreeData, M::Error> {
        let mut data = TreeData::new();
        while let Some((address, record)) = access.next_entry::<Address, TreeRecord>()? {
            data.push(address, record);
        }
        Ok(data)
    }
}

impl<'de> Deserialize<'de> for TreeData {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_map(TreeDataVisitor)
    }
}

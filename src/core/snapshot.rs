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

//! Holder snapshots, written as allowlist input.
//!
//! Two sources are supported: token ownership listed per token id ([`Snapshot`]),
//! and balances replayed from ERC-1155 transfer events ([`BalanceLedger`]).

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::types::{Address, Allowance, TreeData, TreeRecord};

/// Passes held by the zero address before any transfer is replayed.
pub const INITIAL_SUPPLY: Allowance = 10_000;

/// Allowlist mints granted per pass held.
pub const MINTS_PER_PASS: Allowance = 2;

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// JSON encoding failed.
    #[error("serialize snapshot")]
    Serialize(#[from] serde_json::Error),
    /// Writing the output file failed.
    #[error("write snapshot")]
    Write(#[from] std::io::Error),
    /// A transfer moves more than the sender holds.
    #[error("{address} holds {balance}, cannot send {value}")]
    InsufficientBalance {
        /// Sender.
        address: Address,
        /// Sender balance before the transfer.
        balance: Allowance,
        /// Transferred amount.
        value: Allowance,
    },
    /// A batch transfer without any value.
    #[error("empty batch transfer from {0}")]
    EmptyBatch(Address),
    /// A balance or scaled amount exceeds the allowance range.
    #[error("amount overflow for {0}")]
    Overflow(Address),
}

/// Owners and the token ids they hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    owners: BTreeMap<Address, Vec<u64>>,
}

impl Snapshot {
    /// Group `(token_id, owner)` pairs by owner, keeping token ids in encounter order.
    pub fn from_owners<I>(owners: I) -> Self
    where
        I: IntoIterator<Item = (u64, Address)>,
    {
        let mut grouped: BTreeMap<Address, Vec<u64>> = BTreeMap::new();
        for (token_id, owner) in owners {
            grouped.entry(owner).or_default().push(token_id);
        }
        Self { owners: grouped }
    }

    /// Number of distinct holders.
    pub fn holders(&self) -> usize {
        self.owners.len()
    }

    /// Tokens held by `owner`.
    pub fn tokens_of(&self, owner: &Address) -> &[u64] {
        self.owners.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Allowlist input: one record per holder, `amount` = tokens held.
    pub fn to_tree_data(&self) -> TreeData {
        let mut data = TreeData::new();
        for (owner, ids) in &self.owners {
            data.push(
                *owner,
                TreeRecord {
                    amount: ids.len() as u128,
                    pass_ids: ids.clone(),
                },
            );
        }
        data
    }

    /// JSON document in the allowlist input shape.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.to_tree_data())?)
    }

    /// Write the JSON document atomically next to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        write_atomic(path.as_ref(), &self.to_json()?)
    }
}

/// Temp file in the target directory, synced, then renamed over `path`.
/// The temp file is removed if any step fails.
fn write_atomic(path: &Path, contents: &str) -> Result<(), SnapshotError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// One ERC-1155 transfer event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// `TransferSingle(operator, from, to, id, value)`.
    Single {
        /// Sender.
        from: Address,
        /// Recipient.
        to: Address,
        /// Amount moved.
        value: Allowance,
    },
    /// `TransferBatch(operator, from, to, ids, values)`; only the first value counts.
    Batch {
        /// Sender.
        from: Address,
        /// Recipient.
        to: Address,
        /// Amounts per id.
        values: Vec<Allowance>,
    },
}

impl Transfer {
    fn parts(&self) -> Result<(Address, Address, Allowance), SnapshotError> {
        match self {
            Transfer::Single { from, to, value } => Ok((*from, *to, *value)),
            Transfer::Batch { from, to, values } => values
                .first()
                .map(|v| (*from, *to, *v))
                .ok_or(SnapshotError::EmptyBatch(*from)),
        }
    }
}

/// Pass balances replayed from transfer events.
///
/// Mints appear as transfers out of the zero address, which starts with
/// [`INITIAL_SUPPLY`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceLedger {
    balances: BTreeMap<Address, Allowance>,
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::with_supply(INITIAL_SUPPLY)
    }
}

impl BalanceLedger {
    /// Ledger seeded with [`INITIAL_SUPPLY`] at the zero address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with `supply` at the zero address.
    pub fn with_supply(supply: Allowance) -> Self {
        Self {
            balances: BTreeMap::from([(Address::from_bytes([0u8; 20]), supply)]),
        }
    }

    /// Replay `transfers` in order on a fresh ledger.
    pub fn from_transfers<I>(transfers: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = Transfer>,
    {
        let mut ledger = Self::new();
        for t in transfers {
            ledger.apply(&t)?;
        }
        Ok(ledger)
    }

    /// Move the transfer value from sender to recipient.
    ///
    /// The ledger is unchanged when the transfer is rejected.
    pub fn apply(&mut self, transfer: &Transfer) -> Result<(), SnapshotError> {
        let (from, to, value) = transfer.parts()?;
        let balance = self.balance_of(&from);
        let remaining = balance
            .checked_sub(value)
            .ok_or(SnapshotError::InsufficientBalance {
                address: from,
                balance,
                value,
            })?;
        let received = if from == to {
            balance
        } else {
            self.balance_of(&to)
                .checked_add(value)
                .ok_or(SnapshotError::Overflow(to))?
        };
        self.balances.insert(from, remaining);
        self.balances.insert(to, received);
        trace!(%from, %to, value, to_balance = received, "transfer");
        Ok(())
    }

    /// Current balance (zero for unseen addresses).
    pub fn balance_of(&self, address: &Address) -> Allowance {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Every address seen, including drained ones and the zero address.
    pub fn balances(&self) -> impl Iterator<Item = (Address, Allowance)> + '_ {
        self.balances.iter().map(|(a, n)| (*a, *n))
    }

    /// Raw balances in the allowlist input shape.
    pub fn to_tree_data(&self) -> TreeData {
        self.balances().collect()
    }

    /// Allowlist input for minting: holders with a positive balance, each
    /// allowed `mints_per_pass` mints per pass.
    pub fn to_allowlist(&self, mints_per_pass: Allowance) -> Result<TreeData, SnapshotError> {
        let mut data = TreeData::new();
        for (address, amount) in self.balances() {
            if amount == 0 {
                debug!(%address, "skip empty holder");
                continue;
            }
            let allowance = amount
                .checked_mul(mints_per_pass)
                .ok_or(SnapshotError::Overflow(address))?;
            data.insert(address, allowance);
        }
        Ok(data)
    }

    /// Write the minting allowlist as JSON.
    pub fn write_allowlist(
        &self,
        path: impl AsRef<Path>,
        mints_per_pass: Allowance,
    ) -> Result<(), SnapshotError> {
        let json = serde_json::to_string(&self.to_allowlist(mints_per_pass)?)?;
        write_atomic(path.as_ref(), &json)
    }
}

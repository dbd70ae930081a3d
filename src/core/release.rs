#![allow(missing_docs)]
// Copyright (c) 2026 Bpass
// Licensed under the Apache License, Version 2.0

//! Linear release curve for boarding-pass releases: expected availability at a timestamp.

#![forbid(unsafe_code)]

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("release end must be after start")]
    InvalidWindow,
    #[error("release amount must be non-zero")]
    InvalidAmount,
    #[error("previous release still has {0} available")]
    StillAvailable(u64),
}

/// One release window: `max_supply` units unlock linearly over `[start, end]`.
/// Only built through [`ReleasePlan::new`], so `start < end` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    start: u64,
    end: u64,
    max_supply: u64,
}

/// Snapshot of a plan evaluated at one timestamp, as printed by `release-plan`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStatus {
    pub start: u64,
    pub end: u64,
    pub release_max_supply: u64,
    pub now: u64,
    pub released: u64,
    pub available: u64,
    pub next_release_at: Option<u64>,
    /// False while the contract would still revert a replacing release.
    pub can_replace: bool,
}

impl ReleasePlan {
    pub fn new(start: u64, end: u64, max_supply: u64) -> Result<Self, ReleaseError> {
        if end <= start {
            return Err(ReleaseError::InvalidWindow);
        }
        if max_supply == 0 {
            return Err(ReleaseError::InvalidAmount);
        }
        Ok(Self {
            start,
            end,
            max_supply,
        })
    }

    pub fn from_duration(start: u64, duration_secs: u64, max_supply: u64) -> Result<Self, ReleaseError> {
        Self::new(start, start.saturating_add(duration_secs), max_supply)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Units released by `now` (floor of the linear curve).
    pub fn released_at(&self, now: u64) -> u64 {
        if now <= self.start {
            return 0;
        }
        if now >= self.end {
            return self.max_supply;
        }
        let elapsed = (now - self.start) as u128;
        (self.max_supply as u128 * elapsed / self.duration() as u128) as u64
    }

    /// Released minus already minted; minting ahead of the curve delays availability.
    pub fn available_at(&self, now: u64, minted: u64) -> u64 {
        self.released_at(now).saturating_sub(minted)
    }

    /// First timestamp after `now` at which another unit is released.
    pub fn next_release_at(&self, now: u64) -> Option<u64> {
        let released = self.released_at(now);
        if released >= self.max_supply || self.duration() == 0 {
            return None;
        }
        // smallest t with max_supply * (t - start) >= (released + 1) * duration
        let target = (released as u128 + 1) * self.duration() as u128;
        let supply = self.max_supply as u128;
        let elapsed = (target + supply - 1) / supply;
        Some(self.start + elapsed as u64)
    }

    /// A new release may only replace this one once nothing is left to claim.
    pub fn ensure_can_replace(&self, now: u64, minted: u64) -> Result<(), ReleaseError> {
        match self.available_at(now, minted) {
            0 => Ok(()),
            n => Err(ReleaseError::StillAvailable(n)),
        }
    }

    pub fn status(&self, now: u64, minted: u64) -> ReleaseStatus {
        ReleaseStatus {
            start: self.start,
            end: self.end,
            release_max_supply: self.max_supply,
            now,
            released: self.released_at(now),
            available: self.available_at(now, minted),
            next_release_at: self.next_release_at(now),
            can_replace: self.ensure_can_replace(now, minted).is_ok(),
        }
    }
}

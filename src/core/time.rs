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

//! Unix-second duration helpers and timestamp parsing.
//!
//! Nothing here reads the clock except [`now_unix`]; callers pass `now` explicitly.

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Time parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    /// Unrecognised timestamp.
    #[error("unrecognised timestamp: {0}")]
    Parse(String),
}

/// `n` seconds.
pub const fn seconds(n: u64) -> u64 {
    n
}

/// `n` minutes in seconds.
pub const fn minutes(n: u64) -> u64 {
    n * seconds(60)
}

/// `n` hours in seconds.
pub const fn hours(n: u64) -> u64 {
    n * minutes(60)
}

/// `n` days in seconds.
pub const fn days(n: u64) -> u64 {
    n * hours(24)
}

/// `n` weeks in seconds.
pub const fn weeks(n: u64) -> u64 {
    n * days(7)
}

/// `n` 365-day years in seconds.
pub const fn years(n: u64) -> u64 {
    n * days(365)
}

/// Parse a unix timestamp, an RFC 3339 datetime, or `YYYY-MM-DDTHH:MM:SS` (UTC).
pub fn parse_timestamp(s: &str) -> Result<u64, TimeError> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Ok(n);
    }
    let unix = if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        dt.unix_timestamp()
    } else {
        let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        PrimitiveDateTime::parse(s, naive)
            .map_err(|_| TimeError::Parse(s.to_string()))?
            .assume_utc()
            .unix_timestamp()
    };
    u64::try_from(unix).map_err(|_| TimeError::Parse(s.to_string()))
}

/// Current wall-clock time in unix seconds.
pub fn now_unix() -> u64 {
    u64::try_from(OffsetDateTime::now_utc().unix_timestamp()).unwrap_or_default()
}

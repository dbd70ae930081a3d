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

//! Global `tracing` subscriber setup.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Logging errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Filter directive did not parse.
    #[error("bad log filter: {0}")]
    Filter(String),
    /// A global subscriber is already installed.
    #[error("subscriber already set")]
    AlreadySet,
}

/// `RUST_LOG` if set, else the configured directive.
fn env_filter(cfg: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(f) => Ok(f),
        Err(_) => EnvFilter::try_new(&cfg.filter).map_err(|e| LoggingError::Filter(e.to_string())),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays machine-readable.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = env_filter(cfg)?;
    let res = match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true);
            tracing::subscriber::set_global_default(Registry::default().with(filter).with(layer))
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true);
            tracing::subscriber::set_global_default(Registry::default().with(filter).with(layer))
        }
    };
    res.map_err(|_| LoggingError::AlreadySet)
}

// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Logging
//!
//! The library logs through `tracing` and never installs a subscriber on its
//! own. Hosts without a Rust-side subscriber call `jheaps_logging_init` once
//! to route the library's events to stderr or to the file named by
//! `JHEAPS_LOG_FILE`.
//!
//! Installing is idempotent: if a global subscriber already exists the call
//! succeeds and leaves it in place.
//!
//! ## Exported Functions
//!
//! * `jheaps_logging_init`
//! * `jheaps_logging_init_with_filter`

use crate::config::LoggingConfig;
use crate::error::{self, Fault};
use crate::status::JheapsStatus;
use libc::c_char;
use std::ffi::CStr;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber described by `config`.
///
/// Returns `Ok(false)` when another subscriber was already installed.
pub fn install(config: &LoggingConfig) -> Result<bool, Fault> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|e| {
        Fault::invalid(format!("invalid log filter '{}': {}", config.filter, e))
    })?;

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .is_ok()
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .is_ok()
        }
    };

    if installed {
        tracing::debug!(filter = %config.filter, "logging initialized");
    }
    Ok(installed)
}

/// Installs a subscriber configured from `JHEAPS_LOG` and `JHEAPS_LOG_FILE`.
///
/// # Errors
///
/// * `IllegalArgument` if `JHEAPS_LOG` is not a valid filter.
/// * `IOError` if the log file cannot be opened.
#[no_mangle]
pub extern "C" fn jheaps_logging_init() -> JheapsStatus {
    error::guard("jheaps_logging_init", || {
        install(&LoggingConfig::from_env()).map(|_| ())
    })
}

/// Like [`jheaps_logging_init`] with filter directives given by the host.
///
/// # Safety
///
/// `filter` must be null or point to a nul-terminated string.
#[no_mangle]
pub unsafe extern "C" fn jheaps_logging_init_with_filter(filter: *const c_char) -> JheapsStatus {
    error::guard("jheaps_logging_init_with_filter", || {
        if filter.is_null() {
            return Err(Fault::NullArgument("filter"));
        }
        let filter = CStr::from_ptr(filter)
            .to_str()
            .map_err(|_| Fault::invalid("log filter is not valid UTF-8"))?;
        install(&LoggingConfig::from_env().with_filter(filter)).map(|_| ())
    })
}

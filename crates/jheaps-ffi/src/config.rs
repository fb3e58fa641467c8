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

//! Logging configuration read from the process environment.
//!
//! * `JHEAPS_LOG` is an `EnvFilter` directive string, e.g. `jheaps_ffi=debug`.
//! * `JHEAPS_LOG_FILE` redirects output from stderr to a file, which is
//!   created if missing and appended to otherwise.

use std::path::PathBuf;

/// Variable holding the filter directives.
pub const LOG_FILTER_VAR: &str = "JHEAPS_LOG";
/// Variable holding the log file path.
pub const LOG_FILE_VAR: &str = "JHEAPS_LOG_FILE";

const DEFAULT_FILTER: &str = "warn";

/// How the library's tracing output is filtered and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: String,
    pub log_file: Option<PathBuf>,
    /// Colored output. Ignored when writing to a file.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            log_file: None,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Reads `JHEAPS_LOG` and `JHEAPS_LOG_FILE`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LOG_FILTER_VAR).ok(),
            std::env::var_os(LOG_FILE_VAR).map(PathBuf::from),
        )
    }

    fn from_vars(filter: Option<String>, log_file: Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            filter: filter
                .map(|f| f.trim().to_owned())
                .filter(|f| !f.is_empty())
                .unwrap_or(defaults.filter),
            log_file: log_file.filter(|p| !p.as_os_str().is_empty()),
            ansi: defaults.ansi,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "warn");
        assert!(config.log_file.is_none());
        assert!(config.ansi);
    }

    #[test]
    fn test_from_vars() {
        let config = LoggingConfig::from_vars(
            Some(" jheaps_ffi=trace ".to_owned()),
            Some(PathBuf::from("/tmp/jheaps.log")),
        );
        assert_eq!(config.filter, "jheaps_ffi=trace");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/jheaps.log")));
    }

    #[test]
    fn test_blank_vars_fall_back() {
        let config = LoggingConfig::from_vars(Some("   ".to_owned()), Some(PathBuf::new()));
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_with_filter() {
        let config = LoggingConfig::default().with_filter("debug");
        assert_eq!(config.filter, "debug");
    }
}

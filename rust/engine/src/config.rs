// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reader configuration loaded from environment variables.

use step_pmi_semantic::ResolverOptions;

/// Reader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum file size in MB.
    pub max_file_size_mb: usize,
    /// Decode non-UTF-8 input as Latin-1 instead of failing.
    pub latin1_fallback: bool,
    /// Build the reverse reference index before resolving PMI.
    pub reverse_index: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 500,
            latin1_fallback: true,
            reverse_index: true,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from environment variables.
    ///
    /// Absent or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            max_file_size_mb: std::env::var("STEP_PMI_MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "500".into())
                .parse()
                .unwrap_or(500),
            latin1_fallback: std::env::var("STEP_PMI_LATIN1_FALLBACK")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            reverse_index: std::env::var("STEP_PMI_REVERSE_INDEX")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
        }
    }

    /// Size limit in bytes.
    #[inline]
    pub fn max_file_size(&self) -> u64 {
        (self.max_file_size_mb as u64).saturating_mul(1024 * 1024)
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            reverse_index: self.reverse_index,
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for STEP structure parsing.
//!
//! Only a missing `ISO-10303-21;` marker is fatal. Everything else the parser
//! meets (unknown sections, malformed statements, broken escapes) degrades to
//! "absent" or literal text instead of an error.

/// Result type alias for core parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the STEP structure parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The text does not carry the `ISO-10303-21;` exchange structure marker.
    #[error("not an ISO-10303-21 exchange structure: missing `ISO-10303-21;` marker")]
    MissingIsoMarker,

    /// A fragment could not be parsed where a value was required.
    #[error("parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the normalized text.
        position: usize,
        /// Human readable description.
        message: String,
    },
}

impl Error {
    /// Create a parse error.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File access and text decoding.

use std::fs::File;
use std::io;
use std::path::Path;

use memmap2::Mmap;

use crate::config::ReaderConfig;
use crate::error::{LoadError, Result};

/// Read a STEP file into text.
///
/// The size limit is checked before mapping. UTF-8 is tried first; other
/// input decodes as Latin-1 when the fallback is enabled.
pub fn read_text(path: &Path, config: &ReaderConfig) -> Result<String> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let max = config.max_file_size();
    if size > max {
        return Err(LoadError::FileTooLarge { size, max });
    }
    if size == 0 {
        return Ok(String::new());
    }

    // SAFETY: the map is read-only and dropped before this function returns
    let mmap = unsafe { Mmap::map(&file)? };
    decode_bytes(&mmap, config.latin1_fallback)
}

/// Decode raw file bytes.
pub fn decode_bytes(bytes: &[u8], latin1_fallback: bool) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(e) if latin1_fallback => {
            tracing::warn!(
                valid_up_to = e.valid_up_to(),
                "input is not valid UTF-8, decoding as Latin-1"
            );
            Ok(latin1(bytes))
        }
        Err(e) => Err(LoadError::Io(io::Error::new(io::ErrorKind::InvalidData, e))),
    }
}

/// Each byte maps to the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

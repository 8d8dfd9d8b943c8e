// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-backed reader.

use std::path::{Path, PathBuf};

use crate::config::ReaderConfig;
use crate::document::{Document, DocumentSummary};
use crate::error::Result;
use crate::source::read_text;

/// Loads a STEP file into a [`Document`].
///
/// Every [`load`](StepReader::load) discards the previous state and rebuilds
/// from the file. A failed load leaves the reader unloaded.
#[derive(Debug)]
pub struct StepReader {
    path: PathBuf,
    config: ReaderConfig,
    content: Option<String>,
    document: Option<Document>,
}

impl StepReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, ReaderConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            content: None,
            document: None,
        }
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&mut self) -> Result<&Document> {
        self.content = None;
        self.document = None;

        let text = read_text(&self.path, &self.config)?;
        let document = Document::parse_with(&text, self.config.resolver_options())?;
        tracing::debug!(bytes = text.len(), entities = document.data().len(), "file loaded");

        self.content = Some(text);
        Ok(self.document.insert(document))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// File text as decoded, before normalization.
    pub fn raw_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn summary(&self) -> DocumentSummary {
        let file_path = Some(self.path.display().to_string());
        match &self.document {
            Some(document) => DocumentSummary {
                file_path,
                ..document.summary()
            },
            None => DocumentSummary {
                file_path,
                ..DocumentSummary::default()
            },
        }
    }
}

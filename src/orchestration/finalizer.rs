// Tue Jan 13 2026 - Alex

use crate::config::Config;
use crate::error::RegistryError;
use crate::output::RegistryDocument;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalized {
    /// Caller asked for the document in memory.
    Document(RegistryDocument),
    /// Document persisted to the output file.
    Written(PathBuf),
    /// Nothing retained; nothing written.
    Empty,
}

impl Finalized {
    pub fn into_document(self) -> Option<RegistryDocument> {
        match self {
            Finalized::Document(document) => Some(document),
            Finalized::Written(_) | Finalized::Empty => None,
        }
    }
}

/// Decides what happens to a finished document: hand it back or persist it.
pub struct OutputFinalizer {
    output_file: PathBuf,
    clear_stale_output: bool,
}

impl OutputFinalizer {
    pub fn new<P: Into<PathBuf>>(output_file: P) -> Self {
        Self {
            output_file: output_file.into(),
            clear_stale_output: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.output_file.clone()).with_clear_stale_output(config.clear_stale_output)
    }

    pub fn with_clear_stale_output(mut self, clear: bool) -> Self {
        self.clear_stale_output = clear;
        self
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn finalize(
        &self,
        document: Option<RegistryDocument>,
        write_to_file: bool,
    ) -> Result<Finalized, RegistryError> {
        match (document, write_to_file) {
            (Some(document), false) => Ok(Finalized::Document(document)),
            (None, false) => Ok(Finalized::Empty),
            (Some(document), true) => {
                self.write(&document)?;
                log::info!(
                    "Wrote {} units ({} bytes) to {:?}",
                    document.unit_count(),
                    document.byte_len(),
                    self.output_file
                );
                Ok(Finalized::Written(self.output_file.clone()))
            }
            (None, true) => {
                self.handle_stale_output()?;
                Ok(Finalized::Empty)
            }
        }
    }

    fn write(&self, document: &RegistryDocument) -> Result<(), RegistryError> {
        let to_output_error = |source: io::Error| RegistryError::Output {
            path: self.output_file.clone(),
            source,
        };

        if let Some(parent) = self.output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_output_error)?;
        }

        document.write_to(&self.output_file).map_err(to_output_error)
    }

    fn handle_stale_output(&self) -> Result<(), RegistryError> {
        if !self.output_file.exists() {
            return Ok(());
        }

        if !self.clear_stale_output {
            log::warn!(
                "No units retained; leaving previous registry at {:?} untouched",
                self.output_file
            );
            return Ok(());
        }

        log::warn!("No units retained; removing stale registry at {:?}", self.output_file);
        fs::remove_file(&self.output_file).map_err(|source| RegistryError::Output {
            path: self.output_file.clone(),
            source,
        })
    }
}

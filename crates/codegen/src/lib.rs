// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Generates Rust [Simple Binary Encoding](https://github.com/FIXTradingCommunity/fix-simple-binary-encoding)
//! (SBE) codecs from XML message schemas.
//!
//! The `nautilus-sbe-codegen` crate turns a schema into Rust source in three stages:
//!
//! - Parse the XML into an immutable model ([`schema::parse_schema`]).
//! - Validate the model and compute block layouts ([`schema::validate_schema`], [`layout`]).
//! - Emit formatted Rust code targeting the `nautilus-sbe` runtime ([`emit`]).
//!
//! Use [`Generator`] from a `build.rs` or the `sbe-codegen` binary from the command line.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod emit;
pub mod error;
pub mod layout;
pub mod schema;

use std::path::{Path, PathBuf};

pub use crate::{
    config::{CodegenConfig, OutputMode},
    emit::GeneratedFile,
    error::{CodegenError, CodegenResult},
    schema::{Schema, parse_schema, validate_schema},
};

/// Generates codecs for SBE schemas.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: CodegenConfig,
}

impl Generator {
    /// Creates a generator with the given configuration.
    #[must_use]
    pub const fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Validates a parsed schema and emits its codecs.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the model is inconsistent, or a generation error if the
    /// emitted code is not valid Rust.
    pub fn generate(&self, schema: &Schema) -> CodegenResult<Vec<GeneratedFile>> {
        validate_schema(schema)?;
        let files = emit::emit_schema(schema, &self.config)?;
        tracing::info!(
            package = %schema.package,
            schema_id = schema.id,
            version = schema.version,
            messages = schema.messages.len(),
            files = files.len(),
            "Generated SBE codecs",
        );
        Ok(files)
    }

    /// Parses, validates and emits codecs for a schema document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the schema is invalid.
    pub fn generate_from_str(&self, xml: &str) -> CodegenResult<Vec<GeneratedFile>> {
        let schema = parse_schema(xml)?;
        self.generate(&schema)
    }

    /// Reads a schema file and emits its codecs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the schema is invalid.
    pub fn generate_from_file(&self, path: &Path) -> CodegenResult<Vec<GeneratedFile>> {
        tracing::debug!("Reading schema {}", path.display());
        let xml = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        self.generate_from_str(&xml)
    }

    /// Generates codecs for a schema file and writes them under `out_dir`.
    ///
    /// Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails or the files cannot be written.
    pub fn generate_to_dir(
        &self,
        schema_path: &Path,
        out_dir: &Path,
    ) -> CodegenResult<Vec<PathBuf>> {
        let files = self.generate_from_file(schema_path)?;
        write_files(&files, out_dir)
    }
}

/// Writes generated files under `out_dir`, creating it if needed.
///
/// Files whose contents are unchanged are left untouched so that build scripts do not trigger
/// needless recompilation.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn write_files(files: &[GeneratedFile], out_dir: &Path) -> CodegenResult<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| CodegenError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.path);
        let unchanged = std::fs::read_to_string(&path).is_ok_and(|old| old == file.contents);
        if unchanged {
            tracing::debug!("Unchanged {}", path.display());
        } else {
            std::fs::write(&path, &file.contents).map_err(|e| CodegenError::io(&path, e))?;
            tracing::debug!("Wrote {}", path.display());
        }
        written.push(path);
    }
    Ok(written)
}

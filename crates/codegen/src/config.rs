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

//! Configuration structures for the SBE code generator.

use std::path::Path;

use nautilus_sbe::MAX_GROUP_COUNT;
use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};

/// How generated code is laid out on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One Rust file containing every type of the schema.
    #[default]
    SingleFile,
    /// One file per type plus a `mod.rs` re-exporting them.
    ModulePerType,
}

/// Configuration for a code generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// Path of the runtime crate referenced by generated code (default: `nautilus_sbe`).
    pub runtime_crate: String,
    /// Output layout (default: single file).
    pub output_mode: OutputMode,
    /// Emit per-field metadata accessors (default: true).
    pub emit_metadata: bool,
    /// Largest group element count accepted when decoding (default: 10 000).
    pub max_group_count: u32,
    /// Emit schema descriptions as doc comments (default: true).
    pub emit_docs: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "nautilus_sbe".to_string(),
            output_mode: OutputMode::SingleFile,
            emit_metadata: true,
            max_group_count: MAX_GROUP_COUNT,
            emit_docs: true,
        }
    }
}

impl CodegenConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains unknown keys.
    pub fn from_json_str(json: &str) -> CodegenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid configuration.
    pub fn from_json_file(path: &Path) -> CodegenResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Returns the runtime crate as a path usable in generated code.
    ///
    /// Plain crate names are made absolute (`::nautilus_sbe`); paths starting with `crate`,
    /// `self` or `super` are kept relative.
    ///
    /// # Errors
    ///
    /// Returns an error if `runtime_crate` is not a valid Rust path.
    pub fn runtime_path(&self) -> CodegenResult<syn::Path> {
        let name = self.runtime_crate.trim();
        let is_relative = ["crate", "self", "super"]
            .iter()
            .any(|root| name == *root || name.starts_with(&format!("{root}::")));
        let text = if is_relative || name.starts_with("::") {
            name.to_string()
        } else {
            format!("::{name}")
        };
        syn::parse_str(&text).map_err(|source| CodegenError::Syn {
            unit: "runtime_crate".to_string(),
            source,
        })
    }
}

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

//! Error handling for SBE code generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// The main error type for schema parsing, validation and code emission.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The schema document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Reading the schema or writing generated files failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The emitted token stream did not parse as Rust.
    #[error("Generated code for '{unit}' is not valid Rust: {source}")]
    Syn {
        unit: String,
        #[source]
        source: syn::Error,
    },

    /// Configuration file errors.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The schema is malformed or self-inconsistent.
    #[error("Schema error at {element}: {reason}")]
    Schema {
        /// Path of the offending element, e.g. `message 'NewOrder' > field 'price'`.
        element: String,
        reason: String,
    },
}

impl CodegenError {
    /// Creates a schema error for the given element path.
    pub fn schema(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error describes a malformed schema rather than an environment
    /// failure.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::Xml(_) | Self::Schema { .. })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_schema_error_display() {
        let err = CodegenError::schema("message 'NewOrder' > field 'price'", "unknown type 'px'");
        assert_eq!(
            err.to_string(),
            "Schema error at message 'NewOrder' > field 'price': unknown type 'px'"
        );
        assert!(err.is_schema_error());
    }

    #[rstest]
    fn test_io_error_display() {
        let err = CodegenError::io(
            "/tmp/out.rs",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().starts_with("I/O error on '/tmp/out.rs'"));
        assert!(!err.is_schema_error());
    }

    #[rstest]
    fn test_xml_error_from() {
        let err: CodegenError = roxmltree::Document::parse("<messageSchema>")
            .unwrap_err()
            .into();
        assert!(matches!(err, CodegenError::Xml(_)));
    }
}

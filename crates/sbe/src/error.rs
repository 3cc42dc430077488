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

//! Unified SBE error type shared by the runtime and generated codecs.

use thiserror::Error;

/// Maximum allowed group element count to prevent DoS from malformed data.
pub const MAX_GROUP_COUNT: u32 = 10_000;

/// Result alias used throughout the SBE runtime and generated code.
pub type SbeResult<T> = Result<T, SbeError>;

/// SBE encode/decode error.
#[derive(Debug, Error)]
pub enum SbeError {
    /// The underlying source or sink failed, or ran out of bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A value lies outside its declared domain.
    #[error("Range check failed for '{field}': value {value} outside [{min}, {max}]")]
    RangeCheck {
        /// Field identity.
        field: String,
        /// Offending value.
        value: String,
        /// Inclusive lower bound.
        min: String,
        /// Inclusive upper bound.
        max: String,
    },
    /// Bytes are not well-formed in the declared character encoding.
    #[error("Invalid {encoding} in field '{field}'")]
    InvalidEncoding {
        /// Field identity.
        field: String,
        /// Declared character encoding.
        encoding: String,
    },
    /// A decoded enum value matches none of the schema's declared values.
    #[error("Unknown value {value} for enum '{enum_name}'")]
    UnknownEnumValue {
        /// Enum type name.
        enum_name: String,
        /// Raw wire value.
        value: String,
    },
    /// A collection is too long for its length prefix or declared maximum.
    #[error("Length {length} of '{field}' exceeds maximum {max}")]
    LengthOverflow {
        /// Field or group identity.
        field: String,
        /// Actual length.
        length: usize,
        /// Maximum representable length.
        max: u64,
    },
    /// Group count exceeds safety limit.
    #[error("Group '{group}' count {count} exceeds maximum {max}")]
    GroupCountTooLarge {
        /// Group identity.
        group: String,
        /// Actual count.
        count: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Buffer too short to decode expected data.
    #[error("Buffer too short: expected {expected} bytes, was {actual}")]
    BufferTooShort {
        /// Expected minimum bytes.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },
    /// Schema ID mismatch.
    #[error("Schema ID mismatch: expected {expected}, was {actual}")]
    SchemaMismatch {
        /// Expected schema ID.
        expected: u16,
        /// Actual schema ID.
        actual: u16,
    },
    /// Template ID mismatch.
    #[error("Template ID mismatch: expected {expected}, was {actual}")]
    TemplateMismatch {
        /// Expected template ID.
        expected: u16,
        /// Actual template ID.
        actual: u16,
    },
    /// A schema literal cannot be represented by its primitive type.
    #[error("Invalid {primitive} literal '{literal}'")]
    InvalidLiteral {
        /// Primitive type name.
        primitive: &'static str,
        /// Literal text.
        literal: String,
    },
}

impl SbeError {
    /// Returns `true` if this error was caused by the input running out of bytes.
    #[must_use]
    pub fn is_unexpected_eof(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            Self::BufferTooShort { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this error is a value-domain or text-encoding violation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::RangeCheck { .. } | Self::InvalidEncoding { .. })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_buffer_too_short_display() {
        let err = SbeError::BufferTooShort {
            expected: 100,
            actual: 50,
        };
        assert_eq!(
            err.to_string(),
            "Buffer too short: expected 100 bytes, was 50"
        );
    }

    #[rstest]
    fn test_schema_mismatch_display() {
        let err = SbeError::SchemaMismatch {
            expected: 3,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Schema ID mismatch: expected 3, was 1");
    }

    #[rstest]
    fn test_group_count_too_large_display() {
        let err = SbeError::GroupCountTooLarge {
            group: "bids".to_string(),
            count: 50000,
            max: 10000,
        };
        assert_eq!(
            err.to_string(),
            "Group 'bids' count 50000 exceeds maximum 10000"
        );
    }

    #[rstest]
    fn test_range_check_display() {
        let err = SbeError::RangeCheck {
            field: "price".to_string(),
            value: "-9223372036854775808".to_string(),
            min: "-9223372036854775807".to_string(),
            max: "9223372036854775807".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Range check failed for 'price': value -9223372036854775808 outside [-9223372036854775807, 9223372036854775807]"
        );
        assert!(err.is_validation());
    }

    #[rstest]
    fn test_io_error_is_unexpected_eof() {
        let err: SbeError = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert!(err.is_unexpected_eof());
        assert!(!err.is_validation());
    }

    #[rstest]
    fn test_unknown_enum_is_not_validation() {
        let err = SbeError::UnknownEnumValue {
            enum_name: "OrderSide".to_string(),
            value: "7".to_string(),
        };
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Unknown value 7 for enum 'OrderSide'");
    }
}

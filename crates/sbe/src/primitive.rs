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

//! SBE primitive types and their default value domains.
//!
//! Each primitive reserves one value of its representable range as the null sentinel:
//! `MIN` for signed integers, `MAX` for unsigned integers, `0` for `char` and `NaN` for
//! floating point. The default valid range excludes that sentinel.

use std::fmt::Display;

use crate::error::{SbeError, SbeResult};

/// An SBE primitive wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
}

impl PrimitiveType {
    /// Every primitive, in schema declaration order.
    pub const ALL: [Self; 11] = [
        Self::Char,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float,
        Self::Double,
    ];

    /// Parses the schema spelling of a primitive (e.g. `uint16`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns the schema spelling of the primitive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Returns the encoded size in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Char | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float => 4,
            Self::Int64 | Self::UInt64 | Self::Double => 8,
        }
    }

    /// Returns the Rust type used to hold a value of this primitive.
    #[must_use]
    pub const fn rust_type(self) -> &'static str {
        match self {
            Self::Char | Self::UInt8 => "u8",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt16 => "u16",
            Self::UInt32 => "u32",
            Self::UInt64 => "u64",
            Self::Float => "f32",
            Self::Double => "f64",
        }
    }

    /// Returns `true` for signed integer primitives.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns `true` for `float` and `double`.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns the default null sentinel.
    #[must_use]
    pub fn null_value(self) -> PrimitiveValue {
        match self {
            Self::Char => PrimitiveValue::UInt(0),
            Self::Float | Self::Double => PrimitiveValue::Float(f64::NAN),
            _ if self.is_signed() => PrimitiveValue::Int(self.representable_signed().0),
            _ => PrimitiveValue::UInt(self.representable_unsigned()),
        }
    }

    /// Returns the default inclusive lower bound of the valid range.
    #[must_use]
    pub fn min_value(self) -> PrimitiveValue {
        match self {
            Self::Char => PrimitiveValue::UInt(0x20),
            Self::Float => PrimitiveValue::Float(f64::from(f32::MIN)),
            Self::Double => PrimitiveValue::Float(f64::MIN),
            _ if self.is_signed() => PrimitiveValue::Int(self.representable_signed().0 + 1),
            _ => PrimitiveValue::UInt(0),
        }
    }

    /// Returns the default inclusive upper bound of the valid range.
    #[must_use]
    pub fn max_value(self) -> PrimitiveValue {
        match self {
            Self::Char => PrimitiveValue::UInt(0x7E),
            Self::Float => PrimitiveValue::Float(f64::from(f32::MAX)),
            Self::Double => PrimitiveValue::Float(f64::MAX),
            _ if self.is_signed() => PrimitiveValue::Int(self.representable_signed().1),
            _ => PrimitiveValue::UInt(self.representable_unsigned() - 1),
        }
    }

    /// Parses a schema literal (decimal, `0x` hex, or a single character for `char`).
    ///
    /// # Errors
    ///
    /// Returns [`SbeError::InvalidLiteral`] if the text is not a number or does not fit the
    /// representable range of this primitive.
    pub fn parse_value(self, literal: &str) -> SbeResult<PrimitiveValue> {
        let text = literal.trim();
        let invalid = || SbeError::InvalidLiteral {
            primitive: self.name(),
            literal: literal.to_string(),
        };

        match self {
            Self::Char => {
                let mut chars = text.chars();
                if let (Some(c), None) = (chars.next(), chars.next())
                    && c.is_ascii()
                {
                    return Ok(PrimitiveValue::UInt(u64::from(c as u8)));
                }
                parse_unsigned(text)
                    .filter(|v| *v <= u64::from(u8::MAX))
                    .map(PrimitiveValue::UInt)
                    .ok_or_else(invalid)
            }
            Self::Float | Self::Double => {
                let value: f64 = text.parse().map_err(|_| invalid())?;
                if self == Self::Float && value.is_finite() && value.abs() > f64::from(f32::MAX) {
                    return Err(invalid());
                }
                Ok(PrimitiveValue::Float(value))
            }
            _ if self.is_signed() => {
                let (lo, hi) = self.representable_signed();
                parse_signed(text)
                    .filter(|v| (i128::from(lo)..=i128::from(hi)).contains(v))
                    .and_then(|v| i64::try_from(v).ok())
                    .map(PrimitiveValue::Int)
                    .ok_or_else(invalid)
            }
            _ => parse_unsigned(text)
                .filter(|v| *v <= self.representable_unsigned())
                .map(PrimitiveValue::UInt)
                .ok_or_else(invalid),
        }
    }

    const fn representable_signed(self) -> (i64, i64) {
        match self {
            Self::Int8 => (i8::MIN as i64, i8::MAX as i64),
            Self::Int16 => (i16::MIN as i64, i16::MAX as i64),
            Self::Int32 => (i32::MIN as i64, i32::MAX as i64),
            _ => (i64::MIN, i64::MAX),
        }
    }

    const fn representable_unsigned(self) -> u64 {
        match self {
            Self::Char | Self::UInt8 => u8::MAX as u64,
            Self::UInt16 => u16::MAX as u64,
            Self::UInt32 => u32::MAX as u64,
            _ => u64::MAX,
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A schema-time value of some primitive type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl PrimitiveValue {
    /// Returns the value as an `i128` for integer values.
    #[must_use]
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(i128::from(v)),
            Self::UInt(v) => Some(i128::from(v)),
            Self::Float(_) => None,
        }
    }

    /// Returns the value widened to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Returns `true` if this is a floating point `NaN`.
    #[must_use]
    pub fn is_nan(self) -> bool {
        matches!(self, Self::Float(v) if v.is_nan())
    }
}

impl Display for PrimitiveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

fn parse_unsigned(text: &str) -> Option<u64> {
    let text = text.strip_prefix('+').unwrap_or(text);
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn parse_signed(text: &str) -> Option<i128> {
    match text.strip_prefix('-') {
        Some(rest) => parse_unsigned(rest).map(|v| -i128::from(v)),
        None => parse_unsigned(text).map(i128::from),
    }
}

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

//! Value-domain, text-encoding and length checks called by generated codecs.

use std::fmt::Display;

use crate::error::{SbeError, SbeResult};

/// A primitive value that generated code range checks.
pub trait SbePrimitive: Copy + PartialOrd + Display {
    /// Returns `true` if `self` is the null sentinel `null`.
    fn is_null_value(self, null: Self) -> bool;
}

macro_rules! impl_sbe_primitive_int {
    ($($t:ty),*) => {
        $(
            impl SbePrimitive for $t {
                #[inline]
                fn is_null_value(self, null: Self) -> bool {
                    self == null
                }
            }
        )*
    };
}

impl_sbe_primitive_int!(u8, i8, u16, i16, u32, i32, u64, i64);

impl SbePrimitive for f32 {
    #[inline]
    fn is_null_value(self, null: Self) -> bool {
        (self.is_nan() && null.is_nan()) || self == null
    }
}

impl SbePrimitive for f64 {
    #[inline]
    fn is_null_value(self, null: Self) -> bool {
        (self.is_nan() && null.is_nan()) || self == null
    }
}

/// Checks `value` lies within `[min, max]`.
///
/// # Errors
///
/// Returns `RangeCheck` naming the field, the value and the bounds. A `NaN` is outside every
/// range.
#[inline]
pub fn check_range<T: SbePrimitive>(field: &str, value: T, min: T, max: T) -> SbeResult<()> {
    if value >= min && value <= max {
        return Ok(());
    }
    Err(SbeError::RangeCheck {
        field: field.to_string(),
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    })
}

/// Checks an optional field: the null sentinel is accepted, any other value must lie within
/// `[min, max]`.
///
/// # Errors
///
/// Returns `RangeCheck` if a non-null value is out of range.
#[inline]
pub fn check_optional_range<T: SbePrimitive>(
    field: &str,
    value: T,
    null: T,
    min: T,
    max: T,
) -> SbeResult<()> {
    if value.is_null_value(null) {
        return Ok(());
    }
    check_range(field, value, min, max)
}

/// Character encoding declared for `char` arrays and var-data text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterEncoding {
    Utf8,
    UsAscii,
    /// Any other encoding; bytes are not interpreted.
    Other(String),
}

impl CharacterEncoding {
    /// Parses the schema spelling of an encoding (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Self::Utf8,
            "US-ASCII" | "ASCII" => Self::UsAscii,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    /// Returns the canonical spelling.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::UsAscii => "US-ASCII",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` if [`CharacterEncoding::validate`] inspects the bytes.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Validates variable-length text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEncoding` if the bytes are not well-formed in this encoding.
    pub fn validate(&self, field: &str, bytes: &[u8]) -> SbeResult<()> {
        let valid = match self {
            Self::Utf8 => std::str::from_utf8(bytes).is_ok(),
            Self::UsAscii => bytes.is_ascii(),
            Self::Other(_) => true,
        };
        if valid {
            return Ok(());
        }
        Err(SbeError::InvalidEncoding {
            field: field.to_string(),
            encoding: self.name().to_string(),
        })
    }

    /// Validates a fixed-length `char` array, ignoring trailing NUL padding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEncoding` if the unpadded bytes are not well-formed.
    pub fn validate_fixed(&self, field: &str, bytes: &[u8]) -> SbeResult<()> {
        let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        self.validate(field, &bytes[..end])
    }
}

impl Display for CharacterEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts a collection length to its wire width.
///
/// # Errors
///
/// Returns `LengthOverflow` if `length` exceeds `max` or does not fit `T`, rather than
/// silently truncating.
pub fn checked_length<T: TryFrom<u64>>(field: &str, length: usize, max: u64) -> SbeResult<T> {
    let overflow = || SbeError::LengthOverflow {
        field: field.to_string(),
        length,
        max,
    };
    let wide = u64::try_from(length).map_err(|_| overflow())?;
    if wide > max {
        return Err(overflow());
    }
    T::try_from(wide).map_err(|_| overflow())
}

/// Resizes a group container to `count` elements for decoding in place.
///
/// Existing elements (and their own buffers) are reused, surplus elements are dropped without
/// releasing capacity, and new elements are created with [`Default`].
///
/// # Errors
///
/// Returns `GroupCountTooLarge` if `count` exceeds `max`; the container is left untouched.
pub fn prepare_group<T: Default>(
    group: &str,
    items: &mut Vec<T>,
    count: u32,
    max: u32,
) -> SbeResult<()> {
    if count > max {
        return Err(SbeError::GroupCountTooLarge {
            group: group.to_string(),
            count,
            max,
        });
    }
    let count = count as usize;
    items.truncate(count);
    items.resize_with(count, T::default);
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(i64::MIN + 1, true)]
    #[case(i64::MAX, true)]
    #[case(0, true)]
    #[case(i64::MIN, false)]
    fn test_check_range_signed_default_domain(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(
            check_range("price", value, i64::MIN + 1, i64::MAX).is_ok(),
            ok
        );
    }

    #[rstest]
    #[case(9, false)]
    #[case(10, true)]
    #[case(20, true)]
    #[case(21, false)]
    fn test_check_range_custom_bounds(#[case] value: u16, #[case] ok: bool) {
        assert_eq!(check_range("qty", value, 10, 20).is_ok(), ok);
    }

    #[rstest]
    fn test_check_optional_range_accepts_null() {
        assert!(check_optional_range("qty", u32::MAX, u32::MAX, 0, u32::MAX - 1).is_ok());
        assert!(check_optional_range("qty", 5u32, u32::MAX, 10, 20).is_err());
        assert!(check_optional_range("qty", 15u32, u32::MAX, 10, 20).is_ok());
    }

    #[rstest]
    fn test_float_nan_handling() {
        assert!(check_range("px", f64::NAN, f64::MIN, f64::MAX).is_err());
        assert!(check_optional_range("px", f64::NAN, f64::NAN, f64::MIN, f64::MAX).is_ok());
        assert!(check_optional_range("px", 1.5f32, f32::NAN, 0.0, 1.0).is_err());
    }

    #[rstest]
    fn test_range_error_context() {
        let err = check_range("bidQty", -5i32, 0, 100).unwrap_err();
        match err {
            SbeError::RangeCheck {
                field,
                value,
                min,
                max,
            } => {
                assert_eq!(field, "bidQty");
                assert_eq!(value, "-5");
                assert_eq!(min, "0");
                assert_eq!(max, "100");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    #[case("UTF-8", CharacterEncoding::Utf8)]
    #[case("utf-8", CharacterEncoding::Utf8)]
    #[case("US-ASCII", CharacterEncoding::UsAscii)]
    #[case("ISO-8859-1", CharacterEncoding::Other("ISO-8859-1".to_string()))]
    fn test_character_encoding_from_name(#[case] name: &str, #[case] expected: CharacterEncoding) {
        assert_eq!(CharacterEncoding::from_name(name), expected);
    }

    #[rstest]
    fn test_utf8_validation() {
        let enc = CharacterEncoding::Utf8;
        assert!(enc.validate("symbol", "BTC€".as_bytes()).is_ok());
        let err = enc.validate("symbol", &[0x42, 0xC3]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid UTF-8 in field 'symbol'");
    }

    #[rstest]
    fn test_ascii_validation() {
        let enc = CharacterEncoding::UsAscii;
        assert!(enc.validate("code", b"ABC").is_ok());
        assert!(enc.validate("code", "é".as_bytes()).is_err());
        assert!(CharacterEncoding::Other("raw".into()).validate("x", &[0xFF]).is_ok());
    }

    #[rstest]
    fn test_validate_fixed_ignores_trailing_nul() {
        let enc = CharacterEncoding::UsAscii;
        assert!(enc.validate_fixed("symbol", b"BTC\0\0\0\0\0").is_ok());
        assert!(enc.validate_fixed("symbol", &[0u8; 8]).is_ok());
        assert!(enc.validate_fixed("symbol", &[0x80, 0, 0]).is_err());
    }

    #[rstest]
    fn test_checked_length() {
        assert_eq!(checked_length::<u8>("symbol", 5, 254).unwrap(), 5u8);
        assert!(matches!(
            checked_length::<u8>("symbol", 255, 254),
            Err(SbeError::LengthOverflow { length: 255, max: 254, .. })
        ));
        assert!(checked_length::<u16>("fills", 70_000, u64::MAX).is_err());
    }

    #[rstest]
    fn test_prepare_group_grows_and_truncates_without_shrinking() {
        let mut items: Vec<Vec<u8>> = vec![vec![1], vec![2], vec![3]];
        let capacity = items.capacity();

        prepare_group("fills", &mut items, 1, 10).unwrap();
        assert_eq!(items, vec![vec![1]]);
        assert_eq!(items.capacity(), capacity);

        prepare_group("fills", &mut items, 3, 10).unwrap();
        assert_eq!(items, vec![vec![1], vec![], vec![]]);
    }

    #[rstest]
    fn test_prepare_group_rejects_large_count() {
        let mut items: Vec<u32> = vec![7];
        let err = prepare_group("bids", &mut items, 10_001, 10_000).unwrap_err();

        assert!(matches!(err, SbeError::GroupCountTooLarge { count: 10_001, .. }));
        assert_eq!(items, vec![7]);
    }
}

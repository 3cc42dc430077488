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

//! Standard SBE message header and repeating group dimension headers.

use std::io::{Read, Write};

use crate::{
    SbeRead, SbeWrite,
    cursor::SbeCursor,
    error::{SbeError, SbeResult},
    primitive::PrimitiveType,
};

/// SBE message header (8 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    pub block_length: u16,
    pub template_id: u16,
    pub schema_id: u16,
    pub version: u16,
}

impl MessageHeader {
    pub const ENCODED_LENGTH: usize = 8;

    /// Creates a new [`MessageHeader`] instance.
    #[must_use]
    pub const fn new(block_length: u16, template_id: u16, schema_id: u16, version: u16) -> Self {
        Self {
            block_length,
            template_id,
            schema_id,
            version,
        }
    }

    /// Writes the header.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the sink is full or broken.
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W) -> SbeResult<()> {
        w.write_u16_le(self.block_length)?;
        w.write_u16_le(self.template_id)?;
        w.write_u16_le(self.schema_id)?;
        w.write_u16_le(self.version)
    }

    /// Reads a header from a byte source.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source holds fewer than 8 bytes.
    pub fn decode<R: Read + ?Sized>(r: &mut R) -> SbeResult<Self> {
        Ok(Self {
            block_length: r.read_u16_le()?,
            template_id: r.read_u16_le()?,
            schema_id: r.read_u16_le()?,
            version: r.read_u16_le()?,
        })
    }

    /// Decodes a header from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooShort` if the buffer is less than 8 bytes.
    pub fn decode_from_slice(buf: &[u8]) -> SbeResult<Self> {
        let mut cursor = SbeCursor::new(buf);
        cursor.require(Self::ENCODED_LENGTH)?;
        Self::decode(&mut cursor)
    }

    /// Validates the schema ID matches the expected schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the IDs differ.
    pub fn validate_schema(&self, expected: u16) -> SbeResult<()> {
        if self.schema_id != expected {
            return Err(SbeError::SchemaMismatch {
                expected,
                actual: self.schema_id,
            });
        }
        Ok(())
    }
}

/// Width of the element count in a group dimension header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountWidth {
    /// `groupSize8Encoding`-style `uint8` count.
    U8,
    /// `groupSize16Encoding`-style `uint16` count.
    U16,
    /// `groupSizeEncoding`-style `uint32` count.
    U32,
}

impl CountWidth {
    /// Maps the `numInGroup` primitive of a dimension composite.
    #[must_use]
    pub const fn from_primitive(primitive: PrimitiveType) -> Option<Self> {
        match primitive {
            PrimitiveType::UInt8 => Some(Self::U8),
            PrimitiveType::UInt16 => Some(Self::U16),
            PrimitiveType::UInt32 => Some(Self::U32),
            _ => None,
        }
    }

    /// Encoded size of the count in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest count representable at this width.
    #[must_use]
    pub const fn max_count(self) -> u32 {
        match self {
            Self::U8 => u8::MAX as u32,
            Self::U16 => u16::MAX as u32,
            Self::U32 => u32::MAX,
        }
    }
}

/// Repeating group dimension header: element block length and element count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroupHeader {
    pub block_length: u16,
    pub num_in_group: u32,
}

impl GroupHeader {
    /// Creates a new [`GroupHeader`] instance.
    #[must_use]
    pub const fn new(block_length: u16, num_in_group: u32) -> Self {
        Self {
            block_length,
            num_in_group,
        }
    }

    /// Encoded size of a header whose count has the given width.
    #[must_use]
    pub const fn encoded_length(width: CountWidth) -> usize {
        2 + width.size()
    }

    /// Writes the header with the count at `width`.
    ///
    /// # Errors
    ///
    /// Returns `LengthOverflow` if the count does not fit `width`, or an I/O error.
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W, width: CountWidth) -> SbeResult<()> {
        if self.num_in_group > width.max_count() {
            return Err(SbeError::LengthOverflow {
                field: "numInGroup".to_string(),
                length: self.num_in_group as usize,
                max: u64::from(width.max_count()),
            });
        }
        w.write_u16_le(self.block_length)?;
        match width {
            CountWidth::U8 => w.write_u8(self.num_in_group as u8),
            CountWidth::U16 => w.write_u16_le(self.num_in_group as u16),
            CountWidth::U32 => w.write_u32_le(self.num_in_group),
        }
    }

    /// Reads a header whose count has the given width.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source is exhausted.
    pub fn decode<R: Read + ?Sized>(r: &mut R, width: CountWidth) -> SbeResult<Self> {
        let block_length = r.read_u16_le()?;
        let num_in_group = match width {
            CountWidth::U8 => u32::from(r.read_u8()?),
            CountWidth::U16 => u32::from(r.read_u16_le()?),
            CountWidth::U32 => r.read_u32_le()?,
        };
        Ok(Self {
            block_length,
            num_in_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_message_header_layout() {
        let header = MessageHeader::new(18, 10000, 1, 0);
        let mut buf: Vec<u8> = Vec::new();
        header.encode(&mut buf).unwrap();

        assert_eq!(buf, vec![18, 0, 0x10, 0x27, 1, 0, 0, 0]);
        assert_eq!(MessageHeader::decode_from_slice(&buf).unwrap(), header);
    }

    #[rstest]
    fn test_message_header_too_short() {
        let err = MessageHeader::decode_from_slice(&[0u8; 5]).unwrap_err();
        match err {
            SbeError::BufferTooShort { expected, actual } => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    fn test_validate_schema() {
        let header = MessageHeader::new(0, 1, 3, 1);
        assert!(header.validate_schema(3).is_ok());
        assert!(matches!(
            header.validate_schema(1),
            Err(SbeError::SchemaMismatch {
                expected: 1,
                actual: 3
            })
        ));
    }

    #[rstest]
    #[case(CountWidth::U8, vec![25, 0, 3])]
    #[case(CountWidth::U16, vec![25, 0, 3, 0])]
    #[case(CountWidth::U32, vec![25, 0, 3, 0, 0, 0])]
    fn test_group_header_widths(#[case] width: CountWidth, #[case] expected: Vec<u8>) {
        let header = GroupHeader::new(25, 3);
        let mut buf: Vec<u8> = Vec::new();
        header.encode(&mut buf, width).unwrap();

        assert_eq!(buf, expected);
        assert_eq!(buf.len(), GroupHeader::encoded_length(width));

        let mut cursor = SbeCursor::new(&buf);
        assert_eq!(GroupHeader::decode(&mut cursor, width).unwrap(), header);
    }

    #[rstest]
    fn test_group_header_count_overflow() {
        let header = GroupHeader::new(16, 256);
        let mut buf: Vec<u8> = Vec::new();

        let err = header.encode(&mut buf, CountWidth::U8).unwrap_err();
        assert!(matches!(err, SbeError::LengthOverflow { length: 256, .. }));
        assert!(buf.is_empty());
    }

    #[rstest]
    fn test_count_width_from_primitive() {
        assert_eq!(
            CountWidth::from_primitive(PrimitiveType::UInt16),
            Some(CountWidth::U16)
        );
        assert_eq!(CountWidth::from_primitive(PrimitiveType::Int32), None);
    }
}

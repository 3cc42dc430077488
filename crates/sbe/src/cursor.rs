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

//! Zero-copy SBE byte cursor for sequential decoding.

use std::io::{self, Read};

use crate::error::{SbeError, SbeResult};

/// Zero-copy SBE byte cursor for sequential decoding.
///
/// Wraps a byte slice and tracks position. Implements [`Read`], so every
/// [`SbeRead`](crate::SbeRead) method and every generated `decode` works on it directly,
/// and [`SbeCursor::pos`] reports exactly how many bytes a decode consumed.
#[derive(Debug, Clone)]
pub struct SbeCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SbeCursor<'a> {
    /// Creates a new cursor at position 0.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Creates a cursor starting at a specific offset.
    #[must_use]
    pub const fn new_at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    /// Current position in the buffer.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from current position.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Returns the underlying buffer.
    #[must_use]
    pub const fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Returns remaining bytes as a slice.
    #[must_use]
    pub fn peek(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or(&[])
    }

    /// Ensures at least `n` bytes remain.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooShort` if fewer than `n` bytes remain.
    pub fn require(&self, n: usize) -> SbeResult<()> {
        if self.remaining() < n {
            return Err(SbeError::BufferTooShort {
                expected: self.pos.saturating_add(n),
                actual: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Advances position by `n` bytes.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooShort` if fewer than `n` bytes remain.
    pub fn advance(&mut self, n: usize) -> SbeResult<()> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    /// Resets cursor to start of buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Sets cursor to a specific position.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooShort` if `pos` lies beyond the end of the buffer.
    pub fn set_pos(&mut self, pos: usize) -> SbeResult<()> {
        if pos > self.buf.len() {
            return Err(SbeError::BufferTooShort {
                expected: pos,
                actual: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Borrows the next `n` bytes and advances past them.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooShort` if fewer than `n` bytes remain.
    pub fn read_slice(&mut self, n: usize) -> SbeResult<&'a [u8]> {
        self.require(n)?;
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

impl Read for SbeCursor<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.remaining());
        if n == 0 {
            return Ok(0);
        }
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::marshal::SbeRead;

    #[rstest]
    fn test_new_starts_at_zero() {
        let buf = [1, 2, 3, 4];
        let cursor = SbeCursor::new(&buf);
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.remaining(), 4);
    }

    #[rstest]
    fn test_new_at_starts_at_offset() {
        let buf = [1, 2, 3, 4];
        let cursor = SbeCursor::new_at(&buf, 2);
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.peek(), &[3, 4]);
    }

    #[rstest]
    fn test_new_at_past_end_is_empty() {
        let buf = [1, 2];
        let cursor = SbeCursor::new_at(&buf, 5);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.peek().is_empty());
    }

    #[rstest]
    fn test_read_u8() {
        let buf = [0x42, 0xFF];
        let mut cursor = SbeCursor::new(&buf);

        assert_eq!(cursor.read_u8().unwrap(), 0x42);
        assert_eq!(cursor.pos(), 1);

        assert_eq!(cursor.read_u8().unwrap(), 0xFF);
        assert_eq!(cursor.pos(), 2);

        assert!(cursor.read_u8().unwrap_err().is_unexpected_eof());
    }

    #[rstest]
    fn test_read_i8() {
        let buf = [0x7F, 0x80]; // 127, -128
        let mut cursor = SbeCursor::new(&buf);

        assert_eq!(cursor.read_i8().unwrap(), 127);
        assert_eq!(cursor.read_i8().unwrap(), -128);
    }

    #[rstest]
    fn test_read_u16_le() {
        let buf = [0x34, 0x12]; // 0x1234 in little-endian
        let mut cursor = SbeCursor::new(&buf);

        assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
        assert_eq!(cursor.pos(), 2);
    }

    #[rstest]
    fn test_read_i64_le() {
        let value: i64 = -1234567890123456789;
        let buf = value.to_le_bytes();
        let mut cursor = SbeCursor::new(&buf);

        assert_eq!(cursor.read_i64_le().unwrap(), value);
        assert_eq!(cursor.pos(), 8);
    }

    #[rstest]
    fn test_partial_read_keeps_position_at_end() {
        let buf = [1, 2, 3];
        let mut cursor = SbeCursor::new(&buf);

        assert!(cursor.read_u32_le().is_err());
        assert_eq!(cursor.remaining(), 0);
    }

    #[rstest]
    fn test_require_reports_expected_and_actual() {
        let buf = [0u8; 4];
        let cursor = SbeCursor::new_at(&buf, 1);

        assert!(cursor.require(3).is_ok());
        match cursor.require(10).unwrap_err() {
            SbeError::BufferTooShort { expected, actual } => {
                assert_eq!(expected, 11);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    fn test_advance_and_reset() {
        let buf = [0u8; 10];
        let mut cursor = SbeCursor::new(&buf);

        cursor.advance(7).unwrap();
        assert_eq!(cursor.pos(), 7);
        assert!(cursor.advance(4).is_err());
        assert_eq!(cursor.pos(), 7);

        cursor.reset();
        assert_eq!(cursor.pos(), 0);
    }

    #[rstest]
    fn test_set_pos() {
        let buf = [0u8; 4];
        let mut cursor = SbeCursor::new(&buf);

        cursor.set_pos(4).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.set_pos(5).is_err());
        assert_eq!(cursor.pos(), 4);
    }

    #[rstest]
    fn test_read_slice_is_zero_copy() {
        let buf = b"BTCUSDT";
        let mut cursor = SbeCursor::new(buf);

        let slice = cursor.read_slice(3).unwrap();
        assert_eq!(slice, b"BTC");
        assert_eq!(slice.as_ptr(), buf.as_ptr());
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.read_slice(5).is_err());
    }

    #[rstest]
    fn test_read_var_bytes_through_cursor() {
        let buf = [5, b'h', b'e', b'l', b'l', b'o', 0xAA];
        let mut cursor = SbeCursor::new(&buf);
        let mut out = Vec::new();

        let len = cursor.read_u8().unwrap() as usize;
        cursor.read_var_bytes(&mut out, len).unwrap();

        assert_eq!(out, b"hello");
        assert_eq!(cursor.peek(), &[0xAA]);
    }
}

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

// Every method fails with SbeError::Io when the source or sink cannot satisfy the request
#![allow(clippy::missing_errors_doc)]

//! Primitive SBE reads and writes over any [`std::io::Read`] / [`std::io::Write`].
//!
//! All multi-byte values use [`SbeEndian`]. A short read or a full sink is a hard failure:
//! nothing is buffered or retried.

use std::io::{self, Read, Write};

use byteorder::LittleEndian;

use crate::error::SbeResult;

/// The byte order of every SBE multi-byte primitive.
pub type SbeEndian = LittleEndian;

const ZEROS: [u8; 64] = [0; 64];

fn short_read(expected: u64, actual: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("expected {expected} bytes, was {actual}"),
    )
}

/// Extension trait reading SBE primitives from a byte source.
pub trait SbeRead: Read {
    /// Reads a u8.
    fn read_u8(&mut self) -> SbeResult<u8> {
        Ok(byteorder::ReadBytesExt::read_u8(self)?)
    }

    /// Reads an i8.
    fn read_i8(&mut self) -> SbeResult<i8> {
        Ok(byteorder::ReadBytesExt::read_i8(self)?)
    }

    /// Reads a u16 little-endian.
    fn read_u16_le(&mut self) -> SbeResult<u16> {
        Ok(byteorder::ReadBytesExt::read_u16::<SbeEndian>(self)?)
    }

    /// Reads an i16 little-endian.
    fn read_i16_le(&mut self) -> SbeResult<i16> {
        Ok(byteorder::ReadBytesExt::read_i16::<SbeEndian>(self)?)
    }

    /// Reads a u32 little-endian.
    fn read_u32_le(&mut self) -> SbeResult<u32> {
        Ok(byteorder::ReadBytesExt::read_u32::<SbeEndian>(self)?)
    }

    /// Reads an i32 little-endian.
    fn read_i32_le(&mut self) -> SbeResult<i32> {
        Ok(byteorder::ReadBytesExt::read_i32::<SbeEndian>(self)?)
    }

    /// Reads a u64 little-endian.
    fn read_u64_le(&mut self) -> SbeResult<u64> {
        Ok(byteorder::ReadBytesExt::read_u64::<SbeEndian>(self)?)
    }

    /// Reads an i64 little-endian.
    fn read_i64_le(&mut self) -> SbeResult<i64> {
        Ok(byteorder::ReadBytesExt::read_i64::<SbeEndian>(self)?)
    }

    /// Reads an IEEE 754 single little-endian.
    fn read_f32_le(&mut self) -> SbeResult<f32> {
        Ok(byteorder::ReadBytesExt::read_f32::<SbeEndian>(self)?)
    }

    /// Reads an IEEE 754 double little-endian.
    fn read_f64_le(&mut self) -> SbeResult<f64> {
        Ok(byteorder::ReadBytesExt::read_f64::<SbeEndian>(self)?)
    }

    /// Fills `dst` completely (fixed-length arrays).
    fn read_bytes_into(&mut self, dst: &mut [u8]) -> SbeResult<()> {
        self.read_exact(dst)?;
        Ok(())
    }

    /// Replaces the contents of `dst` with exactly `len` bytes.
    ///
    /// The existing allocation of `dst` is reused; it only grows as bytes actually arrive, so a
    /// corrupt length prefix cannot force a large up-front allocation.
    fn read_var_bytes(&mut self, dst: &mut Vec<u8>, len: usize) -> SbeResult<()> {
        dst.clear();
        let expected = len as u64;
        let actual = Read::take(&mut *self, expected).read_to_end(dst)? as u64;
        if actual != expected {
            return Err(short_read(expected, actual).into());
        }
        Ok(())
    }

    /// Consumes and discards exactly `n` bytes.
    fn skip_bytes(&mut self, n: usize) -> SbeResult<()> {
        let expected = n as u64;
        let actual = io::copy(&mut Read::take(&mut *self, expected), &mut io::sink())?;
        if actual != expected {
            return Err(short_read(expected, actual).into());
        }
        Ok(())
    }
}

impl<R: Read + ?Sized> SbeRead for R {}

/// Extension trait writing SBE primitives to a byte sink.
pub trait SbeWrite: Write {
    /// Writes a u8.
    fn write_u8(&mut self, value: u8) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_u8(self, value)?)
    }

    /// Writes an i8.
    fn write_i8(&mut self, value: i8) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_i8(self, value)?)
    }

    /// Writes a u16 little-endian.
    fn write_u16_le(&mut self, value: u16) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_u16::<SbeEndian>(self, value)?)
    }

    /// Writes an i16 little-endian.
    fn write_i16_le(&mut self, value: i16) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_i16::<SbeEndian>(self, value)?)
    }

    /// Writes a u32 little-endian.
    fn write_u32_le(&mut self, value: u32) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_u32::<SbeEndian>(self, value)?)
    }

    /// Writes an i32 little-endian.
    fn write_i32_le(&mut self, value: i32) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_i32::<SbeEndian>(self, value)?)
    }

    /// Writes a u64 little-endian.
    fn write_u64_le(&mut self, value: u64) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_u64::<SbeEndian>(self, value)?)
    }

    /// Writes an i64 little-endian.
    fn write_i64_le(&mut self, value: i64) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_i64::<SbeEndian>(self, value)?)
    }

    /// Writes an IEEE 754 single little-endian.
    fn write_f32_le(&mut self, value: f32) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_f32::<SbeEndian>(self, value)?)
    }

    /// Writes an IEEE 754 double little-endian.
    fn write_f64_le(&mut self, value: f64) -> SbeResult<()> {
        Ok(byteorder::WriteBytesExt::write_f64::<SbeEndian>(self, value)?)
    }

    /// Writes all of `bytes`.
    fn write_bytes(&mut self, bytes: &[u8]) -> SbeResult<()> {
        self.write_all(bytes)?;
        Ok(())
    }

    /// Writes `n` zero bytes.
    fn write_padding(&mut self, mut n: usize) -> SbeResult<()> {
        while n > 0 {
            let chunk = n.min(ZEROS.len());
            self.write_all(&ZEROS[..chunk])?;
            n -= chunk;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> SbeWrite for W {}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    use super::*;
    use crate::error::SbeError;

    #[rstest]
    fn test_write_is_little_endian() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_u16_le(0x1234).unwrap();
        buf.write_i32_le(-2).unwrap();
        buf.write_u8(0xAB).unwrap();

        assert_eq!(buf, vec![0x34, 0x12, 0xFE, 0xFF, 0xFF, 0xFF, 0xAB]);
    }

    #[rstest]
    fn test_read_is_little_endian() {
        let buf = [0x34u8, 0x12, 0xFE, 0xFF, 0xFF, 0xFF];
        let mut reader = &buf[..];

        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_i32_le().unwrap(), -2);
        assert!(reader.is_empty());
    }

    #[rstest]
    fn test_short_read_is_unexpected_eof() {
        let buf = [0x01u8, 0x02, 0x03];
        let mut reader = &buf[..];

        let err = reader.read_u32_le().unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[rstest]
    fn test_full_sink_fails() {
        let mut storage = [0u8; 3];
        let mut sink = &mut storage[..];

        let err = sink.write_u64_le(42).unwrap_err();
        match err {
            SbeError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    fn test_read_var_bytes_reuses_allocation() {
        let buf = b"helloworld";
        let mut reader = &buf[..];
        let mut dst: Vec<u8> = Vec::with_capacity(64);
        let capacity = dst.capacity();

        reader.read_var_bytes(&mut dst, 5).unwrap();
        assert_eq!(dst, b"hello");
        reader.read_var_bytes(&mut dst, 3).unwrap();
        assert_eq!(dst, b"wor");
        assert_eq!(dst.capacity(), capacity);
    }

    #[rstest]
    fn test_read_var_bytes_truncated() {
        let buf = b"abc";
        let mut reader = &buf[..];
        let mut dst: Vec<u8> = Vec::new();

        let err = reader.read_var_bytes(&mut dst, 10).unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[rstest]
    fn test_read_var_bytes_huge_length_does_not_preallocate() {
        let buf = [1u8, 2, 3];
        let mut reader = &buf[..];
        let mut dst: Vec<u8> = Vec::new();

        assert!(reader.read_var_bytes(&mut dst, usize::MAX / 2).is_err());
        assert!(dst.capacity() < 64 * 1024);
    }

    #[rstest]
    fn test_skip_bytes() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut reader = &buf[..];

        reader.skip_bytes(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 4);
        assert!(reader.skip_bytes(2).unwrap_err().is_unexpected_eof());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(64)]
    #[case(130)]
    fn test_write_padding(#[case] n: usize) {
        let mut buf: Vec<u8> = vec![0xFF];
        buf.write_padding(n).unwrap();
        assert_eq!(buf.len(), n + 1);
        assert!(buf[1..].iter().all(|b| *b == 0));
    }

    #[rstest]
    fn test_fixed_bytes_round_trip() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_bytes(b"BTCUSDT\0").unwrap();

        let mut out = [0u8; 8];
        let mut reader = &buf[..];
        reader.read_bytes_into(&mut out).unwrap();
        assert_eq!(&out, b"BTCUSDT\0");
    }

    #[quickcheck]
    fn prop_i64_round_trip(value: i64) -> bool {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_i64_le(value).unwrap();
        buf.len() == 8 && (&buf[..]).read_i64_le().unwrap() == value
    }

    #[quickcheck]
    fn prop_u32_round_trip(value: u32) -> bool {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_u32_le(value).unwrap();
        buf == value.to_le_bytes() && (&buf[..]).read_u32_le().unwrap() == value
    }

    #[quickcheck]
    fn prop_f64_round_trip_bits(value: f64) -> bool {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_f64_le(value).unwrap();
        (&buf[..]).read_f64_le().unwrap().to_bits() == value.to_bits()
    }
}

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

//! The message trait implemented by generated codecs, and header framing on top of it.

use std::io::{Read, Write};

use crate::{
    cursor::SbeCursor,
    error::{SbeError, SbeResult},
    header::MessageHeader,
};

/// Selects a free-text schema attribute of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaAttribute {
    Epoch,
    TimeUnit,
    SemanticType,
    Presence,
}

/// A top-level SBE message codec.
pub trait SbeMessage {
    /// Message name as declared in the schema.
    const NAME: &'static str;
    const TEMPLATE_ID: u16;
    const SCHEMA_ID: u16;
    const SCHEMA_VERSION: u16;
    /// Fixed block length in bytes, excluding groups and var-data.
    const BLOCK_LENGTH: u16;
    const SEMANTIC_TYPE: &'static str;
    const SEMANTIC_VERSION: &'static str;

    /// Encodes the message body.
    ///
    /// When `do_range_check` is set the full value domain is validated before any byte is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns a validation error, a length overflow, or an I/O error from the sink.
    fn encode<W: Write + ?Sized>(&self, w: &mut W, do_range_check: bool) -> SbeResult<()>;

    /// Decodes the message body in place.
    ///
    /// `acting_version` and `block_length` are the values carried by the message header.
    /// On error the message is left mutated up to the failing field.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source runs out, or a validation error.
    fn decode<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
        acting_version: u16,
        block_length: u16,
        do_range_check: bool,
    ) -> SbeResult<()>;

    /// Validates every field against its declared domain.
    ///
    /// # Errors
    ///
    /// Returns the first range, encoding or unknown enumerant violation.
    fn range_check(&self, acting_version: u16, schema_version: u16) -> SbeResult<()>;

    /// Returns the header announcing this message at the compiled schema version.
    #[must_use]
    fn header() -> MessageHeader {
        MessageHeader::new(
            Self::BLOCK_LENGTH,
            Self::TEMPLATE_ID,
            Self::SCHEMA_ID,
            Self::SCHEMA_VERSION,
        )
    }
}

/// Writes the message header followed by the message body.
///
/// # Errors
///
/// Returns any error from [`SbeMessage::encode`] or from writing the header.
pub fn encode_frame<M: SbeMessage, W: Write + ?Sized>(
    msg: &M,
    w: &mut W,
    do_range_check: bool,
) -> SbeResult<()> {
    if do_range_check {
        msg.range_check(M::SCHEMA_VERSION, M::SCHEMA_VERSION)?;
    }
    M::header().encode(w)?;
    msg.encode(w, false)
}

/// Encodes a framed message into a new buffer.
///
/// # Errors
///
/// Returns any error from [`encode_frame`].
pub fn encode_frame_to_vec<M: SbeMessage>(msg: &M, do_range_check: bool) -> SbeResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(MessageHeader::ENCODED_LENGTH + M::BLOCK_LENGTH as usize);
    encode_frame(msg, &mut buf, do_range_check)?;
    Ok(buf)
}

/// Reads the message header at the start of `buf` without consuming anything.
///
/// # Errors
///
/// Returns `BufferTooShort` if fewer than 8 bytes are available.
pub fn peek_header(buf: &[u8]) -> SbeResult<MessageHeader> {
    MessageHeader::decode_from_slice(buf)
}

/// Decodes a framed message into `msg`, reusing its buffers, and returns the number of bytes
/// consumed.
///
/// # Errors
///
/// Returns `SchemaMismatch` or `TemplateMismatch` if the header announces another message,
/// or any error from [`SbeMessage::decode`].
pub fn decode_frame_into<M: SbeMessage>(
    msg: &mut M,
    buf: &[u8],
    do_range_check: bool,
) -> SbeResult<usize> {
    let mut cursor = SbeCursor::new(buf);
    cursor.require(MessageHeader::ENCODED_LENGTH)?;
    let header = MessageHeader::decode(&mut cursor)?;

    header.validate_schema(M::SCHEMA_ID)?;
    if header.template_id != M::TEMPLATE_ID {
        return Err(SbeError::TemplateMismatch {
            expected: M::TEMPLATE_ID,
            actual: header.template_id,
        });
    }
    if header.version != M::SCHEMA_VERSION {
        tracing::trace!(
            message = M::NAME,
            acting_version = header.version,
            schema_version = M::SCHEMA_VERSION,
            block_length = header.block_length,
            "Decoding frame at non-native schema version"
        );
    }

    msg.decode(
        &mut cursor,
        header.version,
        header.block_length,
        do_range_check,
    )?;
    Ok(cursor.pos())
}

/// Decodes a framed message and returns it with the number of bytes consumed.
///
/// # Errors
///
/// Returns any error from [`decode_frame_into`].
pub fn decode_frame<M: SbeMessage + Default>(
    buf: &[u8],
    do_range_check: bool,
) -> SbeResult<(M, usize)> {
    let mut msg = M::default();
    let consumed = decode_frame_into(&mut msg, buf, do_range_check)?;
    Ok((msg, consumed))
}

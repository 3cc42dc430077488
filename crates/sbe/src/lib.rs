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

//! Runtime support for [Simple Binary Encoding](https://github.com/FIXTradingCommunity/fix-simple-binary-encoding)
//! (SBE) codecs.
//!
//! The `nautilus-sbe` crate is the leaf dependency of every generated codec. It provides:
//!
//! - Little-endian primitive reads and writes over any byte source or sink ([`SbeRead`], [`SbeWrite`]).
//! - A zero-copy positioned reader for decoding from slices ([`SbeCursor`]).
//! - The standard message header and group dimension headers.
//! - Range, text encoding and length checks used by generated `range_check`/`encode`/`decode`.
//! - The [`SbeMessage`] trait and header framing helpers.
//!
//! Codecs for a particular schema are produced by the `nautilus-sbe-codegen` crate.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cursor;
pub mod error;
pub mod header;
pub mod marshal;
pub mod message;
pub mod primitive;
pub mod validate;

pub use crate::{
    cursor::SbeCursor,
    error::{MAX_GROUP_COUNT, SbeError, SbeResult},
    header::{CountWidth, GroupHeader, MessageHeader},
    marshal::{SbeEndian, SbeRead, SbeWrite},
    message::{
        MetaAttribute, SbeMessage, decode_frame, decode_frame_into, encode_frame,
        encode_frame_to_vec, peek_header,
    },
    primitive::{PrimitiveType, PrimitiveValue},
    validate::{
        CharacterEncoding, SbePrimitive, check_optional_range, check_range, checked_length,
        prepare_group,
    },
};

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

//! Bit set emission.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{
    Emitter, Unit,
    names::{self, NameRegistry},
    primitives::{read_expr, rust_type, write_stmt},
};
use crate::{
    error::{CodegenError, CodegenResult},
    schema::{ir::SetDef, validate::choice_bit},
};

pub(crate) fn emit_set(
    emitter: &Emitter<'_>,
    s: &SetDef,
    types: &mut NameRegistry,
) -> CodegenResult<Unit> {
    let rt = &emitter.rt;
    let element = format!("set '{}'", s.name);
    let name = types.claim(&names::type_name(&s.name), &element)?;
    let (primitive, _) = emitter.schema.encoding_primitive(&s.encoding_type, &element)?;
    let raw_ty = rust_type(primitive);
    let encoded_length = Literal::usize_unsuffixed(primitive.size());
    let doc = emitter.doc(&s.description);
    let width = primitive.size() * 8;

    let mut methods = NameRegistry::new(&element);
    for reserved in ["new", "raw", "is_empty", "encode", "decode", "range_check"] {
        methods.claim(reserved, "the generated set API")?;
    }

    let mut accessors = TokenStream::new();
    for choice in &s.choices {
        let path = format!("{element} > choice '{}'", choice.name);
        let bit =
            choice_bit(&choice.bit, width).map_err(|reason| CodegenError::schema(&path, reason))?;
        let mask = Literal::u64_unsuffixed(1u64 << bit);
        let getter = methods.claim(&names::member_name(&choice.name), &path)?;
        let setter = methods.claim(&names::setter_name(&choice.name), &path)?;
        let choice_doc = emitter.doc(&choice.description);

        accessors.extend(quote! {
            #choice_doc
            #[must_use]
            pub const fn #getter(self) -> bool {
                (self.0 & #mask) != 0
            }

            pub fn #setter(&mut self, value: bool) -> &mut Self {
                if value {
                    self.0 |= #mask;
                } else {
                    self.0 &= !#mask;
                }
                self
            }
        });
    }

    let read = read_expr(primitive);
    let write = write_stmt(primitive, &quote!(self.0));

    let tokens = quote! {
        #doc
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct #name(pub #raw_ty);

        impl #name {
            pub const ENCODED_LENGTH: usize = #encoded_length;

            #[must_use]
            pub const fn new(raw: #raw_ty) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> #raw_ty {
                self.0
            }

            /// Returns `true` when no choice is set.
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            #accessors

            /// Writes the raw bits.
            ///
            /// # Errors
            ///
            /// Returns an error if the sink fails.
            pub fn encode<W: ::std::io::Write + ?Sized>(&self, w: &mut W) -> #rt::SbeResult<()> {
                #write
                Ok(())
            }

            /// Reads the raw bits; undeclared bits are kept.
            ///
            /// # Errors
            ///
            /// Returns an error if the source runs out.
            pub fn decode<R: ::std::io::Read + ?Sized>(r: &mut R) -> #rt::SbeResult<Self> {
                Ok(Self(#read))
            }

            /// Sets have no invalid values.
            ///
            /// # Errors
            ///
            /// Never fails.
            #[allow(unused_variables)]
            pub fn range_check(&self, acting_version: u16, schema_version: u16) -> #rt::SbeResult<()> {
                Ok(())
            }
        }
    };

    Ok(Unit {
        name: names::type_name(&s.name),
        tokens,
    })
}

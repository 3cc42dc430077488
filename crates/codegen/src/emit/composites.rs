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

//! Composite emission.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{
    Emitter, Unit,
    members::{MemberCode, Owner, emit_member},
    names::{self, NameRegistry},
};
use crate::{error::CodegenResult, layout::resolve_composite, schema::ir::Composite};

pub(crate) fn emit_composite(
    emitter: &Emitter<'_>,
    c: &Composite,
    types: &mut NameRegistry,
) -> CodegenResult<Unit> {
    let rt = &emitter.rt;
    let element = format!("composite '{}'", c.name);
    let name = types.claim(&names::type_name(&c.name), &element)?;
    let (members, layout) = resolve_composite(emitter.schema, c)?;
    let encoded_length = Literal::usize_unsuffixed(layout.block_length);
    let doc = emitter.doc(&c.description);

    let mut fields = NameRegistry::new(&element);
    let mut items = NameRegistry::new(&element);
    for reserved in ["ENCODED_LENGTH", "null", "encode", "decode", "range_check"] {
        items.claim(reserved, "the generated composite API")?;
    }

    let mut code = Vec::with_capacity(members.len());
    for member in &members {
        code.push(emit_member(emitter, member, Owner::Composite, &mut fields, &mut items)?);
    }
    let MemberTokens {
        fields,
        defaults,
        nulls,
        constants,
        encodes,
        decodes,
        range_checks,
        metadata,
    } = MemberTokens::collect(code);

    let tokens = quote! {
        #doc
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct #name {
            #(#fields)*
        }

        impl Default for #name {
            fn default() -> Self {
                Self {
                    #(#defaults)*
                }
            }
        }

        impl #name {
            pub const ENCODED_LENGTH: usize = #encoded_length;

            #(#constants)*

            /// Returns the composite with every member at its null value.
            #[must_use]
            pub const fn null() -> Self {
                Self {
                    #(#nulls)*
                }
            }

            /// Writes every member in declaration order.
            ///
            /// # Errors
            ///
            /// Returns an error if the sink fails.
            pub fn encode<W: ::std::io::Write + ?Sized>(&self, w: &mut W) -> #rt::SbeResult<()> {
                #(#encodes)*
                Ok(())
            }

            /// Reads every member; members newer than `acting_version` are reset to null.
            ///
            /// # Errors
            ///
            /// Returns an error if the source runs out.
            #[allow(unused_variables)]
            pub fn decode<R: ::std::io::Read + ?Sized>(
                &mut self,
                r: &mut R,
                acting_version: u16,
            ) -> #rt::SbeResult<()> {
                #(#decodes)*
                Ok(())
            }

            /// Validates every member present in `acting_version`.
            ///
            /// # Errors
            ///
            /// Returns the first range or encoding violation.
            #[allow(unused_variables)]
            pub fn range_check(&self, acting_version: u16, schema_version: u16) -> #rt::SbeResult<()> {
                #(#range_checks)*
                Ok(())
            }

            #(#metadata)*
        }
    };

    Ok(Unit {
        name: names::type_name(&c.name),
        tokens,
    })
}

/// Member fragments regrouped by where they land in the generated item.
#[derive(Debug, Default)]
pub(crate) struct MemberTokens {
    pub fields: Vec<TokenStream>,
    pub defaults: Vec<TokenStream>,
    pub nulls: Vec<TokenStream>,
    pub constants: Vec<TokenStream>,
    pub encodes: Vec<TokenStream>,
    pub decodes: Vec<TokenStream>,
    pub range_checks: Vec<TokenStream>,
    pub metadata: Vec<TokenStream>,
}

impl MemberTokens {
    pub fn collect(code: Vec<MemberCode>) -> Self {
        let mut tokens = Self::default();
        for member in code {
            tokens.fields.push(member.field);
            tokens.defaults.push(member.default);
            tokens.nulls.push(member.null);
            tokens.constants.push(member.constant);
            tokens.encodes.push(member.encode);
            tokens.decodes.push(member.decode);
            tokens.range_checks.push(member.range_check);
            tokens.metadata.push(member.metadata);
        }
        tokens
    }
}

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

//! Message and repeating group emission.
//!
//! A message and each of its group elements share the same block shape: fixed fields (with
//! padding and trailing padding up to the block length), then groups, then var-data. Group
//! element structs are named after their parent, so `NewOrder` with group `legs` produces
//! `NewOrderLegs`.

use nautilus_sbe::CountWidth;
use proc_macro2::{Ident, Literal, TokenStream};
use quote::quote;

use super::{
    Emitter, Unit,
    composites::MemberTokens,
    members::{Owner, emit_member, encoding_tokens},
    names::{self, NameRegistry},
    primitives::{read_expr, rust_type, write_stmt},
};
use crate::{
    error::{CodegenError, CodegenResult},
    layout::{dimension_shape, resolve_fields, var_data_shape},
    schema::ir::{Body, Group, Message},
};

/// Generated fragments for the body of a message or group element.
struct BlockCode {
    members: MemberTokens,
    block_length: u16,
    trailing_padding: usize,
    tail_fields: Vec<TokenStream>,
    tail_defaults: Vec<TokenStream>,
    tail_encodes: Vec<TokenStream>,
    tail_decodes: Vec<TokenStream>,
    tail_range_checks: Vec<TokenStream>,
    tail_metadata: Vec<TokenStream>,
    /// Group element structs, innermost last.
    nested: TokenStream,
}

impl BlockCode {
    fn encode_body(&self) -> TokenStream {
        let encodes = &self.members.encodes;
        let tail = &self.tail_encodes;
        let trailing = if self.trailing_padding > 0 {
            let padding = Literal::usize_unsuffixed(self.trailing_padding);
            quote!(w.write_padding(#padding)?;)
        } else {
            TokenStream::new()
        };
        quote! {
            #(#encodes)*
            #trailing
            #(#tail)*
        }
    }

    fn decode_body(&self) -> TokenStream {
        let decodes = &self.members.decodes;
        let tail = &self.tail_decodes;
        let trailing = if self.trailing_padding > 0 {
            let padding = Literal::usize_unsuffixed(self.trailing_padding);
            quote! {
                if block_length >= Self::SBE_BLOCK_LENGTH {
                    r.skip_bytes(#padding)?;
                }
            }
        } else {
            TokenStream::new()
        };
        quote! {
            #(#decodes)*
            #trailing
            if acting_version > Self::SBE_SCHEMA_VERSION && block_length > Self::SBE_BLOCK_LENGTH {
                r.skip_bytes(usize::from(block_length - Self::SBE_BLOCK_LENGTH))?;
            }
            #(#tail)*
        }
    }

    fn range_check_body(&self) -> TokenStream {
        let checks = &self.members.range_checks;
        let tail = &self.tail_range_checks;
        quote! {
            #(#checks)*
            #(#tail)*
        }
    }

    fn struct_fields(&self) -> TokenStream {
        let fields = &self.members.fields;
        let tail = &self.tail_fields;
        quote! {
            #(#fields)*
            #(#tail)*
        }
    }

    fn defaults(&self) -> TokenStream {
        let defaults = &self.members.defaults;
        let tail = &self.tail_defaults;
        quote! {
            #(#defaults)*
            #(#tail)*
        }
    }

    fn associated(&self) -> TokenStream {
        let constants = &self.members.constants;
        let metadata = &self.members.metadata;
        let tail = &self.tail_metadata;
        quote! {
            #(#constants)*
            #(#metadata)*
            #(#tail)*
        }
    }
}

fn version_guarded(since: u16, present: TokenStream, absent: TokenStream) -> TokenStream {
    if since == 0 {
        return present;
    }
    let since = Literal::u16_unsuffixed(since);
    if absent.is_empty() {
        quote! {
            if acting_version >= #since {
                #present
            }
        }
    } else {
        quote! {
            if acting_version >= #since {
                #present
            } else {
                #absent
            }
        }
    }
}

fn emit_block(
    emitter: &Emitter<'_>,
    body: &Body,
    declared_block_length: Option<u16>,
    element: &str,
    type_name: &str,
    reserved: &[&str],
    types: &mut NameRegistry,
) -> CodegenResult<BlockCode> {
    let schema = emitter.schema;
    let rt = &emitter.rt;
    let mut fields = NameRegistry::new(element);
    let mut items = NameRegistry::new(element);
    for name in reserved {
        items.claim(name, "the generated codec API")?;
    }

    let (resolved, layout) = resolve_fields(schema, &body.fields, declared_block_length, element)?;
    let block_length = u16::try_from(layout.block_length).map_err(|_| {
        CodegenError::schema(
            element,
            format!("block length {} exceeds {}", layout.block_length, u16::MAX),
        )
    })?;

    let mut code = Vec::with_capacity(resolved.len());
    for member in &resolved {
        code.push(emit_member(emitter, member, Owner::Block, &mut fields, &mut items)?);
    }

    let mut block = BlockCode {
        members: MemberTokens::collect(code),
        block_length,
        trailing_padding: layout.trailing_padding(),
        tail_fields: Vec::new(),
        tail_defaults: Vec::new(),
        tail_encodes: Vec::new(),
        tail_decodes: Vec::new(),
        tail_range_checks: Vec::new(),
        tail_metadata: Vec::new(),
        nested: TokenStream::new(),
    };

    for group in &body.groups {
        let path = format!("{element} > group '{}'", group.name);
        let snake = names::member_name(&group.name);
        let ident = fields.claim(&snake, &path)?;
        let elem_name = format!("{type_name}{}", names::type_name(&group.name));
        let elem = emit_group(emitter, group, &path, &elem_name, types)?;
        block.nested.extend(elem);
        let elem_ty = names::ident(&elem_name);

        let dimension = dimension_shape(schema, &group.dimension_type, &path)?;
        let width = count_width(rt, dimension.width);
        let encode_max = Literal::u64_unsuffixed(u64::from(dimension.max_count));
        let decode_max =
            Literal::u32_unsuffixed(dimension.max_count.min(emitter.config.max_group_count));
        let label = group.name.as_str();
        let doc = emitter.doc(&group.description);

        block.tail_fields.push(quote! {
            #doc
            pub #ident: Vec<#elem_ty>,
        });
        block.tail_defaults.push(quote!(#ident: Vec::new(),));
        block.tail_encodes.push(quote! {
            let count = #rt::checked_length::<u32>(#label, self.#ident.len(), #encode_max)?;
            #rt::GroupHeader::new(#elem_ty::SBE_BLOCK_LENGTH, count).encode(w, #width)?;
            for element in &self.#ident {
                element.encode(w)?;
            }
        });

        let since = group.versioning.since_version;
        block.tail_decodes.push(version_guarded(
            since,
            quote! {
                let header = #rt::GroupHeader::decode(r, #width)?;
                #rt::prepare_group(#label, &mut self.#ident, header.num_in_group, #decode_max)?;
                for element in &mut self.#ident {
                    element.decode(r, acting_version, header.block_length)?;
                }
            },
            quote!(self.#ident.clear();),
        ));
        block.tail_range_checks.push(version_guarded(
            since,
            quote! {
                for element in &self.#ident {
                    element.range_check(acting_version, schema_version)?;
                }
            },
            TokenStream::new(),
        ));

        if emitter.config.emit_metadata {
            block.tail_metadata.push(tail_metadata(
                &mut items, &group.name, &path, group.id, since, group.versioning.deprecated, None,
            )?);
        }
    }

    for data in &body.data {
        let path = format!("{element} > data '{}'", data.name);
        let snake = names::member_name(&data.name);
        let ident = fields.claim(&snake, &path)?;
        let shape = var_data_shape(schema, &data.type_name, &path)?;
        let length_ty = rust_type(shape.length.primitive);
        let max = Literal::u64_unsuffixed(shape.max_length);
        let write_length = write_stmt(shape.length.primitive, &quote!(length));
        let read_length = read_expr(shape.length.primitive);
        let label = data.name.as_str();
        let doc = emitter.doc(&data.description);

        block.tail_fields.push(quote! {
            #doc
            pub #ident: Vec<u8>,
        });
        block.tail_defaults.push(quote!(#ident: Vec::new(),));
        block.tail_encodes.push(quote! {
            let length = #rt::checked_length::<#length_ty>(#label, self.#ident.len(), #max)?;
            #write_length
            w.write_bytes(&self.#ident)?;
        });

        let since = data.versioning.since_version;
        block.tail_decodes.push(version_guarded(
            since,
            quote! {
                let length = #read_length;
                r.read_var_bytes(&mut self.#ident, length as usize)?;
            },
            quote!(self.#ident.clear();),
        ));

        let encoding = if shape.is_text() {
            shape.data.encoding()
        } else {
            None
        };
        if let Some(encoding) = encoding.as_ref().and_then(|e| encoding_tokens(rt, e)) {
            block.tail_range_checks.push(version_guarded(
                since,
                quote!(#encoding.validate(#label, &self.#ident)?;),
                TokenStream::new(),
            ));
        }

        if emitter.config.emit_metadata {
            let header_length = Literal::usize_unsuffixed(shape.width.size());
            let mut tokens = tail_metadata(
                &mut items,
                &data.name,
                &path,
                data.id,
                since,
                data.versioning.deprecated,
                encoding.as_ref().map(|e| e.name().to_string()),
            )?;
            let name = items.claim(&names::accessor_name(&data.name, "header_length"), &path)?;
            tokens.extend(quote! {
                #[must_use]
                pub const fn #name() -> usize {
                    #header_length
                }
            });
            block.tail_metadata.push(tokens);
        }
    }

    Ok(block)
}

fn count_width(rt: &syn::Path, width: CountWidth) -> TokenStream {
    match width {
        CountWidth::U8 => quote!(#rt::CountWidth::U8),
        CountWidth::U16 => quote!(#rt::CountWidth::U16),
        CountWidth::U32 => quote!(#rt::CountWidth::U32),
    }
}

fn tail_metadata(
    items: &mut NameRegistry,
    name: &str,
    element: &str,
    id: u16,
    since: u16,
    deprecated: u16,
    character_encoding: Option<String>,
) -> CodegenResult<TokenStream> {
    let id_name = items.claim(&names::accessor_name(name, "id"), element)?;
    let since_name = items.claim(&names::accessor_name(name, "since_version"), element)?;
    let in_acting_name = items.claim(&names::accessor_name(name, "in_acting_version"), element)?;
    let deprecated_name = items.claim(&names::accessor_name(name, "deprecated"), element)?;
    let id = Literal::u16_unsuffixed(id);
    let since = Literal::u16_unsuffixed(since);
    let deprecated = Literal::u16_unsuffixed(deprecated);

    let mut tokens = quote! {
        #[must_use]
        pub const fn #id_name() -> u16 {
            #id
        }

        #[must_use]
        pub const fn #since_name() -> u16 {
            #since
        }

        #[must_use]
        pub const fn #in_acting_name(acting_version: u16) -> bool {
            acting_version >= Self::#since_name()
        }

        #[must_use]
        pub const fn #deprecated_name() -> u16 {
            #deprecated
        }
    };

    if let Some(encoding) = character_encoding {
        let encoding_name =
            items.claim(&names::accessor_name(name, "character_encoding"), element)?;
        tokens.extend(quote! {
            #[must_use]
            pub const fn #encoding_name() -> &'static str {
                #encoding
            }
        });
    }
    Ok(tokens)
}

fn emit_group(
    emitter: &Emitter<'_>,
    group: &Group,
    element: &str,
    elem_name: &str,
    types: &mut NameRegistry,
) -> CodegenResult<TokenStream> {
    let rt = &emitter.rt;
    let name: Ident = types.claim(elem_name, element)?;
    let block = emit_block(
        emitter,
        &group.body,
        group.block_length,
        element,
        elem_name,
        &["SBE_BLOCK_LENGTH", "SBE_SCHEMA_VERSION", "encode", "decode", "range_check"],
        types,
    )?;

    let doc = emitter.doc(&group.description);
    let block_length = Literal::u16_unsuffixed(block.block_length);
    let schema_version = Literal::u16_unsuffixed(emitter.schema.version);
    let fields = block.struct_fields();
    let defaults = block.defaults();
    let associated = block.associated();
    let encode = block.encode_body();
    let decode = block.decode_body();
    let range_check = block.range_check_body();
    let nested = &block.nested;

    Ok(quote! {
        #doc
        #[derive(Debug, Clone, PartialEq)]
        pub struct #name {
            #fields
        }

        impl Default for #name {
            fn default() -> Self {
                Self {
                    #defaults
                }
            }
        }

        impl #name {
            pub const SBE_BLOCK_LENGTH: u16 = #block_length;
            pub const SBE_SCHEMA_VERSION: u16 = #schema_version;

            /// Writes the element's fixed block, nested groups and var-data.
            ///
            /// # Errors
            ///
            /// Returns an error if the sink fails or a collection is too long for its prefix.
            pub fn encode<W: ::std::io::Write + ?Sized>(&self, w: &mut W) -> #rt::SbeResult<()> {
                #encode
                Ok(())
            }

            /// Reads one element written with `block_length` bytes of fixed fields.
            ///
            /// # Errors
            ///
            /// Returns an error if the source runs out or a nested group is too large.
            #[allow(unused_variables)]
            pub fn decode<R: ::std::io::Read + ?Sized>(
                &mut self,
                r: &mut R,
                acting_version: u16,
                block_length: u16,
            ) -> #rt::SbeResult<()> {
                #decode
                Ok(())
            }

            /// Validates every field present in `acting_version`.
            ///
            /// # Errors
            ///
            /// Returns the first range, encoding or unknown enumerant violation.
            #[allow(unused_variables)]
            pub fn range_check(&self, acting_version: u16, schema_version: u16) -> #rt::SbeResult<()> {
                #range_check
                Ok(())
            }

            #associated
        }

        #nested
    })
}

pub(crate) fn emit_message(
    emitter: &Emitter<'_>,
    message: &Message,
    types: &mut NameRegistry,
) -> CodegenResult<Unit> {
    let rt = &emitter.rt;
    let element = format!("message '{}'", message.name);
    let type_name = names::type_name(&message.name);
    let name = types.claim(&type_name, &element)?;
    let block = emit_block(
        emitter,
        &message.body,
        message.block_length,
        &element,
        &type_name,
        &[
            "SBE_BLOCK_LENGTH",
            "SBE_TEMPLATE_ID",
            "SBE_SCHEMA_ID",
            "SBE_SCHEMA_VERSION",
            "SBE_SEMANTIC_TYPE",
            "SBE_SEMANTIC_VERSION",
            "encode",
            "decode",
            "range_check",
        ],
        types,
    )?;

    let schema = emitter.schema;
    let doc = emitter.doc(&message.description);
    let message_name = &message.name;
    let block_length = Literal::u16_unsuffixed(block.block_length);
    let template_id = Literal::u16_unsuffixed(message.id);
    let schema_id = Literal::u16_unsuffixed(schema.id);
    let schema_version = Literal::u16_unsuffixed(schema.version);
    let semantic_type = &message.semantic_type;
    let semantic_version = &schema.semantic_version;
    let fields = block.struct_fields();
    let defaults = block.defaults();
    let associated = block.associated();
    let encode = block.encode_body();
    let decode = block.decode_body();
    let range_check = block.range_check_body();
    let nested = &block.nested;

    let tokens = quote! {
        #doc
        #[derive(Debug, Clone, PartialEq)]
        pub struct #name {
            #fields
        }

        impl Default for #name {
            fn default() -> Self {
                Self {
                    #defaults
                }
            }
        }

        impl #name {
            pub const SBE_BLOCK_LENGTH: u16 = #block_length;
            pub const SBE_TEMPLATE_ID: u16 = #template_id;
            pub const SBE_SCHEMA_ID: u16 = #schema_id;
            pub const SBE_SCHEMA_VERSION: u16 = #schema_version;
            pub const SBE_SEMANTIC_TYPE: &'static str = #semantic_type;
            pub const SBE_SEMANTIC_VERSION: &'static str = #semantic_version;

            /// Writes the message body: fixed block, groups, then var-data.
            ///
            /// With `do_range_check` the whole message is validated before any byte is written.
            ///
            /// # Errors
            ///
            /// Returns a validation error, a length overflow, or an error from the sink.
            pub fn encode<W: ::std::io::Write + ?Sized>(
                &self,
                w: &mut W,
                do_range_check: bool,
            ) -> #rt::SbeResult<()> {
                if do_range_check {
                    self.range_check(Self::SBE_SCHEMA_VERSION, Self::SBE_SCHEMA_VERSION)?;
                }
                #encode
                Ok(())
            }

            /// Reads a message body written at `acting_version` with a fixed block of
            /// `block_length` bytes, reusing the buffers of `self`.
            ///
            /// # Errors
            ///
            /// Returns an error if the source runs out, a group is too large, or (with
            /// `do_range_check`) a value is outside its domain.
            #[allow(unused_variables)]
            pub fn decode<R: ::std::io::Read + ?Sized>(
                &mut self,
                r: &mut R,
                acting_version: u16,
                block_length: u16,
                do_range_check: bool,
            ) -> #rt::SbeResult<()> {
                #decode
                if do_range_check {
                    self.range_check(acting_version, Self::SBE_SCHEMA_VERSION)?;
                }
                Ok(())
            }

            /// Validates every field present in `acting_version`.
            ///
            /// # Errors
            ///
            /// Returns the first range, encoding or unknown enumerant violation.
            #[allow(unused_variables)]
            pub fn range_check(&self, acting_version: u16, schema_version: u16) -> #rt::SbeResult<()> {
                #range_check
                Ok(())
            }

            #associated
        }

        impl #rt::SbeMessage for #name {
            const NAME: &'static str = #message_name;
            const TEMPLATE_ID: u16 = Self::SBE_TEMPLATE_ID;
            const SCHEMA_ID: u16 = Self::SBE_SCHEMA_ID;
            const SCHEMA_VERSION: u16 = Self::SBE_SCHEMA_VERSION;
            const BLOCK_LENGTH: u16 = Self::SBE_BLOCK_LENGTH;
            const SEMANTIC_TYPE: &'static str = Self::SBE_SEMANTIC_TYPE;
            const SEMANTIC_VERSION: &'static str = Self::SBE_SEMANTIC_VERSION;

            fn encode<W: ::std::io::Write + ?Sized>(
                &self,
                w: &mut W,
                do_range_check: bool,
            ) -> #rt::SbeResult<()> {
                Self::encode(self, w, do_range_check)
            }

            fn decode<R: ::std::io::Read + ?Sized>(
                &mut self,
                r: &mut R,
                acting_version: u16,
                block_length: u16,
                do_range_check: bool,
            ) -> #rt::SbeResult<()> {
                Self::decode(self, r, acting_version, block_length, do_range_check)
            }

            fn range_check(&self, acting_version: u16, schema_version: u16) -> #rt::SbeResult<()> {
                Self::range_check(self, acting_version, schema_version)
            }
        }

        #nested
    };

    Ok(Unit {
        name: type_name,
        tokens,
    })
}

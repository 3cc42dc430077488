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

//! Code for one fixed-block member, shared by composites, messages and group elements.

use nautilus_sbe::{CharacterEncoding, PrimitiveType};
use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{
    Emitter,
    names::{self, NameRegistry},
    primitives::{read_expr, rust_type, value_literal, write_stmt, zero},
};
use crate::{
    error::{CodegenError, CodegenResult},
    layout::{ConstantValue, ResolvedMember},
    schema::{
        ir::{EncodedType, Presence, ResolvedType},
        validate::enum_value,
    },
};

/// Where a member lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    /// Member of a composite: always on the wire, nulled after decode when version-absent.
    Composite,
    /// Field of a message or group element: not on the wire when version-absent.
    Block,
}

/// Generated fragments for one member.
#[derive(Debug, Default)]
pub(crate) struct MemberCode {
    pub field: TokenStream,
    pub default: TokenStream,
    pub null: TokenStream,
    pub constant: TokenStream,
    pub encode: TokenStream,
    pub decode: TokenStream,
    pub range_check: TokenStream,
    pub metadata: TokenStream,
}

/// Shape of the value a member holds.
#[derive(Clone, Copy)]
enum Shape<'a> {
    Scalar(&'a EncodedType),
    Array(&'a EncodedType),
    Named(ResolvedType<'a>),
}

impl<'a> Shape<'a> {
    fn of(member: &ResolvedMember<'a>) -> Self {
        match member.kind {
            ResolvedType::Encoded(t) if t.is_array() => Self::Array(t),
            ResolvedType::Encoded(t) => Self::Scalar(t),
            other => Self::Named(other),
        }
    }
}

fn named_type(kind: ResolvedType<'_>) -> TokenStream {
    let name = match kind {
        ResolvedType::Encoded(t) => return rust_type(t.primitive),
        ResolvedType::Composite(c) => &c.name,
        ResolvedType::Enum(e) => &e.name,
        ResolvedType::Set(s) => &s.name,
    };
    let ty = names::ident(&names::type_name(name));
    quote!(#ty)
}

/// Tokens naming the runtime character encoding, or `None` when it is not checked.
pub(crate) fn encoding_tokens(rt: &syn::Path, encoding: &CharacterEncoding) -> Option<TokenStream> {
    match encoding {
        CharacterEncoding::Utf8 => Some(quote!(#rt::CharacterEncoding::Utf8)),
        CharacterEncoding::UsAscii => Some(quote!(#rt::CharacterEncoding::UsAscii)),
        CharacterEncoding::Other(_) => None,
    }
}

fn is_byte_array(t: &EncodedType) -> bool {
    matches!(t.primitive, PrimitiveType::Char | PrimitiveType::UInt8)
}

fn shape_type(shape: Shape<'_>) -> TokenStream {
    match shape {
        Shape::Scalar(t) => rust_type(t.primitive),
        Shape::Array(t) => {
            let ty = rust_type(t.primitive);
            let len = Literal::usize_unsuffixed(t.length);
            quote!([#ty; #len])
        }
        Shape::Named(kind) => named_type(kind),
    }
}

fn null_expr(shape: Shape<'_>) -> CodegenResult<TokenStream> {
    Ok(match shape {
        Shape::Scalar(t) => value_literal(t.primitive, t.null()?),
        Shape::Array(t) => {
            let null = value_literal(t.primitive, t.null()?);
            let len = Literal::usize_unsuffixed(t.length);
            quote!([#null; #len])
        }
        Shape::Named(kind) => {
            let ty = named_type(kind);
            match kind {
                ResolvedType::Enum(_) => quote!(#ty::NullVal),
                ResolvedType::Set(_) => quote!(#ty::new(0)),
                _ => quote!(#ty::null()),
            }
        }
    })
}

fn default_expr(shape: Shape<'_>, presence: Presence) -> CodegenResult<TokenStream> {
    if presence == Presence::Optional {
        return null_expr(shape);
    }
    Ok(match shape {
        Shape::Scalar(t) => zero(t.primitive),
        Shape::Array(t) => {
            let zero = zero(t.primitive);
            let len = Literal::usize_unsuffixed(t.length);
            quote!([#zero; #len])
        }
        Shape::Named(ResolvedType::Composite(c)) => {
            let ty = names::ident(&names::type_name(&c.name));
            quote!(#ty::default())
        }
        Shape::Named(_) => null_expr(shape)?,
    })
}

fn encode_stmt(shape: Shape<'_>, field: &TokenStream) -> TokenStream {
    match shape {
        Shape::Scalar(t) => write_stmt(t.primitive, &quote!(self.#field)),
        Shape::Array(t) if is_byte_array(t) => quote!(w.write_bytes(&self.#field)?;),
        Shape::Array(t) => {
            let write = write_stmt(t.primitive, &quote!(*value));
            quote! {
                for value in &self.#field {
                    #write
                }
            }
        }
        Shape::Named(_) => quote!(self.#field.encode(w)?;),
    }
}

fn decode_stmt(shape: Shape<'_>, field: &TokenStream) -> TokenStream {
    match shape {
        Shape::Scalar(t) => {
            let read = read_expr(t.primitive);
            quote!(self.#field = #read;)
        }
        Shape::Array(t) if is_byte_array(t) => quote!(r.read_bytes_into(&mut self.#field)?;),
        Shape::Array(t) => {
            let read = read_expr(t.primitive);
            quote! {
                for value in &mut self.#field {
                    *value = #read;
                }
            }
        }
        Shape::Named(ResolvedType::Composite(_)) => {
            quote!(self.#field.decode(r, acting_version)?;)
        }
        Shape::Named(kind) => {
            let ty = named_type(kind);
            quote!(self.#field = #ty::decode(r)?;)
        }
    }
}

fn range_check_stmt(
    emitter: &Emitter<'_>,
    shape: Shape<'_>,
    presence: Presence,
    field: &TokenStream,
    label: &str,
) -> CodegenResult<TokenStream> {
    let rt = &emitter.rt;
    let scalar_check = |t: &EncodedType, value: TokenStream| -> CodegenResult<TokenStream> {
        let min = value_literal(t.primitive, t.min()?);
        let max = value_literal(t.primitive, t.max()?);
        Ok(if presence == Presence::Optional {
            let null = value_literal(t.primitive, t.null()?);
            quote!(#rt::check_optional_range(#label, #value, #null, #min, #max)?;)
        } else {
            quote!(#rt::check_range(#label, #value, #min, #max)?;)
        })
    };

    match shape {
        Shape::Scalar(t) => scalar_check(t, quote!(self.#field)),
        Shape::Array(t) if is_byte_array(t) => {
            let encoding = t.encoding().and_then(|e| encoding_tokens(rt, &e));
            Ok(match encoding {
                Some(encoding) => quote!(#encoding.validate_fixed(#label, &self.#field)?;),
                None => TokenStream::new(),
            })
        }
        Shape::Array(t) => {
            let check = scalar_check(t, quote!(*value))?;
            Ok(quote! {
                for value in &self.#field {
                    #check
                }
            })
        }
        Shape::Named(_) => Ok(quote!(self.#field.range_check(acting_version, schema_version)?;)),
    }
}

fn constant_item(
    member: &ResolvedMember<'_>,
    constant: ConstantValue<'_>,
    name: &proc_macro2::Ident,
) -> CodegenResult<TokenStream> {
    let invalid = |reason: String| CodegenError::schema(&member.element, reason);
    match (constant, member.kind) {
        (ConstantValue::Literal(text), ResolvedType::Encoded(t))
            if t.primitive == PrimitiveType::Char && text.len() != 1 =>
        {
            let mut bytes = text.as_bytes().to_vec();
            bytes.resize(t.length.max(bytes.len()), 0);
            let len = Literal::usize_unsuffixed(bytes.len());
            let value = Literal::byte_string(&bytes);
            Ok(quote!(pub const #name: [u8; #len] = *#value;))
        }
        (ConstantValue::Literal(text), ResolvedType::Encoded(t)) => {
            let ty = rust_type(t.primitive);
            let value = t
                .primitive
                .parse_value(text)
                .map_err(|e| invalid(format!("invalid constant value: {e}")))?;
            let value = value_literal(t.primitive, value);
            Ok(quote!(pub const #name: #ty = #value;))
        }
        (ConstantValue::EnumValue(e, v), ResolvedType::Enum(_)) => {
            let ty = names::ident(&names::type_name(&e.name));
            let variant = names::ident(&names::variant_name(&v.name));
            Ok(quote!(pub const #name: #ty = #ty::#variant;))
        }
        (ConstantValue::EnumValue(_, v), ResolvedType::Encoded(t)) => {
            let raw = enum_value(t.primitive, &v.value).map_err(invalid)?;
            let ty = rust_type(t.primitive);
            let value = value_literal(t.primitive, raw);
            Ok(quote!(pub const #name: #ty = #value;))
        }
        _ => Err(invalid("unsupported constant".to_string())),
    }
}

/// Emits the fragments of one member.
///
/// # Errors
///
/// Returns an error on identifier collisions or unrepresentable values.
pub(crate) fn emit_member(
    emitter: &Emitter<'_>,
    member: &ResolvedMember<'_>,
    owner: Owner,
    fields: &mut NameRegistry,
    items: &mut NameRegistry,
) -> CodegenResult<MemberCode> {
    let snake = names::member_name(member.name);
    let label = member.name;
    let mut code = MemberCode::default();

    if let Some(constant) = member.constant {
        let name = items.claim(&names::const_name(member.name), &member.element)?;
        let doc = emitter.doc(member.description);
        let item = constant_item(member, constant, &name)?;
        code.constant = quote! {
            #doc
            #item
        };
    } else {
        let shape = Shape::of(member);
        let ident = fields.claim(&snake, &member.element)?;
        let field = quote!(#ident);
        let ty = shape_type(shape);
        let doc = emitter.doc(member.description);
        let null = null_expr(shape)?;
        let default = default_expr(shape, member.presence)?;

        code.field = quote! {
            #doc
            pub #ident: #ty,
        };
        code.default = quote!(#ident: #default,);
        code.null = quote!(#ident: #null,);

        let padding = member.slot.padding;
        let (write_padding, skip_padding) = if padding > 0 {
            let padding = Literal::usize_unsuffixed(padding);
            (
                quote!(w.write_padding(#padding)?;),
                quote!(r.skip_bytes(#padding)?;),
            )
        } else {
            (TokenStream::new(), TokenStream::new())
        };

        let encode = encode_stmt(shape, &field);
        code.encode = quote! {
            #write_padding
            #encode
        };

        let since = member.versioning.since_version;
        let since_lit = Literal::u16_unsuffixed(since);
        let decode = decode_stmt(shape, &field);
        code.decode = match (owner, since) {
            (_, 0) => quote! {
                #skip_padding
                #decode
            },
            (Owner::Composite, _) => quote! {
                #skip_padding
                #decode
                if acting_version < #since_lit {
                    self.#ident = #null;
                }
            },
            (Owner::Block, _) => quote! {
                if acting_version >= #since_lit {
                    #skip_padding
                    #decode
                } else {
                    self.#ident = #null;
                }
            },
        };

        let check = range_check_stmt(emitter, shape, member.presence, &field, label)?;
        code.range_check = if since > 0 && !check.is_empty() {
            quote! {
                if acting_version >= #since_lit {
                    #check
                }
            }
        } else {
            check
        };
    }

    if emitter.config.emit_metadata {
        code.metadata = metadata(emitter, member, owner, items)?;
    }
    Ok(code)
}

fn metadata(
    emitter: &Emitter<'_>,
    member: &ResolvedMember<'_>,
    owner: Owner,
    items: &mut NameRegistry,
) -> CodegenResult<TokenStream> {
    let rt = &emitter.rt;
    let mut claim =
        |suffix: &str| items.claim(&names::accessor_name(member.name, suffix), &member.element);
    let mut tokens = TokenStream::new();

    if let (Owner::Block, Some(id)) = (owner, member.id) {
        let name = claim("id")?;
        let id = Literal::u16_unsuffixed(id);
        tokens.extend(quote! {
            #[must_use]
            pub const fn #name() -> u16 {
                #id
            }
        });
    }

    let since = Literal::u16_unsuffixed(member.versioning.since_version);
    let deprecated = Literal::u16_unsuffixed(member.versioning.deprecated);
    let offset = Literal::usize_unsuffixed(member.slot.offset);
    let since_name = claim("since_version")?;
    let in_acting_name = claim("in_acting_version")?;
    let deprecated_name = claim("deprecated")?;
    let offset_name = claim("encoding_offset")?;
    tokens.extend(quote! {
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

        #[must_use]
        pub const fn #offset_name() -> usize {
            #offset
        }
    });

    if owner == Owner::Block {
        let name = claim("meta_attribute")?;
        let epoch = member.epoch;
        let time_unit = member.time_unit;
        let semantic_type = member.semantic_type;
        let presence = member.presence.as_str();
        tokens.extend(quote! {
            #[must_use]
            pub const fn #name(meta: #rt::MetaAttribute) -> &'static str {
                match meta {
                    #rt::MetaAttribute::Epoch => #epoch,
                    #rt::MetaAttribute::TimeUnit => #time_unit,
                    #rt::MetaAttribute::SemanticType => #semantic_type,
                    #rt::MetaAttribute::Presence => #presence,
                }
            }
        });
    }

    if let ResolvedType::Encoded(t) = member.kind
        && member.constant.is_none()
    {
        let ty = rust_type(t.primitive);
        let min = value_literal(t.primitive, t.min()?);
        let max = value_literal(t.primitive, t.max()?);
        let null = value_literal(t.primitive, t.null()?);
        let min_name = claim("min_value")?;
        let max_name = claim("max_value")?;
        let null_name = claim("null_value")?;
        tokens.extend(quote! {
            #[must_use]
            pub const fn #min_name() -> #ty {
                #min
            }

            #[must_use]
            pub const fn #max_name() -> #ty {
                #max
            }

            #[must_use]
            pub const fn #null_name() -> #ty {
                #null
            }
        });

        if let Some(encoding) = t.encoding() {
            let name = claim("character_encoding")?;
            let encoding = encoding.name().to_string();
            tokens.extend(quote! {
                #[must_use]
                pub const fn #name() -> &'static str {
                    #encoding
                }
            });
        }
    }

    Ok(tokens)
}

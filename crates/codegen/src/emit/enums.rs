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

//! Enum emission.
//!
//! Each schema enum becomes a Rust enum with one variant per valid value, a `NullVal` variant
//! for the null sentinel and an `Unknown(raw)` variant that keeps values added by newer schema
//! versions.

use proc_macro2::Literal;
use quote::quote;

use super::{
    Emitter, Unit,
    names::{self, NameRegistry},
    primitives::{read_expr, rust_type, value_literal, write_stmt},
};
use crate::{
    error::{CodegenError, CodegenResult},
    schema::{ir::EnumDef, validate::enum_value},
};

pub(crate) fn emit_enum(
    emitter: &Emitter<'_>,
    e: &EnumDef,
    types: &mut NameRegistry,
) -> CodegenResult<Unit> {
    let rt = &emitter.rt;
    let element = format!("enum '{}'", e.name);
    let name = types.claim(&names::type_name(&e.name), &element)?;
    let (primitive, null) = e.null(emitter.schema)?;
    let raw_ty = rust_type(primitive);
    let null = value_literal(primitive, null);
    let encoded_length = Literal::usize_unsuffixed(primitive.size());
    let doc = emitter.doc(&e.description);
    let enum_name = &e.name;

    let mut variants = NameRegistry::new(&element);
    let mut idents = Vec::with_capacity(e.values.len());
    let mut raws = Vec::with_capacity(e.values.len());
    let mut labels = Vec::with_capacity(e.values.len());
    let mut docs = Vec::with_capacity(e.values.len());

    for value in &e.values {
        let path = format!("{element} > validValue '{}'", value.name);
        idents.push(variants.claim(&names::variant_name(&value.name), &path)?);
        let raw = enum_value(primitive, &value.value)
            .map_err(|reason| CodegenError::schema(&path, reason))?;
        raws.push(value_literal(primitive, raw));
        labels.push(value.name.as_str());
        docs.push(emitter.doc(&value.description));
    }

    let count = Literal::usize_unsuffixed(idents.len());
    let read = read_expr(primitive);
    let write = write_stmt(primitive, &quote!(self.raw()));

    let tokens = quote! {
        #doc
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum #name {
            #(
                #docs
                #idents,
            )*
            /// The null sentinel.
            #[default]
            NullVal,
            /// A value not declared in this schema version.
            Unknown(#raw_ty),
        }

        impl #name {
            pub const ENCODED_LENGTH: usize = #encoded_length;
            pub const NULL_VALUE: #raw_ty = #null;
            /// Every declared value, in schema order.
            pub const VALUES: [Self; #count] = [#(Self::#idents),*];

            /// Maps a wire value to its variant.
            #[must_use]
            pub const fn from_raw(raw: #raw_ty) -> Self {
                match raw {
                    #(#raws => Self::#idents,)*
                    #null => Self::NullVal,
                    other => Self::Unknown(other),
                }
            }

            /// Returns the wire value.
            #[must_use]
            pub const fn raw(self) -> #raw_ty {
                match self {
                    #(Self::#idents => #raws,)*
                    Self::NullVal => #null,
                    Self::Unknown(raw) => raw,
                }
            }

            /// Returns `true` for declared values.
            #[must_use]
            pub const fn is_known(self) -> bool {
                !matches!(self, Self::NullVal | Self::Unknown(_))
            }

            /// Returns the schema name of the value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    #(Self::#idents => #labels,)*
                    Self::NullVal => "NullVal",
                    Self::Unknown(_) => "Unknown",
                }
            }

            /// Writes the wire value.
            ///
            /// # Errors
            ///
            /// Returns an error if the sink fails.
            pub fn encode<W: ::std::io::Write + ?Sized>(self, w: &mut W) -> #rt::SbeResult<()> {
                #write
                Ok(())
            }

            /// Reads a wire value; undeclared values decode to `Unknown`.
            ///
            /// # Errors
            ///
            /// Returns an error if the source runs out.
            pub fn decode<R: ::std::io::Read + ?Sized>(r: &mut R) -> #rt::SbeResult<Self> {
                Ok(Self::from_raw(#read))
            }

            /// Accepts declared values and null; unknown values are accepted only when the
            /// sender uses a newer schema.
            ///
            /// # Errors
            ///
            /// Returns `UnknownEnumValue` for an undeclared value.
            pub fn range_check(self, acting_version: u16, schema_version: u16) -> #rt::SbeResult<()> {
                match self {
                    Self::Unknown(raw) if acting_version <= schema_version => {
                        Err(#rt::SbeError::UnknownEnumValue {
                            enum_name: #enum_name.to_string(),
                            value: raw.to_string(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };

    Ok(Unit {
        name: names::type_name(&e.name),
        tokens,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        config::CodegenConfig,
        emit::stubs::{pretty, types_schema},
        schema::ir::TypeDef,
    };

    fn emit(types: &str, name: &str) -> CodegenResult<String> {
        let schema = types_schema(types);
        let config = CodegenConfig::default();
        let emitter = Emitter {
            schema: &schema,
            config: &config,
            rt: config.runtime_path()?,
        };
        let Some(TypeDef::Enum(e)) = schema.types.get(name) else {
            panic!("enum '{name}' not parsed");
        };
        let unit = emit_enum(&emitter, e, &mut NameRegistry::new("test"))?;
        Ok(pretty(unit.tokens))
    }

    #[rstest]
    fn test_integer_enum() {
        let code = emit(
            r#"<enum name="side" encodingType="uint8">
                <validValue name="Buy">1</validValue>
                <validValue name="Sell">2</validValue>
            </enum>"#,
            "side",
        )
        .unwrap();

        assert!(code.contains("pub enum Side {"));
        assert!(code.contains("Unknown(u8),"));
        assert!(code.contains("pub const NULL_VALUE: u8 = u8::MAX;"));
        assert!(code.contains("pub const VALUES: [Self; 2] = [Self::Buy, Self::Sell];"));
        assert!(code.contains("1 => Self::Buy,"));
        assert!(code.contains("u8::MAX => Self::NullVal,"));
        assert!(code.contains("Self::Unknown(raw) if acting_version <= schema_version"));
        assert!(code.contains("enum_name: \"side\".to_string(),"));
        assert!(code.contains("impl ::std::fmt::Display for Side"));
    }

    #[rstest]
    fn test_char_enum_uses_byte_literals() {
        let code = emit(
            r#"<enum name="timeInForce" encodingType="char">
                <validValue name="Day">0</validValue>
                <validValue name="Gtc">1</validValue>
            </enum>"#,
            "timeInForce",
        )
        .unwrap();

        assert!(code.contains("pub enum TimeInForce {"));
        assert!(code.contains("b'0' => Self::Day,"));
        assert!(code.contains("Self::Gtc => b'1',"));
        assert!(code.contains("pub const NULL_VALUE: u8 = 0;"));
    }

    #[rstest]
    fn test_enum_over_encoded_type() {
        let code = emit(
            r#"<type name="code" primitiveType="int16"/>
            <enum name="reason" encodingType="code">
                <validValue name="Expired">-3</validValue>
            </enum>"#,
            "reason",
        )
        .unwrap();

        assert!(code.contains("Unknown(i16),"));
        assert!(code.contains("-3 => Self::Expired,"));
        assert!(code.contains("pub const NULL_VALUE: i16 = i16::MIN;"));
    }

    #[rstest]
    fn test_duplicate_variant_names() {
        let err = emit(
            r#"<enum name="side" encodingType="uint8">
                <validValue name="buy">1</validValue>
                <validValue name="Buy">2</validValue>
            </enum>"#,
            "side",
        )
        .unwrap_err();

        assert!(err.to_string().contains("enum 'side' > validValue 'Buy'"));
    }
}

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

//! Rust source emission for a validated schema.
//!
//! Each schema type becomes one code unit: a token stream built with `quote`, parsed back
//! with `syn` and formatted with `prettyplease`. Units are joined into a single file or
//! written one per module depending on [`OutputMode`].
//!
//! Generated code carries no inner attributes so it can be pulled in with `include!`.

mod composites;
mod enums;
mod members;
mod messages;
pub mod names;
pub mod primitives;
mod sets;

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use self::names::NameRegistry;
use crate::{
    config::{CodegenConfig, OutputMode},
    error::{CodegenError, CodegenResult},
    layout::var_data_shape,
    schema::ir::{Schema, TypeDef},
};

/// One generated Rust source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: String,
    pub contents: String,
}

/// A named item (or group of items) emitted for one schema type.
#[derive(Debug)]
pub(crate) struct Unit {
    pub name: String,
    pub tokens: TokenStream,
}

/// Shared emission context.
pub(crate) struct Emitter<'a> {
    pub schema: &'a Schema,
    pub config: &'a CodegenConfig,
    /// Path of the runtime crate, e.g. `::nautilus_sbe`.
    pub rt: syn::Path,
}

impl Emitter<'_> {
    /// `#[doc]` attribute for a schema description, empty when docs are disabled.
    pub fn doc(&self, text: &str) -> TokenStream {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !self.config.emit_docs || text.is_empty() {
            return TokenStream::new();
        }
        let text = format!(" {text}");
        quote!(#[doc = #text])
    }
}

/// Module name of the single generated file.
#[must_use]
pub fn module_name(schema: &Schema) -> String {
    if schema.package.is_empty() {
        return "sbe".to_string();
    }
    names::member_name(&schema.package.replace('.', "_"))
}

/// Emits Rust source for a validated schema.
///
/// # Errors
///
/// Returns an error if identifiers collide or if the emitted tokens are not valid Rust.
pub fn emit_schema(schema: &Schema, config: &CodegenConfig) -> CodegenResult<Vec<GeneratedFile>> {
    let emitter = Emitter {
        schema,
        config,
        rt: config.runtime_path()?,
    };

    let mut types = NameRegistry::module_types("the generated module");
    let mut units = Vec::new();

    for def in schema.types.values() {
        let unit = match def {
            TypeDef::Encoded(_) => continue,
            TypeDef::Enum(e) => enums::emit_enum(&emitter, e, &mut types)?,
            TypeDef::Set(s) => sets::emit_set(&emitter, s, &mut types)?,
            TypeDef::Composite(c) => {
                if var_data_shape(schema, &c.name, "").is_ok() {
                    continue;
                }
                composites::emit_composite(&emitter, c, &mut types)?
            }
        };
        tracing::debug!("Emitted {}", unit.name);
        units.push(unit);
    }

    for message in &schema.messages {
        let unit = messages::emit_message(&emitter, message, &mut types)?;
        tracing::debug!("Emitted {}", unit.name);
        units.push(unit);
    }

    let preamble = emit_preamble(&emitter);
    match config.output_mode {
        OutputMode::SingleFile => {
            let mut tokens = emitter.runtime_import();
            tokens.extend(preamble);
            for unit in units {
                tokens.extend(unit.tokens);
            }
            let path = format!("{}.rs", module_name(schema));
            let contents = render(&path, tokens, schema)?;
            Ok(vec![GeneratedFile { path, contents }])
        }
        OutputMode::ModulePerType => {
            let mut files = Vec::with_capacity(units.len() + 1);
            let mut root = emitter.runtime_import();
            root.extend(preamble);

            for unit in units {
                let module = names::ident(&names::member_name(&unit.name));
                root.extend(quote! {
                    mod #module;
                    pub use #module::*;
                });

                let mut tokens = quote! {
                    #[allow(unused_imports)]
                    use super::*;
                };
                tokens.extend(emitter.runtime_import());
                tokens.extend(unit.tokens);
                let path = format!("{module}.rs");
                let contents = render(&path, tokens, schema)?;
                files.push(GeneratedFile { path, contents });
            }

            let path = "mod.rs".to_string();
            let contents = render(&path, root, schema)?;
            files.insert(0, GeneratedFile { path, contents });
            Ok(files)
        }
    }
}

impl Emitter<'_> {
    fn runtime_import(&self) -> TokenStream {
        let rt = &self.rt;
        quote! {
            #[allow(unused_imports)]
            use #rt::{SbeRead as _, SbeWrite as _};
        }
    }
}

fn emit_preamble(emitter: &Emitter<'_>) -> TokenStream {
    let schema = emitter.schema;
    let id = Literal::u16_unsuffixed(schema.id);
    let version = Literal::u16_unsuffixed(schema.version);
    let semantic_version = &schema.semantic_version;
    let package = &schema.package;
    let max_group_count = Literal::u32_unsuffixed(emitter.config.max_group_count);
    let doc = emitter.doc(&schema.description);

    quote! {
        /// Schema id carried in every message header.
        pub const SBE_SCHEMA_ID: u16 = #id;
        /// Schema version the codecs were generated from.
        pub const SBE_SCHEMA_VERSION: u16 = #version;
        pub const SBE_SEMANTIC_VERSION: &str = #semantic_version;
        #doc
        pub const SBE_PACKAGE: &str = #package;
        /// Largest group element count accepted when decoding.
        pub const MAX_GROUP_COUNT: u32 = #max_group_count;
    }
}

fn render(path: &str, tokens: TokenStream, schema: &Schema) -> CodegenResult<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|source| CodegenError::Syn {
        unit: path.to_string(),
        source,
    })?;
    let header = format!(
        "// Generated by nautilus-sbe-codegen from schema '{}' (id {}, version {}). Do not edit.\n\n",
        schema.package, schema.id, schema.version
    );
    Ok(header + &prettyplease::unparse(&file))
}


#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::schema::parse_schema;

    const SCHEMA: &str = r#"<messageSchema package="venue.md" id="9" version="1" semanticVersion="0.4">
    <types>
        <composite name="messageHeader">
            <type name="blockLength" primitiveType="uint16"/>
            <type name="templateId" primitiveType="uint16"/>
            <type name="schemaId" primitiveType="uint16"/>
            <type name="version" primitiveType="uint16"/>
        </composite>
        <composite name="varString8">
            <type name="length" primitiveType="uint8"/>
            <type name="varData" primitiveType="uint8" length="0" characterEncoding="UTF-8"/>
        </composite>
    </types>
    <message name="Ping" id="5">
        <field name="seq" id="1" type="uint32"/>
        <data name="tag" id="2" type="varString8"/>
    </message>
</messageSchema>"#;

    #[rstest]
    #[case("venue.md", "venue_md")]
    #[case("", "sbe")]
    #[case("Spot", "spot")]
    fn test_module_name(#[case] package: &str, #[case] expected: &str) {
        let mut schema = parse_schema(SCHEMA).unwrap();
        schema.package = package.to_string();
        assert_eq!(module_name(&schema), expected);
    }

    #[rstest]
    fn test_single_file_preamble_and_units() {
        let schema = parse_schema(SCHEMA).unwrap();
        let files = emit_schema(&schema, &CodegenConfig::default()).unwrap();

        assert_eq!(files.len(), 1);
        let code = &files[0].contents;
        assert!(code.starts_with("// Generated by nautilus-sbe-codegen from schema 'venue.md'"));
        assert!(code.contains("use ::nautilus_sbe::{SbeRead as _, SbeWrite as _};"));
        assert!(code.contains("pub const SBE_SEMANTIC_VERSION: &str = \"0.4\";"));
        assert!(code.contains("pub const MAX_GROUP_COUNT: u32 = 10000;"));
        assert!(code.contains("pub struct MessageHeader {"));
        assert!(code.contains("pub struct Ping {"));
        assert!(!code.contains("pub struct VarString8"));
        assert!(!code.contains("#!["));
    }

    #[rstest]
    fn test_max_group_count_from_config() {
        let schema = parse_schema(SCHEMA).unwrap();
        let config = CodegenConfig {
            max_group_count: 250,
            ..Default::default()
        };
        let files = emit_schema(&schema, &config).unwrap();
        assert!(files[0].contents.contains("pub const MAX_GROUP_COUNT: u32 = 250;"));
    }

    #[rstest]
    fn test_doc_collapses_whitespace() {
        let schema = parse_schema(SCHEMA).unwrap();
        let config = CodegenConfig::default();
        let emitter = Emitter {
            schema: &schema,
            config: &config,
            rt: config.runtime_path().unwrap(),
        };

        assert_eq!(
            emitter.doc("  Best\n   price ").to_string(),
            quote!(#[doc = " Best price"]).to_string()
        );
        assert!(emitter.doc("   ").is_empty());
    }

    #[rstest]
    fn test_type_and_message_name_collision() {
        let xml = SCHEMA.replace(
            "</types>",
            r#"<enum name="ping" encodingType="uint8"><validValue name="A">1</validValue></enum></types>"#,
        );
        let schema = parse_schema(&xml).unwrap();
        let err = emit_schema(&schema, &CodegenConfig::default()).unwrap_err();

        assert!(err.is_schema_error());
        assert!(err.to_string().contains("message 'Ping'"));
        assert!(err.to_string().contains("collides with enum 'ping'"));
    }
}

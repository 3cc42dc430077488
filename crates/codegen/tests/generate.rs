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

//! Integration tests for end-to-end code generation.

use std::path::PathBuf;

use nautilus_sbe_codegen::{CodegenConfig, CodegenError, Generator, OutputMode, write_files};
use rstest::{fixture, rstest};

const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbe:messageSchema xmlns:sbe="http://fixprotocol.io/2016/sbe"
                   package="venue.orders" id="42" version="2" semanticVersion="1.3"
                   description="Order entry">
    <types>
        <composite name="messageHeader">
            <type name="blockLength" primitiveType="uint16"/>
            <type name="templateId" primitiveType="uint16"/>
            <type name="schemaId" primitiveType="uint16"/>
            <type name="version" primitiveType="uint16"/>
        </composite>
        <composite name="groupSizeEncoding">
            <type name="blockLength" primitiveType="uint16"/>
            <type name="numInGroup" primitiveType="uint16" maxValue="100"/>
        </composite>
        <composite name="varString8">
            <type name="length" primitiveType="uint8"/>
            <type name="varData" primitiveType="uint8" length="0" characterEncoding="UTF-8"/>
        </composite>
        <enum name="side" encodingType="uint8" description="Order side">
            <validValue name="Buy">1</validValue>
            <validValue name="Sell">2</validValue>
        </enum>
        <set name="execFlags" encodingType="uint8">
            <choice name="PostOnly">0</choice>
            <choice name="ReduceOnly">1</choice>
        </set>
        <type name="qty" primitiveType="uint32" minValue="1" maxValue="1000000"/>
        <type name="symbol" primitiveType="char" length="8"/>
        <type name="venue" primitiveType="char" presence="constant">XNAS</type>
    </types>
    <sbe:message name="NewOrder" id="1" description="Submits an order">
        <field name="orderId" id="1" type="uint64"/>
        <field name="side" id="2" type="side"/>
        <field name="quantity" id="3" type="qty"/>
        <field name="flags" id="4" type="execFlags"/>
        <field name="symbol" id="5" type="symbol"/>
        <field name="venue" id="6" type="venue"/>
        <field name="tag" id="7" type="uint32" presence="optional" sinceVersion="2"/>
        <group name="legs" id="8">
            <field name="ratio" id="9" type="int32"/>
        </group>
        <data name="note" id="10" type="varString8"/>
    </sbe:message>
</sbe:messageSchema>
"#;

#[fixture]
fn generator() -> Generator {
    Generator::new(CodegenConfig::default())
}

fn single_file(generator: &Generator) -> String {
    let files = generator.generate_from_str(SCHEMA).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "venue_orders.rs");
    files[0].contents.clone()
}

#[rstest]
fn test_single_file_contents(generator: Generator) {
    let code = single_file(&generator);

    assert!(code.starts_with(
        "// Generated by nautilus-sbe-codegen from schema 'venue.orders' (id 42, version 2). Do not edit."
    ));
    assert!(code.contains("pub const SBE_SCHEMA_ID: u16 = 42;"));
    assert!(code.contains("pub const SBE_SCHEMA_VERSION: u16 = 2;"));
    assert!(code.contains("pub const SBE_SEMANTIC_VERSION: &str = \"1.3\";"));
    assert!(code.contains("pub struct NewOrder {"));
    assert!(code.contains("pub struct NewOrderLegs {"));
    assert!(code.contains("pub enum Side {"));
    assert!(code.contains("pub struct ExecFlags(pub u8);"));
    assert!(code.contains("pub struct MessageHeader {"));
    assert!(code.contains("pub const SBE_TEMPLATE_ID: u16 = 1;"));
    assert!(code.contains("pub const VENUE: [u8; 4] = *b\"XNAS\";"));
    assert!(code.contains("impl ::nautilus_sbe::SbeMessage for NewOrder"));
}

#[rstest]
fn test_var_data_composite_not_emitted(generator: Generator) {
    let code = single_file(&generator);
    assert!(!code.contains("pub struct VarString8"));
    assert!(code.contains("pub note: Vec<u8>,"));
}

#[rstest]
fn test_block_length_and_versioned_field(generator: Generator) {
    let code = single_file(&generator);

    // orderId 8 + side 1 + quantity 4 + flags 1 + symbol 8 + tag 4
    assert!(code.contains("pub const SBE_BLOCK_LENGTH: u16 = 26;"));
    assert!(code.contains("if acting_version >= 2"));
    assert!(code.contains("pub const fn tag_since_version() -> u16"));
}

#[rstest]
fn test_group_limits_follow_dimension_max(generator: Generator) {
    let code = single_file(&generator);
    assert!(code.contains("::nautilus_sbe::CountWidth::U16"));
    assert!(code.contains(
        "::nautilus_sbe::prepare_group(\"legs\", &mut self.legs, header.num_in_group, 100)"
    ));
}

#[rstest]
fn test_descriptions_become_docs(generator: Generator) {
    let code = single_file(&generator);
    assert!(code.contains("/// Order side"));
    assert!(code.contains("/// Submits an order"));

    let quiet = Generator::new(CodegenConfig {
        emit_docs: false,
        ..Default::default()
    });
    let code = single_file(&quiet);
    assert!(!code.contains("/// Order side"));
}

#[rstest]
fn test_metadata_can_be_disabled() {
    let generator = Generator::new(CodegenConfig {
        emit_metadata: false,
        ..Default::default()
    });
    let code = single_file(&generator);
    assert!(!code.contains("_since_version"));
    assert!(!code.contains("_meta_attribute"));
    assert!(code.contains("pub fn range_check"));
}

#[rstest]
fn test_custom_runtime_path() {
    let generator = Generator::new(CodegenConfig {
        runtime_crate: "crate::sbe".to_string(),
        ..Default::default()
    });
    let code = single_file(&generator);
    assert!(code.contains("crate::sbe::SbeResult"));
    assert!(!code.contains("::nautilus_sbe::"));
}

#[rstest]
fn test_module_per_type() {
    let generator = Generator::new(CodegenConfig {
        output_mode: OutputMode::ModulePerType,
        ..Default::default()
    });
    let files = generator.generate_from_str(SCHEMA).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

    assert_eq!(
        paths,
        [
            "mod.rs",
            "message_header.rs",
            "group_size_encoding.rs",
            "side.rs",
            "exec_flags.rs",
            "new_order.rs",
        ]
    );

    let root = &files[0].contents;
    assert!(root.contains("mod side;"));
    assert!(root.contains("pub use side::*;"));
    assert!(root.contains("pub const SBE_SCHEMA_ID: u16 = 42;"));

    let new_order = &files[5].contents;
    assert!(new_order.contains("use super::*;"));
    assert!(new_order.contains("pub struct NewOrderLegs {"));
}

#[rstest]
#[case("vec", "Vec")]
#[case("option", "Option")]
#[case("default", "Default")]
fn test_prelude_type_names_rejected(
    generator: Generator,
    #[case] schema_name: &str,
    #[case] rust_name: &str,
) {
    let xml = SCHEMA
        .replace(
            "</types>",
            &format!(
                r#"<composite name="{schema_name}">
                    <type name="a" primitiveType="int32"/>
                </composite></types>"#
            ),
        )
        .replace(
            r#"<group name="legs""#,
            &format!(r#"<field name="extra" id="11" type="{schema_name}"/><group name="legs""#),
        );
    let err = generator.generate_from_str(&xml).unwrap_err();

    assert!(err.is_schema_error());
    assert_eq!(
        err.to_string(),
        format!(
            "Schema error at composite '{schema_name}': generated identifier '{rust_name}' \
             in the generated module collides with the Rust prelude"
        )
    );
}

#[rstest]
fn test_keyword_field_accessors(generator: Generator) {
    let xml = SCHEMA.replace(
        r#"<group name="legs""#,
        r#"<field name="type" id="11" type="uint8"/><group name="legs""#,
    );
    let code = &generator.generate_from_str(&xml).unwrap()[0].contents;

    assert!(code.contains("pub type_: u8,"));
    assert!(code.contains("pub const fn type_id() -> u16"));
    assert!(code.contains("pub const fn type_since_version() -> u16"));
    assert!(code.contains("pub const fn type_min_value() -> u8"));
    assert!(!code.contains("type__"));
}

#[rstest]
fn test_output_is_deterministic(generator: Generator) {
    assert_eq!(single_file(&generator), single_file(&generator));
}

#[rstest]
fn test_invalid_schema_reports_element(generator: Generator) {
    let xml = SCHEMA.replace(r#"type="qty""#, r#"type="quantity""#);
    let err = generator.generate_from_str(&xml).unwrap_err();

    assert!(err.is_schema_error());
    assert_eq!(
        err.to_string(),
        "Schema error at message 'NewOrder' > field 'quantity': undefined type 'quantity'"
    );
}

#[rstest]
fn test_generate_to_dir(generator: Generator) {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("orders.xml");
    std::fs::write(&schema_path, SCHEMA).unwrap();
    let out_dir = dir.path().join("generated");

    let written = generator.generate_to_dir(&schema_path, &out_dir).unwrap();

    assert_eq!(written, vec![out_dir.join("venue_orders.rs")]);
    let contents = std::fs::read_to_string(&written[0]).unwrap();
    assert!(contents.contains("pub struct NewOrder {"));
}

#[rstest]
fn test_write_files_skips_unchanged(generator: Generator) {
    let dir = tempfile::tempdir().unwrap();
    let files = generator.generate_from_str(SCHEMA).unwrap();

    let first = write_files(&files, dir.path()).unwrap();
    let modified = std::fs::metadata(&first[0]).unwrap().modified().unwrap();
    let second = write_files(&files, dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        std::fs::metadata(&second[0]).unwrap().modified().unwrap(),
        modified
    );
}

#[rstest]
fn test_missing_schema_file(generator: Generator) {
    let err = generator
        .generate_from_file(&PathBuf::from("/nonexistent/schema.xml"))
        .unwrap_err();
    assert!(matches!(err, CodegenError::Io { .. }));
    assert!(!err.is_schema_error());
}

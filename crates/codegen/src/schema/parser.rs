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

//! SBE 1.0 XML schema parser.
//!
//! Element matching uses local names only, so `sbe:message` and `message` are equivalent.
//! Enum, set and composite declarations nested inside composites are hoisted into the schema
//! type table and referenced by name.

use std::{collections::HashSet, str::FromStr};

use indexmap::IndexMap;
use nautilus_sbe::PrimitiveType;
use roxmltree::Node;

use super::ir::{
    Body, Choice, Composite, CompositeMember, DataField, EncodedType, EnumDef, Field, Group,
    MemberKind, Message, Presence, Schema, SetDef, TypeDef, ValidValue, Versioning,
};
use crate::error::{CodegenError, CodegenResult};

/// Parses an SBE XML message schema.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML or is not a structurally valid
/// message schema. Semantic checks are performed separately by
/// [`validate_schema`](super::validate::validate_schema).
pub fn parse_schema(xml: &str) -> CodegenResult<Schema> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "messageSchema" {
        return Err(CodegenError::schema(
            format!("<{}>", root.tag_name().name()),
            "root element must be messageSchema",
        ));
    }

    let element = "messageSchema";
    let byte_order = root.attribute("byteOrder").unwrap_or("littleEndian");
    if byte_order != "littleEndian" {
        return Err(CodegenError::schema(
            element,
            format!("unsupported byteOrder '{byte_order}'"),
        ));
    }

    let mut parser = SchemaParser::new();
    let mut messages = Vec::new();

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "types" => parser.parse_types(child)?,
            "message" => messages.push(parse_message(child)?),
            "include" => {
                return Err(CodegenError::schema(
                    element,
                    "xi:include is not supported, inline the included types",
                ));
            }
            _ => {}
        }
    }

    Ok(Schema {
        package: root.attribute("package").unwrap_or_default().to_string(),
        id: required_number(root, "id", element)?,
        version: number_or(root, "version", element, 0)?,
        semantic_version: attr_string(root, "semanticVersion"),
        description: attr_string(root, "description"),
        header_type: root
            .attribute("headerType")
            .unwrap_or("messageHeader")
            .to_string(),
        types: parser.types,
        messages,
    })
}

struct SchemaParser {
    types: IndexMap<String, TypeDef>,
    declared: HashSet<String>,
}

impl SchemaParser {
    fn new() -> Self {
        let types = PrimitiveType::ALL
            .into_iter()
            .map(|p| {
                (
                    p.name().to_string(),
                    TypeDef::Encoded(EncodedType::primitive(p.name(), p)),
                )
            })
            .collect();
        Self {
            types,
            declared: HashSet::new(),
        }
    }

    fn register(&mut self, def: TypeDef) -> CodegenResult<()> {
        let name = def.name().to_string();
        if !self.declared.insert(name.clone()) {
            return Err(CodegenError::schema(
                format!("{} '{name}'", def.kind()),
                "duplicate type name",
            ));
        }
        self.types.insert(name, def);
        Ok(())
    }

    fn parse_types(&mut self, node: Node) -> CodegenResult<()> {
        for child in node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "type" => {
                    let t = parse_encoded_type(child, "type")?;
                    self.register(TypeDef::Encoded(t))?;
                }
                "composite" => {
                    let c = self.parse_composite(child)?;
                    self.register(TypeDef::Composite(c))?;
                }
                "enum" => {
                    let e = parse_enum(child)?;
                    self.register(TypeDef::Enum(e))?;
                }
                "set" => {
                    let s = parse_set(child)?;
                    self.register(TypeDef::Set(s))?;
                }
                other => {
                    return Err(CodegenError::schema(
                        format!("types > <{other}>"),
                        "unexpected element",
                    ));
                }
            }
        }
        Ok(())
    }

    fn parse_composite(&mut self, node: Node) -> CodegenResult<Composite> {
        let name = required_attr(node, "name", "composite")?.to_string();
        let element = format!("composite '{name}'");
        let mut members = Vec::new();

        for child in node.children().filter(Node::is_element) {
            let tag = child.tag_name().name();
            let member = match tag {
                "type" => {
                    let t = parse_encoded_type(child, &format!("{element} > type"))?;
                    CompositeMember {
                        name: t.name.clone(),
                        offset: t.offset,
                        versioning: t.versioning,
                        description: t.description.clone(),
                        kind: MemberKind::Encoded(t),
                    }
                }
                "enum" | "set" | "composite" => {
                    let (member_name, offset, versioning, description) =
                        member_attrs(child, &element, tag)?;
                    let def = match tag {
                        "enum" => TypeDef::Enum(parse_enum(child)?),
                        "set" => TypeDef::Set(parse_set(child)?),
                        _ => TypeDef::Composite(self.parse_composite(child)?),
                    };
                    self.register(def)?;
                    CompositeMember {
                        name: member_name.clone(),
                        offset,
                        versioning,
                        description,
                        kind: MemberKind::Ref(member_name),
                    }
                }
                "ref" => {
                    let (member_name, offset, versioning, description) =
                        member_attrs(child, &element, tag)?;
                    let type_name =
                        required_attr(child, "type", &format!("{element} > ref '{member_name}'"))?;
                    CompositeMember {
                        name: member_name,
                        offset,
                        versioning,
                        description,
                        kind: MemberKind::Ref(type_name.to_string()),
                    }
                }
                other => {
                    return Err(CodegenError::schema(
                        format!("{element} > <{other}>"),
                        "unexpected element",
                    ));
                }
            };
            members.push(member);
        }

        if members.is_empty() {
            return Err(CodegenError::schema(element, "composite has no members"));
        }

        Ok(Composite {
            description: attr_string(node, "description"),
            semantic_type: attr_string(node, "semanticType"),
            offset: optional_number(node, "offset", &element)?,
            versioning: versioning(node, &element)?,
            name,
            members,
        })
    }

}

fn parse_message(node: Node) -> CodegenResult<Message> {
    let name = required_attr(node, "name", "message")?.to_string();
    let element = format!("message '{name}'");

    Ok(Message {
        id: required_number(node, "id", &element)?,
        block_length: optional_number(node, "blockLength", &element)?,
        semantic_type: attr_string(node, "semanticType"),
        description: attr_string(node, "description"),
        versioning: versioning(node, &element)?,
        body: parse_body(node, &element)?,
        name,
    })
}

fn parse_body(node: Node, element: &str) -> CodegenResult<Body> {
    let mut body = Body::default();

    for child in node.children().filter(Node::is_element) {
        let tag = child.tag_name().name();
        let name = required_attr(child, "name", &format!("{element} > {tag}"))?;
        let path = format!("{element} > {tag} '{name}'");

        match tag {
            "field" => {
                if !body.groups.is_empty() || !body.data.is_empty() {
                    return Err(CodegenError::schema(
                        path,
                        "fixed fields must precede groups and data",
                    ));
                }
                body.fields.push(parse_field(child, name, &path)?);
            }
            "group" => {
                if !body.data.is_empty() {
                    return Err(CodegenError::schema(path, "groups must precede data"));
                }
                body.groups.push(Group {
                    name: name.to_string(),
                    id: number_or(child, "id", &path, 0)?,
                    dimension_type: child
                        .attribute("dimensionType")
                        .unwrap_or("groupSizeEncoding")
                        .to_string(),
                    block_length: optional_number(child, "blockLength", &path)?,
                    semantic_type: attr_string(child, "semanticType"),
                    description: attr_string(child, "description"),
                    versioning: versioning(child, &path)?,
                    body: parse_body(child, &path)?,
                });
            }
            "data" => {
                body.data.push(DataField {
                    name: name.to_string(),
                    id: required_number(child, "id", &path)?,
                    type_name: required_attr(child, "type", &path)?.to_string(),
                    semantic_type: attr_string(child, "semanticType"),
                    description: attr_string(child, "description"),
                    versioning: versioning(child, &path)?,
                });
            }
            other => {
                return Err(CodegenError::schema(
                    format!("{element} > <{other}>"),
                    "unexpected element",
                ));
            }
        }
    }

    Ok(body)
}

fn parse_field(node: Node, name: &str, element: &str) -> CodegenResult<Field> {
    let presence = match node.attribute("presence") {
        Some(text) => Some(parse_presence(text, element)?),
        None => None,
    };

    Ok(Field {
        name: name.to_string(),
        id: required_number(node, "id", element)?,
        type_name: required_attr(node, "type", element)?.to_string(),
        offset: optional_number(node, "offset", element)?,
        presence,
        value_ref: node.attribute("valueRef").map(str::to_string),
        epoch: node.attribute("epoch").unwrap_or("unix").to_string(),
        time_unit: node.attribute("timeUnit").unwrap_or("nanosecond").to_string(),
        semantic_type: attr_string(node, "semanticType"),
        description: attr_string(node, "description"),
        versioning: versioning(node, element)?,
    })
}

fn parse_encoded_type(node: Node, context: &str) -> CodegenResult<EncodedType> {
    let name = required_attr(node, "name", context)?.to_string();
    let element = format!("type '{name}'");

    let primitive_name = required_attr(node, "primitiveType", &element)?;
    let primitive = PrimitiveType::from_name(primitive_name).ok_or_else(|| {
        CodegenError::schema(&element, format!("unknown primitiveType '{primitive_name}'"))
    })?;

    let presence = match node.attribute("presence") {
        Some(text) => parse_presence(text, &element)?,
        None => Presence::Required,
    };

    let constant_value = match presence {
        Presence::Constant => {
            let text = node.text().map(str::trim).unwrap_or_default();
            if text.is_empty() {
                return Err(CodegenError::schema(element, "constant type without a value"));
            }
            Some(text.to_string())
        }
        _ => None,
    };

    let length = match optional_number::<usize>(node, "length", &element)? {
        Some(length) => length,
        None => match (&constant_value, primitive) {
            (Some(text), PrimitiveType::Char) => text.len(),
            _ => 1,
        },
    };

    Ok(EncodedType {
        primitive,
        length,
        presence,
        null_value: node.attribute("nullValue").map(str::to_string),
        min_value: node.attribute("minValue").map(str::to_string),
        max_value: node.attribute("maxValue").map(str::to_string),
        constant_value,
        character_encoding: node.attribute("characterEncoding").map(str::to_string),
        semantic_type: attr_string(node, "semanticType"),
        description: attr_string(node, "description"),
        offset: optional_number(node, "offset", &element)?,
        versioning: versioning(node, &element)?,
        name,
    })
}

fn parse_enum(node: Node) -> CodegenResult<EnumDef> {
    let name = required_attr(node, "name", "enum")?.to_string();
    let element = format!("enum '{name}'");
    let mut values = Vec::new();

    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() != "validValue" {
            return Err(CodegenError::schema(
                format!("{element} > <{}>", child.tag_name().name()),
                "unexpected element",
            ));
        }
        let value_name = required_attr(child, "name", &format!("{element} > validValue"))?;
        let path = format!("{element} > validValue '{value_name}'");
        values.push(ValidValue {
            name: value_name.to_string(),
            value: element_text(child, &path)?,
            description: attr_string(child, "description"),
            versioning: versioning(child, &path)?,
        });
    }

    Ok(EnumDef {
        encoding_type: required_attr(node, "encodingType", &element)?.to_string(),
        description: attr_string(node, "description"),
        offset: optional_number(node, "offset", &element)?,
        versioning: versioning(node, &element)?,
        name,
        values,
    })
}

fn parse_set(node: Node) -> CodegenResult<SetDef> {
    let name = required_attr(node, "name", "set")?.to_string();
    let element = format!("set '{name}'");
    let mut choices = Vec::new();

    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() != "choice" {
            return Err(CodegenError::schema(
                format!("{element} > <{}>", child.tag_name().name()),
                "unexpected element",
            ));
        }
        let choice_name = required_attr(child, "name", &format!("{element} > choice"))?;
        let path = format!("{element} > choice '{choice_name}'");
        choices.push(Choice {
            name: choice_name.to_string(),
            bit: element_text(child, &path)?,
            description: attr_string(child, "description"),
            versioning: versioning(child, &path)?,
        });
    }

    Ok(SetDef {
        encoding_type: required_attr(node, "encodingType", &element)?.to_string(),
        description: attr_string(node, "description"),
        offset: optional_number(node, "offset", &element)?,
        versioning: versioning(node, &element)?,
        name,
        choices,
    })
}

fn member_attrs(
    node: Node,
    parent: &str,
    tag: &str,
) -> CodegenResult<(String, Option<usize>, Versioning, String)> {
    let name = required_attr(node, "name", &format!("{parent} > {tag}"))?.to_string();
    let path = format!("{parent} > {tag} '{name}'");
    Ok((
        name,
        optional_number(node, "offset", &path)?,
        versioning(node, &path)?,
        attr_string(node, "description"),
    ))
}

fn parse_presence(text: &str, element: &str) -> CodegenResult<Presence> {
    Presence::from_name(text)
        .ok_or_else(|| CodegenError::schema(element, format!("invalid presence '{text}'")))
}

fn versioning(node: Node, element: &str) -> CodegenResult<Versioning> {
    Ok(Versioning {
        since_version: number_or(node, "sinceVersion", element, 0)?,
        deprecated: number_or(node, "deprecated", element, 0)?,
    })
}

fn element_text(node: Node, element: &str) -> CodegenResult<String> {
    let text = node.text().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(CodegenError::schema(element, "missing value"));
    }
    Ok(text.to_string())
}

fn attr_string(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str, element: &str) -> CodegenResult<&'a str> {
    node.attribute(name)
        .ok_or_else(|| CodegenError::schema(element, format!("missing attribute '{name}'")))
}

fn optional_number<T: FromStr>(
    node: Node,
    name: &str,
    element: &str,
) -> CodegenResult<Option<T>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(text) => text.trim().parse().map(Some).map_err(|_| {
            CodegenError::schema(
                element,
                format!("attribute '{name}' is not a valid number: '{text}'"),
            )
        }),
    }
}

fn number_or<T: FromStr>(node: Node, name: &str, element: &str, default: T) -> CodegenResult<T> {
    Ok(optional_number(node, name, element)?.unwrap_or(default))
}

fn required_number<T: FromStr>(node: Node, name: &str, element: &str) -> CodegenResult<T> {
    optional_number(node, name, element)?
        .ok_or_else(|| CodegenError::schema(element, format!("missing attribute '{name}'")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbe:messageSchema xmlns:sbe="http://fixprotocol.io/2016/sbe"
                   package="demo" id="7" version="2" semanticVersion="5.2"
                   description="Demo schema" byteOrder="littleEndian">
    <types>
        <composite name="messageHeader">
            <type name="blockLength" primitiveType="uint16"/>
            <type name="templateId" primitiveType="uint16"/>
            <type name="schemaId" primitiveType="uint16"/>
            <type name="version" primitiveType="uint16"/>
        </composite>
        <composite name="priceLevel">
            <type name="price" primitiveType="int64"/>
            <enum name="levelKind" encodingType="uint8">
                <validValue name="Bid">0</validValue>
                <validValue name="Ask">1</validValue>
            </enum>
            <ref name="flags" type="levelFlags"/>
        </composite>
        <set name="levelFlags" encodingType="uint8">
            <choice name="Implied">0</choice>
        </set>
        <type name="currency" primitiveType="char" presence="constant">USD</type>
    </types>
    <sbe:message name="Quote" id="1" blockLength="32">
        <field name="time" id="1" type="int64" timeUnit="millisecond"/>
        <field name="qty" id="2" type="uint32" presence="optional" sinceVersion="2"/>
        <group name="levels" id="3" dimensionType="groupSize16Encoding">
            <field name="level" id="4" type="priceLevel"/>
            <data name="note" id="5" type="varString8"/>
        </group>
        <data name="symbol" id="6" type="varString8"/>
    </sbe:message>
</sbe:messageSchema>
"#;

    #[rstest]
    fn test_parse_schema_attributes() {
        let schema = parse_schema(SCHEMA).unwrap();
        assert_eq!(schema.package, "demo");
        assert_eq!(schema.id, 7);
        assert_eq!(schema.version, 2);
        assert_eq!(schema.semantic_version, "5.2");
        assert_eq!(schema.header_type, "messageHeader");
        assert_eq!(schema.messages.len(), 1);
    }

    #[rstest]
    fn test_nested_types_are_hoisted() {
        let schema = parse_schema(SCHEMA).unwrap();
        assert!(matches!(schema.types.get("levelKind"), Some(TypeDef::Enum(_))));

        let Some(TypeDef::Composite(level)) = schema.types.get("priceLevel") else {
            panic!("priceLevel not parsed");
        };
        assert_eq!(level.members.len(), 3);
        let kind = &level.member("levelKind").unwrap().kind;
        assert!(matches!(kind, MemberKind::Ref(n) if n == "levelKind"));
        let flags = &level.member("flags").unwrap().kind;
        assert!(matches!(flags, MemberKind::Ref(n) if n == "levelFlags"));
    }

    #[rstest]
    fn test_constant_char_type_takes_length_from_value() {
        let schema = parse_schema(SCHEMA).unwrap();
        let Some(TypeDef::Encoded(currency)) = schema.types.get("currency") else {
            panic!("currency not parsed");
        };
        assert_eq!(currency.presence, Presence::Constant);
        assert_eq!(currency.constant_value.as_deref(), Some("USD"));
        assert_eq!(currency.length, 3);
    }

    #[rstest]
    fn test_message_body() {
        let schema = parse_schema(SCHEMA).unwrap();
        let quote = schema.message("Quote").unwrap();

        assert_eq!(quote.id, 1);
        assert_eq!(quote.block_length, Some(32));
        assert_eq!(quote.body.fields.len(), 2);
        assert_eq!(quote.body.fields[0].time_unit, "millisecond");
        assert_eq!(quote.body.fields[0].epoch, "unix");
        assert_eq!(quote.body.fields[1].presence, Some(Presence::Optional));
        assert_eq!(quote.body.fields[1].versioning.since_version, 2);

        let levels = &quote.body.groups[0];
        assert_eq!(levels.dimension_type, "groupSize16Encoding");
        assert_eq!(levels.body.fields.len(), 1);
        assert_eq!(levels.body.data[0].name, "note");
        assert_eq!(quote.body.data[0].type_name, "varString8");
    }

    #[rstest]
    fn test_primitives_pre_registered() {
        let schema = parse_schema(SCHEMA).unwrap();
        let Some(TypeDef::Encoded(t)) = schema.types.get("uint32") else {
            panic!("uint32 not registered");
        };
        assert_eq!(t.primitive, PrimitiveType::UInt32);
    }

    #[rstest]
    #[case(
        r#"<messageSchema id="1" byteOrder="bigEndian"/>"#,
        "unsupported byteOrder 'bigEndian'"
    )]
    #[case(r#"<schema id="1"/>"#, "root element must be messageSchema")]
    #[case(r#"<messageSchema/>"#, "missing attribute 'id'")]
    #[case(
        r#"<messageSchema id="1"><message name="M" id="1"><data name="d" id="1" type="v"/><field name="f" id="2" type="int8"/></message></messageSchema>"#,
        "fixed fields must precede groups and data"
    )]
    #[case(
        r#"<messageSchema id="1"><message name="M" id="1"><data name="d" id="1" type="v"/><group name="g" id="2"/></message></messageSchema>"#,
        "groups must precede data"
    )]
    #[case(
        r#"<messageSchema id="1"><types><type name="t" primitiveType="int128"/></types></messageSchema>"#,
        "unknown primitiveType 'int128'"
    )]
    #[case(
        r#"<messageSchema id="1"><types><type name="t" primitiveType="int8"/><type name="t" primitiveType="int16"/></types></messageSchema>"#,
        "duplicate type name"
    )]
    #[case(
        r#"<messageSchema id="1"><message name="M" id="x"/></messageSchema>"#,
        "attribute 'id' is not a valid number"
    )]
    #[case(
        r#"<messageSchema id="1"><types><type name="c" primitiveType="char" presence="constant"/></types></messageSchema>"#,
        "constant type without a value"
    )]
    fn test_parse_errors(#[case] xml: &str, #[case] reason: &str) {
        let err = parse_schema(xml).unwrap_err();
        assert!(
            err.to_string().contains(reason),
            "expected '{reason}' in '{err}'"
        );
    }

    #[rstest]
    fn test_error_names_element_path() {
        let xml = r#"<messageSchema id="1"><message name="Quote" id="1"><field name="px" id="1" type="int64" presence="maybe"/></message></messageSchema>"#;
        let err = parse_schema(xml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema error at message 'Quote' > field 'px': invalid presence 'maybe'"
        );
    }

    #[rstest]
    fn test_malformed_xml() {
        let err = parse_schema("<messageSchema id=\"1\">").unwrap_err();
        assert!(matches!(err, CodegenError::Xml(_)));
    }
}

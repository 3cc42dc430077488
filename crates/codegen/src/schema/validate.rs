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

//! Semantic validation of a parsed schema.
//!
//! Everything the emitter relies on is checked here so that generation never starts from an
//! inconsistent model. Each error names the offending element.

use std::collections::{HashMap, HashSet};

use nautilus_sbe::{PrimitiveType, PrimitiveValue};

use super::ir::{
    Body, EncodedType, EnumDef, Presence, ResolvedType, Schema, SetDef, TypeDef, Versioning,
};
use crate::{
    error::{CodegenError, CodegenResult},
    layout::{
        ConstantValue, check_header, dimension_shape, member_encoded, resolve_composite,
        resolve_fields, type_length, var_data_shape,
    },
};

/// Validates a parsed schema.
///
/// # Errors
///
/// Returns the first schema error found.
pub fn validate_schema(schema: &Schema) -> CodegenResult<()> {
    check_header(schema)?;

    for def in schema.types.values() {
        match def {
            TypeDef::Encoded(t) => check_encoded(schema, t)?,
            TypeDef::Enum(e) => check_enum(schema, e)?,
            TypeDef::Set(s) => check_set(schema, s)?,
            TypeDef::Composite(c) => {
                let element = format!("composite '{}'", c.name);
                check_version(schema, c.versioning, &element)?;
                for member in &c.members {
                    check_version(
                        schema,
                        member.versioning,
                        &format!("{element} > member '{}'", member.name),
                    )?;
                }
                resolve_composite(schema, c)?;
            }
        }
    }

    let mut ids = HashMap::new();
    let mut names = HashSet::new();
    for message in &schema.messages {
        let element = format!("message '{}'", message.name);
        if !names.insert(message.name.as_str()) {
            return Err(CodegenError::schema(element, "duplicate message name"));
        }
        if let Some(other) = ids.insert(message.id, message.name.as_str()) {
            return Err(CodegenError::schema(
                element,
                format!("duplicate message id {} (also used by '{other}')", message.id),
            ));
        }
        check_version(schema, message.versioning, &element)?;
        check_body(schema, &message.body, message.block_length, &element)?;
    }

    Ok(())
}

fn check_version(schema: &Schema, versioning: Versioning, element: &str) -> CodegenResult<()> {
    if versioning.since_version > schema.version {
        return Err(CodegenError::schema(
            element,
            format!(
                "sinceVersion {} is greater than the schema version {}",
                versioning.since_version, schema.version
            ),
        ));
    }
    Ok(())
}

fn check_encoded(schema: &Schema, t: &EncodedType) -> CodegenResult<()> {
    let element = format!("type '{}'", t.name);
    check_version(schema, t.versioning, &element)?;

    t.null()?;
    let min = t.min()?;
    let max = t.max()?;
    let inverted = match (min.as_i128(), max.as_i128()) {
        (Some(min), Some(max)) => min > max,
        _ => min.as_f64() > max.as_f64(),
    };
    if inverted {
        return Err(CodegenError::schema(
            element,
            format!("minValue {min} is greater than maxValue {max}"),
        ));
    }

    if let (Presence::Constant, Some(text)) = (t.presence, &t.constant_value)
        && !t.is_text()
    {
        t.primitive.parse_value(text).map_err(|e| {
            CodegenError::schema(&element, format!("invalid constant value: {e}"))
        })?;
    }
    Ok(())
}

fn check_enum(schema: &Schema, e: &EnumDef) -> CodegenResult<()> {
    let element = format!("enum '{}'", e.name);
    check_version(schema, e.versioning, &element)?;

    let (primitive, null) = e.null(schema)?;
    if primitive.is_float() {
        return Err(CodegenError::schema(
            element,
            format!("encodingType '{}' must be an integer or char", e.encoding_type),
        ));
    }
    if e.values.is_empty() {
        return Err(CodegenError::schema(element, "enum has no valid values"));
    }

    let mut names = HashSet::new();
    let mut values = HashMap::new();
    for value in &e.values {
        let path = format!("{element} > validValue '{}'", value.name);
        check_version(schema, value.versioning, &path)?;
        if !names.insert(value.name.as_str()) {
            return Err(CodegenError::schema(path, "duplicate name"));
        }
        let raw = enum_value(primitive, &value.value)
            .map_err(|reason| CodegenError::schema(&path, reason))?;
        if raw == null {
            return Err(CodegenError::schema(
                path,
                format!("value {raw} equals the null value of the encoding"),
            ));
        }
        if let Some(other) = raw.as_i128().and_then(|r| values.insert(r, value.name.as_str())) {
            return Err(CodegenError::schema(
                path,
                format!("duplicate value {raw} (also used by '{other}')"),
            ));
        }
    }
    Ok(())
}

/// Parses an enum value in the domain of its encoding primitive.
///
/// # Errors
///
/// Returns a description of the problem if the text is not a representable value.
pub fn enum_value(primitive: PrimitiveType, text: &str) -> Result<PrimitiveValue, String> {
    primitive
        .parse_value(text.trim())
        .map_err(|e| format!("value outside the encoding domain: {e}"))
}

fn check_set(schema: &Schema, s: &SetDef) -> CodegenResult<()> {
    let element = format!("set '{}'", s.name);
    check_version(schema, s.versioning, &element)?;

    let (primitive, _) = schema.encoding_primitive(&s.encoding_type, &element)?;
    if !matches!(
        primitive,
        PrimitiveType::UInt8 | PrimitiveType::UInt16 | PrimitiveType::UInt32 | PrimitiveType::UInt64
    ) {
        return Err(CodegenError::schema(
            element,
            format!("encodingType '{}' must be an unsigned integer", s.encoding_type),
        ));
    }

    let width = primitive.size() * 8;
    let mut names = HashSet::new();
    let mut bits = HashMap::new();
    for choice in &s.choices {
        let path = format!("{element} > choice '{}'", choice.name);
        check_version(schema, choice.versioning, &path)?;
        if !names.insert(choice.name.as_str()) {
            return Err(CodegenError::schema(path, "duplicate name"));
        }
        let bit =
            choice_bit(&choice.bit, width).map_err(|reason| CodegenError::schema(&path, reason))?;
        if let Some(other) = bits.insert(bit, choice.name.as_str()) {
            return Err(CodegenError::schema(
                path,
                format!("duplicate bit {bit} (also used by '{other}')"),
            ));
        }
    }
    Ok(())
}

/// Parses a set choice bit index and checks it against the encoding width.
///
/// # Errors
///
/// Returns a description of the problem if the index is not a number below `width`.
pub fn choice_bit(text: &str, width: usize) -> Result<u32, String> {
    let bit: u32 = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid bit index '{text}'"))?;
    if bit as usize >= width {
        return Err(format!("bit {bit} is beyond the {width}-bit encoding"));
    }
    Ok(bit)
}

fn check_body(
    schema: &Schema,
    body: &Body,
    block_length: Option<u16>,
    element: &str,
) -> CodegenResult<()> {
    let mut ids = HashMap::new();
    let mut names = HashSet::new();
    let mut claim = |name: &str, id: u16, path: &str| -> CodegenResult<()> {
        if !names.insert(name.to_string()) {
            return Err(CodegenError::schema(path, "duplicate name in block"));
        }
        if id != 0
            && let Some(other) = ids.insert(id, name.to_string())
        {
            return Err(CodegenError::schema(
                path,
                format!("duplicate id {id} (also used by '{other}')"),
            ));
        }
        Ok(())
    };

    let (members, _) = resolve_fields(schema, &body.fields, block_length, element)?;
    for member in &members {
        claim(member.name, member.id.unwrap_or(0), &member.element)?;
        check_version(schema, member.versioning, &member.element)?;

        if let ResolvedType::Composite(c) = member.kind
            && c.members.iter().any(|m| {
                member_encoded(schema, m).is_some_and(|t| t.length == 0)
            })
        {
            return Err(CodegenError::schema(
                &member.element,
                format!("var-data type '{}' cannot be used as a fixed field", c.name),
            ));
        }
        if let Some(ConstantValue::Literal(text)) = member.constant
            && let ResolvedType::Encoded(t) = member.kind
            && !t.is_text()
        {
            t.primitive.parse_value(text).map_err(|e| {
                CodegenError::schema(&member.element, format!("invalid constant value: {e}"))
            })?;
        }
        if member.is_constant() && member.versioning.since_version > 0 {
            return Err(CodegenError::schema(
                &member.element,
                "constant fields cannot carry a sinceVersion",
            ));
        }
    }

    for group in &body.groups {
        let path = format!("{element} > group '{}'", group.name);
        claim(&group.name, group.id, &path)?;
        check_version(schema, group.versioning, &path)?;
        dimension_shape(schema, &group.dimension_type, &path)?;
        check_body(schema, &group.body, group.block_length, &path)?;
    }

    for data in &body.data {
        let path = format!("{element} > data '{}'", data.name);
        claim(&data.name, data.id, &path)?;
        check_version(schema, data.versioning, &path)?;
        var_data_shape(schema, &data.type_name, &path)?;
        type_length(schema, &data.type_name, &path)?;
    }

    Ok(())
}

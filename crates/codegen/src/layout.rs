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

//! Wire layout of fixed blocks: member offsets, padding and block lengths.
//!
//! A block is the fixed part of a message, of a group element, or a composite. Members are laid
//! out in declaration order; an explicit `offset` opens a zero-filled gap, and a declared
//! `blockLength` larger than the last member leaves trailing padding. Constant members occupy no
//! bytes.

use nautilus_sbe::{CountWidth, PrimitiveType, PrimitiveValue};

use crate::{
    error::{CodegenError, CodegenResult},
    schema::ir::{
        Composite, CompositeMember, EncodedType, EnumDef, Field, MemberKind, Presence,
        ResolvedType, Schema, ValidValue, Versioning,
    },
};

/// Position of one member inside its block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    pub offset: usize,
    pub size: usize,
    /// Zero bytes between the end of the previous member and this one.
    pub padding: usize,
}

/// Computed layout of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockLayout {
    pub slots: Vec<Slot>,
    /// End of the last non-constant member.
    pub fields_end: usize,
    /// Declared block length, or `fields_end` when none is declared.
    pub block_length: usize,
}

impl BlockLayout {
    /// Zero bytes between the last member and the end of the block.
    #[must_use]
    pub const fn trailing_padding(&self) -> usize {
        self.block_length - self.fields_end
    }
}

/// The fixed value of a constant member.
#[derive(Debug, Clone, Copy)]
pub enum ConstantValue<'a> {
    /// Text of a constant encoded type.
    Literal(&'a str),
    /// `valueRef` to an enum value.
    EnumValue(&'a EnumDef, &'a ValidValue),
}

/// A message field or composite member with its type resolved and its slot computed.
#[derive(Debug, Clone)]
pub struct ResolvedMember<'a> {
    pub name: &'a str,
    /// Wire tag; composite members have none.
    pub id: Option<u16>,
    pub kind: ResolvedType<'a>,
    pub presence: Presence,
    pub constant: Option<ConstantValue<'a>>,
    pub versioning: Versioning,
    pub epoch: &'a str,
    pub time_unit: &'a str,
    pub semantic_type: &'a str,
    pub description: &'a str,
    pub slot: Slot,
    /// Diagnostic path of the member.
    pub element: String,
}

impl ResolvedMember<'_> {
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self.presence, Presence::Constant)
    }
}

/// Returns the encoded length of a named type.
///
/// # Errors
///
/// Returns an error if the type or any type it references is undefined, or if composites
/// reference each other cyclically.
pub fn type_length(schema: &Schema, type_name: &str, element: &str) -> CodegenResult<usize> {
    let mut visiting = Vec::new();
    type_length_inner(schema, type_name, element, &mut visiting)
}

fn type_length_inner(
    schema: &Schema,
    type_name: &str,
    element: &str,
    visiting: &mut Vec<String>,
) -> CodegenResult<usize> {
    match schema.resolve(type_name) {
        None => Err(CodegenError::schema(
            element,
            format!("undefined type '{type_name}'"),
        )),
        Some(ResolvedType::Encoded(t)) => Ok(t.encoded_length()),
        Some(ResolvedType::Enum(e)) => {
            let (primitive, _) = schema.encoding_primitive(&e.encoding_type, element)?;
            Ok(primitive.size())
        }
        Some(ResolvedType::Set(s)) => {
            let (primitive, _) = schema.encoding_primitive(&s.encoding_type, element)?;
            Ok(primitive.size())
        }
        Some(ResolvedType::Composite(c)) => {
            if visiting.iter().any(|v| v == &c.name) {
                return Err(CodegenError::schema(
                    format!("composite '{}'", c.name),
                    format!("cyclic reference via {}", visiting.join(" > ")),
                ));
            }
            visiting.push(c.name.clone());
            let mut end = 0;
            for member in &c.members {
                let path = format!("composite '{}' > member '{}'", c.name, member.name);
                let size = match &member.kind {
                    MemberKind::Encoded(t) => t.encoded_length(),
                    MemberKind::Ref(name) => type_length_inner(schema, name, &path, visiting)?,
                };
                if size > 0 {
                    end = member.offset.unwrap_or(end).max(end) + size;
                }
            }
            visiting.pop();
            Ok(end)
        }
    }
}

/// Resolves the members of a composite and lays them out.
///
/// # Errors
///
/// Returns an error for undefined references, overlapping offsets or cyclic composites.
pub fn resolve_composite<'a>(
    schema: &'a Schema,
    composite: &'a Composite,
) -> CodegenResult<(Vec<ResolvedMember<'a>>, BlockLayout)> {
    let parent = format!("composite '{}'", composite.name);
    let mut members = Vec::with_capacity(composite.members.len());
    let mut sizes = Vec::with_capacity(composite.members.len());

    for member in &composite.members {
        let element = format!("{parent} > member '{}'", member.name);
        let (kind, size) = match &member.kind {
            MemberKind::Encoded(t) => (ResolvedType::Encoded(t), t.encoded_length()),
            MemberKind::Ref(name) => {
                let kind = schema.resolve(name).ok_or_else(|| {
                    CodegenError::schema(&element, format!("undefined type '{name}'"))
                })?;
                let size = type_length(schema, name, &element)?;
                (kind, size)
            }
        };
        let (presence, constant) = match kind {
            ResolvedType::Encoded(t) => (
                t.presence,
                t.constant_value.as_deref().map(ConstantValue::Literal),
            ),
            _ => (Presence::Required, None),
        };
        sizes.push((member.offset, size));
        members.push(ResolvedMember {
            name: &member.name,
            id: None,
            kind,
            presence,
            constant,
            versioning: member.versioning,
            epoch: "",
            time_unit: "",
            semantic_type: encoded_semantic_type(kind),
            description: &member.description,
            slot: Slot::default(),
            element,
        });
    }

    let layout = compute_layout(&sizes, None, &parent)?;
    for (member, slot) in members.iter_mut().zip(&layout.slots) {
        member.slot = *slot;
    }
    Ok((members, layout))
}

/// Resolves the fixed fields of a message or group element and lays them out.
///
/// # Errors
///
/// Returns an error for undefined types, unresolvable constants, overlapping offsets, or a
/// declared block length smaller than the fields require.
pub fn resolve_fields<'a>(
    schema: &'a Schema,
    fields: &'a [Field],
    declared_block_length: Option<u16>,
    parent: &str,
) -> CodegenResult<(Vec<ResolvedMember<'a>>, BlockLayout)> {
    let mut members = Vec::with_capacity(fields.len());
    let mut sizes = Vec::with_capacity(fields.len());

    for field in fields {
        let element = format!("{parent} > field '{}'", field.name);
        let kind = schema.resolve(&field.type_name).ok_or_else(|| {
            CodegenError::schema(&element, format!("undefined type '{}'", field.type_name))
        })?;
        let (presence, constant) = resolve_presence(schema, field, kind, &element)?;
        let size = match presence {
            Presence::Constant => 0,
            _ => type_length(schema, &field.type_name, &element)?,
        };
        sizes.push((field.offset, size));
        members.push(ResolvedMember {
            name: &field.name,
            id: Some(field.id),
            kind,
            presence,
            constant,
            versioning: field.versioning,
            epoch: &field.epoch,
            time_unit: &field.time_unit,
            semantic_type: if field.semantic_type.is_empty() {
                encoded_semantic_type(kind)
            } else {
                &field.semantic_type
            },
            description: &field.description,
            slot: Slot::default(),
            element,
        });
    }

    let layout = compute_layout(&sizes, declared_block_length, parent)?;
    for (member, slot) in members.iter_mut().zip(&layout.slots) {
        member.slot = *slot;
    }
    Ok((members, layout))
}

fn encoded_semantic_type(kind: ResolvedType<'_>) -> &str {
    match kind {
        ResolvedType::Encoded(t) => &t.semantic_type,
        ResolvedType::Composite(c) => &c.semantic_type,
        _ => "",
    }
}

fn resolve_presence<'a>(
    schema: &'a Schema,
    field: &'a Field,
    kind: ResolvedType<'a>,
    element: &str,
) -> CodegenResult<(Presence, Option<ConstantValue<'a>>)> {
    let type_presence = match kind {
        ResolvedType::Encoded(t) => t.presence,
        _ => Presence::Required,
    };

    if type_presence == Presence::Constant {
        if field.presence.is_some_and(|p| p != Presence::Constant) {
            return Err(CodegenError::schema(
                element,
                "field presence conflicts with its constant type",
            ));
        }
        let value = match kind {
            ResolvedType::Encoded(EncodedType {
                constant_value: Some(text),
                ..
            }) => text.as_str(),
            _ => return Err(CodegenError::schema(element, "constant field without a value")),
        };
        return Ok((Presence::Constant, Some(ConstantValue::Literal(value))));
    }

    match field.presence.unwrap_or(type_presence) {
        Presence::Constant => {
            let Some(value_ref) = field.value_ref.as_deref() else {
                return Err(CodegenError::schema(element, "constant field without a value"));
            };
            let (enum_def, value) = resolve_value_ref(schema, value_ref, element)?;
            match kind {
                ResolvedType::Enum(e) if e.name == enum_def.name => {}
                ResolvedType::Encoded(t) if !t.is_array() => {}
                _ => {
                    return Err(CodegenError::schema(
                        element,
                        format!("valueRef '{value_ref}' does not match type '{}'", field.type_name),
                    ));
                }
            }
            Ok((
                Presence::Constant,
                Some(ConstantValue::EnumValue(enum_def, value)),
            ))
        }
        presence => Ok((presence, None)),
    }
}

/// Resolves an `Enum.Value` reference.
///
/// # Errors
///
/// Returns an error if the enum or the value does not exist.
pub fn resolve_value_ref<'a>(
    schema: &'a Schema,
    value_ref: &str,
    element: &str,
) -> CodegenResult<(&'a EnumDef, &'a ValidValue)> {
    let unresolvable =
        || CodegenError::schema(element, format!("unresolvable valueRef '{value_ref}'"));
    let (enum_name, value_name) = value_ref.rsplit_once('.').ok_or_else(unresolvable)?;
    let Some(ResolvedType::Enum(enum_def)) = schema.resolve(enum_name) else {
        return Err(unresolvable());
    };
    let value = enum_def
        .values
        .iter()
        .find(|v| v.name == value_name)
        .ok_or_else(unresolvable)?;
    Ok((enum_def, value))
}

/// Lays out members given as `(explicit offset, size)` pairs.
///
/// # Errors
///
/// Returns an error if an explicit offset overlaps the previous member or the declared block
/// length is smaller than the members require.
pub fn compute_layout(
    members: &[(Option<usize>, usize)],
    declared_block_length: Option<u16>,
    element: &str,
) -> CodegenResult<BlockLayout> {
    let mut slots = Vec::with_capacity(members.len());
    let mut end = 0usize;

    for (index, (offset, size)) in members.iter().copied().enumerate() {
        if size == 0 {
            slots.push(Slot {
                offset: end,
                size: 0,
                padding: 0,
            });
            continue;
        }
        let start = match offset {
            Some(offset) if offset < end => {
                return Err(CodegenError::schema(
                    element,
                    format!(
                        "member {} offset {offset} overlaps the previous member ending at {end}",
                        index + 1
                    ),
                ));
            }
            Some(offset) => offset,
            None => end,
        };
        slots.push(Slot {
            offset: start,
            size,
            padding: start - end,
        });
        end = start + size;
    }

    let block_length = match declared_block_length {
        Some(declared) if usize::from(declared) < end => {
            return Err(CodegenError::schema(
                element,
                format!("declared blockLength {declared} is smaller than the computed length {end}"),
            ));
        }
        Some(declared) => usize::from(declared),
        None => end,
    };

    Ok(BlockLayout {
        slots,
        fields_end: end,
        block_length,
    })
}

/// Wire shape of a var-data composite: a length prefix followed by the bytes.
#[derive(Debug, Clone, Copy)]
pub struct VarDataShape<'a> {
    pub composite: &'a Composite,
    pub length: &'a EncodedType,
    pub data: &'a EncodedType,
    pub width: CountWidth,
    /// Declared `maxValue` of the length, else the largest value the prefix can carry.
    pub max_length: u64,
}

impl VarDataShape<'_> {
    /// Returns `true` when the payload is text with a checked character encoding.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.data.primitive == PrimitiveType::Char || self.data.character_encoding.is_some()
    }
}

/// Wire shape of a group dimension composite.
#[derive(Debug, Clone, Copy)]
pub struct DimensionShape<'a> {
    pub composite: &'a Composite,
    pub width: CountWidth,
    /// Declared `maxValue` of `numInGroup`, else the largest count the width can carry.
    pub max_count: u32,
}

/// Resolves the encoded type behind a composite member, following references to named types.
#[must_use]
pub fn member_encoded<'a>(
    schema: &'a Schema,
    member: &'a CompositeMember,
) -> Option<&'a EncodedType> {
    match &member.kind {
        MemberKind::Encoded(t) => Some(t),
        MemberKind::Ref(name) => match schema.resolve(name) {
            Some(ResolvedType::Encoded(t)) => Some(t),
            _ => None,
        },
    }
}

fn named_composite<'a>(
    schema: &'a Schema,
    type_name: &str,
    role: &str,
    element: &str,
) -> CodegenResult<&'a Composite> {
    match schema.resolve(type_name) {
        Some(ResolvedType::Composite(c)) => Ok(c),
        Some(_) => Err(CodegenError::schema(
            element,
            format!("{role} type '{type_name}' is not a composite"),
        )),
        None => Err(CodegenError::schema(
            element,
            format!("undefined {role} type '{type_name}'"),
        )),
    }
}

fn declared_max(t: &EncodedType, representable: u64, element: &str) -> CodegenResult<u64> {
    if t.max_value.is_none() {
        return Ok(representable);
    }
    match t.max()? {
        PrimitiveValue::UInt(max) => Ok(max.min(representable)),
        other => Err(CodegenError::schema(
            element,
            format!("maxValue {other} is not an unsigned count"),
        )),
    }
}

/// Resolves a var-data composite: `length` must be `uint8`, `uint16` or `uint32` and `varData`
/// must be a zero-length `uint8` or `char` array.
///
/// # Errors
///
/// Returns an error if the type is undefined or does not have the var-data shape.
pub fn var_data_shape<'a>(
    schema: &'a Schema,
    type_name: &str,
    element: &str,
) -> CodegenResult<VarDataShape<'a>> {
    let composite = named_composite(schema, type_name, "var-data", element)?;
    let not_var_data = |reason: &str| {
        CodegenError::schema(
            element,
            format!("type '{type_name}' is not a var-data composite: {reason}"),
        )
    };

    let length = composite
        .member("length")
        .and_then(|m| member_encoded(schema, m))
        .ok_or_else(|| not_var_data("missing 'length' member"))?;
    let width = CountWidth::from_primitive(length.primitive)
        .filter(|_| !length.is_array())
        .ok_or_else(|| not_var_data("'length' must be uint8, uint16 or uint32"))?;

    let data = composite
        .member("varData")
        .and_then(|m| member_encoded(schema, m))
        .ok_or_else(|| not_var_data("missing 'varData' member"))?;
    if data.length != 0 || !matches!(data.primitive, PrimitiveType::UInt8 | PrimitiveType::Char) {
        return Err(not_var_data("'varData' must be a uint8 or char array of length 0"));
    }

    Ok(VarDataShape {
        composite,
        length,
        data,
        width,
        max_length: declared_max(length, u64::from(width.max_count()), element)?,
    })
}

/// Resolves a group dimension composite: `blockLength` must be `uint16` and `numInGroup`
/// `uint8`, `uint16` or `uint32`.
///
/// # Errors
///
/// Returns an error if the type is undefined or does not have the dimension shape.
pub fn dimension_shape<'a>(
    schema: &'a Schema,
    type_name: &str,
    element: &str,
) -> CodegenResult<DimensionShape<'a>> {
    let composite = named_composite(schema, type_name, "dimension", element)?;
    let not_dimension = |reason: &str| {
        CodegenError::schema(
            element,
            format!("type '{type_name}' is not a group dimension: {reason}"),
        )
    };

    match composite.member("blockLength").and_then(|m| member_encoded(schema, m)) {
        Some(t) if t.primitive == PrimitiveType::UInt16 && !t.is_array() => {}
        _ => return Err(not_dimension("'blockLength' must be uint16")),
    }
    let count = composite
        .member("numInGroup")
        .and_then(|m| member_encoded(schema, m))
        .filter(|t| !t.is_array())
        .ok_or_else(|| not_dimension("missing 'numInGroup' member"))?;
    let width = CountWidth::from_primitive(count.primitive)
        .ok_or_else(|| not_dimension("'numInGroup' must be uint8, uint16 or uint32"))?;
    let max_count = declared_max(count, u64::from(width.max_count()), element)?;

    Ok(DimensionShape {
        composite,
        width,
        max_count: u32::try_from(max_count).unwrap_or(u32::MAX),
    })
}

/// Checks that the header composite carries the four standard `uint16` members in order.
///
/// # Errors
///
/// Returns an error if the header type is undefined or not the standard 8-byte header.
pub fn check_header(schema: &Schema) -> CodegenResult<()> {
    let element = format!("headerType '{}'", schema.header_type);
    let composite = named_composite(schema, &schema.header_type, "header", &element)?;
    let expected = ["blockLength", "templateId", "schemaId", "version"];

    let names: Vec<&str> = composite.members.iter().map(|m| m.name.as_str()).collect();
    if names != expected {
        return Err(CodegenError::schema(
            element,
            format!("members must be {}, found {}", expected.join(", "), names.join(", ")),
        ));
    }
    for member in &composite.members {
        match member_encoded(schema, member) {
            Some(t) if t.primitive == PrimitiveType::UInt16 && !t.is_array() => {}
            _ => {
                return Err(CodegenError::schema(
                    format!("{element} > member '{}'", member.name),
                    "header members must be uint16",
                ));
            }
        }
    }
    if type_length(schema, &schema.header_type, &element)? != 8 {
        return Err(CodegenError::schema(element, "header must be 8 bytes long"));
    }
    Ok(())
}

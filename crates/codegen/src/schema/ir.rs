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

//! Immutable in-memory model of a parsed SBE message schema.

use indexmap::IndexMap;
use nautilus_sbe::{CharacterEncoding, PrimitiveType, PrimitiveValue};

use crate::error::{CodegenError, CodegenResult};

/// Field presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Presence {
    #[default]
    Required,
    Optional,
    Constant,
}

impl Presence {
    /// Parses the schema spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            "constant" => Some(Self::Constant),
            _ => None,
        }
    }

    /// Returns the schema spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Constant => "constant",
        }
    }
}

/// Version attributes shared by every versioned schema element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Versioning {
    pub since_version: u16,
    /// Version the element was deprecated in, 0 if never.
    pub deprecated: u16,
}

/// The top-level `messageSchema`.
#[derive(Debug, Clone)]
pub struct Schema {
    pub package: String,
    pub id: u16,
    pub version: u16,
    pub semantic_version: String,
    pub description: String,
    pub header_type: String,
    pub types: IndexMap<String, TypeDef>,
    pub messages: Vec<Message>,
}

/// A named type declared in a `<types>` block.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Encoded(EncodedType),
    Composite(Composite),
    Enum(EnumDef),
    Set(SetDef),
}

impl TypeDef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Encoded(t) => &t.name,
            Self::Composite(c) => &c.name,
            Self::Enum(e) => &e.name,
            Self::Set(s) => &s.name,
        }
    }

    /// Returns the schema element kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Encoded(_) => "type",
            Self::Composite(_) => "composite",
            Self::Enum(_) => "enum",
            Self::Set(_) => "set",
        }
    }
}

/// A primitive-backed `<type>`, possibly a fixed-length array.
#[derive(Debug, Clone)]
pub struct EncodedType {
    pub name: String,
    pub primitive: PrimitiveType,
    /// Array length; 1 for scalars, 0 for the `varData` member of a var-data composite.
    pub length: usize,
    pub presence: Presence,
    pub null_value: Option<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    /// Text content of a constant type.
    pub constant_value: Option<String>,
    pub character_encoding: Option<String>,
    pub semantic_type: String,
    pub description: String,
    pub offset: Option<usize>,
    pub versioning: Versioning,
}

impl EncodedType {
    /// Creates a required scalar of `primitive` with no explicit domain.
    #[must_use]
    pub fn primitive(name: &str, primitive: PrimitiveType) -> Self {
        Self {
            name: name.to_string(),
            primitive,
            length: 1,
            presence: Presence::Required,
            null_value: None,
            min_value: None,
            max_value: None,
            constant_value: None,
            character_encoding: None,
            semantic_type: String::new(),
            description: String::new(),
            offset: None,
            versioning: Versioning::default(),
        }
    }

    /// Returns `true` for multi-element arrays.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.length != 1
    }

    /// Returns `true` for `char` arrays, which are treated as text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.primitive == PrimitiveType::Char && self.is_array()
    }

    /// Encoded size in bytes; constants occupy nothing.
    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        match self.presence {
            Presence::Constant => 0,
            _ => self.primitive.size() * self.length,
        }
    }

    /// Returns the declared character encoding, defaulting to US-ASCII for `char`.
    #[must_use]
    pub fn encoding(&self) -> Option<CharacterEncoding> {
        match (&self.character_encoding, self.primitive) {
            (Some(name), _) => Some(CharacterEncoding::from_name(name)),
            (None, PrimitiveType::Char) => Some(CharacterEncoding::UsAscii),
            (None, _) => None,
        }
    }

    /// Resolved null sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared `nullValue` is not representable.
    pub fn null(&self) -> CodegenResult<PrimitiveValue> {
        self.resolve(self.null_value.as_deref(), "nullValue", self.primitive.null_value())
    }

    /// Resolved inclusive lower bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared `minValue` is not representable.
    pub fn min(&self) -> CodegenResult<PrimitiveValue> {
        self.resolve(self.min_value.as_deref(), "minValue", self.primitive.min_value())
    }

    /// Resolved inclusive upper bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared `maxValue` is not representable.
    pub fn max(&self) -> CodegenResult<PrimitiveValue> {
        self.resolve(self.max_value.as_deref(), "maxValue", self.primitive.max_value())
    }

    fn resolve(
        &self,
        literal: Option<&str>,
        attribute: &str,
        default: PrimitiveValue,
    ) -> CodegenResult<PrimitiveValue> {
        match literal {
            None => Ok(default),
            Some(text) => self.primitive.parse_value(text).map_err(|e| {
                CodegenError::schema(format!("type '{}'", self.name), format!("{attribute}: {e}"))
            }),
        }
    }
}

/// A `<composite>` type.
#[derive(Debug, Clone)]
pub struct Composite {
    pub name: String,
    pub description: String,
    pub semantic_type: String,
    pub offset: Option<usize>,
    pub versioning: Versioning,
    pub members: Vec<CompositeMember>,
}

impl Composite {
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&CompositeMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// A member of a composite: an inline encoded type or a reference to a named type.
#[derive(Debug, Clone)]
pub struct CompositeMember {
    pub name: String,
    pub offset: Option<usize>,
    pub versioning: Versioning,
    pub description: String,
    pub kind: MemberKind,
}

#[derive(Debug, Clone)]
pub enum MemberKind {
    Encoded(EncodedType),
    /// Reference to a named enum, set or composite (nested declarations are hoisted).
    Ref(String),
}

/// An `<enum>` type.
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    /// Primitive name or name of an encoded type.
    pub encoding_type: String,
    pub description: String,
    pub offset: Option<usize>,
    pub versioning: Versioning,
    pub values: Vec<ValidValue>,
}

#[derive(Debug, Clone)]
pub struct ValidValue {
    pub name: String,
    /// Raw value text (a number, or a single character for `char` encodings).
    pub value: String,
    pub description: String,
    pub versioning: Versioning,
}

/// A `<set>` (bit set) type.
#[derive(Debug, Clone)]
pub struct SetDef {
    pub name: String,
    pub encoding_type: String,
    pub description: String,
    pub offset: Option<usize>,
    pub versioning: Versioning,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub name: String,
    /// Bit index text.
    pub bit: String,
    pub description: String,
    pub versioning: Versioning,
}

/// A `<message>`.
#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    pub id: u16,
    pub block_length: Option<u16>,
    pub semantic_type: String,
    pub description: String,
    pub versioning: Versioning,
    pub body: Body,
}

/// Fixed fields, then repeating groups, then var-data, in wire order.
#[derive(Debug, Clone, Default)]
pub struct Body {
    pub fields: Vec<Field>,
    pub groups: Vec<Group>,
    pub data: Vec<DataField>,
}

/// A repeating `<group>`.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub id: u16,
    pub dimension_type: String,
    pub block_length: Option<u16>,
    pub semantic_type: String,
    pub description: String,
    pub versioning: Versioning,
    pub body: Body,
}

/// A fixed-block `<field>`.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub id: u16,
    pub type_name: String,
    pub offset: Option<usize>,
    /// Field-level presence; `None` inherits the presence of the type.
    pub presence: Option<Presence>,
    /// `Enum.Value` reference of a constant enum field.
    pub value_ref: Option<String>,
    pub epoch: String,
    pub time_unit: String,
    pub semantic_type: String,
    pub description: String,
    pub versioning: Versioning,
}

/// A variable-length `<data>` field.
#[derive(Debug, Clone)]
pub struct DataField {
    pub name: String,
    pub id: u16,
    pub type_name: String,
    pub semantic_type: String,
    pub description: String,
    pub versioning: Versioning,
}

/// A reference to a field type resolved against the schema.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    Encoded(&'a EncodedType),
    Composite(&'a Composite),
    Enum(&'a EnumDef),
    Set(&'a SetDef),
}

impl Schema {
    /// Resolves a type name. Built-in primitive names are pre-registered by the parser.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ResolvedType<'_>> {
        self.types.get(name).map(|t| match t {
            TypeDef::Encoded(t) => ResolvedType::Encoded(t),
            TypeDef::Composite(c) => ResolvedType::Composite(c),
            TypeDef::Enum(e) => ResolvedType::Enum(e),
            TypeDef::Set(s) => ResolvedType::Set(s),
        })
    }

    /// Resolves the primitive behind an enum or set `encodingType`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is neither a primitive nor an encoded scalar type.
    pub fn encoding_primitive(
        &self,
        encoding_type: &str,
        element: &str,
    ) -> CodegenResult<(PrimitiveType, Option<&EncodedType>)> {
        if let Some(primitive) = PrimitiveType::from_name(encoding_type) {
            return Ok((primitive, None));
        }
        match self.types.get(encoding_type) {
            Some(TypeDef::Encoded(t)) if !t.is_array() => Ok((t.primitive, Some(t))),
            Some(other) => Err(CodegenError::schema(
                element,
                format!(
                    "encodingType '{encoding_type}' is a {} not a scalar type",
                    other.kind()
                ),
            )),
            None => Err(CodegenError::schema(
                element,
                format!("undefined encodingType '{encoding_type}'"),
            )),
        }
    }

    /// Returns the message with the given name.
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }
}

impl EnumDef {
    /// Resolves the null sentinel of the enum encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding type cannot be resolved.
    pub fn null(&self, schema: &Schema) -> CodegenResult<(PrimitiveType, PrimitiveValue)> {
        let element = format!("enum '{}'", self.name);
        let (primitive, encoded) = schema.encoding_primitive(&self.encoding_type, &element)?;
        let null = match encoded {
            Some(t) => t.null()?,
            None => primitive.null_value(),
        };
        Ok((primitive, null))
    }
}

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

//! Rust identifiers for schema names.

use std::collections::HashMap;

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Span};

use crate::error::{CodegenError, CodegenResult};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Prelude items the generated code names without a path.
const PRELUDE: &[&str] = &[
    "Box", "Clone", "Copy", "Default", "Drop", "Eq", "Err", "From", "Into", "Iterator", "None",
    "Ok", "Option", "PartialEq", "Result", "Send", "Sized", "Some", "String", "Sync", "ToString",
    "Vec",
];

fn sanitize(name: String, prefix: &str) -> String {
    let mut name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, prefix);
    }
    if KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// `UpperCamelCase` type name.
#[must_use]
pub fn type_name(name: &str) -> String {
    sanitize(name.to_upper_camel_case(), "T")
}

/// `snake_case` member or function name.
#[must_use]
pub fn member_name(name: &str) -> String {
    sanitize(name.to_snake_case(), "f_")
}

/// `snake_case` name of a metadata accessor, e.g. `type_since_version` for `type`.
///
/// The suffix is joined before keyword escaping so escaped members keep clean accessor names.
#[must_use]
pub fn accessor_name(name: &str, suffix: &str) -> String {
    member_name(&format!("{}_{suffix}", name.to_snake_case()))
}

/// `snake_case` name of a set choice setter.
#[must_use]
pub fn setter_name(name: &str) -> String {
    member_name(&format!("set_{}", name.to_snake_case()))
}

/// `SHOUTY_SNAKE_CASE` constant name.
#[must_use]
pub fn const_name(name: &str) -> String {
    sanitize(name.to_shouty_snake_case(), "C_")
}

/// Enum variant name; the reserved `NullVal` and `Unknown` variants are suffixed.
#[must_use]
pub fn variant_name(name: &str) -> String {
    let name = type_name(name);
    match name.as_str() {
        "NullVal" | "Unknown" => format!("{name}_"),
        _ => name,
    }
}

/// Creates an identifier at the call site.
#[must_use]
pub fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

/// Tracks the identifiers claimed in one Rust namespace and reports collisions.
#[derive(Debug, Default)]
pub struct NameRegistry {
    scope: String,
    claimed: HashMap<String, String>,
}

impl NameRegistry {
    /// Creates a registry for the namespace described by `scope`.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            claimed: HashMap::new(),
        }
    }

    /// Creates the registry for module-level type names, with the prelude items the generated
    /// code relies on already claimed.
    #[must_use]
    pub fn module_types(scope: impl Into<String>) -> Self {
        let mut registry = Self::new(scope);
        for name in PRELUDE {
            registry
                .claimed
                .insert((*name).to_string(), "the Rust prelude".to_string());
        }
        registry
    }

    /// Claims `name` for the schema element `element`.
    ///
    /// # Errors
    ///
    /// Returns an error if another element already generated the same identifier.
    pub fn claim(&mut self, name: &str, element: &str) -> CodegenResult<Ident> {
        if let Some(previous) = self.claimed.get(name) {
            return Err(CodegenError::schema(
                element,
                format!(
                    "generated identifier '{name}' in {} collides with {previous}",
                    self.scope
                ),
            ));
        }
        self.claimed.insert(name.to_string(), element.to_string());
        Ok(ident(name))
    }
}

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

//! Tokens for primitive types, values and their wire accessors.

use nautilus_sbe::{PrimitiveType, PrimitiveValue};
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;

use super::names::ident;

/// The Rust type of a primitive.
#[must_use]
pub fn rust_type(primitive: PrimitiveType) -> TokenStream {
    let ty = ident(primitive.rust_type());
    quote!(#ty)
}

fn read_method(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Char | PrimitiveType::UInt8 => "read_u8",
        PrimitiveType::Int8 => "read_i8",
        PrimitiveType::Int16 => "read_i16_le",
        PrimitiveType::Int32 => "read_i32_le",
        PrimitiveType::Int64 => "read_i64_le",
        PrimitiveType::UInt16 => "read_u16_le",
        PrimitiveType::UInt32 => "read_u32_le",
        PrimitiveType::UInt64 => "read_u64_le",
        PrimitiveType::Float => "read_f32_le",
        PrimitiveType::Double => "read_f64_le",
    }
}

fn write_method(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Char | PrimitiveType::UInt8 => "write_u8",
        PrimitiveType::Int8 => "write_i8",
        PrimitiveType::Int16 => "write_i16_le",
        PrimitiveType::Int32 => "write_i32_le",
        PrimitiveType::Int64 => "write_i64_le",
        PrimitiveType::UInt16 => "write_u16_le",
        PrimitiveType::UInt32 => "write_u32_le",
        PrimitiveType::UInt64 => "write_u64_le",
        PrimitiveType::Float => "write_f32_le",
        PrimitiveType::Double => "write_f64_le",
    }
}

/// `r.read_xx()?` for a primitive.
#[must_use]
pub fn read_expr(primitive: PrimitiveType) -> TokenStream {
    let method = ident(read_method(primitive));
    quote!(r.#method()?)
}

/// `w.write_xx(value)?;` for a primitive.
#[must_use]
pub fn write_stmt(primitive: PrimitiveType, value: &TokenStream) -> TokenStream {
    let method = ident(write_method(primitive));
    quote!(w.#method(#value)?;)
}

/// Zero of a primitive, used as the default of required members.
#[must_use]
pub fn zero(primitive: PrimitiveType) -> TokenStream {
    if primitive.is_float() {
        quote!(0.0)
    } else {
        quote!(0)
    }
}

/// A literal of `value` typed as `primitive`.
///
/// Type bounds are spelled as associated constants (`i64::MIN`, `f32::NAN`) and negative values
/// as a negated unsuffixed literal, so the result is valid in expressions, patterns and const
/// items alike.
#[must_use]
pub fn value_literal(primitive: PrimitiveType, value: PrimitiveValue) -> TokenStream {
    let ty = rust_type(primitive);
    match value {
        PrimitiveValue::Int(v) => {
            let bounds = signed_bounds(primitive);
            if Some(v) == bounds.map(|(min, _)| min) {
                quote!(#ty::MIN)
            } else if Some(v) == bounds.map(|(_, max)| max) {
                quote!(#ty::MAX)
            } else if v < 0 {
                let abs = Literal::u64_unsuffixed(v.unsigned_abs());
                quote!(-#abs)
            } else {
                let lit = Literal::i64_unsuffixed(v);
                quote!(#lit)
            }
        }
        PrimitiveValue::UInt(v) => {
            if primitive == PrimitiveType::Char && (0x20..0x7F).contains(&v) {
                let byte = syn::LitByte::new(v as u8, Span::call_site());
                return quote!(#byte);
            }
            if primitive != PrimitiveType::Char && Some(v) == unsigned_max(primitive) {
                return quote!(#ty::MAX);
            }
            let lit = Literal::u64_unsuffixed(v);
            quote!(#lit)
        }
        PrimitiveValue::Float(v) => float_literal(primitive, v),
    }
}

fn float_literal(primitive: PrimitiveType, v: f64) -> TokenStream {
    let ty = rust_type(primitive);
    let (min, max) = match primitive {
        PrimitiveType::Float => (f64::from(f32::MIN), f64::from(f32::MAX)),
        _ => (f64::MIN, f64::MAX),
    };
    if v.is_nan() {
        quote!(#ty::NAN)
    } else if v == f64::INFINITY {
        quote!(#ty::INFINITY)
    } else if v == f64::NEG_INFINITY {
        quote!(#ty::NEG_INFINITY)
    } else if v == min {
        quote!(#ty::MIN)
    } else if v == max {
        quote!(#ty::MAX)
    } else if v.is_sign_negative() {
        let abs = Literal::f64_unsuffixed(-v);
        quote!(-#abs)
    } else {
        let lit = Literal::f64_unsuffixed(v);
        quote!(#lit)
    }
}

fn signed_bounds(primitive: PrimitiveType) -> Option<(i64, i64)> {
    match primitive {
        PrimitiveType::Int8 => Some((i64::from(i8::MIN), i64::from(i8::MAX))),
        PrimitiveType::Int16 => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
        PrimitiveType::Int32 => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
        PrimitiveType::Int64 => Some((i64::MIN, i64::MAX)),
        _ => None,
    }
}

fn unsigned_max(primitive: PrimitiveType) -> Option<u64> {
    match primitive {
        PrimitiveType::UInt8 => Some(u64::from(u8::MAX)),
        PrimitiveType::UInt16 => Some(u64::from(u16::MAX)),
        PrimitiveType::UInt32 => Some(u64::from(u32::MAX)),
        PrimitiveType::UInt64 => Some(u64::MAX),
        _ => None,
    }
}

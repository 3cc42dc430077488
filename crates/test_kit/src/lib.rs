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

//! Codecs generated at build time from the schemas in `schemas/`.
//!
//! - [`spot_v1`] and [`spot_v2`] are two versions of one order entry schema, used to exercise
//!   schema evolution in both directions.
//! - [`market_data`] mirrors a public exchange stream (trades and top of book).

/// Spot order entry, schema version 1.
#[allow(clippy::all, clippy::pedantic)]
pub mod spot_v1 {
    include!(concat!(env!("OUT_DIR"), "/spot_v1/spot.rs"));
}

/// Spot order entry, schema version 2.
#[allow(clippy::all, clippy::pedantic)]
pub mod spot_v2 {
    include!(concat!(env!("OUT_DIR"), "/spot_v2/spot.rs"));
}

/// Public market data stream events.
#[allow(clippy::all, clippy::pedantic)]
pub mod market_data {
    include!(concat!(env!("OUT_DIR"), "/market_data/market_data.rs"));
}

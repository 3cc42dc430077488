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

use std::{env, path::PathBuf};

use nautilus_sbe_codegen::{CodegenConfig, Generator};

/// Schemas under `schemas/`, each generated into its own `OUT_DIR` subdirectory.
const SCHEMAS: [&str; 3] = ["spot_v1", "spot_v2", "market_data"];

fn main() -> anyhow::Result<()> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let generator = Generator::new(CodegenConfig::default());

    for name in SCHEMAS {
        let schema = PathBuf::from("schemas").join(format!("{name}.xml"));
        println!("cargo:rerun-if-changed={}", schema.display());
        generator.generate_to_dir(&schema, &out_dir.join(name))?;
    }
    Ok(())
}

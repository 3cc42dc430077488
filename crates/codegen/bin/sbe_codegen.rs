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

//! Command line SBE code generator.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sbe-codegen -- schemas/spot.xml --out src/generated --mode modules
//! ```
//!
//! Set `RUST_LOG=debug` to log every generated unit and written file.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nautilus_sbe_codegen::{CodegenConfig, Generator, OutputMode};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// One file for the whole schema.
    Single,
    /// One file per type plus a `mod.rs`.
    Modules,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => Self::SingleFile,
            Mode::Modules => Self::ModulePerType,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sbe-codegen", version, about = "Generate Rust SBE codecs from an XML schema")]
struct Cli {
    /// Path to the SBE XML schema.
    schema: PathBuf,
    /// Output directory.
    #[arg(long, short)]
    out: PathBuf,
    /// Output layout, overriding the configuration file.
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Runtime crate path used by the generated code.
    #[arg(long, env = "SBE_RUNTIME_CRATE")]
    runtime_crate: Option<String>,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip per-field metadata accessors.
    #[arg(long)]
    no_metadata: bool,
}

impl Cli {
    fn codegen_config(&self) -> anyhow::Result<CodegenConfig> {
        let mut config = match &self.config {
            Some(path) => CodegenConfig::from_json_file(path)?,
            None => CodegenConfig::default(),
        };
        if let Some(mode) = self.mode {
            config.output_mode = mode.into();
        }
        if let Some(runtime_crate) = &self.runtime_crate {
            config.runtime_crate.clone_from(runtime_crate);
        }
        if self.no_metadata {
            config.emit_metadata = false;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let generator = Generator::new(cli.codegen_config()?);

    let written = generator.generate_to_dir(&cli.schema, &cli.out)?;
    for path in &written {
        tracing::info!("Generated {}", path.display());
    }
    tracing::info!(
        schema = %cli.schema.display(),
        files = written.len(),
        "Code generation complete",
    );
    Ok(())
}

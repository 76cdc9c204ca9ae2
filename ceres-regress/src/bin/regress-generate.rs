//! Record reference images
//!
//! Runs each given ROM through the emulator and stores the capture under the
//! expected root, replacing any previous reference.

use anyhow::{Context as _, Result};
use ceres_regress::{Generator, cli::ToolArgs};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regress-generate")]
#[command(about = "Capture test ROMs and store the frames as reference images", long_about = None)]
struct Cli {
    /// Test ROMs to (re)record, each inside the suite root
    #[arg(required = true)]
    roms: Vec<PathBuf>,

    #[command(flatten)]
    tools: ToolArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.tools.init_tracing();

    let generator = Generator::new(cli.tools.executor(), cli.tools.oracle(), cli.tools.layout());

    for rom in &cli.roms {
        let reference = generator
            .generate(rom)
            .with_context(|| format!("Failed to record reference for {}", rom.display()))?;
        println!("{} -> {}", rom.display(), reference.display());
    }

    Ok(())
}

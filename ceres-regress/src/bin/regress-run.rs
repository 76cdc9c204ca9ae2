//! Run the screenshot regression suite
//!
//! Every ROM under the suite root (optionally narrowed by a pattern) is run
//! through the emulator and its capture compared against the recorded
//! reference. Exits with a failure status if any test failed.

use anyhow::{Context as _, Result};
use ceres_regress::{
    Classifier, FailurePolicy, Filter, Harness, Reporter, RomExtensions,
    cli::{ColorMode, ToolArgs},
    discover,
    discovery::DEFAULT_ROM_EXTENSIONS,
};
use clap::Parser;
use std::{io, path::PathBuf, process::ExitCode};

#[derive(Parser)]
#[command(name = "regress-run")]
#[command(about = "Run test ROMs and compare their captures against reference images", long_about = None)]
struct Cli {
    /// Case-insensitive regular expression; only ROM paths matching it are run
    pattern: Option<String>,

    #[command(flatten)]
    tools: ToolArgs,

    /// ROM file extension to pick up (repeatable)
    #[arg(long = "extension", value_name = "EXT", default_values = DEFAULT_ROM_EXTENSIONS)]
    extensions: Vec<String>,

    /// Score emulator crashes as FAIL instead of aborting the run
    #[arg(short, long)]
    keep_going: bool,

    /// Also write the results as JSON to this file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Colorize the report
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli.tools.init_tracing();

    let layout = cli.tools.layout();
    let filter = cli
        .pattern
        .as_deref()
        .map(Filter::new)
        .transpose()
        .context("Failed to compile test pattern")?;
    let extensions = RomExtensions::new(&cli.extensions);

    let cases = discover(&layout, &extensions, filter.as_ref()).context("Failed to discover tests")?;

    let policy = if cli.keep_going {
        FailurePolicy::Score
    } else {
        FailurePolicy::Abort
    };
    let harness = Harness::new(
        cli.tools.executor(),
        Classifier::new(cli.tools.oracle()),
        layout,
    )
    .with_policy(policy);

    let mut reporter = Reporter::new(io::stdout().lock(), cli.color.enabled());
    let record = harness
        .run(cases, &mut reporter)
        .context("Test run aborted")?;
    let summary = reporter.finish().context("Failed to write report")?;

    if let Some(path) = &cli.json {
        record
            .write_json(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

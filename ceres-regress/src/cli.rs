//! Command line options shared by `regress-run` and `regress-generate`.

use crate::{
    emulator::{DEFAULT_EMULATOR, EmulatorBinary},
    executor::Executor,
    layout::{DEFAULT_EXPECTED_ROOT, DEFAULT_SUITE_ROOT, Layout, REFERENCE_EXTENSION},
    oracle::{ImageMagick, NativeOracle, Oracle},
};
use std::{
    io::{self, IsTerminal as _},
    path::PathBuf,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OracleKind {
    /// ImageMagick `compare` and `convert`
    #[default]
    Imagemagick,
    /// Built-in comparison, no external tools
    Native,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `Auto` colors only a terminal, and honours `NO_COLOR`.
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
                    && io::stdout().is_terminal()
            }
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ToolArgs {
    #[arg(
        long,
        env = "CERES_REGRESS_EMULATOR",
        default_value = DEFAULT_EMULATOR,
        help = "Emulator executable, run as `<emulator> --test --test-output <bmp> <rom>`"
    )]
    pub emulator: PathBuf,
    #[arg(
        long,
        env = "CERES_REGRESS_SUITE",
        default_value = DEFAULT_SUITE_ROOT,
        help = "Directory holding the test ROMs"
    )]
    pub suite_root: PathBuf,
    #[arg(
        long,
        env = "CERES_REGRESS_EXPECTED",
        default_value = DEFAULT_EXPECTED_ROOT,
        help = "Directory holding the reference images, mirroring the suite root"
    )]
    pub expected_root: PathBuf,
    #[arg(
        long,
        default_value = REFERENCE_EXTENSION,
        help = "Image format of the reference images"
    )]
    pub reference_extension: String,
    #[arg(
        long,
        env = "CERES_REGRESS_ORACLE",
        value_enum,
        default_value_t = OracleKind::default(),
        help = "Image comparison backend"
    )]
    pub oracle: OracleKind,
    #[arg(
        long,
        env = "CERES_REGRESS_COMPARE",
        default_value = "compare",
        help = "ImageMagick compare executable"
    )]
    pub compare: PathBuf,
    #[arg(
        long,
        env = "CERES_REGRESS_CONVERT",
        default_value = "convert",
        help = "ImageMagick convert executable"
    )]
    pub convert: PathBuf,
    #[arg(
        long,
        env = "CERES_REGRESS_TIMEOUT",
        value_name = "SECS",
        help = "Kill any emulator or image tool still running after this many seconds"
    )]
    pub timeout: Option<u64>,
    #[arg(
        long,
        env = "CERES_REGRESS_CAPTURE_DIR",
        help = "Where to put temporary captures instead of the system temp directory"
    )]
    pub capture_dir: Option<PathBuf>,
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "More logging on stderr (-v info, -vv debug); RUST_LOG overrides"
    )]
    pub verbose: u8,
}

impl ToolArgs {
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::new(&self.suite_root, &self.expected_root)
            .with_reference_extension(&self.reference_extension)
    }

    #[must_use]
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    #[must_use]
    pub fn executor(&self) -> Executor<EmulatorBinary> {
        let emulator = EmulatorBinary::new(&self.emulator).with_timeout(self.timeout());
        Executor::new(emulator).with_capture_dir(self.capture_dir.clone())
    }

    #[must_use]
    pub fn oracle(&self) -> Oracle {
        match self.oracle {
            OracleKind::Imagemagick => Oracle::ImageMagick(
                ImageMagick::new(&self.compare, &self.convert).with_timeout(self.timeout()),
            ),
            OracleKind::Native => Oracle::Native(NativeOracle),
        }
    }

    /// Install the stderr log subscriber. Stdout is left to the report.
    pub fn init_tracing(&self) {
        let default = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }
}

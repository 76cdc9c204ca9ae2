//! Screenshot regression harness for the Ceres Game Boy emulator
//!
//! Every test ROM under the suite root is run through the emulator in test
//! mode, which dumps the final frame to a bitmap. That capture is compared
//! against a reference image recorded earlier and the ROM is scored:
//!
//! - `PASS`: pixel identical to the reference
//! - `FAIL`: different, or the reference can't be compared
//! - `XFAIL`: no reference recorded yet
//! - `XPASS`: reserved for tests expected to fail that start passing
//!
//! `regress-run` runs the suite and prints a report grouped by suite.
//! `regress-generate` (re)records references for the ROMs it is given.

pub mod classifier;
pub mod cli;
pub mod discovery;
pub mod emulator;
mod error;
pub mod executor;
pub mod generator;
pub mod layout;
pub mod oracle;
pub mod outcome;
pub mod process;
pub mod record;
pub mod report;
pub mod runner;

pub use classifier::{Classifier, judge};
pub use discovery::{Filter, RomExtensions, TestCase, discover};
pub use emulator::{Emulator, EmulatorBinary};
pub use error::{Error, Result};
pub use executor::{Capture, Executor};
pub use generator::Generator;
pub use layout::Layout;
pub use oracle::{Comparison, ImageMagick, ImageOracle, NativeOracle, Oracle};
pub use outcome::{Outcome, RunSummary};
pub use record::RunRecord;
pub use report::Reporter;
pub use runner::{FailurePolicy, Harness};

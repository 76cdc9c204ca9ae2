//! Image comparison and conversion.
//!
//! The harness never looks at pixels itself, it asks an oracle. The default
//! oracle shells out to ImageMagick; [`NativeOracle`] does the same job in
//! process with the `image` crate and reports in the same textual format.

use crate::{
    error::{Error, Result},
    process::Invocation,
};
use image::{ImageBuffer, Rgba};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::warn;

/// Metric text printed for two identical images.
///
/// Matched exactly, except that a trailing newline from the tool is ignored.
pub const IDENTICAL: &str = "0 (0)";

/// What the comparison oracle had to say about a capture/reference pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// The images were comparable; holds the metric text, e.g. `"0 (0)"`.
    Measured(String),
    /// The oracle could not compare them; holds its diagnostic.
    Failed(String),
}

pub trait ImageOracle {
    /// Root-mean-square error between `capture` and `reference`.
    ///
    /// Tool failures are part of the answer, not errors.
    fn compare(&self, capture: &Path, reference: &Path) -> Comparison;

    /// Re-encode `capture` as `reference`, format chosen by its extension.
    fn convert(&self, capture: &Path, reference: &Path) -> Result<()>;
}

/// ImageMagick's `compare` and `convert` executables.
#[derive(Clone, Debug)]
pub struct ImageMagick {
    compare: PathBuf,
    convert: PathBuf,
    timeout: Option<Duration>,
}

impl Default for ImageMagick {
    #[inline]
    fn default() -> Self {
        Self::new("compare", "convert")
    }
}

impl ImageMagick {
    #[must_use]
    #[inline]
    pub fn new(compare: impl Into<PathBuf>, convert: impl Into<PathBuf>) -> Self {
        Self {
            compare: compare.into(),
            convert: convert.into(),
            timeout: None,
        }
    }

    #[must_use]
    #[inline]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ImageOracle for ImageMagick {
    fn compare(&self, capture: &Path, reference: &Path) -> Comparison {
        let invocation = Invocation::new(&self.compare)
            .arg("-metric")
            .arg("rmse")
            .arg(capture)
            .arg(reference)
            .arg("null:")
            .timeout(self.timeout);

        match invocation.run() {
            Ok(finished) if finished.success() => Comparison::Measured(finished.output),
            Ok(finished) => Comparison::Failed(finished.output),
            Err(err) => {
                warn!(command = %invocation.command_line(), %err, "comparison did not run");
                Comparison::Failed(err.to_string())
            }
        }
    }

    fn convert(&self, capture: &Path, reference: &Path) -> Result<()> {
        let finished = Invocation::new(&self.convert)
            .arg(capture)
            .arg(reference)
            .timeout(self.timeout)
            .run()?;

        if finished.success() {
            Ok(())
        } else {
            Err(Error::Tool {
                program: self.convert.clone(),
                status: finished.status,
                output: finished.output,
            })
        }
    }
}

/// In-process oracle backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeOracle;

type Rgba16 = ImageBuffer<Rgba<u16>, Vec<u16>>;

fn open_rgba16(path: &Path) -> core::result::Result<Rgba16, String> {
    image::open(path)
        .map(|img| img.to_rgba16())
        .map_err(|err| format!("unable to read {}: {err}", path.display()))
}

/// Format like ImageMagick's `%g`: six significant decimals, no trailing zeros.
fn significant(value: f64) -> String {
    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    if trimmed == "0" && value > 0.0 {
        format!("{value:e}")
    } else {
        trimmed.to_owned()
    }
}

/// Absolute (16-bit quantum) and normalised RMSE over all RGBA samples.
#[expect(clippy::cast_precision_loss)]
fn rmse(a: &Rgba16, b: &Rgba16) -> Option<(f64, f64)> {
    let squared: u128 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = u128::from(x.abs_diff(y));
            d * d
        })
        .sum();

    if squared == 0 {
        return None;
    }

    let samples = a.as_raw().len() as f64;
    let quantum = f64::from(u16::MAX);
    let normalised = ((squared as f64) / samples).sqrt() / quantum;

    Some((normalised * quantum, normalised))
}

impl ImageOracle for NativeOracle {
    fn compare(&self, capture: &Path, reference: &Path) -> Comparison {
        let (capture, reference) = match (open_rgba16(capture), open_rgba16(reference)) {
            (Ok(capture), Ok(reference)) => (capture, reference),
            (Err(reason), _) | (_, Err(reason)) => return Comparison::Failed(reason),
        };

        if capture.dimensions() != reference.dimensions() {
            let (cw, ch) = capture.dimensions();
            let (rw, rh) = reference.dimensions();
            return Comparison::Failed(format!(
                "image widths or heights differ: {cw}x{ch} vs {rw}x{rh}"
            ));
        }

        match rmse(&capture, &reference) {
            None => Comparison::Measured(IDENTICAL.to_owned()),
            Some((absolute, normalised)) => Comparison::Measured(format!(
                "{} ({})",
                significant(absolute),
                significant(normalised)
            )),
        }
    }

    fn convert(&self, capture: &Path, reference: &Path) -> Result<()> {
        image::open(capture)?.save(reference)?;
        Ok(())
    }
}

/// Either oracle, picked at runtime.
#[derive(Clone, Debug)]
pub enum Oracle {
    ImageMagick(ImageMagick),
    Native(NativeOracle),
}

impl ImageOracle for Oracle {
    fn compare(&self, capture: &Path, reference: &Path) -> Comparison {
        match self {
            Self::ImageMagick(oracle) => oracle.compare(capture, reference),
            Self::Native(oracle) => oracle.compare(capture, reference),
        }
    }

    fn convert(&self, capture: &Path, reference: &Path) -> Result<()> {
        match self {
            Self::ImageMagick(oracle) => oracle.convert(capture, reference),
            Self::Native(oracle) => oracle.convert(capture, reference),
        }
    }
}

//! Turning a capture and a reference into an [`Outcome`].
//!
//! A failed comparison is ambiguous between "the images differ in a way the
//! oracle can't measure" and "nobody recorded a reference yet". The reference
//! is probed up front to tell the two apart:
//!
//! | reference | oracle                 | outcome |
//! | --------- | ---------------------- | ------- |
//! | missing   | (not consulted)        | `XFAIL` |
//! | present   | measured `0 (0)`       | `PASS`  |
//! | present   | measured anything else | `FAIL`  |
//! | present   | failed to compare      | `FAIL`  |

use crate::{
    oracle::{Comparison, IDENTICAL, ImageOracle},
    outcome::Outcome,
};
use std::path::Path;
use tracing::{debug, info};

/// Verdict for a comparison against a reference known to exist.
///
/// Equality is exact: any nonzero error, however small, fails.
#[must_use]
pub fn judge(comparison: &Comparison) -> Outcome {
    match comparison {
        Comparison::Measured(metric) if metric.trim_end_matches(['\r', '\n']) == IDENTICAL => {
            Outcome::Pass
        }
        Comparison::Measured(_) | Comparison::Failed(_) => Outcome::Fail,
    }
}

pub struct Classifier<O> {
    oracle: O,
}

impl<O: ImageOracle> Classifier<O> {
    #[inline]
    pub const fn new(oracle: O) -> Self {
        Self { oracle }
    }

    #[inline]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn classify(&self, capture: &Path, reference: &Path) -> Outcome {
        if !reference.is_file() {
            debug!(reference = %reference.display(), "no reference recorded");
            return Outcome::Xfail;
        }

        let comparison = self.oracle.compare(capture, reference);
        let outcome = judge(&comparison);

        match &comparison {
            Comparison::Measured(metric) => {
                info!(reference = %reference.display(), metric = metric.trim(), %outcome, "compared");
            }
            Comparison::Failed(reason) => {
                info!(reference = %reference.display(), reason = reason.trim(), %outcome, "comparison failed");
            }
        }

        outcome
    }
}

use core::fmt;
use serde::Serialize;

/// Verdict for a single test ROM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// Capture is pixel identical to the reference.
    Pass,
    /// Capture differs from the reference, or the reference is unusable.
    Fail,
    /// No reference has been recorded yet.
    Xfail,
    /// A test expected to fail passed. Never produced by the classifier.
    Xpass,
}

impl Outcome {
    #[must_use]
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Xfail => "XFAIL",
            Self::Xpass => "XPASS",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Per-outcome counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: u32,
    pub failed: u32,
    pub xfailed: u32,
    pub xpassed: u32,
}

impl RunSummary {
    #[inline]
    pub const fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Xfail => self.xfailed += 1,
            Outcome::Xpass => self.xpassed += 1,
        }
    }

    #[must_use]
    #[inline]
    pub const fn total(&self) -> u32 {
        self.passed + self.failed + self.xfailed + self.xpassed
    }

    /// True when nothing failed. Expected failures don't count.
    #[must_use]
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counters = [
            (self.passed, "passed"),
            (self.failed, "failed"),
            (self.xfailed, "xfailed"),
            (self.xpassed, "xpassed"),
        ];

        let mut first = true;
        for (count, label) in counters {
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{count} {label}")?;
        }

        Ok(())
    }
}

//! The main loop: capture, classify, report, one ROM at a time.

use crate::{
    classifier::Classifier,
    discovery::TestCase,
    emulator::Emulator,
    error::Result,
    executor::Executor,
    layout::Layout,
    oracle::ImageOracle,
    outcome::Outcome,
    record::RunRecord,
    report::Reporter,
};
use std::{io::Write, path::PathBuf};
use tracing::{info, warn};

/// What to do when the emulator itself fails on a ROM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole run; a broken emulator invalidates every result.
    #[default]
    Abort,
    /// Score the ROM as `FAIL` and carry on with the next one.
    Score,
}

pub struct Harness<E, O> {
    executor: Executor<E>,
    classifier: Classifier<O>,
    layout: Layout,
    policy: FailurePolicy,
}

impl<E: Emulator, O: ImageOracle> Harness<E, O> {
    #[inline]
    pub const fn new(executor: Executor<E>, classifier: Classifier<O>, layout: Layout) -> Self {
        Self {
            executor,
            classifier,
            layout,
            policy: FailurePolicy::Abort,
        }
    }

    #[must_use]
    #[inline]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one case. Returns the reference it was judged against and the verdict.
    pub fn evaluate(&self, case: &TestCase) -> Result<(PathBuf, Outcome)> {
        let reference = self.layout.reference_path(&case.path)?;

        let capture = match self.executor.capture(&case.path) {
            Ok(capture) => capture,
            Err(err) if self.policy == FailurePolicy::Score => {
                warn!(rom = %case.path.display(), %err, "emulator failed, scoring as FAIL");
                return Ok((reference, Outcome::Fail));
            }
            Err(err) => return Err(err),
        };

        let outcome = self.classifier.classify(capture.path(), &reference);

        Ok((reference, outcome))
    }

    /// Evaluate `cases` in order, reporting each as soon as it is judged.
    pub fn run<W: Write>(
        &self,
        cases: Vec<TestCase>,
        reporter: &mut Reporter<W>,
    ) -> Result<RunRecord> {
        if !self.layout.expected_root().is_dir() {
            warn!(
                expected = %self.layout.expected_root().display(),
                "expected root does not exist, every test will be XFAIL"
            );
        }

        info!(count = cases.len(), "running tests");

        let mut record = RunRecord::default();
        for case in cases {
            let (reference, outcome) = self.evaluate(&case)?;
            reporter.record(&case, outcome)?;
            record.push(case, reference, outcome);
        }

        Ok(record)
    }
}

//! Machine readable record of a run, for CI dashboards and diffing runs.

use crate::{
    discovery::TestCase,
    error::Result,
    outcome::{Outcome, RunSummary},
};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

/// Schema version of the JSON record.
pub const RECORD_VERSION: &str = "1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    #[serde(flatten)]
    pub case: TestCase,
    pub reference: PathBuf,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub version: &'static str,
    pub results: Vec<CaseRecord>,
    pub summary: RunSummary,
}

impl Default for RunRecord {
    #[inline]
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            results: Vec::new(),
            summary: RunSummary::default(),
        }
    }
}

impl RunRecord {
    pub fn push(&mut self, case: TestCase, reference: PathBuf, outcome: Outcome) {
        self.summary.record(outcome);
        self.results.push(CaseRecord {
            case,
            reference,
            outcome,
        });
    }

    /// Write the record as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let mut record = RunRecord::default();
        record.push(
            TestCase {
                path: PathBuf::from("test/suite/timer/tim00.gb"),
                suite: "timer".to_owned(),
                name: "tim00".to_owned(),
            },
            PathBuf::from("test/expected/timer/tim00.png"),
            Outcome::Xfail,
        );

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["version"], "1");
        assert_eq!(value["results"][0]["suite"], "timer");
        assert_eq!(value["results"][0]["name"], "tim00");
        assert_eq!(value["results"][0]["outcome"], "XFAIL");
        assert_eq!(
            value["results"][0]["reference"],
            "test/expected/timer/tim00.png"
        );
        assert_eq!(value["summary"]["xfailed"], 1);
        assert_eq!(value["summary"]["passed"], 0);
    }

    #[test]
    fn written_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        RunRecord::default().write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["results"], serde_json::json!([]));
    }
}

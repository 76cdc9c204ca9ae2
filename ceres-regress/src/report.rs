//! Suite-grouped, human readable report.
//!
//! ```text
//! ------------------------------- blargg/cpu_instrs -------------------------------
//! 01-special                                                                 PASS
//! 02-interrupts                                                             XFAIL
//!
//! =========================== 1 passed, 1 xfailed ================================
//! ```

use crate::{
    discovery::TestCase,
    outcome::{Outcome, RunSummary},
};
use colorful::{Color, Colorful as _};
use std::io::{self, Write};

const RULE_WIDTH: usize = 78;
const NAME_WIDTH: usize = 72;
const OUTCOME_WIDTH: usize = 7;

/// Center `text` in a rule of `sep` characters, with a space on either side.
#[must_use]
pub fn banner(text: &str, sep: char) -> String {
    let room = RULE_WIDTH.saturating_sub(text.chars().count());
    let left = room / 2;
    let right = left + room % 2;

    let mut line = String::with_capacity(RULE_WIDTH + 2);
    line.extend(core::iter::repeat_n(sep, left));
    line.push(' ');
    line.push_str(text);
    line.push(' ');
    line.extend(core::iter::repeat_n(sep, right));
    line
}

const fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Pass => Color::Green,
        Outcome::Xfail => Color::DarkGray,
        Outcome::Fail | Outcome::Xpass => Color::Red,
    }
}

pub struct Reporter<W> {
    out: W,
    colored: bool,
    current_suite: Option<String>,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    #[inline]
    pub const fn new(out: W, colored: bool) -> Self {
        Self {
            out,
            colored,
            current_suite: None,
            summary: RunSummary {
                passed: 0,
                failed: 0,
                xfailed: 0,
                xpassed: 0,
            },
        }
    }

    #[inline]
    pub const fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Print the row for `case`, preceded by its suite header when the suite changes.
    pub fn record(&mut self, case: &TestCase, outcome: Outcome) -> io::Result<()> {
        if self.current_suite.as_deref() != Some(case.suite.as_str()) {
            if self.current_suite.is_some() {
                writeln!(self.out)?;
            }
            writeln!(self.out, "{}", banner(&case.suite, '-'))?;
            self.current_suite = Some(case.suite.clone());
        }

        let label = format!("{:>OUTCOME_WIDTH$}", outcome.label());
        if self.colored {
            writeln!(
                self.out,
                "{:<NAME_WIDTH$}{}",
                case.name,
                label.as_str().color(outcome_color(outcome))
            )?;
        } else {
            writeln!(self.out, "{:<NAME_WIDTH$}{label}", case.name)?;
        }

        self.summary.record(outcome);
        Ok(())
    }

    /// Print the summary banner and hand back the counters.
    ///
    /// Nothing is printed when no test was recorded.
    pub fn finish(mut self) -> io::Result<RunSummary> {
        if self.summary.total() > 0 {
            let line = banner(&self.summary.to_string(), '=');
            writeln!(self.out)?;

            if self.colored {
                let color = if self.summary.is_success() {
                    Color::Green
                } else {
                    Color::Red
                };
                writeln!(self.out, "{}", line.as_str().color(color).bold())?;
            } else {
                writeln!(self.out, "{line}")?;
            }
        }

        self.out.flush()?;
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorful::Colorful as _;
    use std::path::PathBuf;

    fn case(suite: &str, name: &str) -> TestCase {
        TestCase {
            path: PathBuf::from(format!("test/suite/{suite}/{name}.gb")),
            suite: suite.to_owned(),
            name: name.to_owned(),
        }
    }

    fn render(rows: &[(TestCase, Outcome)]) -> (String, RunSummary) {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf, false);
        for (case, outcome) in rows {
            reporter.record(case, *outcome).unwrap();
        }
        let summary = reporter.finish().unwrap();
        (String::from_utf8(buf).unwrap(), summary)
    }

    #[test]
    fn banner_centers_text() {
        let line = banner("a", '-');

        assert_eq!(line.len(), 80);
        assert!(line.starts_with(&"-".repeat(38)));
        assert!(line.ends_with(&"-".repeat(39)));
        assert!(line.contains("- a -"));
    }

    #[test]
    fn banner_for_even_text_is_symmetric() {
        assert_eq!(banner("ab", '='), format!("{0} ab {0}", "=".repeat(38)));
    }

    #[test]
    fn banner_never_underflows() {
        let long = "x".repeat(100);

        assert_eq!(banner(&long, '-'), format!(" {long} "));
    }

    #[test]
    fn suites_are_grouped_with_blank_line_between() {
        let (text, _) = render(&[
            (case("a", "one"), Outcome::Pass),
            (case("a", "two"), Outcome::Pass),
            (case("b", "three"), Outcome::Pass),
        ]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], banner("a", '-'));
        assert!(lines[1].starts_with("one "));
        assert!(lines[2].starts_with("two "));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], banner("b", '-'));
        assert!(lines[5].starts_with("three "));
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], banner("3 passed", '='));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn row_is_fixed_width() {
        let (text, _) = render(&[(case("a", "halt_bug"), Outcome::Xfail)]);
        let row = text.lines().nth(1).unwrap();

        assert_eq!(row, format!("{:<72}{:>7}", "halt_bug", "XFAIL"));
        assert_eq!(row.len(), 79);
    }

    #[test]
    fn summary_counts_every_outcome() {
        let (text, summary) = render(&[
            (case("a", "1"), Outcome::Pass),
            (case("a", "2"), Outcome::Xfail),
            (case("a", "3"), Outcome::Fail),
            (case("a", "4"), Outcome::Pass),
            (case("a", "5"), Outcome::Xfail),
            (case("a", "6"), Outcome::Pass),
        ]);

        assert_eq!(summary.to_string(), "3 passed, 1 failed, 2 xfailed");
        assert!(text.ends_with(&format!("{}\n", banner("3 passed, 1 failed, 2 xfailed", '='))));
    }

    #[test]
    fn empty_run_prints_nothing() {
        let (text, summary) = render(&[]);

        assert!(text.is_empty());
        assert_eq!(summary.total(), 0);
    }

    fn render_colored(rows: &[(TestCase, Outcome)]) -> String {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf, true);
        for (case, outcome) in rows {
            reporter.record(case, *outcome).unwrap();
        }
        reporter.finish().unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn painted(text: &str, color: Color) -> String {
        text.color(color).to_string()
    }

    fn painted_bold(text: &str, color: Color) -> String {
        text.color(color).bold().to_string()
    }

    #[test]
    fn row_colors_follow_outcome() {
        let text = render_colored(&[
            (case("a", "1"), Outcome::Pass),
            (case("a", "2"), Outcome::Xfail),
            (case("a", "3"), Outcome::Fail),
            (case("a", "4"), Outcome::Xpass),
        ]);

        assert!(text.contains(&painted("   PASS", Color::Green)));
        assert!(text.contains(&painted("  XFAIL", Color::DarkGray)));
        assert!(text.contains(&painted("   FAIL", Color::Red)));
        assert!(text.contains(&painted("  XPASS", Color::Red)));
        assert!(!text.contains(&painted("  XPASS", Color::Green)));
    }

    #[test]
    fn failing_summary_is_red() {
        let text = render_colored(&[
            (case("a", "1"), Outcome::Pass),
            (case("a", "2"), Outcome::Xfail),
            (case("a", "3"), Outcome::Fail),
            (case("a", "4"), Outcome::Pass),
            (case("a", "5"), Outcome::Xfail),
            (case("a", "6"), Outcome::Pass),
        ]);
        let line = banner("3 passed, 1 failed, 2 xfailed", '=');

        assert!(text.ends_with(&format!("{}\n", painted_bold(&line, Color::Red))));
        assert!(!text.contains(&painted_bold(&line, Color::Green)));
    }

    #[test]
    fn clean_summary_is_green() {
        let text = render_colored(&[
            (case("a", "1"), Outcome::Pass),
            (case("a", "2"), Outcome::Xfail),
            (case("a", "3"), Outcome::Xpass),
        ]);
        let line = banner("1 passed, 1 xfailed, 1 xpassed", '=');

        assert!(text.ends_with(&format!("{}\n", painted_bold(&line, Color::Green))));
        assert!(!text.contains(&painted_bold(&line, Color::Red)));
    }
}

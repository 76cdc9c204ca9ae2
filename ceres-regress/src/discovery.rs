//! Finding test ROMs under the suite root.

use crate::{
    error::{Error, Result},
    layout::Layout,
};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Extensions recognised as test ROMs. `gbc` and `cgb` are aliases of `gb`.
pub const DEFAULT_ROM_EXTENSIONS: [&str; 3] = ["gb", "gbc", "cgb"];

/// One unit of work: a ROM and the names it is reported under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub path: PathBuf,
    pub suite: String,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct RomExtensions(Vec<String>);

impl Default for RomExtensions {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_ROM_EXTENSIONS)
    }
}

impl RomExtensions {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        )
    }

    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy();
            self.0.iter().any(|known| known.eq_ignore_ascii_case(&ext))
        })
    }

    /// File name of `path` with a recognised ROM extension removed.
    #[must_use]
    pub fn test_name(&self, path: &Path) -> String {
        if self.matches(path)
            && let Some(stem) = path.file_stem()
        {
            return stem.to_string_lossy().into_owned();
        }

        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Case-insensitive pattern matched anywhere in a discovered path.
#[derive(Clone, Debug)]
pub struct Filter(Regex);

impl Filter {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self(regex))
    }

    #[must_use]
    #[inline]
    pub fn is_match(&self, path: &Path) -> bool {
        self.0.is_match(&path.to_string_lossy())
    }
}

impl TestCase {
    pub fn new(layout: &Layout, extensions: &RomExtensions, path: PathBuf) -> Result<Self> {
        let suite = layout.suite_name(&path)?;
        let name = extensions.test_name(&path);

        Ok(Self { path, suite, name })
    }
}

/// Walk the suite root and collect every ROM, optionally filtered.
///
/// Directory entries are sorted by file name before descending, so the
/// order is stable across runs and each suite's tests are contiguous.
pub fn discover(
    layout: &Layout,
    extensions: &RomExtensions,
    filter: Option<&Filter>,
) -> Result<Vec<TestCase>> {
    fn collect_roms(dir: &Path, extensions: &RomExtensions, roms: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.and_then(|entry| Ok((entry.path(), entry.file_type()?))))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (path, file_type) in entries {
            // Symlinked directories are not descended into.
            if file_type.is_dir() {
                collect_roms(&path, extensions, roms)?;
            } else if path.is_file() && extensions.matches(&path) {
                roms.push(path);
            } else {
                // Ignore other files and dangling links
            }
        }

        Ok(())
    }

    let root = layout.suite_root();
    fs::read_dir(root).map_err(|err| Error::suite_root(root, err))?;

    let mut roms = Vec::new();
    collect_roms(root, extensions, &mut roms)?;

    let total = roms.len();
    let cases = roms
        .into_iter()
        .filter(|path| filter.is_none_or(|filter| filter.is_match(path)))
        .map(|path| TestCase::new(layout, extensions, path))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        root = %root.display(),
        found = total,
        selected = cases.len(),
        "discovered test roms"
    );

    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    fn names(cases: &[TestCase]) -> Vec<(String, String)> {
        cases
            .iter()
            .map(|case| (case.suite.clone(), case.name.clone()))
            .collect()
    }

    #[test]
    fn walk_is_sorted_and_suite_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        touch(&root, "b/three.gb");
        touch(&root, "a/two.gb");
        touch(&root, "a/one.gb");
        touch(&root, "a/notes.txt");

        let layout = Layout::new(&root, dir.path().join("expected"));
        let cases = discover(&layout, &RomExtensions::default(), None).unwrap();

        assert_eq!(
            names(&cases),
            vec![
                ("a".to_owned(), "one".to_owned()),
                ("a".to_owned(), "two".to_owned()),
                ("b".to_owned(), "three".to_owned()),
            ]
        );
    }

    #[test]
    fn alias_extensions_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        touch(&root, "acid/cgb-acid2.gbc");
        touch(&root, "acid/dmg-acid2.cgb");

        let layout = Layout::new(&root, dir.path().join("expected"));
        let cases = discover(&layout, &RomExtensions::default(), None).unwrap();

        assert_eq!(
            names(&cases),
            vec![
                ("acid".to_owned(), "cgb-acid2".to_owned()),
                ("acid".to_owned(), "dmg-acid2".to_owned()),
            ]
        );
    }

    #[test]
    fn pattern_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        touch(&root, "CPU/op01.gb");
        touch(&root, "timer/t1.gb");

        let layout = Layout::new(&root, dir.path().join("expected"));
        let filter = Filter::new("cpu").unwrap();
        let cases = discover(&layout, &RomExtensions::default(), Some(&filter)).unwrap();

        assert_eq!(names(&cases), vec![("CPU".to_owned(), "op01".to_owned())]);
    }

    #[test]
    fn pattern_matches_full_path() {
        let filter = Filter::new("suite/cpu/.*01").unwrap();

        assert!(filter.is_match(Path::new("test/suite/CPU/op01.gb")));
        assert!(!filter.is_match(Path::new("test/suite/timer/t1.gb")));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(Filter::new("cpu("), Err(Error::Pattern(_))));
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("nope"), dir.path().join("expected"));

        let result = discover(&layout, &RomExtensions::default(), None);

        assert!(matches!(result, Err(Error::SuiteRoot { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        touch(&root, "a/one.gb");
        touch(&dir.path().join("elsewhere"), "two.gb");
        std::os::unix::fs::symlink("..", root.join("a/up")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("elsewhere"), root.join("b")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("elsewhere/two.gb"),
            root.join("a/linked.gb"),
        )
        .unwrap();

        let layout = Layout::new(&root, dir.path().join("expected"));
        let cases = discover(&layout, &RomExtensions::default(), None).unwrap();

        assert_eq!(
            names(&cases),
            vec![
                ("a".to_owned(), "linked".to_owned()),
                ("a".to_owned(), "one".to_owned()),
            ]
        );
    }

    #[test]
    fn unknown_extension_keeps_full_name() {
        let extensions = RomExtensions::new(["gb"]);

        assert_eq!(extensions.test_name(Path::new("a/readme.txt")), "readme.txt");
        assert_eq!(extensions.test_name(Path::new("a/halt_bug.GB")), "halt_bug");
    }
}

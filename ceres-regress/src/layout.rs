//! Where test ROMs live and where their reference images are stored.
//!
//! The expected tree mirrors the suite tree: `test/suite/a/b.gb` is judged
//! against `test/expected/a/b.png`.

use crate::error::{Error, Result};
use std::path::{self, Component, Path, PathBuf};

pub const DEFAULT_SUITE_ROOT: &str = "test/suite";
pub const DEFAULT_EXPECTED_ROOT: &str = "test/expected";
pub const REFERENCE_EXTENSION: &str = "png";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    suite_root: PathBuf,
    expected_root: PathBuf,
    reference_extension: String,
}

impl Default for Layout {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_SUITE_ROOT, DEFAULT_EXPECTED_ROOT)
    }
}

impl Layout {
    #[must_use]
    #[inline]
    pub fn new(suite_root: impl Into<PathBuf>, expected_root: impl Into<PathBuf>) -> Self {
        Self {
            suite_root: suite_root.into(),
            expected_root: expected_root.into(),
            reference_extension: REFERENCE_EXTENSION.to_owned(),
        }
    }

    #[must_use]
    #[inline]
    pub fn with_reference_extension(mut self, extension: &str) -> Self {
        self.reference_extension = extension.trim_start_matches('.').to_owned();
        self
    }

    #[must_use]
    #[inline]
    pub fn suite_root(&self) -> &Path {
        &self.suite_root
    }

    #[must_use]
    #[inline]
    pub fn expected_root(&self) -> &Path {
        &self.expected_root
    }

    /// Path of `rom` relative to the suite root.
    ///
    /// A relative root still matches an absolute ROM path (and the other way
    /// round) once both are resolved against the working directory.
    fn relative(&self, rom: &Path) -> Result<PathBuf> {
        let rom = lexical(rom);
        let root = lexical(&self.suite_root);

        if let Ok(relative) = rom.strip_prefix(&root) {
            return Ok(relative.to_path_buf());
        }

        if rom.is_absolute() != root.is_absolute() {
            let abs_rom = lexical(&path::absolute(&rom)?);
            let abs_root = lexical(&path::absolute(&root)?);

            if let Ok(relative) = abs_rom.strip_prefix(&abs_root) {
                return Ok(relative.to_path_buf());
            }
        }

        Err(Error::OutsideSuiteRoot { path: rom, root })
    }

    /// Reference image for `rom`: the suite root swapped for the expected
    /// root and the ROM extension swapped for the reference extension.
    pub fn reference_path(&self, rom: &Path) -> Result<PathBuf> {
        let relative = self.relative(rom)?;

        Ok(self
            .expected_root
            .join(relative)
            .with_extension(&self.reference_extension))
    }

    /// Suite a ROM belongs to: its directory relative to the suite root.
    /// ROMs sitting directly in the root are grouped under the root's own name.
    pub fn suite_name(&self, rom: &Path) -> Result<String> {
        let relative = self.relative(rom)?;
        let dir = relative.parent().unwrap_or_else(|| Path::new(""));

        if dir.as_os_str().is_empty() {
            let root = lexical(&self.suite_root);
            return Ok(root
                .file_name()
                .map_or_else(|| ".".to_owned(), |name| name.to_string_lossy().into_owned()));
        }

        Ok(dir.to_string_lossy().into_owned())
    }
}

/// Drop `.` components so `./test/suite/x.gb` and `test/suite/x.gb` compare equal.
fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

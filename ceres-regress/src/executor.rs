//! Running one ROM through the emulator into a scoped temporary bitmap.

use crate::{emulator::Emulator, error::Result};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::debug;

/// A captured frame on disk. The file is removed when this is dropped.
#[derive(Debug)]
pub struct Capture {
    path: TempPath,
}

impl Capture {
    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct Executor<E> {
    emulator: E,
    capture_dir: Option<PathBuf>,
}

impl<E: Emulator> Executor<E> {
    #[inline]
    pub const fn new(emulator: E) -> Self {
        Self {
            emulator,
            capture_dir: None,
        }
    }

    /// Allocate captures in `dir` instead of the system temporary directory.
    #[must_use]
    #[inline]
    pub fn with_capture_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.capture_dir = dir;
        self
    }

    #[inline]
    pub const fn emulator(&self) -> &E {
        &self.emulator
    }

    /// Run `rom` and hand back its capture. Emulator failures propagate.
    pub fn capture(&self, rom: &Path) -> Result<Capture> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ceres-regress-").suffix(".bmp");

        let file = match &self.capture_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let path = file.into_temp_path();

        debug!(rom = %rom.display(), capture = %path.display(), "capturing");
        self.emulator.capture(rom, &path)?;

        Ok(Capture { path })
    }
}

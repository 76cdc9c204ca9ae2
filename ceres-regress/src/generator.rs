//! (Re)building the reference corpus.

use crate::{
    emulator::Emulator,
    error::{Error, Result},
    executor::Executor,
    layout::Layout,
    oracle::ImageOracle,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::info;

pub struct Generator<E, O> {
    executor: Executor<E>,
    oracle: O,
    layout: Layout,
}

fn create_parent(reference: &Path) -> Result<()> {
    let Some(parent) = reference.parent() else {
        return Ok(());
    };

    match fs::create_dir_all(parent) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        }),
    }
}

impl<E: Emulator, O: ImageOracle> Generator<E, O> {
    #[inline]
    pub const fn new(executor: Executor<E>, oracle: O, layout: Layout) -> Self {
        Self {
            executor,
            oracle,
            layout,
        }
    }

    /// Capture `rom` and store the frame as its reference image.
    ///
    /// Returns where the reference was written.
    pub fn generate(&self, rom: &Path) -> Result<PathBuf> {
        let reference = self.layout.reference_path(rom)?;
        let capture = self.executor.capture(rom)?;

        create_parent(&reference)?;
        self.oracle.convert(capture.path(), &reference)?;

        info!(rom = %rom.display(), reference = %reference.display(), "reference written");

        Ok(reference)
    }
}

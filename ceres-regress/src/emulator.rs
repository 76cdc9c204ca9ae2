use crate::{
    error::{Error, Result},
    process::Invocation,
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Default emulator executable, looked up on `PATH`.
pub const DEFAULT_EMULATOR: &str = "ceres";

/// Something that can run a test ROM headless and dump its final frame.
pub trait Emulator {
    /// Run `rom` in test mode and write the captured frame to `output` as a bitmap.
    fn capture(&self, rom: &Path, output: &Path) -> Result<()>;
}

/// An emulator binary speaking `--test --test-output <bmp> <rom>`.
#[derive(Clone, Debug)]
pub struct EmulatorBinary {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Default for EmulatorBinary {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_EMULATOR)
    }
}

impl EmulatorBinary {
    #[must_use]
    #[inline]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    #[must_use]
    #[inline]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    #[inline]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Emulator for EmulatorBinary {
    fn capture(&self, rom: &Path, output: &Path) -> Result<()> {
        let finished = Invocation::new(&self.program)
            .arg("--test")
            .arg("--test-output")
            .arg(output)
            .arg(rom)
            .timeout(self.timeout)
            .run()?;

        if finished.success() {
            Ok(())
        } else {
            Err(Error::Emulator {
                rom: rom.to_path_buf(),
                status: finished.status,
                output: finished.output,
            })
        }
    }
}

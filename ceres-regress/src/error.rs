use std::{
    fmt, io,
    path::{Path, PathBuf},
    process::ExitStatus,
    time::Duration,
};

#[derive(Debug)]
pub enum Error {
    CreateDir { path: PathBuf, source: io::Error },
    Emulator { rom: PathBuf, status: ExitStatus, output: String },
    Image(image::ImageError),
    Io(io::Error),
    Json(serde_json::Error),
    Launch { program: PathBuf, source: io::Error },
    OutsideSuiteRoot { path: PathBuf, root: PathBuf },
    Pattern(regex::Error),
    SuiteRoot { path: PathBuf, source: io::Error },
    TimedOut { program: PathBuf, after: Duration },
    Tool { program: PathBuf, status: ExitStatus, output: String },
}

impl Error {
    pub(crate) fn suite_root(path: &Path, source: io::Error) -> Self {
        Self::SuiteRoot {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Launch { source, .. }
            | Self::SuiteRoot { source, .. }
            | Self::Io(source) => Some(source),
            Self::Image(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Pattern(err) => Some(err),
            Self::Emulator { .. }
            | Self::OutsideSuiteRoot { .. }
            | Self::TimedOut { .. }
            | Self::Tool { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "unable to create directory {}: {source}", path.display())
            }
            Self::Emulator {
                rom,
                status,
                output,
            } => {
                write!(f, "emulator failed on {} ({status})", rom.display())?;
                if !output.trim().is_empty() {
                    write!(f, ":\n{}", output.trim_end())?;
                }
                Ok(())
            }
            Self::Image(err) => write!(f, "image error: {err}"),
            Self::Io(err) => write!(f, "os error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Launch { program, source } => {
                write!(f, "unable to launch {}: {source}", program.display())
            }
            Self::OutsideSuiteRoot { path, root } => write!(
                f,
                "{} is not inside the suite root {}",
                path.display(),
                root.display()
            ),
            Self::Pattern(err) => write!(f, "invalid test pattern: {err}"),
            Self::SuiteRoot { path, source } => {
                write!(f, "unable to read suite root {}: {source}", path.display())
            }
            Self::TimedOut { program, after } => write!(
                f,
                "{} did not exit within {}s and was killed",
                program.display(),
                after.as_secs_f32()
            ),
            Self::Tool {
                program,
                status,
                output,
            } => {
                write!(f, "{} failed ({status})", program.display())?;
                if !output.trim().is_empty() {
                    write!(f, ":\n{}", output.trim_end())?;
                }
                Ok(())
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::Pattern(err)
    }
}

pub type Result<T> = core::result::Result<T, Error>;

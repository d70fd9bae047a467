//! Fatal wrapper errors.
//!
//! Anything here ends the run. `main` reports it and exits with
//! [`WrapperError::exit_code`], which carries the OS error code through
//! so the calling build system sees the same status cl.exe would produce.

use clwrap_core::DispatchError;
use std::io;
use std::path::PathBuf;

/// Windows `ERROR_FILE_TOO_LARGE`.
#[cfg(windows)]
pub(crate) const FILE_TOO_LARGE: i32 = 223;
#[cfg(unix)]
pub(crate) const FILE_TOO_LARGE: i32 = libc::EFBIG;
#[cfg(not(any(windows, unix)))]
pub(crate) const FILE_TOO_LARGE: i32 = 1;

/// `ERROR_FILE_NOT_FOUND` and `ENOENT` agree.
const FILE_NOT_FOUND: i32 = 2;

#[derive(Debug)]
pub enum WrapperError {
    /// The `@file` named on the command line could not be read
    ResponseFile { path: PathBuf, source: io::Error },
    /// The file holding the MinGW bin directory is missing or unusable
    BinDirConfig { path: PathBuf, source: io::Error },
    /// No `PATH` entry looks like a Visual C++ bin directory
    CompilerNotFound { marker: String },
    /// The compiler found on `PATH` is this wrapper
    SelfInvocation { path: PathBuf },
    /// `CLWRAP_CONFIG` names a file that cannot be read or parsed
    Settings { path: PathBuf, message: String },
    /// A compiler process could not be run
    Dispatch(DispatchError),
}

impl WrapperError {
    /// Process exit code for this failure. Never 0.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            WrapperError::ResponseFile { source, .. } | WrapperError::BinDirConfig { source, .. } => {
                io_exit_code(source)
            }
            WrapperError::CompilerNotFound { .. } => Some(FILE_NOT_FOUND),
            WrapperError::SelfInvocation { .. } | WrapperError::Settings { .. } => None,
            WrapperError::Dispatch(e) => e.raw_os_error(),
        };
        code.filter(|&c| c != 0).unwrap_or(1)
    }
}

fn io_exit_code(err: &io::Error) -> Option<i32> {
    if err.kind() == io::ErrorKind::FileTooLarge {
        Some(FILE_TOO_LARGE)
    } else {
        err.raw_os_error()
    }
}

impl std::fmt::Display for WrapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapperError::ResponseFile { path, source } => {
                write!(f, "Failed to read response file {}: {}", path.display(), source)
            }
            WrapperError::BinDirConfig { path, source } => {
                write!(
                    f,
                    "Failed to read MinGW bin directory from {}: {}",
                    path.display(),
                    source
                )
            }
            WrapperError::CompilerNotFound { marker } => {
                write!(f, "No PATH entry contains '{}', cannot locate cl.exe", marker)
            }
            WrapperError::SelfInvocation { path } => {
                write!(
                    f,
                    "{} is this wrapper, refusing to invoke it recursively",
                    path.display()
                )
            }
            WrapperError::Settings { path, message } => {
                write!(f, "Invalid settings in {}: {}", path.display(), message)
            }
            WrapperError::Dispatch(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WrapperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WrapperError::ResponseFile { source, .. } | WrapperError::BinDirConfig { source, .. } => {
                Some(source)
            }
            WrapperError::Dispatch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DispatchError> for WrapperError {
    fn from(e: DispatchError) -> Self {
        WrapperError::Dispatch(e)
    }
}

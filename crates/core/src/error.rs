//! Execution failure types.

use std::io;
use std::path::PathBuf;

/// A build step that could not be carried out at all.
///
/// Distinct from a compiler that ran and returned non-zero: these abort the
/// whole batch and there is nothing sensible to retry.
#[derive(Debug)]
pub enum DispatchError {
    /// The child process could not be created
    Spawn { program: PathBuf, source: io::Error },
    /// Waiting for the child process failed
    Wait { program: PathBuf, source: io::Error },
    /// The child ended without an exit code (e.g. killed by a signal)
    NoExitStatus { program: PathBuf, status: String },
}

impl DispatchError {
    /// OS error code behind the failure, if there is one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            DispatchError::Spawn { source, .. } | DispatchError::Wait { source, .. } => {
                source.raw_os_error()
            }
            DispatchError::NoExitStatus { .. } => None,
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Spawn { program, source } => {
                write!(f, "Failed to start {}: {}", program.display(), source)
            }
            DispatchError::Wait { program, source } => {
                write!(f, "Failed waiting for {}: {}", program.display(), source)
            }
            DispatchError::NoExitStatus { program, status } => {
                write!(f, "{} did not report an exit code ({})", program.display(), status)
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Spawn { source, .. } | DispatchError::Wait { source, .. } => {
                Some(source)
            }
            DispatchError::NoExitStatus { .. } => None,
        }
    }
}

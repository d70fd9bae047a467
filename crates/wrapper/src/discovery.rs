//! Compiler discovery
//!
//! cl.exe is located through `PATH` rather than by name: process creation
//! would otherwise find this wrapper first and recurse. gcc.exe cannot be
//! found reliably at all (it need not be on `PATH` or in the registry), so
//! its bin directory is read from a small text file in the working
//! directory.

use crate::config::Settings;
use crate::error::WrapperError;
use crate::response_file::read_decoded;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// First search path entry containing `marker` (ignoring case), joined with `executable`.
pub fn find_in_search_path(search_path: &OsStr, marker: &str, executable: &str) -> Option<PathBuf> {
    let marker = marker.to_lowercase();
    env::split_paths(search_path)
        .find(|dir| dir.to_string_lossy().to_lowercase().contains(&marker))
        .map(|dir| dir.join(executable))
}

/// Locate cl.exe in the given search path (usually `PATH`).
pub fn find_cl(search_path: Option<&OsStr>, settings: &Settings) -> Result<PathBuf, WrapperError> {
    let not_found = || WrapperError::CompilerNotFound {
        marker: settings.cl_path_marker.clone(),
    };

    let Some(search_path) = search_path else {
        warn!("PATH is not set");
        return Err(not_found());
    };

    let cl = find_in_search_path(search_path, &settings.cl_path_marker, &settings.cl_executable)
        .ok_or_else(not_found)?;

    if is_current_exe(&cl) {
        return Err(WrapperError::SelfInvocation { path: cl });
    }

    debug!(path = %cl.display(), "found cl.exe");
    Ok(cl)
}

fn is_current_exe(candidate: &Path) -> bool {
    let Ok(current) = env::current_exe() else {
        return false;
    };
    match (fs::canonicalize(candidate), fs::canonicalize(&current)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Locate gcc.exe from the bin directory file in `working_dir`.
pub fn find_gcc(working_dir: &Path, settings: &Settings) -> Result<PathBuf, WrapperError> {
    let path = working_dir.join(&settings.bindir_file);

    let text = read_decoded(&path).map_err(|source| WrapperError::BinDirConfig {
        path: path.clone(),
        source,
    })?;

    // Editors like to end files with a newline
    let bindir = text.trim_end_matches(['\r', '\n']);
    if bindir.is_empty() {
        return Err(WrapperError::BinDirConfig {
            path,
            source: io::Error::new(io::ErrorKind::InvalidData, "file is empty"),
        });
    }

    let gcc = Path::new(bindir).join(&settings.gcc_executable);
    debug!(path = %gcc.display(), "found gcc.exe");
    Ok(gcc)
}

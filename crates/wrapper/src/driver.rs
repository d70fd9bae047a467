//! Top-level wrapper logic
//!
//! Decides between the two build paths for one cl.exe command line:
//!
//! 1. Expand an `@file` command line.
//! 2. With `/GCCBuild`: locate gcc, translate, run one gcc per `.cpp`.
//! 3. Without it: locate the real cl.exe and hand it the line untouched.

use crate::config::Settings;
use crate::discovery;
use crate::error::WrapperError;
use crate::response_file;
use clwrap_core::{ProcessRunner, has_marker, run_all, synthesize};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

/// Runs one cl.exe command line through the right compiler.
pub struct Driver<R: ProcessRunner> {
    settings: Settings,
    runner: R,
    /// Overrides `PATH` when set
    search_path: Option<OsString>,
    working_dir: PathBuf,
}

impl<R: ProcessRunner> Driver<R> {
    pub fn new(settings: Settings, runner: R) -> Self {
        Driver {
            settings,
            runner,
            search_path: None,
            working_dir: PathBuf::from("."),
        }
    }

    /// Search cl.exe in `search_path` instead of `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Look for the MinGW bin directory file in `dir` instead of the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build with the command line, returning the exit code to report.
    pub fn run(&mut self, command_line: &str) -> Result<i32, WrapperError> {
        let command_line = response_file::expand(command_line)?;

        if has_marker(&command_line) {
            let gcc = discovery::find_gcc(&self.working_dir, &self.settings)?;
            let batch = synthesize(&command_line);
            info!(compiler = %gcc.display(), units = batch.len(), "building with gcc");
            Ok(run_all(&mut self.runner, &gcc, &batch)?)
        } else {
            let search_path = match &self.search_path {
                Some(path) => Some(path.clone()),
                None => env::var_os("PATH"),
            };
            let cl = discovery::find_cl(search_path.as_deref(), &self.settings)?;
            info!(compiler = %cl.display(), "passing through to cl.exe");
            let batch = [command_line.into_owned()];
            Ok(run_all(&mut self.runner, &cl, &batch)?)
        }
    }
}

/// Reassemble separately passed arguments into one command line.
///
/// Arguments containing whitespace, or empty ones, are quoted again.
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.is_empty() || arg.contains([' ', '\t']) {
                format!("\"{}\"", arg)
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Skip the program name at the start of a raw Windows command line.
pub fn strip_program_name(raw: &str) -> &str {
    let rest = match raw.strip_prefix('"') {
        Some(quoted) => quoted.find('"').map_or("", |end| &quoted[end + 1..]),
        None => raw.find([' ', '\t']).map_or("", |end| &raw[end..]),
    };
    rest.trim_start_matches([' ', '\t'])
}

/// The command line this process was started with, minus the program name.
///
/// Windows hands over the exact text the build system wrote, quotes
/// included, which the tokenizer relies on. Elsewhere the already split
/// `args` are joined back together.
#[cfg(windows)]
pub fn process_command_line(_args: &[String]) -> String {
    #[link(name = "kernel32")]
    unsafe extern "system" {
        fn GetCommandLineW() -> *const u16;
    }

    // SAFETY: GetCommandLineW returns a NUL-terminated buffer owned by the
    // process that stays valid and unmodified for its lifetime
    let raw = unsafe {
        let ptr = GetCommandLineW();
        if ptr.is_null() {
            return String::new();
        }
        let mut len = 0;
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    };

    strip_program_name(&raw).to_string()
}

#[cfg(not(windows))]
pub fn process_command_line(args: &[String]) -> String {
    join_args(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_args() {
        assert_eq!(join_args(&["/c", "a.cpp"]), "/c a.cpp");
        assert_eq!(
            join_args(&["/I", "C:\\Program Files\\inc", ""]),
            "/I \"C:\\Program Files\\inc\" \"\""
        );
        assert_eq!(join_args::<&str>(&[]), "");
    }

    #[test]
    fn test_strip_program_name() {
        assert_eq!(strip_program_name("cl.exe /c a.cpp"), "/c a.cpp");
        assert_eq!(
            strip_program_name("\"C:\\VS 10\\cl.exe\"  /GCCBuild a.cpp"),
            "/GCCBuild a.cpp"
        );
        assert_eq!(strip_program_name("\"cl.exe\"/c"), "/c");
        assert_eq!(strip_program_name("cl.exe"), "");
        assert_eq!(strip_program_name("\"unterminated"), "");
    }
}

//! Process execution
//!
//! The dispatcher does not create processes itself, it hands each
//! [`Invocation`] to a [`ProcessRunner`]. [`SystemRunner`] is the real one;
//! tests substitute a recording runner.

use crate::error::DispatchError;
use std::path::Path;
use std::process::{Command, Stdio};

/// One compiler run: the executable and its argument text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub executable: &'a Path,
    pub arguments: &'a str,
}

impl<'a> Invocation<'a> {
    pub fn new(executable: &'a Path, arguments: &'a str) -> Self {
        Invocation {
            executable,
            arguments,
        }
    }

    /// Full command line with the quoted executable as argument zero.
    ///
    /// Compilers read their own name from argv[0], so the program name has
    /// to lead the command line even though the executable is also passed
    /// separately.
    pub fn command_line(&self) -> String {
        format!("\"{}\" {}", self.executable.display(), self.arguments)
    }
}

/// Runs a process to completion and reports its exit code.
pub trait ProcessRunner {
    /// Block until the child exits. `Ok` carries its exit code.
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<i32, DispatchError>;
}

/// Runs invocations with `std::process`, sharing this process's stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<i32, DispatchError> {
        let program = invocation.executable;
        let mut command = Command::new(program);

        // std quotes the program name into argument zero itself, which yields
        // exactly Invocation::command_line
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command
                .raw_arg(invocation.arguments)
                .creation_flags(CREATE_NO_WINDOW);
        }
        #[cfg(not(windows))]
        command.args(split_command_line(invocation.arguments));

        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = command.spawn().map_err(|source| DispatchError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

        let status = child.wait().map_err(|source| DispatchError::Wait {
            program: program.to_path_buf(),
            source,
        })?;

        status.code().ok_or_else(|| DispatchError::NoExitStatus {
            program: program.to_path_buf(),
            status: status.to_string(),
        })
    }
}

/// Split argument text the way the Windows C runtime does.
///
/// Whitespace separates arguments outside double quotes. Backslashes are
/// literal unless they precede a quote: `2n` of them then yield `n` and the
/// quote toggles quoting, `2n + 1` yield `n` and a literal quote.
pub fn split_command_line(command_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quoted = false;
    let mut backslashes = 0usize;

    for c in command_line.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                in_arg = true;
            }
            '"' => {
                current.extend(std::iter::repeat_n('\\', backslashes / 2));
                if backslashes % 2 == 1 {
                    current.push('"');
                } else {
                    quoted = !quoted;
                }
                backslashes = 0;
                in_arg = true;
            }
            ' ' | '\t' if !quoted => {
                current.extend(std::iter::repeat_n('\\', backslashes));
                backslashes = 0;
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            _ => {
                current.extend(std::iter::repeat_n('\\', backslashes));
                backslashes = 0;
                current.push(c);
                in_arg = true;
            }
        }
    }

    current.extend(std::iter::repeat_n('\\', backslashes));
    if in_arg {
        args.push(current);
    }

    args
}

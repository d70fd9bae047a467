//! Sequential build dispatch
//!
//! Runs a batch of command lines against one compiler, strictly in order.
//! The first non-zero exit code stops the batch: later translation units are
//! never attempted, so partial output and diagnostic ordering match what a
//! single cl.exe run would have produced.

use crate::error::DispatchError;
use crate::runner::{Invocation, ProcessRunner};
use std::path::Path;
use tracing::{info, warn};

/// Run every command line with `executable`, stopping at the first failure.
///
/// Returns the failing exit code, or 0 when every step succeeded (including
/// an empty batch). An `Err` means a step could not be run at all.
pub fn run_all<R: ProcessRunner + ?Sized>(
    runner: &mut R,
    executable: &Path,
    command_lines: &[String],
) -> Result<i32, DispatchError> {
    let total = command_lines.len();

    for (index, arguments) in command_lines.iter().enumerate() {
        let invocation = Invocation::new(executable, arguments);
        info!(
            step = index + 1,
            total,
            command_line = %invocation.command_line(),
            "running compiler"
        );

        let status = runner.run(&invocation)?;
        if status != 0 {
            warn!(
                status,
                skipped = total - index - 1,
                "compiler failed, stopping batch"
            );
            return Ok(status);
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    /// Hands out canned exit codes and remembers what it was asked to run.
    struct RecordingRunner {
        statuses: Vec<i32>,
        seen: Vec<String>,
    }

    impl RecordingRunner {
        fn new(statuses: &[i32]) -> Self {
            RecordingRunner {
                statuses: statuses.to_vec(),
                seen: Vec::new(),
            }
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&mut self, invocation: &Invocation<'_>) -> Result<i32, DispatchError> {
            self.seen.push(invocation.command_line());
            Ok(self.statuses[self.seen.len() - 1])
        }
    }

    struct BrokenRunner;

    impl ProcessRunner for BrokenRunner {
        fn run(&mut self, invocation: &Invocation<'_>) -> Result<i32, DispatchError> {
            Err(DispatchError::Spawn {
                program: invocation.executable.to_path_buf(),
                source: io::Error::from_raw_os_error(2),
            })
        }
    }

    fn batch(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_all_succeed() {
        let mut runner = RecordingRunner::new(&[0, 0, 0]);
        let status = run_all(&mut runner, Path::new("gcc"), &batch(&["a", "b", "c"])).unwrap();
        assert_eq!(status, 0);
        assert_eq!(runner.seen, vec!["\"gcc\" a", "\"gcc\" b", "\"gcc\" c"]);
    }

    #[test]
    fn test_halts_on_first_failure() {
        let mut runner = RecordingRunner::new(&[0, 7, 0]);
        let status = run_all(&mut runner, Path::new("gcc"), &batch(&["a", "b", "c"])).unwrap();
        assert_eq!(status, 7);
        assert_eq!(runner.seen, vec!["\"gcc\" a", "\"gcc\" b"]);
    }

    #[test]
    fn test_empty_batch_is_success() {
        let mut runner = RecordingRunner::new(&[]);
        let status = run_all(&mut runner, Path::new("gcc"), &[]).unwrap();
        assert_eq!(status, 0);
        assert!(runner.seen.is_empty());
    }

    #[test]
    fn test_negative_status_is_failure() {
        let mut runner = RecordingRunner::new(&[-1, 0]);
        let status = run_all(&mut runner, Path::new("gcc"), &batch(&["a", "b"])).unwrap();
        assert_eq!(status, -1);
        assert_eq!(runner.seen.len(), 1);
    }

    #[test]
    fn test_execution_failure_aborts() {
        let err = run_all(&mut BrokenRunner, Path::new("gcc"), &batch(&["a", "b"])).unwrap_err();
        match err {
            DispatchError::Spawn { program, .. } => assert_eq!(program, PathBuf::from("gcc")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_runner_behind_trait_object() {
        let mut runner: Box<dyn ProcessRunner> = Box::new(RecordingRunner::new(&[0]));
        let status = run_all(runner.as_mut(), Path::new("gcc"), &batch(&["a"])).unwrap();
        assert_eq!(status, 0);
    }
}

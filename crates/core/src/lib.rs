//! clwrap core: cl.exe to gcc command-line translation
//!
//! This crate holds the pieces of the wrapper that do not touch the host
//! environment directly:
//!
//! - `switches`: static table mapping `cl.exe` switches to `gcc` flags
//! - `synthesizer`: tokenizer and per-translation-unit command line builder
//! - `dispatcher`: sequential batch execution, halting on the first failure
//! - `runner`: the process-execution capability the dispatcher is given
//! - `error`: execution failures that abort a batch
//!
//! ```rust,ignore
//! use clwrap_core::{SystemRunner, run_all, synthesize};
//!
//! let batch = synthesize(r#"/GCCBuild /c /Fo"Debug\\" main.cpp"#);
//! let status = run_all(&mut SystemRunner, gcc_path, &batch)?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod runner;
pub mod switches;
pub mod synthesizer;

pub use dispatcher::run_all;
pub use error::DispatchError;
pub use runner::{Invocation, ProcessRunner, SystemRunner, split_command_line};
pub use switches::{GCC_BUILD_MARKER, SwitchEffect, lookup};
pub use synthesizer::{ScanState, has_marker, synthesize, tokenize};

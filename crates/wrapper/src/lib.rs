//! clwrap: a cl.exe stand-in
//!
//! Installed in place of `cl.exe`, the wrapper inspects each command line it
//! is given. Without `/GCCBuild` the line goes unchanged to the real cl.exe
//! found on `PATH`. With it, the line is translated into one MinGW gcc
//! invocation per `.cpp` file and those run in order, stopping at the first
//! failure.
//!
//! Host-facing concerns live here; the translation itself is in
//! [`clwrap_core`].

pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod response_file;

pub use config::Settings;
pub use driver::{Driver, join_args};
pub use error::WrapperError;

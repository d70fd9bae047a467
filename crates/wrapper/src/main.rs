//! cl.exe stand-in
//!
//! Receives whatever the build system meant for cl.exe and either forwards
//! it or builds with MinGW gcc. All arguments belong to the forwarded
//! command line, so the wrapper has no options of its own.

use clap::Parser as ClapParser;
use clwrap::{Driver, Settings, WrapperError};
use clwrap_core::SystemRunner;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set. stderr carries the
/// compiler's diagnostics, so stay quiet unless asked.
const DEFAULT_LOG_FILTER: &str = "clwrap=warn,clwrap_core=warn";

#[derive(ClapParser)]
#[command(name = "cl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "cl.exe wrapper - build with MinGW gcc when /GCCBuild is given", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// cl.exe command line, or @response-file
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    args: Vec<String>,
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let command_line = clwrap::driver::process_command_line(&cli.args);

    let code = match run(&command_line) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "build aborted");
            eprintln!("cl: {}", e);
            e.exit_code()
        }
    };

    process::exit(code);
}

fn run(command_line: &str) -> Result<i32, WrapperError> {
    let settings = Settings::load()?;
    Driver::new(settings, SystemRunner).run(command_line)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

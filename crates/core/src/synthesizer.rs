//! cl.exe command line to gcc command line synthesis
//!
//! cl.exe compiles any number of translation units per invocation, gcc wants
//! one `-o` per object file. The synthesizer scans the cl.exe command line
//! once, collecting translated flags, the `/Fo` output directory and the
//! `.cpp` operands, then emits one gcc command line per operand.
//!
//! # Tokens
//!
//! A token starts at a delimiter (space, `/` or `"`) and runs up to the next
//! one, so `/c /Iinclude a.cpp` yields `/c`, `/Iinclude` and ` a.cpp`. The
//! delimiter stays attached. Tokens shorter than two characters are the
//! leftovers of adjacent delimiters and are skipped.
//!
//! # Known constraints
//!
//! Switch values are cut at the next delimiter. `/D PATH=a/b` defines
//! `PATH=a`, and quoted include paths containing spaces are lost past the
//! first space. A fully quoted include such as `/I"inc"` leaves a bare `/I`,
//! so gcc gets `-I` with no directory and takes the next flag as one.

use crate::switches::{DEFINE_PREFIX, INCLUDE_PREFIX, OUTPUT_PREFIX, SwitchEffect, lookup};
use std::ops::ControlFlow;
use tracing::debug;

const DELIMITERS: [char; 3] = [' ', '/', '"'];

/// gcc flags every synthesized command line starts with.
pub const BASELINE_FLAGS: &str = "-v --std=c++11";

/// Output directory used when the command line has no `/Fo`.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = ".\\";

/// Marks an operand as a translation unit.
pub const TRANSLATION_UNIT_SUFFIX: &str = ".cpp";

/// Replaces [`TRANSLATION_UNIT_SUFFIX`] in the object file name.
pub const OBJECT_SUFFIX: &str = ".obj";

/// Where the scanner is relative to the last recognized switch.
///
/// A `/D` or `/Fo` value is taken from exactly one token, after which the
/// scanner is back in [`ScanState::Scanning`]. The switch does not stay
/// pending until the next recognized one, so `/D _CONSOLE /Gm` yields
/// `-D_CONSOLE` rather than `-D_CONSOLEGm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No switch recognized yet
    Initial,
    /// Between switches
    Scanning,
    /// Last switch was `/D`, next unrecognized token is the macro
    AwaitingDefineValue,
    /// Last switch was `/Fo`, next unrecognized token is the output directory
    AwaitingOutputValue,
}

impl ScanState {
    fn after_switch(effect: SwitchEffect) -> Self {
        match effect {
            SwitchEffect::Define => ScanState::AwaitingDefineValue,
            SwitchEffect::Output => ScanState::AwaitingOutputValue,
            SwitchEffect::Drop | SwitchEffect::Direct(_) => ScanState::Scanning,
        }
    }
}

/// Split a cl.exe command line into tokens, delimiter included.
pub fn tokenize(command_line: &str) -> impl Iterator<Item = &str> + '_ {
    let mut starts = command_line
        .match_indices(DELIMITERS)
        .map(|(index, _)| index)
        .peekable();

    std::iter::from_fn(move || {
        loop {
            let start = starts.next()?;
            let end = starts.peek().copied().unwrap_or(command_line.len());
            let token = &command_line[start..end];
            if token.chars().nth(1).is_some() {
                return Some(token);
            }
        }
    })
}

/// Check whether the command line asks for a gcc build.
pub fn has_marker(command_line: &str) -> bool {
    tokenize(command_line).any(|token| token == crate::GCC_BUILD_MARKER)
}

/// Accumulated translation for one command line.
#[derive(Debug)]
struct TranslationState {
    target_flags: String,
    output_directory: String,
    source_files: Vec<String>,
    scan: ScanState,
}

impl TranslationState {
    fn new() -> Self {
        TranslationState {
            target_flags: BASELINE_FLAGS.to_string(),
            output_directory: DEFAULT_OUTPUT_DIRECTORY.to_string(),
            source_files: Vec::new(),
            scan: ScanState::Initial,
        }
    }

    /// Feed one token. Breaks when the line cannot be a cl.exe command line.
    fn accept(&mut self, token: &str) -> ControlFlow<()> {
        if let Some(effect) = lookup(token) {
            self.target_flags.push_str(effect.fragment());
            self.scan = ScanState::after_switch(effect);
            return ControlFlow::Continue(());
        }

        if self.scan == ScanState::Initial {
            return ControlFlow::Break(());
        }

        // Every token starts with its one-character delimiter
        let value = &token[1..];

        if self.scan == ScanState::AwaitingDefineValue {
            debug!(define = value, "macro definition");
            self.target_flags.push_str(value);
            self.scan = ScanState::Scanning;
        } else if token.contains(TRANSLATION_UNIT_SUFFIX) {
            debug!(source = value, "translation unit");
            self.source_files.push(value.to_string());
        } else if token.starts_with(INCLUDE_PREFIX) {
            debug!(include = &value[1..], "include path");
            self.target_flags.push_str(" -");
            self.target_flags.push_str(value);
        } else if let Some(define) = token.strip_prefix(DEFINE_PREFIX) {
            debug!(define, "glued macro definition");
            self.target_flags.push_str(SwitchEffect::Define.fragment());
            self.target_flags.push_str(define);
        } else if self.scan == ScanState::AwaitingOutputValue {
            debug!(output_directory = value, "output directory");
            self.output_directory = value.to_string();
            self.scan = ScanState::Scanning;
        } else if let Some(directory) = token.strip_prefix(OUTPUT_PREFIX) {
            debug!(output_directory = directory, "glued output directory");
            self.output_directory = directory.to_string();
        } else {
            debug!(token, "ignoring unrecognized token");
        }

        ControlFlow::Continue(())
    }

    fn into_command_lines(self) -> Vec<String> {
        let mut flags = self.target_flags;
        flags.push_str(" -o ");
        flags.push_str(&self.output_directory);

        self.source_files
            .iter()
            .map(|source| format!("{}{} {}", flags, object_file_name(source), source))
            .collect()
    }
}

/// `src\widget.cpp` becomes `widget.obj`.
fn object_file_name(source: &str) -> String {
    let base = source
        .rfind('\\')
        .map_or(source, |separator| &source[separator + 1..]);
    let stem = base
        .find(TRANSLATION_UNIT_SUFFIX)
        .map_or(base, |suffix| &base[..suffix]);
    format!("{}{}", stem, OBJECT_SUFFIX)
}

/// Translate a cl.exe command line into one gcc command line per `.cpp` file.
///
/// Lines come back in the order the files appear in the input. The result is
/// empty when there are no `.cpp` operands, or when the input starts with a
/// token that is not a known switch.
pub fn synthesize(command_line: &str) -> Vec<String> {
    let mut state = TranslationState::new();

    for token in tokenize(command_line) {
        if state.accept(token).is_break() {
            debug!(token, "command line does not start with a switch");
            return Vec::new();
        }
    }

    state.into_command_lines()
}

//! Response files and text decoding
//!
//! MSBuild passes long cl.exe command lines through a response file,
//! `cl.exe @C:\tmp\tmp1234.rsp`. The same decoding is used for the MinGW
//! bin directory file, since both are usually written by Windows tools as
//! UTF-16 with a byte-order mark.

use crate::error::WrapperError;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest text file the wrapper will read.
pub const MAX_TEXT_FILE_SIZE: u64 = u32::MAX as u64;

/// Decode file contents, honouring and stripping a byte-order mark.
///
/// UTF-16LE and UTF-16BE need their BOM; everything else is read as UTF-8,
/// with invalid sequences replaced.
pub fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Read and decode a text file, refusing anything over [`MAX_TEXT_FILE_SIZE`].
pub fn read_decoded(path: &Path) -> io::Result<String> {
    let size = fs::metadata(path)?.len();
    if size > MAX_TEXT_FILE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::FileTooLarge,
            format!("{} bytes", size),
        ));
    }
    Ok(decode_text(&fs::read(path)?))
}

/// Path of the response file if the command line is an `@file` reference.
///
/// `@` has to be the first character, or the second after an opening quote;
/// anywhere else it is an ordinary part of the command line.
pub fn response_file_path(command_line: &str) -> Option<&str> {
    let command_line = command_line.trim_end();
    if let Some(quoted) = command_line.strip_prefix("\"@") {
        Some(quoted.strip_suffix('"').unwrap_or(quoted))
    } else {
        command_line.strip_prefix('@')
    }
}

/// Replace an `@file` command line with the file's contents.
///
/// Line breaks and tabs in the file become spaces, the tokenizer only splits
/// on those.
pub fn expand(command_line: &str) -> Result<Cow<'_, str>, WrapperError> {
    let Some(path) = response_file_path(command_line) else {
        return Ok(Cow::Borrowed(command_line));
    };

    debug!(path, "reading command line from response file");
    let text = read_decoded(Path::new(path)).map_err(|source| WrapperError::ResponseFile {
        path: PathBuf::from(path),
        source,
    })?;

    Ok(Cow::Owned(text.replace(['\r', '\n', '\t'], " ")))
}

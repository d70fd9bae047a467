//! Wrapper settings
//!
//! The defaults match a stock Visual Studio 2010 + MinGW setup and are what
//! almost every install wants. A TOML file named by `CLWRAP_CONFIG` can
//! override any of them:
//!
//! ```toml
//! bindir_file = "toolchain/mingw_bindir.txt"
//! cl_path_marker = "\\VC\\Tools\\MSVC"
//! ```
//!
//! The `/GCCBuild` marker and the switch table are fixed.

use crate::error::WrapperError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable naming an optional settings file.
pub const CONFIG_ENV_VAR: &str = "CLWRAP_CONFIG";

/// Paths and names the driver needs to find both compilers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// File, relative to the working directory, holding the MinGW bin directory
    pub bindir_file: PathBuf,

    /// Case-insensitive substring identifying the cl.exe directory on `PATH`
    pub cl_path_marker: String,

    /// File name of the Visual C++ compiler
    pub cl_executable: String,

    /// File name of the MinGW compiler
    pub gcc_executable: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bindir_file: PathBuf::from("mingw32_bindir.txt"),
            cl_path_marker: "\\VC\\BIN".to_string(),
            cl_executable: "cl.exe".to_string(),
            gcc_executable: "gcc.exe".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Settings::default()
    }

    pub fn with_bindir_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.bindir_file = path.into();
        self
    }

    pub fn with_cl_path_marker(mut self, marker: impl Into<String>) -> Self {
        self.cl_path_marker = marker.into();
        self
    }

    pub fn with_cl_executable(mut self, name: impl Into<String>) -> Self {
        self.cl_executable = name.into();
        self
    }

    pub fn with_gcc_executable(mut self, name: impl Into<String>) -> Self {
        self.gcc_executable = name.into();
        self
    }

    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Settings from the `CLWRAP_CONFIG` file, or the defaults if it is unset.
    pub fn load() -> Result<Self, WrapperError> {
        let Some(path) = env::var_os(CONFIG_ENV_VAR) else {
            return Ok(Settings::default());
        };
        let path = PathBuf::from(path);

        let content = fs::read_to_string(&path).map_err(|e| WrapperError::Settings {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Settings::from_toml(&content).map_err(|e| WrapperError::Settings {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bindir_file, PathBuf::from("mingw32_bindir.txt"));
        assert_eq!(settings.cl_path_marker, "\\VC\\BIN");
        assert_eq!(settings.cl_executable, "cl.exe");
        assert_eq!(settings.gcc_executable, "gcc.exe");
    }

    #[test]
    fn test_builder() {
        let settings = Settings::new()
            .with_bindir_file("bindir.txt")
            .with_cl_path_marker("msvc")
            .with_cl_executable("cl")
            .with_gcc_executable("g++");

        assert_eq!(settings.bindir_file, PathBuf::from("bindir.txt"));
        assert_eq!(settings.cl_path_marker, "msvc");
        assert_eq!(settings.cl_executable, "cl");
        assert_eq!(settings.gcc_executable, "g++");
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = Settings::from_toml("gcc_executable = \"g++.exe\"\n").unwrap();
        assert_eq!(settings.gcc_executable, "g++.exe");
        assert_eq!(settings.cl_executable, "cl.exe");
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(Settings::from_toml("marker = \"/ClangBuild\"\n").is_err());
    }

    #[test]
    #[serial]
    fn test_load_without_env_uses_defaults() {
        let orig = env::var_os(CONFIG_ENV_VAR);
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            env::remove_var(CONFIG_ENV_VAR);
        }

        assert_eq!(Settings::load().unwrap(), Settings::default());

        // SAFETY: restoring environment to original state
        unsafe {
            if let Some(v) = orig {
                env::set_var(CONFIG_ENV_VAR, v);
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_file() {
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let path = temp.path().join("clwrap.toml");
        fs::write(&path, "bindir_file = \"gcc_dir.txt\"\n").unwrap();

        let orig = env::var_os(CONFIG_ENV_VAR);
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            env::set_var(CONFIG_ENV_VAR, &path);
        }

        let loaded = Settings::load();

        // SAFETY: restoring environment to original state
        unsafe {
            match orig {
                Some(v) => env::set_var(CONFIG_ENV_VAR, v),
                None => env::remove_var(CONFIG_ENV_VAR),
            }
        }

        assert_eq!(loaded.unwrap().bindir_file, PathBuf::from("gcc_dir.txt"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_is_error() {
        let orig = env::var_os(CONFIG_ENV_VAR);
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            env::set_var(CONFIG_ENV_VAR, "/nonexistent/clwrap.toml");
        }

        let loaded = Settings::load();

        // SAFETY: restoring environment to original state
        unsafe {
            match orig {
                Some(v) => env::set_var(CONFIG_ENV_VAR, v),
                None => env::remove_var(CONFIG_ENV_VAR),
            }
        }

        assert!(matches!(loaded, Err(WrapperError::Settings { .. })));
    }
}

//! Generator configuration
//!
//! Everything that names the target library lives here: the symbol prefix,
//! where the shared object sits relative to the generated module on each
//! platform, and the calling-convention rules handed to the loader. Every field
//! has a default, so a configuration file only lists what differs.

use ffi_loader::ConventionRules;
use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid config format
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] serde_yaml::Error),
}

/// Location of the shared library for one platform
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct PlatformLibrary {
    /// Path segments from the generated module's directory to the library directory
    pub directory: Vec<String>,
    /// File name of the shared library
    pub file_name: String,
}

impl PlatformLibrary {
    fn new(directory: &[&str], file_name: &str) -> Self {
        Self {
            directory: directory.iter().map(|s| s.to_string()).collect(),
            file_name: file_name.to_string(),
        }
    }
}

/// Facts about the native library the bindings load
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct LibraryConfig {
    /// Prefix stripped from enumeration names (e.g. `BNLogLevel` -> `LogLevel`)
    pub name_prefix: String,
    pub darwin: PlatformLibrary,
    pub linux: PlatformLibrary,
    /// Also used for Cygwin
    pub windows: PlatformLibrary,
    /// Native entry point called at import time with the bundled plugin directory
    pub plugin_directory_setter: Option<String>,
    /// Value of the generated `max_confidence` constant
    pub max_confidence: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name_prefix: "BN".to_string(),
            darwin: PlatformLibrary::new(&["..", "..", "..", "MacOS"], "libbinaryninjacore.dylib"),
            linux: PlatformLibrary::new(&["..", ".."], "libbinaryninjacore.so.1"),
            windows: PlatformLibrary::new(&["..", ".."], "binaryninjacore.dll"),
            plugin_directory_setter: Some("BNSetBundledPluginDirectory".to_string()),
            max_confidence: 255,
        }
    }
}

/// Top-level generator configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeneratorConfig {
    pub library: LibraryConfig,
    pub conventions: ConventionRules,
}

impl GeneratorConfig {
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load the configuration file, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&contents)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GeneratorConfig::from_yaml(
            r#"
library:
  name-prefix: "XY"
  linux:
    directory: [".."]
    file-name: "libxy.so"
conventions:
  allocators: ["XYAllocString"]
"#,
        )
        .unwrap();

        assert_eq!(config.library.name_prefix, "XY");
        assert_eq!(config.library.linux.file_name, "libxy.so");
        assert_eq!(config.library.darwin, LibraryConfig::default().darwin);
        assert_eq!(config.library.max_confidence, 255);
        assert_eq!(config.conventions.allocators, vec!["XYAllocString".to_string()]);
        assert_eq!(config.conventions.generic_free, "BNFreeString");
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let err = GeneratorConfig::from_yaml("library: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = GeneratorConfig::load(Some(Path::new("/nonexistent/ffi-gen.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

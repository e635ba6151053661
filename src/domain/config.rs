use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a registry store.
///
/// This struct holds settings that control where the registry snapshot is
/// kept and which limits apply to enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// File name of the registry snapshot, relative to the store root.
    data_file: String,

    /// The maximum number of courses a student may be enrolled in at once.
    ///
    /// If this is `None`, the course load is unlimited.
    pub max_course_load: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            max_course_load: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the snapshot file name, relative to the store root.
    #[must_use]
    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    /// Sets the snapshot file name.
    pub fn set_data_file(&mut self, data_file: impl Into<String>) {
        self.data_file = data_file.into();
    }
}

fn default_data_file() -> String {
    "registry.bin".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_file")]
        data_file: String,

        /// Absent means unlimited.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_course_load: Option<usize>,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                max_course_load,
            } => Self {
                data_file,
                max_course_load,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            max_course_load: config.max_course_load,
        }
    }
}

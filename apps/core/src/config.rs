//! YAML configuration: a mapping from processor name to a flat string map.
//! The `__common__` section is required and its keys fill any gaps in the
//! per-processor sections.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const COMMON_SECTION: &str = "__common__";
pub const OUTPUT_DIR_KEY: &str = "output_dir";

#[derive(Debug)]
pub enum ConfigError {
    MissingFile(PathBuf),
    Parse(serde_yaml::Error),
    MissingSection(String),
    MissingKey { section: String, key: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile(path) => {
                write!(f, "config file does not exist: {}", path.display())
            }
            Self::Parse(error) => write!(f, "config parse error: {error}"),
            Self::MissingSection(name) => {
                write!(f, "config file must contain a '{name}' section")
            }
            Self::MissingKey { section, key } => {
                write!(f, "config section '{section}' must contain a '{key}' key")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value)
    }
}

/// The main configuration file, one section per processor.
#[derive(Debug)]
pub struct MainConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl MainConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|_| ConfigError::MissingFile(path.to_path_buf()))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let sections = serde_yaml::from_str(raw)?;
        let config = Self { sections };
        config.common()?.require(OUTPUT_DIR_KEY)?;
        Ok(config)
    }

    pub fn common(&self) -> Result<ProcessorConfig, ConfigError> {
        self.sections
            .get(COMMON_SECTION)
            .map(|values| ProcessorConfig {
                name: COMMON_SECTION.to_string(),
                values: values.clone(),
            })
            .ok_or_else(|| ConfigError::MissingSection(COMMON_SECTION.to_string()))
    }

    /// The named section with missing or empty keys filled in from
    /// `__common__`, or `None` when the section is absent (the processor is
    /// simply not configured).
    pub fn processor(&self, name: &str) -> Option<ProcessorConfig> {
        let section = self.sections.get(name)?;
        let mut values = section.clone();
        if let Some(common) = self.sections.get(COMMON_SECTION) {
            for (key, value) in common {
                let fill = values.get(key).map_or(true, |existing| existing.is_empty());
                if fill {
                    values.insert(key.clone(), value.clone());
                }
            }
        }
        Some(ProcessorConfig {
            name: name.to_string(),
            values,
        })
    }
}

/// Configuration record for one processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    name: String,
    values: BTreeMap<String, String>,
}

impl ProcessorConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                section: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Path of a per-processor persistence file under the output directory.
    pub fn outpath(&self, file_stem: &str) -> Result<PathBuf, ConfigError> {
        let output_dir = self.require(OUTPUT_DIR_KEY)?;
        Ok(Path::new(output_dir).join(format!("{file_stem}.json")))
    }
}

/// Loads a standalone YAML file holding a flat name-to-value map, as used by
/// the quickcmd snippets file.
pub fn load_str_map(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    let raw =
        fs::read_to_string(path).map_err(|_| ConfigError::MissingFile(path.to_path_buf()))?;
    Ok(serde_yaml::from_str(&raw)?)
}

/// Loads a standalone YAML file mapping names to lists of paths, as used by
/// the diragg locations file.
pub fn load_list_map(path: &Path) -> Result<BTreeMap<String, Vec<String>>, ConfigError> {
    let raw =
        fs::read_to_string(path).map_err(|_| ConfigError::MissingFile(path.to_path_buf()))?;
    Ok(serde_yaml::from_str(&raw)?)
}

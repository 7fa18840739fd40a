use crate::error::CliError;
use clap::ValueEnum;
use log::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `name: value` line per field, with binary values hex encoded.
    #[default]
    Hex,
    /// A JSON object.
    Json,
}

/// Contents of the YAML configuration file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdaptorConfig {
    #[serde(default)]
    pub output: OutputFormat,
    /// File holding a hex-encoded signing key, used when no key is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

impl AdaptorConfig {
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        load_config_file(path)
    }

    /// Load the configuration file, falling back to defaults if it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        match Self::try_load(&path) {
            Ok(config) => Ok(config),
            Err(CliError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration file found at {}. Using defaults.", path.as_ref().display());
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        save_config_file(path, self)
    }
}

pub fn default_config_path() -> PathBuf {
    let mut home = std::env::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.push(".adaptor");
    home.push("config.yml");
    home
}

pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<AdaptorConfig, CliError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let config = serde_yml::from_reader(reader)?;
    Ok(config)
}

pub fn save_config_file<P: AsRef<Path>>(path: P, config: &AdaptorConfig) -> Result<(), CliError> {
    // Create directory path if required
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_yml::to_writer(writer, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdaptorConfig::load_or_default(dir.path().join("nope.yml")).unwrap();
        assert_eq!(config, AdaptorConfig::default());
        assert!(matches!(AdaptorConfig::try_load(dir.path().join("nope.yml")), Err(CliError::IoError(_))));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let config = AdaptorConfig { output: OutputFormat::Json, key_file: Some(PathBuf::from("/keys/signing.key")) };
        config.save(&path).unwrap();
        assert_eq!(AdaptorConfig::try_load(&path).unwrap(), config);
    }

    #[test]
    fn yaml_format() {
        let config: AdaptorConfig = serde_yml::from_str("output: json\n").unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.key_file.is_none());
        let config: AdaptorConfig = serde_yml::from_str("key_file: /tmp/k\n").unwrap();
        assert_eq!(config.output, OutputFormat::Hex);
        assert_eq!(config.key_file, Some(PathBuf::from("/tmp/k")));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "output: [not, a, format]\n").unwrap();
        assert!(matches!(AdaptorConfig::load_or_default(&path), Err(CliError::InvalidConfig(_))));
    }
}

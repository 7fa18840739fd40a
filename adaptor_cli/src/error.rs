use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] serde_yml::Error),
    #[error("Could not format output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Configuration file {0} already exists. Use --force to overwrite it.")]
    ConfigExists(String),
    #[error("No signing key given. Pass --key or --key-file, or set `key_file` in the configuration file.")]
    MissingKey,
}

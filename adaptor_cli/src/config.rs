use crate::settings::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// BIP-340 adaptor signatures.
///
/// Create pre-signatures that only become valid Schnorr signatures once an adaptor secret is revealed, and recover
/// that secret from the completed signature.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Path to the configuration file. The default is `$HOME/.adaptor/config.yml`.
    #[arg(long = "config-file", short = 'c', env = "ADAPTOR_CONFIG")]
    pub config_file: Option<PathBuf>,
    /// Output format. Overrides the `output` setting in the configuration file.
    #[arg(long = "output", short = 'o', value_enum)]
    pub output: Option<OutputFormat>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Generate a random signing key.
    #[command(name = "keygen")]
    Keygen,
    /// Adaptor secret management.
    #[command(subcommand, name = "adaptor")]
    Adaptor(AdaptorCommand),
    /// Create a pre-signature over a message for an adaptor point.
    #[command(name = "presign", alias = "pre-sign")]
    PreSign(PreSignCommand),
    /// Check a pre-signature against a public key and message.
    #[command(name = "preverify", alias = "pre-verify")]
    PreVerify(PreVerifyCommand),
    /// Complete a pre-signature with the adaptor secret.
    #[command(name = "adapt")]
    Adapt(AdaptCommand),
    /// Recover the adaptor secret from a pre-signature and its completed signature.
    #[command(name = "extract")]
    Extract(ExtractCommand),
    /// Verify a BIP-340 signature.
    #[command(name = "verify")]
    Verify(VerifyCommand),
    /// Manage the configuration file.
    #[command(subcommand, name = "config")]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum AdaptorCommand {
    /// Generate a random adaptor secret and its point.
    #[command(name = "new", alias = "create")]
    New,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a configuration file with default settings.
    #[command(name = "init")]
    Init {
        /// Overwrite an existing file.
        #[arg(long = "force", short = 'f', default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct PreSignCommand {
    /// Hex-encoded 32-byte signing key.
    #[arg(long = "key", short = 'k', conflicts_with = "key_file")]
    pub key: Option<String>,
    /// File holding a hex-encoded signing key. Defaults to `key_file` from the configuration file.
    #[arg(long = "key-file")]
    pub key_file: Option<PathBuf>,
    /// Hex-encoded 32-byte message digest.
    #[arg(long = "msg", short = 'm')]
    pub msg: String,
    /// Adaptor point, as a 33-byte compressed point or 32-byte x-only point in hex.
    #[arg(long = "adaptor-point", short = 't')]
    pub adaptor_point: String,
    /// Hex-encoded 32 bytes of auxiliary randomness to mix into the nonce.
    #[arg(long = "aux")]
    pub aux: Option<String>,
    /// Also write the 96-byte pre-signature, in binary wire form, to this file.
    #[arg(long = "out-file")]
    pub out_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreVerifyCommand {
    /// Hex-encoded 96-byte pre-signature, or `@path` to read the binary wire form from a file.
    #[arg(long = "presig", short = 'p')]
    pub presig: String,
    /// Hex-encoded 32-byte x-only public key.
    #[arg(long = "pubkey", short = 'P')]
    pub pubkey: String,
    /// Hex-encoded 32-byte message digest.
    #[arg(long = "msg", short = 'm')]
    pub msg: String,
}

#[derive(Debug, Args)]
pub struct AdaptCommand {
    /// Hex-encoded 96-byte pre-signature, or `@path` to read the binary wire form from a file.
    #[arg(long = "presig", short = 'p')]
    pub presig: String,
    /// Hex-encoded 32-byte adaptor secret.
    #[arg(long = "secret", short = 's')]
    pub secret: String,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Hex-encoded 96-byte pre-signature, or `@path` to read the binary wire form from a file.
    #[arg(long = "presig", short = 'p')]
    pub presig: String,
    /// Hex-encoded 64-byte signature.
    #[arg(long = "sig", short = 's')]
    pub sig: String,
    /// The full adaptor point (33-byte compressed, hex). If given, the secret is negated as needed so that its point
    /// matches exactly.
    #[arg(long = "adaptor-point", short = 't')]
    pub adaptor_point: Option<String>,
}

#[derive(Debug, Args)]
pub struct VerifyCommand {
    /// Hex-encoded 64-byte signature.
    #[arg(long = "sig", short = 's')]
    pub sig: String,
    /// Hex-encoded 32-byte x-only public key.
    #[arg(long = "pubkey", short = 'P')]
    pub pubkey: String,
    /// Hex-encoded 32-byte message digest.
    #[arg(long = "msg", short = 'm')]
    pub msg: String,
}

pub struct GlobalOptions {
    pub config_file: Option<PathBuf>,
    pub output: Option<OutputFormat>,
}

impl Config {
    pub fn to_parts(self) -> (GlobalOptions, CliCommand) {
        let global = GlobalOptions { config_file: self.config_file, output: self.output };
        (global, self.command)
    }
}

use crate::config::{
    AdaptCommand, AdaptorCommand, CliCommand, ConfigCommand, ExtractCommand, GlobalOptions, PreSignCommand,
    PreVerifyCommand, VerifyCommand,
};
use crate::error::CliError;
use crate::settings::{default_config_path, AdaptorConfig, OutputFormat};
use anyhow::anyhow;
use libadaptor::codec::{Readable, Writable};
use libadaptor::helpers::{array_from_hex, array_from_hex_str, to_hex, MESSAGE_LEN};
use libadaptor::{
    AdaptorPoint, AdaptorSecret, Bip340AdaptorEngine, PointRelation, PreSignature, Secp256k1, Signature, SigningKey,
    XOnlyPoint,
};
use log::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, Zeroizing};

/// The rendered output of a command, and whether the command succeeded. Verification commands render their result
/// even when the signature is invalid.
#[derive(Debug)]
pub struct CommandResult {
    pub output: Zeroizing<String>,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyReport {
    #[serde(serialize_with = "reveal", deserialize_with = "conceal")]
    pub secret_key: Zeroizing<String>,
    pub public_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdaptorReport {
    #[serde(serialize_with = "reveal", deserialize_with = "conceal")]
    pub adaptor_secret: Zeroizing<String>,
    pub adaptor_point: AdaptorPoint<Secp256k1>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreSignReport {
    pub pre_signature: PreSignature<Secp256k1>,
    pub public_key: String,
    #[serde(serialize_with = "to_hex", deserialize_with = "array_from_hex")]
    pub message: [u8; MESSAGE_LEN],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyReport {
    pub valid: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdaptReport {
    pub signature: Signature<Secp256k1>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractReport {
    #[serde(serialize_with = "reveal", deserialize_with = "conceal")]
    pub adaptor_secret: Zeroizing<String>,
    pub relation: PointRelation,
    /// Whether the secret was checked against (and if necessary negated to match) a full adaptor point.
    pub resolved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigReport {
    pub config_file: PathBuf,
}

fn reveal<S: Serializer>(secret: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret)
}

fn conceal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Zeroizing<String>, D::Error> {
    String::deserialize(deserializer).map(Zeroizing::new)
}

/// Run `command`, loading settings from the configuration file named in `options`.
pub fn execute(command: CliCommand, options: GlobalOptions) -> Result<CommandResult, anyhow::Error> {
    let config_path = options.config_file.unwrap_or_else(default_config_path);
    let settings = AdaptorConfig::load_or_default(&config_path)?;
    let format = options.output.unwrap_or(settings.output);
    let engine = Bip340AdaptorEngine::new();
    match command {
        CliCommand::Keygen => ok(&keygen(), format),
        CliCommand::Adaptor(AdaptorCommand::New) => ok(&new_adaptor(), format),
        CliCommand::PreSign(cmd) => ok(&pre_sign(&engine, cmd, &settings)?, format),
        CliCommand::PreVerify(cmd) => {
            let report = pre_verify(&engine, cmd)?;
            Ok(CommandResult { success: report.valid, output: render(&report, format)? })
        }
        CliCommand::Adapt(cmd) => ok(&adapt(&engine, cmd)?, format),
        CliCommand::Extract(cmd) => ok(&extract(&engine, cmd)?, format),
        CliCommand::Verify(cmd) => {
            let report = verify(&engine, cmd)?;
            Ok(CommandResult { success: report.valid, output: render(&report, format)? })
        }
        CliCommand::Config(ConfigCommand::Init { force }) => ok(&init_config(&config_path, force)?, format),
    }
}

fn ok<T: Serialize>(report: &T, format: OutputFormat) -> Result<CommandResult, anyhow::Error> {
    Ok(CommandResult { output: render(report, format)?, success: true })
}

/// Render a report as pretty JSON, or as one `name: value` line per field. The intermediate JSON value is wiped
/// before returning.
pub fn render<T: Serialize>(report: &T, format: OutputFormat) -> Result<Zeroizing<String>, CliError> {
    let mut value = serde_json::to_value(report)?;
    let mut out = Zeroizing::new(String::new());
    let result = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&value).map(|json| *out = json),
        OutputFormat::Hex => match &value {
            Value::Object(fields) => {
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    push_plain(&mut out, v);
                }
                Ok(())
            }
            other => {
                push_plain(&mut out, other);
                Ok(())
            }
        },
    };
    scrub(&mut value);
    result?;
    Ok(out)
}

fn push_plain(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        other => {
            let _ = write!(out, "{other}");
        }
    }
}

fn scrub(value: &mut Value) {
    match value {
        Value::String(s) => s.zeroize(),
        Value::Array(items) => items.iter_mut().for_each(scrub),
        Value::Object(fields) => fields.values_mut().for_each(scrub),
        _ => {}
    }
}

pub fn keygen() -> KeyReport {
    let key = SigningKey::<Secp256k1>::random(&mut rand::rng());
    info!("Generated signing key with public key {}", key.public_key());
    KeyReport { secret_key: key.as_hex(), public_key: key.public_key().as_hex() }
}

pub fn new_adaptor() -> AdaptorReport {
    let secret = AdaptorSecret::<Secp256k1>::random(&mut rand::rng());
    let adaptor_point = secret.point();
    info!("Generated adaptor secret with point {}", adaptor_point.as_hex());
    AdaptorReport { adaptor_secret: secret.as_hex(), adaptor_point }
}

fn pre_sign(
    engine: &Bip340AdaptorEngine,
    cmd: PreSignCommand,
    settings: &AdaptorConfig,
) -> Result<PreSignReport, anyhow::Error> {
    let key = match (cmd.key, cmd.key_file.as_ref().or(settings.key_file.as_ref())) {
        (Some(hex), _) => SigningKey::<Secp256k1>::from_hex(&Zeroizing::new(hex))?,
        (None, Some(path)) => load_signing_key(path)?,
        (None, None) => return Err(CliError::MissingKey.into()),
    };
    let message = array_from_hex_str::<MESSAGE_LEN>("message", &cmd.msg)?;
    let adaptor = AdaptorPoint::<Secp256k1>::from_hex(&cmd.adaptor_point)?;
    let pre_signature = match cmd.aux {
        Some(aux) => {
            let aux = array_from_hex_str::<32>("aux", &aux)?;
            engine.pre_sign_with_aux(&key, &message, &adaptor.to_x_only(), &aux)?
        }
        None => engine.pre_sign(&key, &message, &adaptor.to_x_only())?,
    };
    info!("Pre-signed message under adaptor point {}", adaptor.as_hex());
    if let Some(path) = cmd.out_file {
        let mut writer = BufWriter::new(File::create(&path).map_err(CliError::from)?);
        pre_signature.write(&mut writer).map_err(CliError::from)?;
        writer.into_inner().map_err(|e| CliError::from(e.into_error()))?;
        debug!("Wrote pre-signature to {}", path.display());
    }
    Ok(PreSignReport { pre_signature, public_key: key.public_key().as_hex(), message })
}

pub fn load_signing_key<P: AsRef<Path>>(path: P) -> Result<SigningKey<Secp256k1>, anyhow::Error> {
    let path = path.as_ref();
    debug!("Reading signing key from {}", path.display());
    let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(CliError::from)?);
    SigningKey::from_hex(&contents).map_err(|e| anyhow!("Invalid signing key in {}: {e}", path.display()))
}

/// Read a pre-signature given as hex, or as `@path` to a file holding the binary wire form.
pub fn load_pre_signature(arg: &str) -> Result<PreSignature<Secp256k1>, anyhow::Error> {
    match arg.strip_prefix('@') {
        Some(path) => {
            debug!("Reading pre-signature from {path}");
            let mut reader = BufReader::new(File::open(path).map_err(CliError::from)?);
            Ok(PreSignature::read(&mut reader)?)
        }
        None => Ok(PreSignature::from_hex(arg)?),
    }
}

/// Undecodable pre-signatures and public keys are reported as invalid rather than as errors. Only input that is not
/// hex at all, or a file that cannot be read, is an error.
fn pre_verify(engine: &Bip340AdaptorEngine, cmd: PreVerifyCommand) -> Result<VerifyReport, anyhow::Error> {
    let pre_sig = match cmd.presig.strip_prefix('@') {
        Some(path) => std::fs::read(path).map_err(CliError::from)?,
        None => hex::decode(cmd.presig.trim())?,
    };
    let pubkey = hex::decode(cmd.pubkey.trim())?;
    let msg = array_from_hex_str::<MESSAGE_LEN>("message", &cmd.msg)?;
    Ok(VerifyReport { valid: engine.pre_verify_bytes(&pre_sig, &pubkey, &msg) })
}

fn adapt(engine: &Bip340AdaptorEngine, cmd: AdaptCommand) -> Result<AdaptReport, anyhow::Error> {
    let pre_sig = load_pre_signature(&cmd.presig)?;
    let secret = AdaptorSecret::<Secp256k1>::from_hex(&Zeroizing::new(cmd.secret))?;
    let signature = engine.adapt(&pre_sig, &secret)?;
    Ok(AdaptReport { signature })
}

fn extract(engine: &Bip340AdaptorEngine, cmd: ExtractCommand) -> Result<ExtractReport, anyhow::Error> {
    let pre_sig = load_pre_signature(&cmd.presig)?;
    let sig = Signature::<Secp256k1>::from_hex(&cmd.sig)?;
    let extracted = engine.extract_adaptor(&pre_sig, &sig)?;
    let relation = extracted.relation();
    let report = match cmd.adaptor_point {
        Some(point) => {
            let point = AdaptorPoint::<Secp256k1>::from_hex(&point)?;
            let secret = extracted.resolve(&point)?;
            ExtractReport { adaptor_secret: secret.as_hex(), relation, resolved: true }
        }
        None => ExtractReport { adaptor_secret: extracted.secret().as_hex(), relation, resolved: false },
    };
    Ok(report)
}

fn verify(engine: &Bip340AdaptorEngine, cmd: VerifyCommand) -> Result<VerifyReport, anyhow::Error> {
    let sig = Signature::<Secp256k1>::from_hex(&cmd.sig)?;
    let pubkey = XOnlyPoint::from_hex::<Secp256k1>(&cmd.pubkey)?;
    let msg = array_from_hex_str::<MESSAGE_LEN>("message", &cmd.msg)?;
    Ok(VerifyReport { valid: engine.verify(&sig, &pubkey, &msg) })
}

fn init_config(path: &Path, force: bool) -> Result<ConfigReport, CliError> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists(path.display().to_string()));
    }
    AdaptorConfig::default().save(path)?;
    info!("Wrote default configuration to {}", path.display());
    Ok(ConfigReport { config_file: path.to_path_buf() })
}

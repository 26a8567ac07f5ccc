use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
use saltbox::{
    Envelope, KeyPair, PwHashAlgorithm, PwHashLimit, PwHashParams, SYMMETRIC_KEY_LEN, Scheme,
    public_key, symmetric,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgArg {
    Argon2i,
    Argon2id,
}

impl From<AlgArg> for PwHashAlgorithm {
    fn from(alg: AlgArg) -> Self {
        match alg {
            AlgArg::Argon2i => PwHashAlgorithm::Argon2i13,
            AlgArg::Argon2id => PwHashAlgorithm::Argon2id13,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Interactive,
    Moderate,
    Sensitive,
}

impl From<PresetArg> for PwHashLimit {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Interactive => PwHashLimit::Interactive,
            PresetArg::Moderate => PwHashLimit::Moderate,
            PresetArg::Sensitive => PwHashLimit::Sensitive,
        }
    }
}

#[derive(Debug, clap::Args)]
struct CostArgs {
    /// Password hash algorithm
    #[arg(long, value_enum, default_value_t = AlgArg::Argon2id)]
    alg: AlgArg,

    /// Cost preset
    #[arg(long, value_enum, default_value_t = PresetArg::Interactive)]
    preset: PresetArg,

    /// Number of passes, overrides the preset
    #[arg(long = "ops-limit")]
    ops_limit: Option<u64>,

    /// Memory in bytes, overrides the preset
    #[arg(long = "mem-limit")]
    mem_limit: Option<u64>,
}

impl CostArgs {
    fn to_params(&self) -> Result<PwHashParams> {
        let algorithm = PwHashAlgorithm::from(self.alg);
        let preset = PwHashParams::preset(algorithm, self.preset.into());

        Ok(PwHashParams::new(
            algorithm,
            self.ops_limit.unwrap_or(preset.ops_limit()),
            self.mem_limit.unwrap_or(preset.mem_limit()),
        )?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "saltbox")]
#[command(
    version,
    about = "Password stretching, secret-key and public-key authenticated encryption."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints key, nonce and tag lengths as JSON
    Constants,

    /// Generates a keypair for public-key boxes
    Keypair,

    /// Generates a random password hash salt
    Salt,

    /// Stretches a password into key material
    #[command(arg_required_else_help = true)]
    Stretch {
        /// Hex-encoded salt
        #[arg(long)]
        salt: String,

        /// Output length in bytes
        #[arg(long, default_value_t = SYMMETRIC_KEY_LEN)]
        length: usize,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Encrypts a message with a shared secret key
    Encrypt {
        /// Hex-encoded secret key
        #[arg(long, env = "SALTBOX_KEY", hide_env_values = true)]
        key: String,

        /// Read the message from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Decrypts an envelope produced by `encrypt`
    Decrypt {
        /// Hex-encoded secret key
        #[arg(long, env = "SALTBOX_KEY", hide_env_values = true)]
        key: String,

        /// Read the envelope from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Encrypts a message to a receiver's public key
    BoxEncrypt {
        /// Receiver's hex-encoded public key
        #[arg(long)]
        to: String,

        /// Sender's hex-encoded secret key
        #[arg(long, env = "SALTBOX_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        /// Read the message from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Decrypts an envelope produced by `box-encrypt`
    BoxDecrypt {
        /// Sender's hex-encoded public key
        #[arg(long)]
        from: String,

        /// Receiver's hex-encoded secret key
        #[arg(long, env = "SALTBOX_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        /// Read the envelope from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },
}

/// Install a stderr logger filtered by `RUST_LOG` (default `warn`).
fn set_up_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_envelope(path: Option<&std::path::Path>, expected: Scheme) -> Result<Envelope> {
    let raw = auth::read_input(path)?;
    let text = std::str::from_utf8(&raw).context("envelope is not hex text")?;
    let bytes = auth::decode_hex("envelope", text)?;
    let envelope = Envelope::from_bytes(&bytes)?;
    if envelope.scheme() != expected {
        bail!(
            "envelope scheme is {:?}, expected {:?}",
            envelope.scheme(),
            expected
        );
    }
    Ok(envelope)
}

fn write_plaintext(plaintext: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(plaintext)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    set_up_logger();

    if !saltbox::initialize() {
        bail!("failed to initialize saltbox: no secure random source");
    }

    match args.command {
        Commands::Constants => {
            println!("{}", serde_json::to_string_pretty(&saltbox::constants())?);
        }
        Commands::Keypair => {
            let kp = KeyPair::generate()?;
            let secret_hex = zeroize::Zeroizing::new(hex::encode(kp.secret_key()));
            let out = serde_json::json!({
                "public_key": hex::encode(kp.public_key()),
                "secret_key": secret_hex.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Salt => {
            println!("{}", hex::encode(saltbox::generate_salt()?));
        }
        Commands::Stretch { salt, length, cost } => {
            let params = cost.to_params()?;
            let salt = auth::decode_hex("salt", &salt)?;
            let password = auth::read_password()?;
            let key = saltbox::stretch_with_params(password.as_bytes(), &salt, length, &params)
                .context("failed to stretch password")?;
            drop(password);
            println!("{}", hex::encode(&*key));
        }
        Commands::Encrypt { key, input } => {
            let key = auth::decode_hex("key", &key)?;
            let message = auth::read_input(input.as_deref())?;
            let sealed = symmetric::encrypt(&message, &key)?;
            let envelope = Envelope::new(Scheme::Symmetric, sealed)?;
            println!("{}", hex::encode(envelope.to_bytes()));
        }
        Commands::Decrypt { key, input } => {
            let key = auth::decode_hex("key", &key)?;
            let envelope = read_envelope(input.as_deref(), Scheme::Symmetric)?;
            let data = envelope.data();
            let plaintext = symmetric::decrypt(data.cipher_text(), data.nonce(), &key)
                .context("unable to decrypt")?;
            write_plaintext(&plaintext)?;
        }
        Commands::BoxEncrypt {
            to,
            secret_key,
            input,
        } => {
            let receiver = auth::decode_hex("receiver public key", &to)?;
            let sender = auth::decode_hex("secret key", &secret_key)?;
            let message = auth::read_input(input.as_deref())?;
            let sealed = public_key::encrypt(&message, &receiver, &sender)?;
            let envelope = Envelope::new(Scheme::PublicKey, sealed)?;
            println!("{}", hex::encode(envelope.to_bytes()));
        }
        Commands::BoxDecrypt {
            from,
            secret_key,
            input,
        } => {
            let sender = auth::decode_hex("sender public key", &from)?;
            let receiver = auth::decode_hex("secret key", &secret_key)?;
            let envelope = read_envelope(input.as_deref(), Scheme::PublicKey)?;
            let data = envelope.data();
            let plaintext = public_key::decrypt(data.cipher_text(), data.nonce(), &sender, &receiver)
                .context("unable to decrypt")?;
            write_plaintext(&plaintext)?;
        }
    }

    Ok(())
}

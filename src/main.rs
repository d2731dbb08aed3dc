use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use mcfhash::{
    Algorithm, ConfigFile, HashError, PasswordHash, PasswordHasher, Pbkdf2Hash, Pbkdf2Hasher,
    Pbkdf2Params, default_config,
};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "MCFHASH_LOG";

#[derive(Debug, clap::Args)]
struct ParamArgs {
    /// Salt size in bytes, at least 8 (default: 16)
    #[arg(long)]
    salt_size: Option<usize>,

    /// PBKDF2 iteration count (default: 10000)
    #[arg(long)]
    iterations: Option<u32>,

    /// HMAC digest: sha1, sha256, sha384 or sha512 (default: sha1)
    #[arg(long)]
    algorithm: Option<Algorithm>,
}

impl ParamArgs {
    /// Flags override whatever the config file set.
    fn apply(&self, base: Pbkdf2Params) -> Result<Pbkdf2Params> {
        let params = Pbkdf2Params::new(
            self.salt_size.unwrap_or(base.salt_size()),
            self.iterations.unwrap_or(base.iterations()),
            self.algorithm.unwrap_or(base.algorithm()),
        )?;
        Ok(params)
    }
}

#[derive(Debug, Parser)]
#[command(name = "mcfhash")]
#[command(version, about = "Hash and verify passwords as PBKDF2 modular crypt strings.")]
struct Cli {
    /// Path to the hasher config file
    #[arg(long, global = true, value_name = "PATH", env = "MCFHASH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the hash string
    Hash {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Checks a password against a hash string
    #[command(arg_required_else_help = true)]
    Verify { hash: String },

    /// Shows the parameters stored in a hash string
    #[command(arg_required_else_help = true)]
    Inspect {
        hash: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Prints the effective hasher parameters
    Config {
        #[command(flatten)]
        params: ParamArgs,

        /// Write the parameters to the config file
        #[arg(long, default_value_t = false)]
        save: bool,
    },
}

#[derive(Debug, Serialize)]
struct HashInfo<'a> {
    id: &'a str,
    algorithm: Algorithm,
    iterations: u32,
    salt_len: usize,
    key_len: usize,
}

impl<'a> From<&'a Pbkdf2Hash> for HashInfo<'a> {
    fn from(hash: &'a Pbkdf2Hash) -> Self {
        Self {
            id: hash.id(),
            algorithm: hash.algorithm(),
            iterations: hash.iterations(),
            salt_len: hash.salt().len(),
            key_len: hash.derived_key().len(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn resolve_config(path: Option<PathBuf>) -> Result<ConfigFile> {
    match path {
        Some(p) => Ok(ConfigFile::new(p)),
        None => Ok(default_config()?),
    }
}

/// An explicit config path must exist; the default one may be absent.
fn load_params(config: &ConfigFile, explicit: bool) -> Result<Pbkdf2Params> {
    let params = if explicit {
        config.load()
    } else {
        config.load_or_default()
    };
    params.with_context(|| format!("failed to load config {}", config.path().display()))
}

fn main() -> Result<()> {
    init_tracing();

    let args = Cli::parse();
    let explicit = args.config.is_some();

    match args.command {
        Commands::Hash { params } => {
            let config = resolve_config(args.config)?;
            let params = params.apply(load_params(&config, explicit)?)?;
            let hasher = Pbkdf2Hasher::new(params)?;

            let password = auth::read_new_password_with_confirmation()?;
            println!("{}", hasher.hash(&password)?);
        }
        Commands::Verify { hash } => {
            let hash = mcfhash::parse(&hash).ok_or(HashError::Format)?;
            debug!(id = hash.id(), "verifying");

            let password = auth::read_password()?;
            if !hash.verify(&password)? {
                bail!("password does not match");
            }
            println!("password matches");
        }
        Commands::Inspect { hash, json } => {
            let hash = Pbkdf2Hash::parse(&hash).ok_or(HashError::Format)?;
            let info = HashInfo::from(&hash);

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("id:          {}", info.id);
                println!("algorithm:   {}", info.algorithm);
                println!("iterations:  {}", info.iterations);
                println!("salt length: {}", info.salt_len);
                println!("key length:  {}", info.key_len);
            }
        }
        Commands::Config { params, save } => {
            let config = resolve_config(args.config)?;
            let params = params.apply(load_params(&config, explicit && !save)?)?;

            println!("{}", serde_json::to_string_pretty(&params)?);
            if save {
                config.save(&params)?;
                eprintln!("saved to {}", config.path().display());
            }
        }
    }

    Ok(())
}

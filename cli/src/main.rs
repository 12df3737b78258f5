//! AgeGate command line.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use agegate_claims::{birth_date_from_parts, compute_age};
use agegate_crypto::{sign_message_hex, UserHasher, WalletKeypair};
use agegate_node::NodeConfig;
use agegate_types::{KeyAlgorithm, WalletPubkey};
use agegate_utils::format_duration;

#[derive(Parser)]
#[command(name = "agegate", about = "AgeGate wallet authentication and age claims")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate a wallet keypair.
    Keygen {
        #[arg(long, value_enum, default_value_t = Algorithm::Ed25519)]
        algorithm: Algorithm,
    },

    /// Sign a challenge message with a wallet secret key.
    Sign {
        #[arg(long, value_enum, default_value_t = Algorithm::Ed25519)]
        algorithm: Algorithm,

        /// Hex secret key.
        #[arg(long, env = "AGEGATE_WALLET_SECRET", hide_env_values = true)]
        secret: String,

        /// Message to sign. Read from `--message-file` when absent.
        #[arg(long, conflicts_with = "message_file")]
        message: Option<String>,

        #[arg(long)]
        message_file: Option<PathBuf>,

        /// Sign the wallet-banner-wrapped message, as browser wallets do.
        #[arg(long)]
        banner: bool,
    },

    /// Print the pseudonymous user hash for a wallet.
    UserHash {
        #[arg(long, env = "AGEGATE_USER_HASH_SALT", hide_env_values = true)]
        salt: String,

        wallet: String,
    },

    /// Compute age and majority for a birthdate.
    Age {
        day: u32,
        month: u32,
        year: i32,

        /// Reference date (YYYY-MM-DD); today in UTC when absent.
        #[arg(long)]
        on: Option<NaiveDate>,
    },

    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the default configuration as TOML.
    Default,
    /// Load and validate a configuration file.
    Check { path: PathBuf },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Algorithm {
    Ed25519,
    Secp256k1,
}

impl From<Algorithm> for KeyAlgorithm {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Ed25519 => KeyAlgorithm::Ed25519,
            Algorithm::Secp256k1 => KeyAlgorithm::Secp256k1,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    agegate_utils::init_tracing("warn");

    match cli.command {
        Command::Keygen { algorithm } => {
            let keypair = WalletKeypair::generate(algorithm.into());
            println!("public: {}", keypair.public());
            println!("secret: {}", keypair.secret_hex().as_str());
            Ok(())
        }
        Command::Sign {
            algorithm,
            secret,
            message,
            message_file,
            banner,
        } => {
            let keypair = WalletKeypair::from_secret_hex(algorithm.into(), &secret)?;
            let message = match (message, message_file) {
                (Some(m), _) => m,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => anyhow::bail!("either --message or --message-file is required"),
            };
            println!("{}", sign_message_hex(&keypair, message.as_bytes(), banner));
            Ok(())
        }
        Command::UserHash { salt, wallet } => {
            let wallet = WalletPubkey::parse(&wallet)?;
            println!("{}", UserHasher::new(salt).compute_user_hash(wallet.as_str()));
            Ok(())
        }
        Command::Age {
            day,
            month,
            year,
            on,
        } => {
            let birth = birth_date_from_parts(day, month, year)?;
            let reference = on.unwrap_or_else(|| chrono::Utc::now().date_naive());
            let result = compute_age(birth, reference)?;
            println!("age: {}", result.age);
            println!("is_major: {}", result.is_major);
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Default => {
                print!("{}", NodeConfig::default().to_toml_string()?);
                Ok(())
            }
            ConfigAction::Check { path } => {
                let cfg = NodeConfig::from_toml_file(&path.to_string_lossy())
                    .with_context(|| format!("loading {}", path.display()))?;
                cfg.validate()?;
                println!("ok: {}", path.display());
                println!(
                    "challenge ttl {}, token ttl {}, claims valid {} years",
                    format_duration(cfg.challenge_ttl_secs),
                    format_duration(cfg.token_ttl_secs),
                    cfg.claim_validity_years
                );
                Ok(())
            }
        },
    }
}

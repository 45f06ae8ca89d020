//! Random OT party CLI
//!
//! Command-line interface for:
//! - Random OT setup, persisted to a data directory
//! - Local random OT executions against the persisted setup
//! - Ethereum compact encoding and verification of signatures

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::OsRng, Rng};
use rot_core::{
    curve::decode_point,
    ot::{self, ReceiverSetup, SenderSetup},
    Nonce, Pad, Signature,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use subtle::Choice;
use tracing::{info, Level};

const SENDER_SETUP_FILE: &str = "sender_setup.json";
const RECEIVER_SETUP_FILE: &str = "receiver_setup.json";

/// Random OT party
#[derive(Parser)]
#[command(name = "rot-party")]
#[command(about = "Random oblivious transfer and signature tooling")]
#[command(version)]
struct Cli {
    /// Data directory for persisted setups
    #[arg(short, long, env = "ROT_DEST", default_value = "./data")]
    dest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both sides of the OT setup and save the results
    Setup {
        /// Context bound into the setup proof
        #[arg(short, long, env = "ROT_CONTEXT", default_value = "rot-party")]
        context: String,
    },

    /// Run random OT executions with the saved setup
    Transfer {
        /// Number of executions
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Receiver choice bit
        #[arg(short, long, value_enum, default_value_t = ChoiceArg::Random)]
        choice: ChoiceArg,
    },

    /// Print the Ethereum compact encoding of a signature
    Compact {
        /// Signature as hex encoded R (compressed) || S
        #[arg(short, long)]
        signature: String,
    },

    /// Verify a signature
    Verify {
        /// Compressed public key (hex)
        #[arg(short, long)]
        public_key: String,

        /// Message hash (hex)
        #[arg(short = 'm', long)]
        hash: String,

        /// Signature as hex encoded R (compressed) || S
        #[arg(short, long)]
        signature: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChoiceArg {
    #[value(name = "0")]
    Zero,
    #[value(name = "1")]
    One,
    Random,
}

/// Result of one local execution
struct Outcome {
    nonce: Nonce,
    choice: u8,
    received: Pad,
    rand0: Pad,
    rand1: Pad,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Setup { ref context } => {
            run_setup(&cli.dest, context)?;
        }
        Commands::Transfer { count, choice } => {
            run_transfer(&cli.dest, count, choice)?;
        }
        Commands::Compact { ref signature } => {
            run_compact(signature)?;
        }
        Commands::Verify {
            ref public_key,
            ref hash,
            ref signature,
        } => {
            run_verify(public_key, hash, signature)?;
        }
    }

    Ok(())
}

fn run_setup(dest: &Path, context: &str) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    info!(context = context, "Starting random OT setup");

    let (msg, sender_setup) = ot::setup_send(context.as_bytes(), &mut OsRng);
    let receiver_setup = ot::setup_receive(context.as_bytes(), &msg)?;

    let sender_path = dest.join(SENDER_SETUP_FILE);
    std::fs::write(&sender_path, serde_json::to_string_pretty(&sender_setup)?)?;

    let receiver_path = dest.join(RECEIVER_SETUP_FILE);
    std::fs::write(&receiver_path, serde_json::to_string_pretty(&receiver_setup)?)?;

    info!(
        sender = ?sender_path,
        receiver = ?receiver_path,
        "Setup completed, results saved"
    );

    println!("Setup message: {}", hex::encode(msg.to_bytes()));
    println!("Public Key: {}", hex::encode(msg.public_key));

    Ok(())
}

fn run_transfer(dest: &Path, count: usize, choice: ChoiceArg) -> Result<()> {
    let sender_setup: SenderSetup = load_json(&dest.join(SENDER_SETUP_FILE))?;
    let receiver_setup: ReceiverSetup = load_json(&dest.join(RECEIVER_SETUP_FILE))?;

    if sender_setup.public_key() != receiver_setup.public_key() {
        bail!("Sender and receiver setups do not belong together");
    }

    info!(count = count, "Starting random OT executions");

    #[cfg(feature = "multi-thread")]
    let outcomes = {
        use rayon::prelude::*;
        (0..count)
            .into_par_iter()
            .map(|_| run_one(&sender_setup, &receiver_setup, choice))
            .collect::<Result<Vec<_>>>()?
    };

    #[cfg(not(feature = "multi-thread"))]
    let outcomes = (0..count)
        .map(|_| run_one(&sender_setup, &receiver_setup, choice))
        .collect::<Result<Vec<_>>>()?;

    for (i, outcome) in outcomes.iter().enumerate() {
        println!("Execution {}:", i);
        println!("  nonce: {}", hex::encode(outcome.nonce));
        println!("  choice: {}", outcome.choice);
        println!("  received: {}", hex::encode(outcome.received));
        println!("  rand0: {}", hex::encode(outcome.rand0));
        println!("  rand1: {}", hex::encode(outcome.rand1));
    }

    info!(count = outcomes.len(), "Random OT executions completed");

    Ok(())
}

fn run_one(
    sender_setup: &SenderSetup,
    receiver_setup: &ReceiverSetup,
    choice: ChoiceArg,
) -> Result<Outcome> {
    let mut rng = OsRng;
    let nonce: Nonce = rng.gen();
    let bit = match choice {
        ChoiceArg::Zero => 0,
        ChoiceArg::One => 1,
        ChoiceArg::Random => rng.gen::<u8>() & 1,
    };

    let (sent, received) =
        ot::execute(&nonce, sender_setup, receiver_setup, Choice::from(bit), &mut rng)?;

    let expected = if bit == 1 { sent.rand1 } else { sent.rand0 };
    if received != expected {
        bail!("Receiver pad does not match sender pad");
    }

    Ok(Outcome {
        nonce,
        choice: bit,
        received,
        rand0: sent.rand0,
        rand1: sent.rand1,
    })
}

fn run_compact(signature: &str) -> Result<()> {
    let signature = parse_signature(signature)?;
    println!("Compact: {}", hex::encode(signature.to_compact_eth()));
    Ok(())
}

fn run_verify(public_key: &str, hash: &str, signature: &str) -> Result<()> {
    let public_key = decode_point(&hex::decode(public_key)?).context("Invalid public key")?;
    let hash = hex::decode(hash)?;
    let signature = parse_signature(signature)?;

    let valid = signature.verify(&public_key, &hash);
    info!(valid = valid, "Signature checked");

    println!("{}", if valid { "valid" } else { "invalid" });

    Ok(())
}

fn parse_signature(signature: &str) -> Result<Signature> {
    let bytes = hex::decode(signature)?;
    Ok(Signature::from_bytes(&bytes)?)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

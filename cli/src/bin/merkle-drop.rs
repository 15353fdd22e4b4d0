use alloy_primitives::B256;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use merkle_drop::utils::leaf::parse_address;
use merkle_drop::LeafOrder;
use merkle_drop_cli::{find_claim, generate, init_logging, verify};
use std::path::PathBuf;
use tracing::{error, info};

/// Cumulative Merkle airdrop generator
#[derive(Parser, Debug)]
#[command(name = "merkle-drop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and write the root and every proof
    Generate {
        /// JSON object mapping addresses to cumulative amounts
        #[arg(short, long)]
        input: PathBuf,

        /// Output artifact path
        #[arg(short, long)]
        output: PathBuf,

        /// How leaves are arranged before pairing
        #[arg(long, value_enum, default_value_t = LeafOrderArg::Sorted)]
        leaf_order: LeafOrderArg,
    },

    /// Check every proof in an artifact
    Verify {
        /// Artifact produced by `generate`
        #[arg(short, long)]
        artifact: PathBuf,

        /// Root published on chain; defaults to the artifact's own root
        #[arg(short, long)]
        root: Option<B256>,
    },

    /// Print the claim for one address
    Proof {
        /// Artifact produced by `generate`
        #[arg(short, long)]
        artifact: PathBuf,

        /// Recipient address
        #[arg(long)]
        address: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LeafOrderArg {
    /// Sort leaf digests; the root ignores input order
    Sorted,
    /// Pair leaves in input order
    Insertion,
}

impl From<LeafOrderArg> for LeafOrder {
    fn from(arg: LeafOrderArg) -> Self {
        match arg {
            LeafOrderArg::Sorted => LeafOrder::Sorted,
            LeafOrderArg::Insertion => LeafOrder::Insertion,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            output,
            leaf_order,
        } => {
            let distribution = generate(&input, &output, leaf_order.into())?;
            println!("{}", distribution.root());
        }
        Commands::Verify { artifact, root } => {
            let report = verify(&artifact, root)?;
            for address in &report.invalid {
                error!(%address, "Proof does not verify");
            }
            if !report.is_valid() {
                anyhow::bail!(
                    "{} of {} claims failed verification against {}",
                    report.invalid.len(),
                    report.checked,
                    report.root
                );
            }
            info!(root = %report.root, "All {} claims verify", report.checked);
        }
        Commands::Proof { artifact, address } => {
            let address = parse_address(&address).context("Invalid address")?;
            let claim = find_claim(&artifact, &address)?;
            let json = serde_json::to_string_pretty(&claim).context("Failed to serialize claim")?;
            println!("{json}");
        }
    }

    Ok(())
}

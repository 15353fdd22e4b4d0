//! File plumbing and command bodies for the `merkle-drop` binary.

use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use merkle_drop::{Claim, Distribution, DistributionFile, DistributionInput, LeafOrder};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

pub fn read_input(path: &Path) -> Result<DistributionInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse distribution input {}", path.display()))
}

pub fn read_artifact(path: &Path) -> Result<DistributionFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse artifact {}", path.display()))
}

/// Writes `contents` next to `path` first and renames it into place, so a
/// crash never leaves a half-written artifact behind.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).context("Failed to create temp file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write to temp file")?;
    file.sync_all().context("Failed to flush temp file")?;
    fs::rename(&temp_path, path).context("Failed to move temp file to output")?;
    Ok(())
}

/// Reads recipients from `input`, generates every proof, checks them, and
/// writes the artifact to `output`.
pub fn generate(input: &Path, output: &Path, order: LeafOrder) -> Result<Distribution> {
    info!("Reading recipients from {}", input.display());
    let input = read_input(input)?;
    info!("Loaded {} recipients", input.recipients().len());

    let distribution = input
        .into_distribution(order)
        .context("Failed to generate distribution")?;

    if !distribution.verify_all() {
        anyhow::bail!("Generated distribution failed self-verification");
    }
    match distribution.total_amount() {
        Some(total) => info!(%total, "Total cumulative amount"),
        None => warn!("Total cumulative amount exceeds 256 bits"),
    }

    let json = serde_json::to_string_pretty(&DistributionFile::from(&distribution))
        .context("Failed to serialize distribution")?;
    write_file_atomic(output, &json).context("Failed to write artifact")?;

    info!(root = %distribution.root(), "Wrote {}", output.display());
    Ok(distribution)
}

/// Outcome of checking an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub root: B256,
    pub checked: usize,
    pub invalid: Vec<Address>,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Checks every claim of an artifact against its own root, or against
/// `published_root` when the root on chain is known.
pub fn verify(artifact: &Path, published_root: Option<B256>) -> Result<VerifyReport> {
    let file = read_artifact(artifact)?;
    if let Some(published) = published_root {
        if published != file.root {
            warn!(artifact = %file.root, %published, "Artifact root differs from published root");
        }
    }
    let root = published_root.unwrap_or(file.root);
    let distribution = Distribution::from_parts(root, file.data);
    debug!(claims = distribution.len(), %root, "Verifying claims");

    let invalid = distribution
        .invalid_claims()
        .into_iter()
        .map(|claim| claim.address)
        .collect();
    Ok(VerifyReport {
        root,
        checked: distribution.len(),
        invalid,
    })
}

/// Looks up the claim for one address in an artifact.
pub fn find_claim(artifact: &Path, address: &Address) -> Result<Claim> {
    let distribution = Distribution::from(read_artifact(artifact)?);
    distribution
        .claim_for(address)
        .cloned()
        .with_context(|| format!("Address {address} not found in {}", artifact.display()))
}

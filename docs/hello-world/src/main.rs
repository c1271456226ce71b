// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Consumer example for the prescription verifier crates.
//!
//! Reads a signed prescription document and a sub-CA trust bundle, runs the
//! full verification pipeline, and prints either `valid` or the failure
//! reasons. Exit code 0 means the signature verified clean.

use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;

use rxsig::{verify_prescription_signature_xml, RevocationPolicy, VerificationSettings};

#[derive(Parser)]
#[command(about = "Verify the digital signature of an HL7v3 prescription document")]
struct Args {
    /// Path to the prescription XML file
    prescription: String,

    /// Path to a comma-joined PEM bundle of trusted sub-CA certificates
    #[arg(long, env = "RXSIG_TRUST_BUNDLE")]
    trust_bundle: String,

    /// Reject certificates whose revocation status cannot be determined
    #[arg(long)]
    strict_revocation: bool,

    /// Timeout in seconds for each CRL fetch
    #[arg(long, env = "RXSIG_CRL_TIMEOUT", default_value_t = 10)]
    crl_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::{fmt, EnvFilter};
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).init();
    }
    let args = Args::parse();

    let xml = std::fs::read_to_string(&args.prescription)
        .with_context(|| format!("failed to read {}", args.prescription))?;
    let bundle = std::fs::read_to_string(&args.trust_bundle)
        .with_context(|| format!("failed to read {}", args.trust_bundle))?;

    let policy = if args.strict_revocation {
        RevocationPolicy::RejectWhenUndetermined
    } else {
        RevocationPolicy::AcceptWhenUndetermined
    };
    let settings = VerificationSettings::default()
        .with_trust_anchor_bundle(&bundle)
        .map_err(anyhow::Error::msg)
        .context("failed to parse trust bundle")?
        .with_revocation_policy(policy)
        .with_fetch_timeout(Duration::from_secs(args.crl_timeout));

    let errors = verify_prescription_signature_xml(&xml, &settings).await;
    if errors.is_empty() {
        println!("valid");
        return Ok(());
    }
    for error in &errors {
        println!("{error}");
    }
    std::process::exit(1);
}

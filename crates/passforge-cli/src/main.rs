//! Command-line interface for building and signing wallet pass bundles.
//!
//! Reads a descriptor JSON document and an image directory, signs the bundle
//! with local PEM credentials or a remote signing service, and writes the
//! finished `.pkpass` archive.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use passforge::{Localizations, Pass, PassBundle, PassImages, SigningConfig};

#[derive(Parser)]
#[command(name = "passforge")]
#[command(about = "Wallet pass bundle builder and signer")]
struct Cli {
    /// Pass descriptor JSON file
    input: PathBuf,

    /// Output file (defaults to the input name with a .pkpass extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory with image variants (icon.png, logo@2x.png, ...)
    #[arg(short, long)]
    images: PathBuf,

    /// Localized string table as lang=path, where path is a JSON object of
    /// key/value translations (repeatable)
    #[arg(short = 's', long = "strings")]
    strings: Vec<String>,

    /// Signing certificate file (PEM format)
    #[arg(short = 'c', long)]
    certificate: Option<PathBuf>,

    /// Private key file (PEM format, unencrypted PKCS#8)
    #[arg(short = 'k', long)]
    private_key: Option<PathBuf>,

    /// Intermediate chain certificate (PEM format, repeatable)
    #[arg(long)]
    chain: Vec<PathBuf>,

    /// Remote signing service endpoint (overrides local signing;
    /// falls back to the SIGN_URL environment variable)
    #[arg(long)]
    remote_url: Option<String>,

    /// Extra headers for the remote signing request, "name=value;name2=value2"
    /// (falls back to the HEADERS environment variable)
    #[arg(long)]
    remote_headers: Option<String>,

    /// ZIP compression level (0-9, default: 6)
    #[arg(short = 'z', long, default_value = "6")]
    zip_level: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let descriptor = fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let pass = Pass::from_json(&descriptor)?;

    let images = PassImages::load_dir(&cli.images)
        .with_context(|| format!("failed to load images from {}", cli.images.display()))?;

    let localizations = load_localizations(&cli.strings)?;
    let config = build_signing_config(&cli)?;

    let bundle = PassBundle::new(&pass, &images)
        .localizations(&localizations)
        .compression_level(cli.zip_level.into())
        .build(&config)?;

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("pkpass"));
    fs::write(&output, &bundle)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("bundle is {} bytes", bundle.len());
    println!("Wrote: {}", output.display());
    Ok(())
}

/// Resolve the signing configuration from flags, with environment fallback
/// for remote deployments. Read once here; the library takes the result as
/// an explicit value.
fn build_signing_config(cli: &Cli) -> anyhow::Result<SigningConfig> {
    let remote_url = cli
        .remote_url
        .clone()
        .or_else(|| std::env::var("SIGN_URL").ok());

    if let Some(url) = remote_url {
        let mut config = SigningConfig::remote(url);
        let headers = cli
            .remote_headers
            .clone()
            .or_else(|| std::env::var("HEADERS").ok());
        if let Some(spec) = headers {
            config = config.headers_spec(&spec);
        }
        return Ok(config);
    }

    let (Some(cert_path), Some(key_path)) = (cli.certificate.as_ref(), cli.private_key.as_ref())
    else {
        bail!("must provide either --remote-url or both --certificate and --private-key");
    };

    let mut config = SigningConfig::local()
        .certificate_pem(
            fs::read(cert_path)
                .with_context(|| format!("failed to read {}", cert_path.display()))?,
        )
        .private_key_pem(
            fs::read(key_path)
                .with_context(|| format!("failed to read {}", key_path.display()))?,
        );
    for chain_path in &cli.chain {
        config = config.chain_certificate_pem(
            fs::read(chain_path)
                .with_context(|| format!("failed to read {}", chain_path.display()))?,
        );
    }
    Ok(config)
}

/// Load `lang=path` string tables, each file a flat JSON object.
fn load_localizations(specs: &[String]) -> anyhow::Result<Localizations> {
    let mut localizations = Localizations::new();
    for spec in specs {
        let Some((language, path)) = spec.split_once('=') else {
            bail!("invalid --strings value \"{spec}\", expected lang=path");
        };
        let data = fs::read(path).with_context(|| format!("failed to read {path}"))?;
        let table: BTreeMap<String, String> = serde_json::from_slice(&data)
            .with_context(|| format!("{path} is not a JSON object of strings"))?;
        for (key, value) in table {
            localizations.add(language, key, value);
        }
    }
    Ok(localizations)
}

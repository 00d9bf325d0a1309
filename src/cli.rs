//! Command-line interface

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vmp_keygen::types::DEFAULT_PUBLIC_EXPONENT;
use vmp_keygen::{generate, parse, parse_with_config, KeyConfig, License};

#[derive(Parser)]
#[command(name = "vmp_keygen")]
#[command(author = "vmp_keygen Contributors")]
#[command(version = "1.0.0")]
#[command(about = "Generate and decode VMProtect serial numbers")]
pub struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a serial number for a license
    Generate {
        #[command(flatten)]
        key: KeyArgs,

        /// Private exponent (base64)
        #[arg(long, conflicts_with = "export")]
        private: Option<String>,

        #[command(flatten)]
        license: LicenseArgs,
    },

    /// Decode and verify a serial number
    Parse {
        #[command(flatten)]
        key: KeyArgs,

        /// Public exponent (base64), defaults to 65537
        #[arg(long)]
        public: Option<String>,

        /// Serial number; read from stdin when omitted
        #[arg(long)]
        serial: Option<String>,
    },
}

/// Key material, either from an export file or given piece by piece
#[derive(Args)]
pub struct KeyArgs {
    /// Key export file with $exported_* lines
    #[arg(long, conflicts_with_all = ["bits", "modulus", "product_code"])]
    pub export: Option<PathBuf>,

    /// Key size in bits (128, 256, 512, 1024, 2048 or 4096)
    #[arg(long)]
    pub bits: Option<usize>,

    /// Modulus (base64)
    #[arg(long)]
    pub modulus: Option<String>,

    /// Product code (base64, 8 bytes)
    #[arg(long)]
    pub product_code: Option<String>,
}

#[derive(Args)]
pub struct LicenseArgs {
    /// Licensee name
    #[arg(long)]
    pub name: Option<String>,

    /// Licensee e-mail
    #[arg(long)]
    pub email: Option<String>,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub expires: Option<NaiveDate>,

    /// Last build date the license covers (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub max_build: Option<NaiveDate>,

    /// Hardware id (base64, length a multiple of 4 bytes)
    #[arg(long)]
    pub hardware_id: Option<String>,

    /// Running time limit in minutes (0-255)
    #[arg(long)]
    pub running_time: Option<u32>,

    /// Free-form user data (up to 255 bytes)
    #[arg(long)]
    pub user_data: Option<String>,
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate {
            key,
            private,
            license,
        } => run_generate(&key, private.as_deref(), &license),
        Command::Parse {
            key,
            public,
            serial,
        } => run_parse(&key, public.as_deref(), serial),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(key: &KeyArgs, private: Option<&str>, args: &LicenseArgs) -> anyhow::Result<()> {
    let config = match &key.export {
        Some(path) => load_export(path)?,
        None => KeyConfig::new(
            "RSA",
            require(key.bits, "--bits")?,
            require(private, "--private")?,
            require(key.modulus.as_deref(), "--modulus")?,
            require(key.product_code.as_deref(), "--product-code")?,
        )?,
    };

    let hardware_id = args
        .hardware_id
        .as_deref()
        .map(|hwid| STANDARD.decode(hwid.trim()))
        .transpose()
        .context("--hardware-id is not valid base64")?;

    let license = License {
        name: args.name.clone(),
        email: args.email.clone(),
        expiration: args.expires,
        max_build: args.max_build,
        hardware_id,
        running_time_limit: args.running_time,
        user_data: args.user_data.as_ref().map(|data| data.as_bytes().to_vec()),
        ..Default::default()
    };

    tracing::info!(bits = config.bits(), "generating serial");
    let serial = generate(&license, &config).context("failed to generate serial number")?;
    println!("{}", serial);
    Ok(())
}

fn run_parse(key: &KeyArgs, public: Option<&str>, serial: Option<String>) -> anyhow::Result<()> {
    let serial = match serial {
        Some(serial) => serial,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read serial from stdin")?;
            buf
        }
    };

    let license = match &key.export {
        Some(path) => parse_with_config(&serial, public, &load_export(path)?),
        None => parse(
            &serial,
            public.unwrap_or(DEFAULT_PUBLIC_EXPONENT),
            require(key.modulus.as_deref(), "--modulus")?,
            require(key.product_code.as_deref(), "--product-code")?,
            require(key.bits, "--bits")?,
        ),
    }
    .context("failed to parse serial number")?;

    print!("{}", format_license(&license));
    Ok(())
}

fn format_license(license: &License) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule);
    if let Some(version) = license.version {
        let _ = writeln!(out, "Version:       {}", version);
    }
    if let Some(code) = &license.product_code {
        let _ = writeln!(out, "Product code:  {}", STANDARD.encode(code));
    }
    if let Some(name) = &license.name {
        let _ = writeln!(out, "Name:          {}", name);
    }
    if let Some(email) = &license.email {
        let _ = writeln!(out, "E-mail:        {}", email);
    }
    if let Some(date) = license.expiration {
        let _ = writeln!(out, "Expires:       {}", date);
    }
    if let Some(date) = license.max_build {
        let _ = writeln!(out, "Max build:     {}", date);
    }
    if let Some(hwid) = &license.hardware_id {
        let _ = writeln!(out, "Hardware id:   {}", STANDARD.encode(hwid));
    }
    if let Some(limit) = license.running_time_limit {
        let _ = writeln!(out, "Running time:  {} min", limit);
    }
    if let Some(data) = &license.user_data {
        let _ = writeln!(out, "User data:     {}", String::from_utf8_lossy(data));
    }
    let _ = writeln!(out, "{}", rule);
    out
}

fn load_export(path: &Path) -> anyhow::Result<KeyConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key export {}", path.display()))?;
    KeyConfig::from_export(&text)
        .with_context(|| format!("invalid key export {}", path.display()))
}

fn require<T>(value: Option<T>, flag: &str) -> anyhow::Result<T> {
    value.ok_or_else(|| anyhow::anyhow!("{} is required unless --export is given", flag))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

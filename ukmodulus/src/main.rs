//! UK bank account modulus checker.
//!
//! Loads the VocaLink weighting and substitution tables named by
//! `ukmodulus.toml` (or the `--rules`/`--substitutions` flags) and checks sort
//! code / account number pairs against them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use ukmodulus::core::normalize::normalize;
use ukmodulus::error::ModulusError;
use ukmodulus::exit_codes;
use ukmodulus::io::config::{DEFAULT_CONFIG_FILE, load_config};
use ukmodulus::io::table_store::load_tables;
use ukmodulus::logging;
use ukmodulus::validate::Validator;

#[derive(Parser)]
#[command(
    name = "ukmodulus",
    version,
    about = "UK bank account modulus checker"
)]
struct Cli {
    /// Configuration file naming the table files.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Weighting-rule table (overrides the config file).
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Sort-code substitution table (overrides the config file).
    #[arg(long, global = true)]
    substitutions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an account number; exits 0 when valid, 2 when not.
    Check {
        sort_code: String,
        account_number: String,
        /// Print the full check report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the weighting rules that apply to a sort code.
    Rules { sort_code: String },
    /// Print the normalized sort code and account number.
    Normalize {
        sort_code: String,
        account_number: String,
    },
    /// Load both tables and print their sizes.
    Tables,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_code_for(&err));
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Check {
            sort_code,
            account_number,
            json,
        } => cmd_check(&cli, sort_code, account_number, *json),
        Command::Rules { sort_code } => cmd_rules(&cli, sort_code),
        Command::Normalize {
            sort_code,
            account_number,
        } => cmd_normalize(sort_code, account_number),
        Command::Tables => cmd_tables(&cli),
    }
}

fn cmd_check(cli: &Cli, sort_code: &str, account_number: &str, json: bool) -> Result<i32> {
    let validator = load_validator(cli)?;
    let report = validator.check(sort_code, account_number)?;
    if json {
        let payload = serde_json::to_string_pretty(&report).context("serialize check report")?;
        println!("{payload}");
    } else if report.valid {
        println!("valid");
    } else {
        println!("invalid");
    }
    Ok(if report.valid {
        exit_codes::OK
    } else {
        exit_codes::CHECK_FAILED
    })
}

fn cmd_rules(cli: &Cli, sort_code: &str) -> Result<i32> {
    let validator = load_validator(cli)?;
    for rule in validator.rules_for(sort_code)? {
        println!("{rule}");
    }
    Ok(exit_codes::OK)
}

fn cmd_normalize(sort_code: &str, account_number: &str) -> Result<i32> {
    let input = normalize(account_number, sort_code)?;
    println!("{} {}", input.sort_code, input.account_number);
    Ok(exit_codes::OK)
}

fn cmd_tables(cli: &Cli) -> Result<i32> {
    let validator = load_validator(cli)?;
    let tables = validator.tables();
    println!("rules: {}", tables.rules().len());
    println!("substitutions: {}", tables.substitutions().len());
    Ok(exit_codes::OK)
}

/// Resolve table paths (flags win over the config file) and load them.
fn load_validator(cli: &Cli) -> Result<Validator> {
    let cfg = load_config(&cli.config)?;
    let rules_path = cli.rules.clone().unwrap_or(cfg.tables.rules_path);
    let substitutions_path = cli
        .substitutions
        .clone()
        .unwrap_or(cfg.tables.substitutions_path);
    debug!(
        rules = %rules_path.display(),
        substitutions = %substitutions_path.display(),
        "resolved table paths"
    );
    let tables = load_tables(&rules_path, &substitutions_path).context("load tables")?;
    Ok(Validator::new(tables))
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ModulusError>() {
        Some(modulus) if modulus.is_invalid_input() => exit_codes::INVALID_INPUT,
        _ => exit_codes::ERROR,
    }
}

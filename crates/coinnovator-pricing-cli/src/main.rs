mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;

use commands::catalog::CatalogArgs;
use commands::membership::MemberPriceArgs;
use commands::pricing::{CalculateArgs, QuoteArgs, ValidateFormulaArgs};

/// Challenge pricing for the CoInnovator marketplace
#[derive(Parser)]
#[command(
    name = "coinnovator-pricing",
    version,
    about = "Challenge pricing for the CoInnovator marketplace",
    long_about = "Computes platform, management and consulting fees, engagement-model \
                  totals, advance payments and membership discounts with decimal \
                  precision, from a self-contained request or a pricing catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a fee breakdown from a self-contained request
    Calculate(CalculateArgs),
    /// Quote a challenge against a pricing catalog
    Quote(QuoteArgs),
    /// Check a pricing formula and list every problem
    ValidateFormula(ValidateFormulaArgs),
    /// Load a pricing catalog and report what it contains
    ValidateCatalog(CatalogArgs),
    /// List engagement models and the fees they charge
    Models(CatalogArgs),
    /// Apply the membership discount to a fee schedule
    MemberPrice(MemberPriceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::pricing::run_calculate(args),
        Commands::Quote(args) => commands::pricing::run_quote(args),
        Commands::ValidateFormula(args) => commands::pricing::run_validate_formula(args),
        Commands::ValidateCatalog(args) => commands::catalog::run_validate_catalog(args),
        Commands::Models(args) => commands::catalog::run_models(args),
        Commands::MemberPrice(args) => commands::membership::run_member_price(args),
        Commands::Version => {
            println!("coinnovator-pricing {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            debug!(format = ?cli.output, "writing output");
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

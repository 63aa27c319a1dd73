//! Reconcile CLI
//!
//! Command-line interface for planning and applying reconciliation against
//! JSON state files

use clap::{Parser, Subcommand};
use reconcile_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "reconcile")]
#[command(about = "Reconcile - declarative configuration reconciliation", long_about = None)]
struct Cli {
    /// Logging profile: development, production or test
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the built-in object kinds and their variants
    Kinds(commands::kinds::KindsArgs),
    /// Show the operations that would converge the current state
    Plan(commands::reconcile::ReconcileArgs),
    /// Apply the operations and write the new state back
    Apply(commands::reconcile::ReconcileArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Kinds(args) => commands::kinds::execute(args),
        Commands::Plan(args) => commands::reconcile::execute_plan(args),
        Commands::Apply(args) => commands::reconcile::execute_apply(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

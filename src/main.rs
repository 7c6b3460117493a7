//! machine-driver-hetzner: Hetzner Cloud provisioning driver
//!
//! Validates the driver's flags the way the host orchestration tool passes
//! them, and merges cloud-init user data documents.

mod cli;
mod config;
mod domain;
mod service;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::ConfigService;
use service::DriverService;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ConfigService::load(cli.config.as_deref())?;

    domain::logger::init(&config, cli.debug || config.debug)?;

    match cli.command {
        Commands::Check { flags } => {
            let service = DriverService::new(config);
            let report = service.check(&flags)?;
            println!("{}", report);
            if !cli.quiet {
                eprintln!("Driver flags are valid.");
            }
        }
        Commands::UserData { flags } => {
            let service = DriverService::new(config);
            print!("{}", service.user_data(&flags)?);
        }
        Commands::MergeUserData { first, second } => {
            print!("{}", DriverService::merge_files(&first, &second)?);
        }
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Version => {
            println!("machine-driver-hetzner {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

//! Gantry CLI
//!
//! Command-line client for the Gantry PaaS control plane.

use anyhow::Result;
use clap::Parser;
use gantryctl::cli::{
    generate_completion, handle_config, handle_key, handle_login, handle_logout, handle_service,
    handle_team, handle_token, handle_user, Cli, Commands,
};
use gantryctl::client::ApiClient;
use gantryctl::config::CliConfig;
use gantryctl::credentials;
use gantryctl::prompt::TerminalPrompter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    // Load config file (unless --no-config is specified)
    builder = builder.with_config_file(!cli.no_config)?;

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Apply CLI argument overrides (highest priority)
    if let Some(ref target) = cli.target {
        builder = builder.with_target(target)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose.unwrap_or(false) {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    let verbose = config.verbose;

    if verbose {
        eprintln!("Verbose mode enabled");
        if config.target.is_empty() {
            eprintln!("Target: (not set)");
        } else {
            eprintln!("Target: {}", config.target);
        }
        eprintln!("Command: {:?}", cli.command);
    }

    let mut prompter = TerminalPrompter;

    // Execute commands
    let result = match cli.command {
        Commands::Login { email } => {
            handle_login(&api_client(&config), &email, &mut prompter).await
        }
        Commands::Logout => handle_logout(),
        Commands::Service { command } => {
            handle_service(&api_client(&config), command, &mut prompter).await
        }
        Commands::User { command } => {
            handle_user(&api_client(&config), command, &mut prompter).await
        }
        Commands::Team { command } => {
            handle_team(&api_client(&config), command, &mut prompter).await
        }
        Commands::Key { command } => handle_key(&api_client(&config), command).await,
        Commands::Token { command } => handle_token(&api_client(&config), command).await,
        Commands::Config { command } => handle_config(command, &config).await,
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Create the API client from validated configuration, exiting on failure
///
/// Commands that never talk to the control plane (config, completion,
/// logout) skip this entirely, so an unset target only fails the
/// commands that actually need one.
fn api_client(config: &CliConfig) -> ApiClient {
    match ApiClient::with_config(
        &config.target,
        config.timeout,
        3,
        std::time::Duration::from_millis(500),
        credentials::load_token(),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

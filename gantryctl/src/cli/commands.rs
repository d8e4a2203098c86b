//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};

/// Gantry control plane CLI
#[derive(Parser, Debug)]
#[command(name = "gantryctl")]
#[command(version, about = "Gantry control plane CLI", long_about = None)]
pub struct Cli {
    /// Control plane URL (overrides config file)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Enable verbose diagnostics (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email address
        email: String,
    },

    /// Log out and discard the stored session token
    Logout,

    /// Service catalog and instance commands
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },

    /// Account management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Team management commands
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },

    /// Public key management commands
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// API key commands
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// List the services you have instances of
    List,

    /// Provision a new service instance
    Add {
        /// Service to provision from
        service: String,

        /// Name for the new instance
        instance: String,

        /// Plan to use (control plane default when omitted)
        plan: Option<String>,

        /// Team that owns the new instance
        #[arg(short = 't', long)]
        team_owner: Option<String>,
    },

    /// Remove a service instance
    Remove {
        /// Instance name
        instance: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        assume_yes: bool,
    },

    /// Show the instances and plans of a service
    Info {
        /// Service name
        service: String,
    },

    /// Show the status of a service instance
    Status {
        /// Instance name
        instance: String,
    },

    /// Show the documentation of a service
    Doc {
        /// Service name
        service: String,
    },

    /// Bind a service instance to an application
    Bind {
        /// Instance name
        instance: String,

        /// Application name
        #[arg(short, long)]
        app: String,
    },

    /// Unbind a service instance from an application
    Unbind {
        /// Instance name
        instance: String,

        /// Application name
        #[arg(short, long)]
        app: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a new account on the target
    Create {
        /// Account email address
        email: String,
    },

    /// Remove your account from the target
    Remove {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        assume_yes: bool,
    },

    /// Change your password
    ChangePassword,

    /// Start or finish a password reset
    ResetPassword {
        /// Account email address
        email: String,

        /// Reset token from the email (finishes the reset)
        #[arg(short = 't', long)]
        token: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// Create a new team
    Create {
        /// Team name
        name: String,
    },

    /// Remove a team
    Remove {
        /// Team name
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        assume_yes: bool,
    },

    /// List the teams you belong to
    List,

    /// Add a user to a team
    AddMember {
        /// Team name
        team: String,

        /// Email address of the user to add
        email: String,
    },

    /// Remove a user from a team
    RemoveMember {
        /// Team name
        team: String,

        /// Email address of the user to remove
        email: String,
    },

    /// List the members of a team
    Members {
        /// Team name
        team: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Register a public key
    Add {
        /// Name for the key
        name: String,

        /// Path of the public key file ("-" reads standard input)
        path: String,
    },

    /// Remove a public key
    Remove {
        /// Key name
        name: String,
    },

    /// List your registered keys
    List {
        /// Show full key content without truncation
        #[arg(short = 'n', long)]
        no_truncate: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Show your permanent API key
    Show,

    /// Invalidate your API key and issue a new one
    Regenerate,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}

//! Command execution handlers

use anyhow::Result;
use gantry_core::GantryError;
use std::io::Read;

use crate::client::ApiClient;
use crate::config::CliConfig;
use crate::credentials;
use crate::format::{self, format_success};
use crate::prompt::Prompter;

use super::commands::*;

/// Handle the login command
///
/// Stores the session token so later commands authenticate without
/// prompting again.
pub async fn handle_login(
    client: &ApiClient,
    email: &str,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let password = prompter.password("Password: ")?;

    let token = client.login(email, &password).await?;
    credentials::save_token(&token)?;

    println!("{}", format_success("Successfully logged in!"));
    Ok(())
}

/// Handle the logout command
pub fn handle_logout() -> Result<()> {
    credentials::delete_token()?;
    println!("{}", format_success("Successfully logged out!"));
    Ok(())
}

/// Handle service commands
pub async fn handle_service(
    client: &ApiClient,
    command: ServiceCommands,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match command {
        ServiceCommands::List => {
            let entries = client.list_instances().await?;
            print!("{}", format::format_catalog(&entries));
        }
        ServiceCommands::Add {
            service,
            instance,
            plan,
            team_owner,
        } => {
            client
                .create_instance(&instance, &service, plan, team_owner)
                .await?;
            println!("{}", format_success("Service successfully added."));
        }
        ServiceCommands::Remove {
            instance,
            assume_yes,
        } => {
            if !assume_yes {
                let question =
                    format!("Are you sure you want to remove service \"{}\"?", instance);
                if !prompter.confirm(&question)? {
                    println!("Abort.");
                    return Ok(());
                }
            }

            client.remove_instance(&instance).await?;
            println!(
                "{}",
                format_success(&format!("Service \"{}\" successfully removed!", instance))
            );
        }
        ServiceCommands::Info { service } => {
            let instances = client.service_instances(&service).await?;

            print!("Info for \"{}\"\n\n", service);
            if !instances.is_empty() {
                println!("Instances");
                print!("{}", format::format_instances(&instances));
            }

            let plans = client.service_plans(&service).await?;
            print!("\nPlans\n");
            if !plans.is_empty() {
                print!("{}", format::format_plans(&plans));
            }
        }
        ServiceCommands::Status { instance } => {
            let status = client.instance_status(&instance).await?;
            println!("{}", status);
        }
        ServiceCommands::Doc { service } => {
            let doc = client.service_doc(&service).await?;
            print!("{}", doc);
        }
        ServiceCommands::Bind { instance, app } => {
            let output = client.bind_instance(&instance, &app).await?;
            if !output.is_empty() {
                print!("{}", output);
                if !output.ends_with('\n') {
                    println!();
                }
            }
            println!(
                "{}",
                format_success(&format!(
                    "Instance \"{}\" successfully bound to app \"{}\"!",
                    instance, app
                ))
            );
        }
        ServiceCommands::Unbind { instance, app } => {
            client.unbind_instance(&instance, &app).await?;
            println!(
                "{}",
                format_success(&format!(
                    "Instance \"{}\" successfully unbound from app \"{}\"!",
                    instance, app
                ))
            );
        }
    }

    Ok(())
}

/// Handle user commands
pub async fn handle_user(
    client: &ApiClient,
    command: UserCommands,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match command {
        UserCommands::Create { email } => {
            let password = prompter.password("Password: ")?;
            let confirmation = prompter.password("Confirm: ")?;
            if password != confirmation {
                return Err(anyhow::anyhow!("Passwords didn't match."));
            }

            if let Err(err) = client.create_user(&email, &password).await {
                // Targets with self-service signup disabled answer the
                // signup route with 404 or 405
                if let Some(GantryError::Api { status, .. }) =
                    err.downcast_ref::<GantryError>()
                {
                    if *status == 404 || *status == 405 {
                        return Err(anyhow::anyhow!(
                            "User creation is disabled on this target."
                        ));
                    }
                }
                return Err(err);
            }

            println!(
                "{}",
                format_success(&format!("User \"{}\" successfully created!", email))
            );
        }
        UserCommands::Remove { assume_yes } => {
            if !assume_yes {
                let question = "Are you sure you want to remove your user from gantry?";
                if !prompter.confirm(question)? {
                    println!("Abort.");
                    return Ok(());
                }
            }

            client.remove_user().await?;
            credentials::delete_token()?;
            println!("{}", format_success("User successfully removed."));
        }
        UserCommands::ChangePassword => {
            let old = prompter.password("Current password: ")?;
            let new = prompter.password("New password: ")?;
            let confirmation = prompter.password("Confirm: ")?;
            if new != confirmation {
                return Err(anyhow::anyhow!(
                    "New password and password confirmation didn't match."
                ));
            }

            client.change_password(&old, &new).await?;
            println!("{}", format_success("Password successfully updated!"));
        }
        UserCommands::ResetPassword { email, token } => {
            client.reset_password(&email, token.as_deref()).await?;
            if token.is_some() {
                println!("Your password has been reset and mailed to you.\n\nPlease check your email.");
            } else {
                println!("You've successfully started the password reset process.\n\nPlease check your email.");
            }
        }
    }

    Ok(())
}

/// Handle team commands
pub async fn handle_team(
    client: &ApiClient,
    command: TeamCommands,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match command {
        TeamCommands::Create { name } => {
            client.create_team(&name).await?;
            println!(
                "{}",
                format_success(&format!("Team \"{}\" successfully created!", name))
            );
        }
        TeamCommands::Remove { name, assume_yes } => {
            if !assume_yes {
                let question = format!("Are you sure you want to remove team \"{}\"?", name);
                if !prompter.confirm(&question)? {
                    println!("Abort.");
                    return Ok(());
                }
            }

            client.remove_team(&name).await?;
            println!(
                "{}",
                format_success(&format!("Team \"{}\" successfully removed!", name))
            );
        }
        TeamCommands::List => {
            let teams = client.list_teams().await?;
            print!("Teams:\n\n");
            for team in &teams {
                println!("  - {}", team.name);
            }
        }
        TeamCommands::AddMember { team, email } => {
            client.add_team_member(&team, &email).await?;
            println!(
                "{}",
                format_success(&format!(
                    "User \"{}\" was added to the \"{}\" team",
                    email, team
                ))
            );
        }
        TeamCommands::RemoveMember { team, email } => {
            client.remove_team_member(&team, &email).await?;
            println!(
                "{}",
                format_success(&format!(
                    "User \"{}\" was removed from the \"{}\" team",
                    email, team
                ))
            );
        }
        TeamCommands::Members { team } => {
            let detail = client.team_detail(&team).await?;
            let mut users = detail.users;
            users.sort();
            for user in &users {
                println!("- {}", user);
            }
        }
    }

    Ok(())
}

/// Handle public key commands
pub async fn handle_key(client: &ApiClient, command: KeyCommands) -> Result<()> {
    match command {
        KeyCommands::Add { name, path } => {
            let key = read_key_material(&path)?;
            client.add_key(&name, &key).await?;
            println!(
                "{}",
                format_success(&format!("Key \"{}\" successfully added!", name))
            );
        }
        KeyCommands::Remove { name } => {
            client.remove_key(&name).await?;
            println!(
                "{}",
                format_success(&format!("Key \"{}\" successfully removed!", name))
            );
        }
        KeyCommands::List { no_truncate } => {
            let keys = client.list_keys().await?;
            print!("{}", format::format_keys(&keys, no_truncate));
        }
    }

    Ok(())
}

/// Handle API key commands
pub async fn handle_token(client: &ApiClient, command: TokenCommands) -> Result<()> {
    match command {
        TokenCommands::Show => {
            let key = client.show_api_key().await?;
            println!("API key: {}", key);
        }
        TokenCommands::Regenerate => {
            let key = client.regenerate_api_key().await?;
            println!("Your new API key is: {}", key);
        }
    }

    Ok(())
}

/// Handle config commands
pub async fn handle_config(command: ConfigCommands, current_config: &CliConfig) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("CLI Configuration:");
            println!("{:<20} Value", "Setting");
            println!("{}", "-".repeat(40));
            let target = if current_config.target.is_empty() {
                "(not set)"
            } else {
                &current_config.target
            };
            println!("{:<20} {}", "Target", target);
            println!("{:<20} {}", "Verbose", current_config.verbose);
            println!("{:<20} {}s", "Timeout", current_config.timeout);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            config.set(&key, &value)?;
            config.save()?;
            println!("{}", format_success(&format!("Set {} = {}", key, value)));
        }
        ConfigCommands::Reset => {
            let default_config = CliConfig::default();
            default_config.save()?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

/// Read public key material from a file, or stdin when `path` is "-"
///
/// All line breaks are stripped so multi-line key files upload as one
/// continuous string.
fn read_key_material(path: &str) -> Result<String> {
    let raw = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(anyhow::anyhow!("file \"{}\" doesn't exist", path));
            }
            Err(e) => return Err(e.into()),
        }
    };

    Ok(raw.replace(['\r', '\n'], ""))
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// src/cli/config.rs
//! Config 命令 - 凭据的交互式设置、路径查看与清除

use anyhow::{bail, Result};
use clap::Subcommand;
use dialoguer::{Input, Password};
use tracing::{debug, info};

use crate::config::{ConfigStore, Credentials, CONFIG_FILE};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Setup the auth configuration for the current user
    Setup,
    /// Print the folders used for configuration lookup
    Paths,
    /// Remove the local configuration file
    Clear,
}

/// 处理 config 子命令
pub fn handle_config(command: ConfigCommands, store: &ConfigStore) -> Result<()> {
    match command {
        ConfigCommands::Setup => {
            let user_key: String = Input::new()
                .with_prompt("Enter user key")
                .interact_text()?;
            let api_token = Password::new()
                .with_prompt("Enter API token")
                .interact()?;

            let credentials = credentials_from_input(&user_key, &api_token)?;
            debug!(config = ?credentials, "Given config");

            let path = store.save(&credentials)?;
            println!("✓ Config saved to {}", path.display());
        }
        ConfigCommands::Paths => {
            info!("Collecting paths that will be used for {} lookup", CONFIG_FILE);
            for folder in store.paths() {
                println!("{}", folder.display());
            }
        }
        ConfigCommands::Clear => {
            let path = store.clear()?;
            info!(file = %path.display(), "Config cleared");
            println!("✓ Removed {}", path.display());
        }
    }
    Ok(())
}

/// 去掉首尾空白，拒绝空值
fn credentials_from_input(user_key: &str, api_token: &str) -> Result<Credentials> {
    let user_key = user_key.trim();
    let api_token = api_token.trim();
    if user_key.is_empty() || api_token.is_empty() {
        bail!("User key and API token must not be empty");
    }
    Ok(Credentials::new(user_key, api_token))
}

//! Config command - show or change the stored client configuration.

use colored::Colorize;
use entityset::config::{environment_for_host, ConfigFile};

use crate::cli::ConfigAction;

pub fn run(action: ConfigAction, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = ConfigFile::default_path()?;
    let mut config = ConfigFile::load(&path)?;

    match action {
        ConfigAction::Show => {
            println!("{} {}", "Config file".cyan().bold(), path.display());
            println!("{}", serde_json::to_string_pretty(&masked(&config))?);
            return Ok(());
        }
        ConfigAction::SetHost { host } => {
            config.set_default_host(host);
        }
        ConfigAction::SetUser { user } => {
            config.set_default_user(user);
        }
        ConfigAction::SetApiKey { key, host, user } => {
            config.set_api_key(&host, user.as_deref(), key)?;
            println!("Stored key for environment {}", environment_for_host(&host).white().bold());
        }
    }

    config.save(&path)?;
    println!("{} {}", "Saved".green().bold(), path.display());
    Ok(())
}

/// Copy of the configuration with API keys reduced to their last four characters.
fn masked(config: &ConfigFile) -> ConfigFile {
    let mut shown = config.clone();
    for user in shown.users.values_mut() {
        for key in user.api_keys.values_mut() {
            let tail: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            *key = format!("****{}", tail);
        }
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_keys() {
        let mut config = ConfigFile::default();
        config.set_api_key("dev", Some("ana"), "abcdef123456").unwrap();

        let shown = masked(&config);
        assert_eq!(shown.api_key_for("dev", "ana"), Some("****3456"));
        assert_eq!(config.api_key_for("dev", "ana"), Some("abcdef123456"));
    }
}

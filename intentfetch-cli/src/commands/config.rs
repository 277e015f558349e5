//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use intentfetch::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., intent.max_reach)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., intent.max_reach)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'intentfetch config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load()?;
    println!("{}", config_key.get(&config));
    Ok(())
}

/// Set a configuration value.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load()?;
    apply_setting(&mut config, config_key, value)?;
    config.save()?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));

    Ok(())
}

/// Store `value` and reject it if it leaves the configuration unusable.
fn apply_setting(config: &mut ConfigFile, key: ConfigKey, value: &str) -> Result<(), CliError> {
    let mut updated = config.clone();
    key.set(&mut updated, value)?;
    updated.intent_config()?;
    updated.tracker_config()?;
    *config = updated;
    Ok(())
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    print!("{}", render_list(&config));
    Ok(())
}

fn render_list(config: &ConfigFile) -> String {
    let mut out = String::from("Configuration Settings\n======================\n\n");
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section));
            current_section = section;
        }

        out.push_str(&format!("  {} = {}\n", key.key_name(), key.get(config)));
    }

    out
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_message() {
        let err = parse_key("intent.bogus").unwrap_err();
        assert!(err.to_string().contains("intentfetch config list"));
    }

    #[test]
    fn test_apply_setting_valid() {
        let mut config = ConfigFile::default();
        apply_setting(&mut config, ConfigKey::MaxReach, "750").unwrap();
        assert_eq!(config.intent.max_reach, 750.0);
    }

    #[test]
    fn test_apply_setting_out_of_range_leaves_config_unchanged() {
        let mut config = ConfigFile::default();
        let err = apply_setting(&mut config, ConfigKey::MinSpeed, "-2").unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig(_)));
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_render_list_groups_sections() {
        let listing = render_list(&ConfigFile::default());
        assert!(listing.contains("[intent]\n  max_reach = 500\n"));
        assert!(listing.contains("[tracker]\n  pointer_stride = 4\n"));
        assert!(listing.find("[intent]") < listing.find("[tracker]"));
    }
}

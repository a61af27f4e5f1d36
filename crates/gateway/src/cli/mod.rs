pub mod config;
pub mod reply;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rd_domain::config::{Config, PORT_ENV};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RD_CONFIG";

/// ReplyDesk: drafts customer email replies from company knowledge.
#[derive(Debug, Parser)]
#[command(name = "replydesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate a single reply and print it to stdout.
    Reply {
        /// The email body to answer.
        email: String,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `RD_CONFIG` (or `config.toml`
/// by default) and apply the `PORT` override. Returns the parsed
/// [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.toml".into());
    let port = std::env::var(PORT_ENV).ok();
    let config = load_config_from(Path::new(&config_path), port.as_deref())?;
    Ok((config, config_path))
}

/// Parse `path` (all defaults when it does not exist), then apply `port`.
pub fn load_config_from(path: &Path, port: Option<&str>) -> anyhow::Result<Config> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    } else {
        Config::default()
    };
    config.server.apply_port_override(port);
    Ok(config)
}

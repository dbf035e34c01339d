//! CLI definitions for tasklist
//!
//! This module defines the CLI structure using clap's derive macros.

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::Config;

/// Local task list served as HTML
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: ./tasklist.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to listen on (overrides config)
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,
}

impl Cli {
    /// Apply command-line overrides to a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(db_path) = &self.database {
            config.server.db_path = db_path.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["tasklist", "--port", "8081", "-d", "other.db"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.db_path, PathBuf::from("other.db"));
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn absent_flags_leave_config_alone() {
        let cli = Cli::parse_from(["tasklist"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config, Config::default());
    }
}

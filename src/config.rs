//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-server")]
#[command(about = "A state-managed Pomodoro timer served over a local HTTP API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory the settings record is stored in
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Do not ring the terminal bell when an interval completes
    #[arg(short, long)]
    pub silent: bool,

    /// Show the live countdown in the terminal title
    #[arg(long)]
    pub terminal_title: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the settings directory, defaulting to the platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pomodoro-server")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["pomodoro-server"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert!(!config.silent);
        assert!(config.data_dir().ends_with("pomodoro-server"));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "pomodoro-server", "-p", "9000", "--data-dir", "/tmp/pomo", "-s", "-v", "--terminal-title",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/pomo"));
        assert!(config.silent && config.verbose && config.terminal_title);
        assert_eq!(config.log_level(), "debug");
    }
}

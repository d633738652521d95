//! CLI argument definitions for the terminal chat front-end.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Sikkim travel assistant: chat with the multilingual tour guide bot.
#[derive(Parser, Debug)]
#[command(name = "sikkim-chat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Language to start in (english, hindi, nepali, lepcha, bhutia).
    #[arg(short = 'L', long = "language")]
    pub language: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Skip the unsolicited welcome greeting.
    #[arg(long = "no-welcome")]
    pub no_welcome: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SIKKIM_CONFIG env var > ~/.sikkim/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SIKKIM_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Resolve the starting language: --language flag > config file value.
    pub fn resolve_language(&self, config_language: &str) -> String {
        self.language
            .clone()
            .unwrap_or_else(|| config_language.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".sikkim").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".sikkim").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = CliArgs::parse_from(["sikkim-chat"]);
        assert!(args.config.is_none());
        assert!(args.language.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.no_welcome);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::parse_from([
            "sikkim-chat",
            "-c",
            "/tmp/sikkim.toml",
            "-L",
            "hindi",
            "-l",
            "debug",
            "--no-welcome",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/sikkim.toml")));
        assert_eq!(args.language.as_deref(), Some("hindi"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.no_welcome);
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["sikkim-chat", "--config", "custom.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_log_level_override() {
        let args = CliArgs::parse_from(["sikkim-chat", "--log-level", "trace"]);
        assert_eq!(args.resolve_log_level("info"), "trace");
        let args = CliArgs::parse_from(["sikkim-chat"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    #[test]
    fn test_language_override() {
        let args = CliArgs::parse_from(["sikkim-chat", "--language", "nepali"]);
        assert_eq!(args.resolve_language("english"), "nepali");
        let args = CliArgs::parse_from(["sikkim-chat"]);
        assert_eq!(args.resolve_language("english"), "english");
    }
}

use crate::util::logging::LogFormat;
use clap::Parser;
use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub service: ServiceConfig,
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Smoke test for the ML mapping suggestion service", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the mapping service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// JSON file holding a custom source/destination schema request
    #[arg(short, long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Exit with a non-zero status when the run does not pass
    #[arg(long)]
    pub fail_on_error: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        // Seed the builder from Default so a partial file only overrides what it names
        let defaults = AppConfig::default();
        let mut config_builder = Config::builder()
            .set_default("service.base_url", defaults.service.base_url)?
            .set_default("service.timeout_secs", defaults.service.timeout_secs as i64)?;

        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            let default_locations = ["mapping-probe.toml", "config/mapping-probe.toml"];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        // Command line wins over any file
        if let Some(base_url) = &args.base_url {
            config.service.base_url = base_url.clone();
        }
        if let Some(timeout) = args.timeout {
            config.service.timeout_secs = timeout;
        }

        config.service.base_url = config.service.base_url.trim_end_matches('/').to_string();

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

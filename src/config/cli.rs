use std::path::PathBuf;

use clap::{Args, ValueHint, builder::BoolishValueParser};

/// Settings flags shared by every `quill-cli` command. They win over both the
/// config files and the environment.
#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "QUILL_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Override the API base URL, e.g. http://127.0.0.1:8000/api/.
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the page size used to compute total pages.
    #[arg(long = "page-size", value_name = "COUNT", global = true)]
    pub page_size: Option<u64>,

    /// Override the request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS", global = true)]
    pub timeout_seconds: Option<u64>,

    /// Override where the signed-in session is persisted.
    #[arg(
        long = "session-file",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub session_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

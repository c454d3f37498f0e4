use anyhow::{Result, anyhow, bail};

pub const USAGE: &str = "usage: client hostname conn_attempts\n  Example: client localhost 10000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(var: &str, value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Invalid {}: {}. Valid formats are: text, json", var, value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub log_level: String,
    pub log_format: OutputFormat,
    pub report_format: OutputFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: OutputFormat::Text,
            report_format: OutputFormat::Text,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("CLIENT_LOG_LEVEL").unwrap_or_else(default_log_level);
        let log_format = match lookup("CLIENT_LOG_FORMAT") {
            Some(v) => OutputFormat::parse("CLIENT_LOG_FORMAT", &v)?,
            None => OutputFormat::Text,
        };
        let report_format = match lookup("CLIENT_REPORT_FORMAT") {
            Some(v) => OutputFormat::parse("CLIENT_REPORT_FORMAT", &v)?,
            None => OutputFormat::Text,
        };

        let config = ClientConfig {
            log_level,
            log_format,
            report_format,
        };
        config.validate_log_level()?;
        Ok(config)
    }

    /// Get the log level as a tracing::Level
    pub fn get_tracing_level(&self) -> Result<tracing::Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" | "warning" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            _ => Err(anyhow!("Invalid log level: {}. Valid levels are: trace, debug, info, warn, error", self.log_level))
        }
    }

    pub fn validate_log_level(&self) -> Result<()> {
        self.get_tracing_level().map(|_| ())
    }
}

/// Positional arguments: `client <hostname> <attempt-count>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub host: String,
    pub attempts: u64,
}

impl CliArgs {
    /// Parse the arguments following the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let [host, attempts] = args.as_slice() else {
            bail!("{}", USAGE);
        };

        if host.is_empty() {
            bail!("hostname must not be empty\n{}", USAGE);
        }

        let attempts = match attempts.trim().parse::<u64>() {
            Ok(n) if n >= 1 => n,
            _ => bail!("Instead of a correct number of attempts, you gave: {}", attempts),
        };

        Ok(CliArgs {
            host: host.clone(),
            attempts,
        })
    }
}

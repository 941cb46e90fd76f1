//! rexec: send one request through the resilient executor.
//!
//! ```text
//! rexec GET /leads --config client.toml
//! rexec POST https://erp.example.com/api/quotations --data '{"lead_id":3}' --token $TOKEN
//! ```
//!
//! Prints the settled request state as JSON. Exit code is 0 on success, 1 on
//! error and 2 on timeout.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;

use request_executor::config::{load_config, validate_config, ClientConfig, ConfigError};
use request_executor::observability::{logging, metrics};
use request_executor::{RequestExecutor, RequestOptions, RequestStatus};

#[derive(Parser)]
#[command(name = "rexec")]
#[command(about = "Send an HTTP request with timeout, retry and backoff", long_about = None)]
struct Cli {
    /// HTTP method (GET, POST, PUT, DELETE, ...)
    method: String,

    /// Absolute URL, or a path resolved against the configured base URL
    target: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for relative targets
    #[arg(long)]
    base_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Retries after the first attempt
    #[arg(long)]
    max_retries: Option<u32>,

    /// Delay before the first retry in milliseconds
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Bearer token for the Authorization header
    #[arg(long)]
    token: Option<String>,

    /// Extra header, repeatable ("Name: value")
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        let executor = &mut config.executor;
        if let Some(base_url) = &self.base_url {
            executor.base_url = Some(base_url.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            executor.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = self.max_retries {
            executor.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            executor.retry_delay_ms = retry_delay_ms;
        }
        if let Some(token) = &self.token {
            config.auth.bearer_token = Some(token.clone());
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn request_options(&self) -> Result<RequestOptions, Box<dyn std::error::Error>> {
        let method = Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())?;
        let mut options = RequestOptions::new(method);

        for line in &self.headers {
            let (name, value) = parse_header(line)?;
            options = options.header(name, value);
        }

        if let Some(data) = &self.data {
            serde_json::from_str::<serde_json::Value>(data)?;
            if !options.headers.contains_key(CONTENT_TYPE) {
                options = options.json_content();
            }
            options = options.body(data.clone());
        }

        Ok(options)
    }
}

/// Parse a `Name: value` header line.
fn parse_header(line: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| format!("header '{}' must look like 'Name: value'", line))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| format!("invalid header name in '{}': {}", line, e))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|e| format!("invalid header value in '{}': {}", line, e))?;
    Ok((name, value))
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::debug!(
        timeout_ms = config.executor.timeout_ms,
        max_retries = config.executor.max_retries,
        retry_delay_ms = config.executor.retry_delay_ms,
        "Configuration loaded"
    );

    let options = cli.request_options()?;
    let executor = RequestExecutor::from_config(&config)?;

    let _ = executor.execute(&cli.target, options).await;

    let state = executor.state();
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(match state.status {
        RequestStatus::Success => ExitCode::SUCCESS,
        RequestStatus::Timeout => ExitCode::from(2),
        _ => ExitCode::from(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("X-Branch: pune").unwrap();
        assert_eq!(name, "x-branch");
        assert_eq!(value, "pune");

        assert!(parse_header("no-colon").is_err());
        assert!(parse_header("bad name: v").is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "rexec",
            "get",
            "/leads",
            "--base-url",
            "http://erp.local/",
            "--timeout-ms",
            "500",
            "--max-retries",
            "1",
            "--token",
            "abc",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.executor.timeout_ms, 500);
        assert_eq!(config.executor.max_retries, 1);
        assert_eq!(config.executor.base_url.as_deref(), Some("http://erp.local/"));
        assert_eq!(config.auth.bearer_token.as_deref(), Some("abc"));

        let options = cli.request_options().unwrap();
        assert_eq!(options.method, Method::GET);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::parse_from(["rexec", "GET", "/x", "--timeout-ms", "0"]);
        assert!(matches!(cli.resolve_config(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_data_requires_json() {
        let cli = Cli::parse_from(["rexec", "POST", "/x", "--data", "{oops"]);
        assert!(cli.request_options().is_err());

        let cli = Cli::parse_from(["rexec", "POST", "/x", "--data", r#"{"ok":true}"#]);
        let options = cli.request_options().unwrap();
        assert_eq!(options.headers[CONTENT_TYPE], "application/json");
    }
}

//! Process configuration: command-line flags with environment fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use clap::Parser;

use advisorhub_observability::{LogFormat, ObservabilityConfig};

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, Parser)]
#[command(name = "advisorhub-api", about = "Advisor and product REST backend", version)]
pub struct Config {
    /// Address to listen on.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// PostgreSQL connection URL. In-memory stores are used when unset.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// HMAC secret used to sign bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token lifetime: `<n>` seconds or `<n>s`, `<n>m`, `<n>h`, `<n>d`.
    #[arg(long, env = "JWT_EXPIRATION", default_value = "1h", value_parser = parse_expiration)]
    pub jwt_expiration: Duration,

    /// `json` or `pretty`.
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// Also write logs to daily-rolling files in this directory.
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn observability(&self) -> ObservabilityConfig {
        ObservabilityConfig {
            format: self.log_format,
            log_dir: self.log_dir.clone(),
        }
    }

    /// The configured signing secret, or an insecure development default.
    pub fn jwt_secret(&self) -> String {
        match &self.jwt_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        }
    }
}

/// Parse a token lifetime such as `3600`, `90s`, `15m`, `1h` or `7d`.
pub fn parse_expiration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let amount: i64 = digits
        .parse()
        .map_err(|_| format!("invalid expiration `{raw}`: expected a number with an optional s/m/h/d unit"))?;
    if amount == 0 {
        return Err("expiration must be greater than zero".to_string());
    }

    let duration = match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        other => return Err(format!("unknown expiration unit `{other}` (expected s, m, h or d)")),
    };
    duration.ok_or_else(|| format!("expiration `{raw}` is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expiration_units() {
        assert_eq!(parse_expiration("3600").unwrap(), Duration::seconds(3600));
        assert_eq!(parse_expiration("90s").unwrap(), Duration::seconds(90));
        assert_eq!(parse_expiration("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_expiration("1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_expiration("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn rejects_malformed_expirations() {
        for bad in ["", "h", "0", "0h", "1w", "-5m", "1.5h", "1 h"] {
            assert!(parse_expiration(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = Config::try_parse_from([
            "advisorhub-api",
            "--bind",
            "127.0.0.1:9000",
            "--jwt-expiration",
            "30m",
            "--jwt-secret",
            "s3cret",
            "--log-format",
            "pretty",
        ])
        .unwrap();

        assert_eq!(config.bind, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.jwt_expiration, Duration::minutes(30));
        assert_eq!(config.jwt_secret(), "s3cret");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = Config::try_parse_from(["advisorhub-api", "--log-format", "xml"]);
        assert!(result.is_err());
    }
}

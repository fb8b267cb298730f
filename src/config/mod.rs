//! Configuration module for the bookmark backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// A named disclosure group and how many items it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub len: usize,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint returning the JSON array of user records
    pub source_url: String,
    /// User-Agent sent with the collection request
    pub user_agent: String,
    /// Timeout for the collection request
    pub fetch_timeout: Duration,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Fetch the collection once before serving
    pub load_on_start: bool,
    /// Disclosure groups registered at startup
    pub groups: Vec<GroupSpec>,
}

const DEFAULT_SOURCE_URL: &str = "https://api.github.com/users";
const DEFAULT_GROUPS: &str = "faq:6,nav:5,drawer:5";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_url =
            lookup("BOOKMARK_SOURCE_URL").unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

        let user_agent = lookup("BOOKMARK_USER_AGENT")
            .unwrap_or_else(|| concat!("bookmark-backend/", env!("CARGO_PKG_VERSION")).to_string());

        let fetch_timeout = match lookup("BOOKMARK_FETCH_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(invalid("BOOKMARK_FETCH_TIMEOUT_SECS", &raw)),
            },
            None => Duration::from_secs(10),
        };

        let bind_addr = lookup("BOOKMARK_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| invalid("BOOKMARK_BIND_ADDR", &bind_addr))?;

        let log_level = lookup("BOOKMARK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("BOOKMARK_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(invalid("BOOKMARK_LOG_FORMAT", other)),
        };

        let load_on_start = match lookup("BOOKMARK_LOAD_ON_START").as_deref() {
            None | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => return Err(invalid("BOOKMARK_LOAD_ON_START", other)),
        };

        let groups = parse_groups(
            &lookup("BOOKMARK_GROUPS").unwrap_or_else(|| DEFAULT_GROUPS.to_string()),
        )?;

        Ok(Self {
            source_url,
            user_agent,
            fetch_timeout,
            bind_addr,
            log_level,
            log_format,
            load_on_start,
            groups,
        })
    }
}

/// Parse `name:len` pairs separated by commas, e.g. `faq:6,nav:5`.
pub fn parse_groups(raw: &str) -> Result<Vec<GroupSpec>, AppError> {
    let mut groups: Vec<GroupSpec> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, len) = entry
            .split_once(':')
            .ok_or_else(|| invalid("BOOKMARK_GROUPS", entry))?;
        let name = name.trim();
        let len = len
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid("BOOKMARK_GROUPS", entry))?;

        if name.is_empty() || groups.iter().any(|g| g.name == name) {
            return Err(invalid("BOOKMARK_GROUPS", entry));
        }

        groups.push(GroupSpec {
            name: name.to_string(),
            len,
        });
    }

    Ok(groups)
}

fn invalid(key: &str, value: &str) -> AppError {
    AppError::Config(format!("Invalid {} value: {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.source_url, "https://api.github.com/users");
        assert!(config.user_agent.starts_with("bookmark-backend/"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.load_on_start);
        assert_eq!(
            config.groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            vec!["faq", "nav", "drawer"]
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BOOKMARK_SOURCE_URL", "http://localhost:9000/users"),
            ("BOOKMARK_FETCH_TIMEOUT_SECS", "3"),
            ("BOOKMARK_LOG_FORMAT", "json"),
            ("BOOKMARK_LOAD_ON_START", "false"),
            ("BOOKMARK_GROUPS", "faq:2"),
        ])
        .unwrap();

        assert_eq!(config.source_url, "http://localhost:9000/users");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.load_on_start);
        assert_eq!(
            config.groups,
            vec![GroupSpec {
                name: "faq".to_string(),
                len: 2
            }]
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("BOOKMARK_BIND_ADDR", "nowhere")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("BOOKMARK_LOG_FORMAT", "xml")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("BOOKMARK_FETCH_TIMEOUT_SECS", "-1")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_zero_fetch_timeout_is_rejected() {
        assert!(matches!(
            config_from(&[("BOOKMARK_FETCH_TIMEOUT_SECS", "0")]),
            Err(AppError::Config(_))
        ));
        assert_eq!(
            config_from(&[("BOOKMARK_FETCH_TIMEOUT_SECS", "1")])
                .unwrap()
                .fetch_timeout,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_parse_groups() {
        assert_eq!(parse_groups("").unwrap(), Vec::new());
        assert_eq!(parse_groups(" faq : 3 ,").unwrap().len(), 1);
        assert!(parse_groups("faq").is_err());
        assert!(parse_groups("faq:x").is_err());
        assert!(parse_groups("faq:1,faq:2").is_err());
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use petshop_client::{ClientConfig, DEFAULT_BASE_URL};

const DEFAULT_TOKEN_FILE: &str = ".petshop_token";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub token_file: PathBuf,
    pub log_level: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub page_size: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("SHOP_API_URL")
            .map(|url| url.trim().to_string())
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token_file = std::env::var("SHOP_TOKEN_FILE")
            .unwrap_or_else(|_| DEFAULT_TOKEN_FILE.to_string())
            .into();
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let connect_timeout_secs = parse_u64_env("SHOP_CONNECT_TIMEOUT_SECS", 5)?;
        let request_timeout_secs = parse_u64_env("SHOP_REQUEST_TIMEOUT_SECS", 15)?;
        let page_size = parse_u32_env("SHOP_PAGE_SIZE", 10)?;

        Ok(Self {
            api_url,
            token_file,
            log_level,
            connect_timeout_secs,
            request_timeout_secs,
            page_size,
        })
    }

    /// `--server` перекрывает `SHOP_API_URL`.
    pub fn client_config(&self, server: Option<String>) -> Result<ClientConfig> {
        let url = normalize_server(server.unwrap_or_else(|| self.api_url.clone()));
        let config = ClientConfig::new(url)
            .context("некорректный адрес сервера")?
            .with_timeouts(
                Duration::from_secs(self.connect_timeout_secs),
                Duration::from_secs(self.request_timeout_secs),
            )
            .context("некорректные таймауты")?;
        Ok(config)
    }
}

pub fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    parse_positive(key, std::env::var(key).ok(), default)
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32> {
    parse_positive(key, std::env::var(key).ok(), default)
}

fn parse_positive<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialEq + Default + ToString,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = raw
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<T>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            api_url: DEFAULT_BASE_URL.to_string(),
            token_file: DEFAULT_TOKEN_FILE.into(),
            log_level: "info".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
            page_size: 10,
        }
    }

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://shop.example.com".to_string());
        assert_eq!(s, "https://shop.example.com");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:5000".to_string());
        assert_eq!(s, "http://127.0.0.1:5000");
    }

    #[test]
    fn parse_positive_uses_default() {
        assert_eq!(parse_positive::<u64>("X", None, 15).expect("default is valid"), 15);
    }

    #[test]
    fn parse_positive_rejects_zero_and_garbage() {
        assert!(parse_positive::<u32>("X", Some("0".to_string()), 10).is_err());
        assert!(parse_positive::<u32>("X", Some("ten".to_string()), 10).is_err());
        assert_eq!(
            parse_positive::<u32>("X", Some(" 25 ".to_string()), 10).expect("25 is valid"),
            25
        );
    }

    #[test]
    fn server_flag_overrides_env_url() {
        let config = settings()
            .client_config(Some("localhost:9999".to_string()))
            .expect("config must build");
        assert_eq!(config.base_url(), "http://localhost:9999");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }
}

use std::time::Duration;

use crate::error::{ShopClientError, ShopClientResult};

/// Адрес backend по умолчанию.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Параметры HTTP-клиента.
pub struct ClientConfig {
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    /// Проверяет базовый URL: нужен `http://` или `https://` и хост.
    pub fn new(base_url: impl Into<String>) -> ShopClientResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let host = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"))
            .ok_or_else(|| {
                ShopClientError::Config(format!("base url must start with http:// or https://: {base_url}"))
            })?;
        if host.is_empty() {
            return Err(ShopClientError::Config("base url has no host".to_string()));
        }

        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Таймауты подключения и всего запроса. Нулевые значения отвергаются.
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> ShopClientResult<Self> {
        if connect.is_zero() || request.is_zero() {
            return Err(ShopClientError::Config("timeouts must be > 0".to_string()));
        }
        self.connect_timeout = connect;
        self.request_timeout = request;
        Ok(self)
    }

    /// Базовый URL без завершающего `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Таймаут подключения.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Таймаут запроса.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

//! Клиентская библиотека для работы с backend зоомагазина по HTTP.
//!
//! [`ShopClient`] связывает транспорт ([`StorefrontApi`], по умолчанию
//! [`HttpClient`] на `reqwest`) с явным контекстом сессии из `petshop-core`
//! и применяет ответы к состояниям страниц: пагинация доски, детали записи,
//! форма поста, чат-ассистент, личный кабинет.
//!
//! Токен берётся из [`SessionContext`] и передаётся транспорту явно.
//! Первый 401 на запросе с токеном завершает сессию ровно один раз.
#![warn(missing_docs)]

mod account;
mod api;
mod board;
mod cancel;
mod catalog;
mod chat;
mod compose;
mod config;
mod detail;
mod error;
mod http_client;
mod mypage;

#[cfg(test)]
mod fake;

use std::sync::Arc;

use petshop_core::session::SessionContext;
use petshop_core::{ApiError, ApiResult};

pub use api::StorefrontApi;
pub use cancel::until_cancelled;
pub use compose::PrefillOutcome;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ShopClientError, ShopClientResult};
pub use http_client::HttpClient;

/// Клиент магазина поверх выбранного транспорта.
pub struct ShopClient<A = HttpClient> {
    api: Arc<A>,
    session: SessionContext,
}

impl<A> Clone for ShopClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
        }
    }
}

impl ShopClient<HttpClient> {
    /// HTTP-клиент по конфигурации.
    pub fn new(config: &ClientConfig, session: SessionContext) -> ShopClientResult<Self> {
        Ok(Self::with_api(HttpClient::new(config)?, session))
    }
}

impl<A: StorefrontApi> ShopClient<A> {
    /// Клиент поверх произвольного транспорта.
    pub fn with_api(api: A, session: SessionContext) -> Self {
        Self {
            api: Arc::new(api),
            session,
        }
    }

    /// Контекст сессии.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Транспорт.
    pub fn api(&self) -> &A {
        &self.api
    }

    fn require_token(&self) -> ApiResult<String> {
        self.session.require_token()
    }

    /// Завершает сессию, если сервер отверг токен.
    fn observe<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(ApiError::Unauthorized) = &result
            && self.session.expire()
        {
            tracing::info!("session expired by server");
        }
        result
    }
}

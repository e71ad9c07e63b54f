use petshop_core::ApiError;
use petshop_core::session::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `petshop-client`.
pub enum ShopClientError {
    /// Ошибка обращения к backend.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Некорректная конфигурация клиента.
    #[error("invalid client config: {0}")]
    Config(String),

    /// Не удалось прочитать или записать токен.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Ввод не прошёл локальную проверку, запрос не отправлялся.
    #[error("{0}")]
    InvalidInput(String),
}

/// Результат операций `petshop-client`.
pub type ShopClientResult<T> = Result<T, ShopClientError>;

impl ShopClientError {
    /// Ошибка backend, если она есть.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Требуется ли повторный вход.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }
}

/// Переводит ошибку `reqwest` в транспортно-независимую.
pub(crate) fn from_reqwest(err: reqwest::Error) -> ApiError {
    if let Some(status) = err.status() {
        return ApiError::from_status(status.as_u16(), None);
    }
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Ошибки обращения к backend, не зависящие от транспорта.
pub enum ApiError {
    /// Нет токена или backend ответил 401.
    #[error("unauthorized")]
    Unauthorized,

    /// Backend ответил 403.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Ресурс не найден (404).
    #[error("not found")]
    NotFound,

    /// Некорректный ввод (400).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Конфликт данных (409), например занятый логин.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Любой другой неуспешный HTTP-статус.
    #[error("http status {status}: {message}")]
    Server {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение сервера или fallback.
        message: String,
    },

    /// Запрос не дошёл до сервера.
    #[error("network error: {0}")]
    Network(String),

    /// Тело ответа не разобрано.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Результат обращения к backend.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Класс ошибки, определяющий реакцию интерфейса.
pub enum ErrorClass {
    /// 401/403: редирект на логин или блокировка рендера.
    Auth,
    /// 400/409: сообщение у формы + alert, состояние формы сохраняется.
    Validation,
    /// Сеть/сервер: общий alert, коллекции показываются пустыми.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Что показать пользователю после ошибки.
pub enum UserNotice {
    /// Alert и переход на `/login`.
    RedirectToLogin(String),
    /// Сообщение у формы и alert; введённые данные остаются.
    Inline(String),
    /// Общий alert; коллекции показываются пустыми.
    Alert(String),
}

impl UserNotice {
    /// Текст уведомления.
    pub fn message(&self) -> &str {
        match self {
            Self::RedirectToLogin(m) | Self::Inline(m) | Self::Alert(m) => m,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBodyDto {
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Достаёт сообщение из тела ошибки (`msg`, `message` или `error`).
pub fn parse_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBodyDto>(trimmed) {
        Ok(dto) => dto
            .msg
            .or(dto.message)
            .or(dto.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        Err(_) => None,
    }
}

fn fallback_message(status: u16) -> String {
    match status {
        400 => "Некорректный запрос".to_string(),
        401 => "Требуется авторизация".to_string(),
        403 => "Недостаточно прав для этой операции".to_string(),
        404 => "Ресурс не найден".to_string(),
        409 => "Конфликт данных (например, логин уже занят)".to_string(),
        500..=599 => "Ошибка сервера".to_string(),
        _ => format!("HTTP ошибка {status}"),
    }
}

impl ApiError {
    /// Строит ошибку по HTTP-статусу и (опционально) телу ответа.
    pub fn from_status(status: u16, body: Option<&str>) -> Self {
        let message = body
            .and_then(parse_error_message)
            .unwrap_or_else(|| fallback_message(status));
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden(message),
            404 => Self::NotFound,
            400 => Self::InvalidRequest(message),
            409 => Self::Conflict(message),
            _ => Self::Server { status, message },
        }
    }

    /// HTTP-статус, если ошибка пришла от сервера.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound => Some(404),
            Self::InvalidRequest(_) => Some(400),
            Self::Conflict(_) => Some(409),
            Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Классификация для выбора реакции UI.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized | Self::Forbidden(_) => ErrorClass::Auth,
            Self::InvalidRequest(_) | Self::Conflict(_) => ErrorClass::Validation,
            _ => ErrorClass::Other,
        }
    }

    /// Реакция интерфейса по классу ошибки.
    pub fn notice(&self) -> UserNotice {
        let message = self.user_message();
        match self.class() {
            ErrorClass::Auth => UserNotice::RedirectToLogin(message),
            ErrorClass::Validation => UserNotice::Inline(message),
            ErrorClass::Other => UserNotice::Alert(message),
        }
    }

    /// Сообщение сервера, если оно было в теле ответа.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Forbidden(m) | Self::InvalidRequest(m) | Self::Conflict(m) => Some(m),
            Self::Server { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Текст для пользователя.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Сессия истекла, войдите снова".to_string(),
            Self::NotFound => "Ресурс не найден".to_string(),
            Self::Network(_) => "Ошибка сети. Проверьте подключение к интернету".to_string(),
            Self::Decode(_) => "Не удалось разобрать ответ сервера".to_string(),
            other => other
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_auth_codes() {
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert!(matches!(
            ApiError::from_status(403, None),
            ApiError::Forbidden(_)
        ));
        assert_eq!(ApiError::from_status(401, None).class(), ErrorClass::Auth);
        assert_eq!(ApiError::from_status(403, None).class(), ErrorClass::Auth);
    }

    #[test]
    fn from_status_maps_validation_codes() {
        let conflict = ApiError::from_status(409, Some(r#"{"msg":"id taken"}"#));
        assert_eq!(conflict, ApiError::Conflict("id taken".to_string()));
        assert_eq!(conflict.class(), ErrorClass::Validation);

        let bad = ApiError::from_status(400, Some(r#"{"message":"title/content"}"#));
        assert_eq!(bad.class(), ErrorClass::Validation);
        assert_eq!(bad.server_message(), Some("title/content"));
    }

    #[test]
    fn from_status_uses_fallback_for_unparsable_body() {
        let err = ApiError::from_status(500, Some("<html>oops</html>"));
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: "Ошибка сервера".to_string()
            }
        );
        assert_eq!(err.class(), ErrorClass::Other);
    }

    #[test]
    fn notice_follows_error_class() {
        assert!(matches!(ApiError::Unauthorized.notice(), UserNotice::RedirectToLogin(_)));
        assert_eq!(
            ApiError::from_status(409, Some(r#"{"msg":"taken"}"#)).notice(),
            UserNotice::Inline("taken".to_string())
        );
        assert_eq!(
            ApiError::Network("reset".to_string()).notice().message(),
            "Ошибка сети. Проверьте подключение к интернету"
        );
    }

    #[test]
    fn network_errors_have_no_status() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.class(), ErrorClass::Other);
    }

    #[test]
    fn parse_error_message_prefers_msg_then_message_then_error() {
        assert_eq!(
            parse_error_message(r#"{"error":"c","message":"b","msg":"a"}"#).as_deref(),
            Some("a")
        );
        assert_eq!(
            parse_error_message(r#"{"error":"c"}"#).as_deref(),
            Some("c")
        );
        assert!(parse_error_message(r#"{"msg":"   "}"#).is_none());
        assert!(parse_error_message("").is_none());
    }
}

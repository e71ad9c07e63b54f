//! Общая логика фронтенда зоомагазина без ввода-вывода.
//!
//! Здесь живут модели backend, классификация ошибок, контекст сессии,
//! отмена запросов и состояния страниц (пагинация, детали записи, формы,
//! чат-виджет). Транспорт подключают `petshop-client` (reqwest) и
//! `petshop-wasm` (gloo-net); оба применяют ответы через эти состояния.
#![warn(missing_docs)]

pub mod access;
pub mod cancel;
pub mod catalog;
pub mod chat;
pub mod detail;
mod error;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod post_form;
pub mod record;
pub mod router;
pub mod session;
pub mod signup;

pub use error::{ApiError, ApiResult, ErrorClass, UserNotice, parse_error_message};

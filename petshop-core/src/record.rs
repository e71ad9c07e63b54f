//! Адресация записей, с которыми работают страницы деталей и редактирования.
//!
//! Подтип записи (пост доски или событие) задаётся явным сегментом маршрута,
//! а не угадывается по подстроке URL.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Подтип записи.
pub enum RecordKind {
    /// Пост доски объявлений / обращение.
    Board,
    /// Событие (акция магазина).
    Event,
}

impl RecordKind {
    /// Сегмент маршрута фронтенда.
    pub fn route_segment(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Event => "events",
        }
    }

    fn api_segment(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Event => "event",
        }
    }

    /// Список, куда возвращаемся после удаления.
    pub fn list_route(self) -> &'static str {
        match self {
            Self::Board => "/noticeboard",
            Self::Event => "/events",
        }
    }

    /// Заголовок страницы редактирования.
    pub fn edit_title(self) -> &'static str {
        match self {
            Self::Board => "Редактирование поста",
            Self::Event => "Редактирование события",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Неизвестный сегмент маршрута.
pub struct UnknownRecordKind(pub String);

impl fmt::Display for UnknownRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record kind: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordKind {}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "board" => Ok(Self::Board),
            "events" | "event" => Ok(Self::Event),
            other => Err(UnknownRecordKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Ссылка на конкретную запись.
pub struct RecordRef {
    /// Подтип.
    pub kind: RecordKind,
    /// Идентификатор.
    pub id: i64,
}

impl RecordRef {
    /// Пост доски.
    pub fn board(id: i64) -> Self {
        Self {
            kind: RecordKind::Board,
            id,
        }
    }

    /// Событие.
    pub fn event(id: i64) -> Self {
        Self {
            kind: RecordKind::Event,
            id,
        }
    }

    /// REST-путь записи (GET/PUT/DELETE).
    pub fn api_path(&self) -> String {
        format!("/api/{}/{}", self.kind.api_segment(), self.id)
    }

    /// REST-путь ответа администратора. У событий ответов нет.
    pub fn answer_api_path(&self) -> Option<String> {
        match self.kind {
            RecordKind::Board => Some(format!("/api/board/{}/answer", self.id)),
            RecordKind::Event => None,
        }
    }

    /// Маршрут страницы деталей.
    pub fn detail_route(&self) -> String {
        format!("/{}/{}", self.kind.route_segment(), self.id)
    }

    /// Маршрут страницы редактирования.
    pub fn edit_route(&self) -> String {
        format!("/{}/edit/{}", self.kind.route_segment(), self.id)
    }
}

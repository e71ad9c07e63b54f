//! Форма создания поста: предзаполнение из профиля, сборка multipart-отправки.
//!
//! Валидация только на наличие значений; формат и права проверяет сервер.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::detail::{ActionOutcome, action_failure};
use crate::error::ApiResult;
use crate::models::{CreatedPost, Profile};
use crate::record::RecordKind;

/// Домены, которые форма предлагает выбрать из списка.
pub const KNOWN_EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "naver.com", "daum.net", "hanmail.net"];

/// Имя multipart-поля с файлом.
pub const ATTACHMENT_FIELD: &str = "attachment";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Раздел доски, куда сохраняется пост.
pub enum BoardType {
    /// Объявление.
    #[default]
    Notice,
    /// Вопрос-ответ.
    Qna,
    /// Свободная тема.
    Free,
}

impl BoardType {
    /// Все разделы в порядке выпадающего списка.
    pub const ALL: [BoardType; 3] = [BoardType::Notice, BoardType::Qna, BoardType::Free];

    /// Значение поля `boardType`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "NOTICE",
            Self::Qna => "QNA",
            Self::Free => "FREE",
        }
    }

    /// Подпись в интерфейсе.
    pub fn label(self) -> &'static str {
        match self {
            Self::Notice => "Объявление",
            Self::Qna => "Q&A",
            Self::Free => "Свободная тема",
        }
    }
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOTICE" => Ok(Self::Notice),
            "QNA" => Ok(Self::Qna),
            "FREE" => Ok(Self::Free),
            _ => Err(FormError::UnknownBoardType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Выбор домена почты.
pub enum DomainChoice {
    /// Ничего не выбрано.
    #[default]
    Unselected,
    /// Домен из [`KNOWN_EMAIL_DOMAINS`].
    Known(String),
    /// Домен, введённый вручную.
    Custom(String),
}

impl DomainChoice {
    /// Раскладывает домен: известный попадает в список, остальное в ручной ввод.
    pub fn for_domain(domain: &str) -> Self {
        let domain = domain.trim();
        if domain.is_empty() {
            return Self::Unselected;
        }
        if KNOWN_EMAIL_DOMAINS.contains(&domain) {
            Self::Known(domain.to_string())
        } else {
            Self::Custom(domain.to_string())
        }
    }

    /// Фактический домен; пустая строка, если не выбран.
    pub fn domain(&self) -> &str {
        match self {
            Self::Unselected => "",
            Self::Known(d) | Self::Custom(d) => d,
        }
    }

    /// Нужно ли показывать поле ручного ввода.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Почта, разбитая на логин и домен.
pub struct EmailParts {
    /// Часть до `@`.
    pub id: String,
    /// Домен.
    pub domain: DomainChoice,
}

impl EmailParts {
    /// Делит адрес по первому `@`. Без `@` возвращает `None`.
    pub fn split(email: &str) -> Option<Self> {
        let (id, domain) = email.trim().split_once('@')?;
        Some(Self {
            id: id.to_string(),
            domain: DomainChoice::for_domain(domain),
        })
    }

    /// Полный адрес, только если заданы обе части.
    pub fn resolve(&self) -> Option<String> {
        let id = self.id.trim();
        let domain = self.domain.domain().trim();
        if id.is_empty() || domain.is_empty() {
            return None;
        }
        Some(format!("{id}@{domain}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Прикреплённый файл.
pub struct Attachment {
    /// Имя файла.
    pub file_name: String,
    /// MIME-тип.
    pub mime_type: String,
    /// Содержимое.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Причины, по которым форма не отправляется.
pub enum FormError {
    /// Почта не собирается из частей.
    #[error("Введите email.")]
    MissingEmail,
    /// Пустое обязательное поле.
    #[error("Заполните поле «{0}».")]
    MissingField(&'static str),
    /// Неизвестный раздел доски.
    #[error("unknown board type: {0}")]
    UnknownBoardType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Готовая к отправке форма: текстовые поля в фиксированном порядке и файл.
pub struct PostSubmission {
    fields: Vec<(&'static str, String)>,
    attachment: Option<Attachment>,
}

impl PostSubmission {
    /// Текстовые поля.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Значение поля по имени.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Файл, если приложен.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Разбирает отправку на части.
    pub fn into_parts(self) -> (Vec<(&'static str, String)>, Option<Attachment>) {
        (self.fields, self.attachment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Черновик поста.
pub struct PostDraft {
    /// Раздел.
    pub board_type: BoardType,
    /// Заголовок.
    pub title: String,
    /// Автор.
    pub writer: String,
    /// Поле автора заблокировано.
    pub writer_locked: bool,
    /// Почта.
    pub email: EmailParts,
    /// Поля почты заблокированы.
    pub email_locked: bool,
    /// Текст.
    pub content: String,
    /// Файл.
    pub attachment: Option<Attachment>,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self {
            board_type: BoardType::default(),
            title: String::new(),
            writer: String::new(),
            writer_locked: true,
            email: EmailParts::default(),
            email_locked: true,
            content: String::new(),
            attachment: None,
        }
    }
}

impl PostDraft {
    /// Заполняет автора и почту из профиля.
    pub fn apply_profile(&mut self, profile: &Profile) {
        if let Some(nickname) = profile.nickname.as_deref().filter(|n| !n.is_empty()) {
            self.writer = nickname.to_string();
        }
        if let Some(parts) = profile.email.as_deref().and_then(EmailParts::split) {
            self.email = parts;
        }
    }

    /// Переключает блокировку автора.
    pub fn toggle_writer_lock(&mut self) {
        self.writer_locked = !self.writer_locked;
    }

    /// Переключает блокировку почты.
    pub fn toggle_email_lock(&mut self) {
        self.email_locked = !self.email_locked;
    }

    /// Собирает отправку. Без собранной почты отправка невозможна.
    pub fn build_submission(&self) -> Result<PostSubmission, FormError> {
        let email = self.email.resolve().ok_or(FormError::MissingEmail)?;

        for (value, name) in [
            (&self.title, "Заголовок"),
            (&self.writer, "Автор"),
            (&self.content, "Текст"),
        ] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(name));
            }
        }

        Ok(PostSubmission {
            fields: vec![
                ("boardType", self.board_type.as_str().to_string()),
                ("title", self.title.clone()),
                ("content", self.content.clone()),
                ("writer", self.writer.clone()),
                ("email", email),
            ],
            attachment: self.attachment.clone(),
        })
    }
}

/// Итог публикации: при успехе alert и переход к списку доски.
pub fn submission_outcome(result: ApiResult<CreatedPost>) -> ActionOutcome {
    match result {
        Ok(created) => ActionOutcome::Succeeded {
            message: created
                .message
                .unwrap_or_else(|| "Пост опубликован.".to_string()),
            navigate_to: Some(RecordKind::Board.list_route().to_string()),
            refetch: false,
        },
        Err(err) => action_failure("Не удалось опубликовать пост", err),
    }
}

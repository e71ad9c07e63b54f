use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Строка списка на доске объявлений.
pub struct BoardSummary {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    #[serde(default)]
    pub title: String,
    /// Ник автора.
    #[serde(default)]
    pub writer: String,
    /// Дата публикации в формате сервера (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
    /// Количество просмотров.
    #[serde(default, alias = "view")]
    pub view_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Ответ администратора на пост.
pub struct Answer {
    /// Идентификатор ответа.
    pub id: i64,
    /// Автор ответа.
    #[serde(default)]
    pub writer: String,
    /// Дата ответа.
    #[serde(default)]
    pub date: String,
    /// Текст ответа.
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Пост доски или событие вместе с флагами доступа текущего пользователя.
pub struct Post {
    /// Идентификатор.
    pub id: i64,
    /// Заголовок.
    #[serde(default)]
    pub title: String,
    /// Текст.
    #[serde(default)]
    pub content: String,
    /// Автор.
    #[serde(default)]
    pub writer: String,
    /// Дата публикации.
    #[serde(default)]
    pub date: String,
    /// Категория (раздел доски).
    #[serde(default)]
    pub category: String,
    /// Количество просмотров.
    #[serde(default, alias = "view")]
    pub view_count: i64,
    /// Ссылка на вложенное изображение.
    #[serde(default)]
    pub img_url: Option<String>,
    /// Текущий пользователь является автором.
    #[serde(default)]
    pub is_owner: bool,
    /// Текущий пользователь является администратором.
    #[serde(default)]
    pub is_admin: bool,
    /// Ответы администратора.
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
/// Детальный ответ: сервер отдаёт либо `{"item": {...}}`, либо пост целиком.
pub enum PostEnvelope {
    /// Обёрнутый вариант.
    Wrapped {
        /// Пост.
        item: Post,
    },
    /// Голый пост.
    Bare(Post),
}

impl PostEnvelope {
    /// Разворачивает конверт.
    pub fn into_post(self) -> Post {
        match self {
            Self::Wrapped { item } => item,
            Self::Bare(post) => post,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
/// Список, который сервер отдаёт как `{"items": [...]}` или голым массивом.
pub enum ListEnvelope<T> {
    /// Обёрнутый вариант.
    Wrapped {
        /// Элементы.
        items: Vec<T>,
    },
    /// Голый массив.
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    /// Элементы списка.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { items } | Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Страница коллекции в том виде, в каком её считает сервер.
pub struct BoardPage<T> {
    /// Элементы страницы.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Страница, которую сервер фактически вернул.
    #[serde(default)]
    pub page: Option<u32>,
    /// Всего страниц.
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Первая кнопка окна пагинации.
    #[serde(default)]
    pub start_page: Option<u32>,
    /// Последняя кнопка окна пагинации.
    #[serde(default)]
    pub end_page: Option<u32>,
    /// Всего элементов.
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> BoardPage<T> {
    /// Страница с явно заданным окном; удобно в тестах и фейках.
    pub fn new(items: Vec<T>, total_pages: u32, start_page: u32, end_page: u32) -> Self {
        Self {
            items,
            page: None,
            total_pages: Some(total_pages),
            start_page: Some(start_page),
            end_page: Some(end_page),
            total: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Профиль текущего пользователя (`/api/auth/me`).
pub struct Profile {
    /// Логин.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Ник.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Ответ на успешный вход.
pub struct AuthResponse {
    /// Access token.
    pub access_token: String,
    /// Данные пользователя, если сервер их вернул.
    #[serde(default)]
    pub user: Option<Profile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
/// Короткий ответ сервера вида `{"msg": "..."}`.
pub struct ServerMessage {
    /// Сообщение.
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Результат проверки логина на занятость.
pub struct IdCheck {
    /// Логин свободен.
    pub ok: bool,
    /// Пояснение сервера.
    #[serde(default)]
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Ответ на создание поста.
pub struct CreatedPost {
    /// Идентификатор нового поста.
    pub id: i64,
    /// Сообщение сервера.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Список событий.
pub struct EventList {
    /// События.
    #[serde(default)]
    pub items: Vec<Post>,
    /// Текущий пользователь может управлять событиями.
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Карточка товара в каталоге.
pub struct ProductSummary {
    /// Идентификатор товара.
    pub id: i64,
    /// Название.
    #[serde(default)]
    pub name: String,
    /// Цена в вонах.
    #[serde(default)]
    pub price: i64,
    /// Картинка.
    #[serde(default)]
    pub img_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Детальная карточка товара.
pub struct Product {
    /// Идентификатор товара.
    pub id: i64,
    /// Название.
    #[serde(default)]
    pub name: String,
    /// Цена в вонах.
    #[serde(default)]
    pub price: i64,
    /// Описание.
    #[serde(default)]
    pub description: String,
    /// Картинка.
    #[serde(default)]
    pub img_url: Option<String>,
    /// Тип питомца (`dog`/`cat`).
    #[serde(default)]
    pub pet: Option<String>,
    /// Подкатегория.
    #[serde(default)]
    pub sub_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Обращение пользователя по товару.
pub struct QnaEntry {
    /// Идентификатор.
    pub id: i64,
    /// Товар.
    #[serde(default)]
    pub product_name: String,
    /// Заголовок.
    #[serde(default)]
    pub title: String,
    /// Текст обращения.
    #[serde(default)]
    pub content: String,
    /// Статус как его отдаёт сервер.
    #[serde(default)]
    pub status: String,
    /// Тип обращения.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Дата создания.
    #[serde(default)]
    pub created_at: String,
    /// Ответ, если есть.
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Отзыв пользователя о товаре.
pub struct ReviewEntry {
    /// Идентификатор.
    pub id: i64,
    /// Товар.
    #[serde(default)]
    pub product_name: String,
    /// Оценка 1..=5.
    #[serde(default)]
    pub rating: u8,
    /// Заголовок.
    #[serde(default)]
    pub title: String,
    /// Текст отзыва.
    #[serde(default)]
    pub content: String,
    /// Дата создания.
    #[serde(default)]
    pub created_at: String,
    /// Ссылки на картинки.
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Быстрый ответ чат-виджета.
pub struct QuickReply {
    /// Текст кнопки (он же вопрос пользователя).
    pub label: String,
    /// Заготовленный ответ бота.
    pub answer: String,
    /// Куда перейти после ответа.
    #[serde(default)]
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_envelope_accepts_wrapped_and_bare() {
        let wrapped = r#"{"item":{"id":3,"title":"t","is_owner":true}}"#;
        let bare = r#"{"id":4,"title":"b","is_admin":true,"answers":[{"id":1,"content":"ok"}]}"#;

        let post = serde_json::from_str::<PostEnvelope>(wrapped)
            .expect("wrapped must parse")
            .into_post();
        assert_eq!(post.id, 3);
        assert!(post.is_owner);
        assert!(!post.is_admin);

        let post = serde_json::from_str::<PostEnvelope>(bare)
            .expect("bare must parse")
            .into_post();
        assert_eq!(post.id, 4);
        assert!(post.is_admin);
        assert_eq!(post.answers.len(), 1);
    }

    #[test]
    fn board_summary_reads_view_field() {
        let raw = r#"{"id":1,"title":"A","writer":"cat","date":"2026-01-04","view":12}"#;
        let row: BoardSummary = serde_json::from_str(raw).expect("row must parse");
        assert_eq!(row.view_count, 12);

        let raw = r#"{"id":2,"title":"B","view_count":5}"#;
        let row: BoardSummary = serde_json::from_str(raw).expect("row must parse");
        assert_eq!(row.view_count, 5);
    }

    #[test]
    fn board_page_tolerates_missing_window() {
        let raw = r#"{"items":[{"id":1,"title":"A"}]}"#;
        let page: BoardPage<BoardSummary> = serde_json::from_str(raw).expect("page must parse");
        assert_eq!(page.items.len(), 1);
        assert!(page.total_pages.is_none());
    }

    #[test]
    fn qna_entry_uses_camel_case_and_type_field() {
        let raw = r#"{"id":7,"productName":"패딩","title":"size?","status":"답변대기","type":"상품","createdAt":"2026-01-02"}"#;
        let entry: QnaEntry = serde_json::from_str(raw).expect("entry must parse");
        assert_eq!(entry.product_name, "패딩");
        assert_eq!(entry.kind, "상품");
        assert!(entry.answer.is_none());
    }
}

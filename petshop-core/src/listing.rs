//! Списки личного кабинета: мои вопросы и мои отзывы.

use crate::error::ApiResult;
use crate::models::{QnaEntry, ReviewEntry};

/// Статус вопроса без ответа, как его присылает сервер.
pub const QNA_WAITING: &str = "답변대기";
/// Статус вопроса с ответом.
pub const QNA_ANSWERED: &str = "답변완료";

/// Текст вместо отсутствующего ответа.
pub const NO_ANSWER_PLACEHOLDER: &str = "Ответ пока не опубликован.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Фильтр вопросов.
pub enum QnaFilter {
    /// Все.
    #[default]
    All,
    /// Ждут ответа.
    Waiting,
    /// С ответом.
    Answered,
}

impl QnaFilter {
    /// Кнопки фильтра по порядку.
    pub const ALL: [QnaFilter; 3] = [QnaFilter::All, QnaFilter::Waiting, QnaFilter::Answered];

    /// Подпись кнопки.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Все",
            Self::Waiting => "Ждут ответа",
            Self::Answered => "Есть ответ",
        }
    }

    /// Подходит ли вопрос под фильтр.
    pub fn matches(self, entry: &QnaEntry) -> bool {
        match self {
            Self::All => true,
            Self::Waiting => entry.status == QNA_WAITING,
            Self::Answered => entry.status == QNA_ANSWERED,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Фильтр отзывов.
pub enum ReviewFilter {
    /// Все.
    #[default]
    All,
    /// Только с этой оценкой.
    Rating(u8),
}

impl ReviewFilter {
    /// Кнопки фильтра по порядку.
    pub const ALL: [ReviewFilter; 6] = [
        ReviewFilter::All,
        ReviewFilter::Rating(5),
        ReviewFilter::Rating(4),
        ReviewFilter::Rating(3),
        ReviewFilter::Rating(2),
        ReviewFilter::Rating(1),
    ];

    /// Подпись кнопки.
    pub fn label(self) -> String {
        match self {
            Self::All => "Все".to_string(),
            Self::Rating(n) => n.to_string(),
        }
    }

    /// Подходит ли отзыв под фильтр.
    pub fn matches(self, entry: &ReviewEntry) -> bool {
        match self {
            Self::All => true,
            Self::Rating(n) => entry.rating == n,
        }
    }
}

/// Звёзды для оценки: `★` × rating и `☆` до пяти. Оценка ограничена 0..=5.
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Демо-отзывы, которые показываются, если сервер не ответил.
pub fn fallback_reviews() -> Vec<ReviewEntry> {
    vec![
        ReviewEntry {
            id: 1,
            product_name: "강아지 겨울 패딩".to_string(),
            rating: 5,
            title: "따뜻하고 예뻐요".to_string(),
            content: "사이즈도 딱 맞고 보온이 좋아요!".to_string(),
            created_at: "2026-01-02".to_string(),
            images: Vec::new(),
        },
        ReviewEntry {
            id: 2,
            product_name: "강아지 배변패드".to_string(),
            rating: 4,
            title: "흡수력 괜찮아요".to_string(),
            content: "조금 얇긴 한데 가격 생각하면 만족합니다.".to_string(),
            created_at: "2025-12-20".to_string(),
            images: Vec::new(),
        },
    ]
}

/// Запись списка с идентификатором.
pub trait Identified {
    /// Идентификатор для выбора.
    fn id(&self) -> i64;
}

impl Identified for QnaEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for ReviewEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
/// Загруженный список с выбранной записью.
pub struct Listing<T> {
    entries: Vec<T>,
    loading: bool,
    selected: Option<i64>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            loading: true,
            selected: None,
        }
    }
}

impl<T: Identified> Listing<T> {
    /// Все записи.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Идёт ли загрузка.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Применяет ответ. Ошибка логируется, список пуст.
    pub fn apply(&mut self, result: ApiResult<Vec<T>>) {
        self.apply_or(result, Vec::new);
    }

    /// Применяет ответ, при ошибке подставляя `fallback`.
    pub fn apply_or(&mut self, result: ApiResult<Vec<T>>, fallback: impl FnOnce() -> Vec<T>) {
        self.loading = false;
        self.entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load my-page listing");
                fallback()
            }
        };
    }

    /// Записи, прошедшие фильтр.
    pub fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<&T> {
        self.entries.iter().filter(|e| keep(e)).collect()
    }

    /// Открывает панель записи.
    pub fn select(&mut self, id: i64) {
        self.selected = Some(id);
    }

    /// Закрывает панель.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Выбранная запись.
    pub fn selected(&self) -> Option<&T> {
        let id = self.selected?;
        self.entries.iter().find(|e| e.id() == id)
    }
}

/// Ответ на вопрос или заглушка.
pub fn answer_text(entry: &QnaEntry) -> &str {
    entry
        .answer
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(NO_ANSWER_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn qna(id: i64, status: &str, answer: Option<&str>) -> QnaEntry {
        QnaEntry {
            id,
            product_name: "패딩".to_string(),
            title: format!("question {id}"),
            content: "size?".to_string(),
            status: status.to_string(),
            kind: "상품".to_string(),
            created_at: "2026-01-01".to_string(),
            answer: answer.map(str::to_string),
        }
    }

    #[test]
    fn stars_are_clamped() {
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(5), "★★★★★");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn qna_filter_by_status() {
        let mut listing = Listing::default();
        listing.apply(Ok(vec![
            qna(1, QNA_WAITING, None),
            qna(2, QNA_ANSWERED, Some("L")),
            qna(3, QNA_WAITING, None),
        ]));

        let waiting = listing.filtered(|e| QnaFilter::Waiting.matches(e));
        assert_eq!(waiting.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(listing.filtered(|e| QnaFilter::All.matches(e)).len(), 3);
        assert_eq!(listing.filtered(|e| QnaFilter::Answered.matches(e)).len(), 1);
    }

    #[test]
    fn selection_and_placeholder() {
        let mut listing = Listing::default();
        listing.apply(Ok(vec![qna(1, QNA_WAITING, None), qna(2, QNA_ANSWERED, Some("L"))]));

        listing.select(1);
        let selected = listing.selected().expect("selected");
        assert_eq!(answer_text(selected), NO_ANSWER_PLACEHOLDER);

        listing.select(2);
        assert_eq!(listing.selected().map(answer_text), Some("L"));

        listing.clear_selection();
        assert!(listing.selected().is_none());
    }

    #[test]
    fn qna_failure_leaves_empty_list() {
        let mut listing: Listing<QnaEntry> = Listing::default();
        listing.apply(Err(ApiError::Network("down".to_string())));
        assert!(listing.entries().is_empty());
        assert!(!listing.is_loading());
    }

    #[test]
    fn review_failure_uses_demo_data() {
        let mut listing: Listing<ReviewEntry> = Listing::default();
        listing.apply_or(Err(ApiError::NotFound), fallback_reviews);
        assert_eq!(listing.entries().len(), 2);

        let five = listing.filtered(|e| ReviewFilter::Rating(5).matches(e));
        assert_eq!(five.len(), 1);
        assert_eq!(five[0].id, 1);
    }
}

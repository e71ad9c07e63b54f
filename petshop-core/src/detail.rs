//! Состояние страниц деталей и редактирования записи.

use serde::Serialize;

use crate::access::RecordAccess;
use crate::cancel::CancelToken;
use crate::error::{ApiError, ApiResult};
use crate::models::Post;
use crate::record::RecordRef;
use crate::signup::LOGIN_ROUTE;

/// Куда уходим, если запись не открылась.
pub const SUPPORT_ROUTE: &str = "/support";

/// Текст подтверждения удаления.
pub const DELETE_CONFIRM: &str = "Удалить запись без возможности восстановления?";

/// Сообщение для неудачной загрузки записи.
pub fn load_failure_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Forbidden(_) => "Это закрытый пост. Его может открыть только автор.",
        ApiError::Unauthorized => "Требуется вход в аккаунт.",
        _ => "Не удалось загрузить пост.",
    }
}

/// Куда уйти после неудачной загрузки: 401 ведёт на вход, остальное на `fallback`.
fn failure_route(err: &ApiError, fallback: String) -> String {
    match err {
        ApiError::Unauthorized => LOGIN_ROUTE.to_string(),
        _ => fallback,
    }
}

/// Ошибка действия. Отвергнутый токен уводит на вход, остальное остаётся alert.
pub(crate) fn action_failure(prefix: &str, err: ApiError) -> ActionOutcome {
    match err {
        ApiError::Unauthorized => ActionOutcome::RedirectToLogin(err.user_message()),
        err => ActionOutcome::Failed(format!("{prefix}: {}", err.user_message())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Итог загрузки записи.
pub enum LoadOutcome {
    /// Запись показана.
    Loaded,
    /// Alert с сообщением и переход на `navigate_to`.
    Failed {
        /// Текст alert.
        message: String,
        /// Маршрут, куда уйти.
        navigate_to: String,
    },
    /// Запрос отменён.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Итог мутирующего действия.
pub enum ActionOutcome {
    /// Успех: alert, затем переход или перезагрузка на месте.
    Succeeded {
        /// Текст alert.
        message: String,
        /// Куда перейти; `None`: остаться.
        navigate_to: Option<String>,
        /// Нужно перечитать запись.
        refetch: bool,
    },
    /// Ошибка: alert, прежнее состояние сохранено.
    Failed(String),
    /// Сервер отверг токен: alert и переход на `/login`.
    RedirectToLogin(String),
}

#[derive(Debug, Clone)]
/// Состояние страницы деталей.
pub struct DetailState {
    record: RecordRef,
    post: Option<Post>,
    loading: bool,
    answer_draft: String,
    submitting: bool,
}

impl DetailState {
    /// Страница ещё ничего не загрузила.
    pub fn new(record: RecordRef) -> Self {
        Self {
            record,
            post: None,
            loading: true,
            answer_draft: String::new(),
            submitting: false,
        }
    }

    /// Ссылка на запись.
    pub fn record(&self) -> RecordRef {
        self.record
    }

    /// Загруженная запись.
    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// Идёт ли загрузка.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Флаги доступа; без записи ничего не разрешено.
    pub fn access(&self) -> RecordAccess {
        self.post.as_ref().map(RecordAccess::for_post).unwrap_or_default()
    }

    /// Черновик ответа администратора.
    pub fn answer_draft(&self) -> &str {
        &self.answer_draft
    }

    /// Отправляется ли ответ.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Обновляет черновик ответа.
    pub fn set_answer_draft(&mut self, draft: impl Into<String>) {
        self.answer_draft = draft.into();
    }

    /// Применяет результат загрузки.
    pub fn apply_load(&mut self, token: &CancelToken, result: ApiResult<Post>) -> LoadOutcome {
        if token.is_cancelled() {
            return LoadOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(post) => {
                self.post = Some(post);
                LoadOutcome::Loaded
            }
            Err(err) => LoadOutcome::Failed {
                message: load_failure_message(&err).to_string(),
                navigate_to: failure_route(&err, SUPPORT_ROUTE.to_string()),
            },
        }
    }

    /// Проверяет черновик и помечает ответ как отправляемый.
    ///
    /// Возвращает текст ответа или сообщение для alert.
    pub fn begin_answer(&mut self) -> Result<String, &'static str> {
        if !self.access().can_answer {
            return Err("Отвечать может только администратор.");
        }
        let content = self.answer_draft.trim();
        if content.is_empty() {
            return Err("Введите текст ответа.");
        }
        if self.submitting {
            return Err("Ответ уже отправляется.");
        }
        self.submitting = true;
        Ok(content.to_string())
    }

    /// Завершает отправку ответа. При успехе черновик очищается и запись
    /// перечитывается, при ошибке черновик остаётся.
    pub fn finish_answer(&mut self, result: ApiResult<()>) -> ActionOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.answer_draft.clear();
                ActionOutcome::Succeeded {
                    message: "Ответ опубликован.".to_string(),
                    navigate_to: None,
                    refetch: true,
                }
            }
            Err(err) => action_failure("Не удалось отправить ответ", err),
        }
    }

    /// Итог удаления.
    pub fn delete_outcome(&self, result: ApiResult<()>) -> ActionOutcome {
        match result {
            Ok(()) => ActionOutcome::Succeeded {
                message: "Запись удалена.".to_string(),
                navigate_to: Some(self.record.kind.list_route().to_string()),
                refetch: false,
            },
            Err(err) => action_failure("Не удалось удалить", err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Тело PUT-запроса редактирования.
pub struct PostEdit {
    /// Новый заголовок.
    pub title: String,
    /// Новый текст.
    pub content: String,
}

#[derive(Debug, Clone)]
/// Состояние страницы редактирования.
pub struct EditState {
    record: RecordRef,
    title: String,
    content: String,
    loading: bool,
}

impl EditState {
    /// Форма ещё не загружена.
    pub fn new(record: RecordRef) -> Self {
        Self {
            record,
            title: String::new(),
            content: String::new(),
            loading: true,
        }
    }

    /// Ссылка на запись.
    pub fn record(&self) -> RecordRef {
        self.record
    }

    /// Заголовок в форме.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Текст в форме.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Идёт ли загрузка.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Меняет заголовок.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Меняет текст.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Заполняет форму загруженной записью. При ошибке страница уходит
    /// назад к записи, а при отвергнутом токене на `/login`.
    pub fn apply_load(&mut self, result: ApiResult<Post>) -> LoadOutcome {
        self.loading = false;
        match result {
            Ok(post) => {
                self.title = post.title;
                self.content = post.content;
                LoadOutcome::Loaded
            }
            Err(err) => LoadOutcome::Failed {
                message: match err {
                    ApiError::Unauthorized => load_failure_message(&err).to_string(),
                    _ => "Не удалось загрузить пост для редактирования.".to_string(),
                },
                navigate_to: failure_route(&err, self.record.detail_route()),
            },
        }
    }

    /// Проверка наличия заголовка и текста.
    pub fn validate(&self) -> Result<PostEdit, &'static str> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err("Заполните заголовок и текст.");
        }
        Ok(PostEdit {
            title: self.title.clone(),
            content: self.content.clone(),
        })
    }

    /// Итог сохранения: при успехе назад на страницу записи.
    pub fn save_outcome(&self, result: ApiResult<()>) -> ActionOutcome {
        match result {
            Ok(()) => ActionOutcome::Succeeded {
                message: "Изменения сохранены.".to_string(),
                navigate_to: Some(self.record.detail_route()),
                refetch: false,
            },
            Err(err) => action_failure("Не удалось сохранить", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(is_owner: bool, is_admin: bool) -> Post {
        Post {
            id: 3,
            title: "title".to_string(),
            content: "body".to_string(),
            writer: "cat".to_string(),
            date: "2026-01-04".to_string(),
            category: "문의사항".to_string(),
            view_count: 0,
            img_url: None,
            is_owner,
            is_admin,
            answers: Vec::new(),
        }
    }

    #[test]
    fn access_follows_loaded_flags() {
        let mut state = DetailState::new(RecordRef::board(3));
        assert_eq!(state.access(), RecordAccess::default());

        state.apply_load(&CancelToken::new(), Ok(post(true, false)));
        let access = state.access();
        assert!(access.can_edit && access.can_delete);
        assert!(!access.can_answer);
    }

    #[test]
    fn load_failures_map_to_messages_and_support_route() {
        let mut state = DetailState::new(RecordRef::board(3));
        let outcome = state.apply_load(&CancelToken::new(), Err(ApiError::Forbidden("x".to_string())));
        match outcome {
            LoadOutcome::Failed { message, navigate_to } => {
                assert!(message.contains("закрытый"));
                assert_eq!(navigate_to, SUPPORT_ROUTE);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(state.post().is_none());
    }

    #[test]
    fn cancelled_load_is_stale() {
        let mut state = DetailState::new(RecordRef::board(3));
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(state.apply_load(&token, Ok(post(true, true))), LoadOutcome::Stale);
        assert!(state.post().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn blank_answer_is_blocked() {
        let mut state = DetailState::new(RecordRef::board(3));
        state.apply_load(&CancelToken::new(), Ok(post(false, true)));
        state.set_answer_draft("   ");
        assert!(state.begin_answer().is_err());
        assert!(!state.is_submitting());
    }

    #[test]
    fn non_admin_cannot_answer() {
        let mut state = DetailState::new(RecordRef::board(3));
        state.apply_load(&CancelToken::new(), Ok(post(true, false)));
        state.set_answer_draft("hello");
        assert!(state.begin_answer().is_err());
    }

    #[test]
    fn failed_answer_keeps_draft_and_success_clears_it() {
        let mut state = DetailState::new(RecordRef::board(3));
        state.apply_load(&CancelToken::new(), Ok(post(false, true)));
        state.set_answer_draft(" answer ");

        assert_eq!(state.begin_answer(), Ok("answer".to_string()));
        let failed = state.finish_answer(Err(ApiError::Network("down".to_string())));
        assert!(matches!(failed, ActionOutcome::Failed(_)));
        assert_eq!(state.answer_draft(), " answer ");
        assert!(!state.is_submitting());

        state.begin_answer().expect("second attempt must start");
        let ok = state.finish_answer(Ok(()));
        assert!(matches!(ok, ActionOutcome::Succeeded { refetch: true, .. }));
        assert!(state.answer_draft().is_empty());
    }

    #[test]
    fn delete_success_navigates_to_kind_list() {
        let state = DetailState::new(RecordRef::event(4));
        match state.delete_outcome(Ok(())) {
            ActionOutcome::Succeeded { navigate_to, .. } => {
                assert_eq!(navigate_to.as_deref(), Some("/events"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn edit_requires_title_and_content() {
        let mut state = EditState::new(RecordRef::board(1));
        assert_eq!(state.apply_load(Ok(post(true, false))), LoadOutcome::Loaded);
        assert_eq!(state.title(), "title");

        state.set_content("  ");
        assert!(state.validate().is_err());

        state.set_content("new body");
        let edit = state.validate().expect("edit must validate");
        assert_eq!(edit.content, "new body");
    }

    #[test]
    fn rejected_token_on_load_goes_to_login() {
        let mut state = DetailState::new(RecordRef::board(3));
        let outcome = state.apply_load(&CancelToken::new(), Err(ApiError::Unauthorized));
        assert!(matches!(
            outcome,
            LoadOutcome::Failed { navigate_to, .. } if navigate_to == LOGIN_ROUTE
        ));

        let mut edit = EditState::new(RecordRef::event(5));
        assert!(matches!(
            edit.apply_load(Err(ApiError::Unauthorized)),
            LoadOutcome::Failed { navigate_to, .. } if navigate_to == LOGIN_ROUTE
        ));
    }

    #[test]
    fn failed_edit_load_returns_to_record() {
        let mut edit = EditState::new(RecordRef::event(5));
        assert!(matches!(
            edit.apply_load(Err(ApiError::Network("down".to_string()))),
            LoadOutcome::Failed { navigate_to, .. } if navigate_to == "/events/5"
        ));
    }

    #[test]
    fn rejected_token_on_actions_redirects_to_login() {
        let mut state = DetailState::new(RecordRef::board(3));
        state.apply_load(&CancelToken::new(), Ok(post(true, true)));

        assert!(matches!(
            state.delete_outcome(Err(ApiError::Unauthorized)),
            ActionOutcome::RedirectToLogin(_)
        ));

        state.set_answer_draft("answer");
        state.begin_answer().expect("answer must start");
        assert!(matches!(
            state.finish_answer(Err(ApiError::Unauthorized)),
            ActionOutcome::RedirectToLogin(_)
        ));
        assert_eq!(state.answer_draft(), "answer");

        let edit = EditState::new(RecordRef::board(3));
        assert!(matches!(
            edit.save_outcome(Err(ApiError::Unauthorized)),
            ActionOutcome::RedirectToLogin(_)
        ));
    }

    #[test]
    fn forbidden_action_stays_on_page() {
        let state = DetailState::new(RecordRef::board(3));
        assert!(matches!(
            state.delete_outcome(Err(ApiError::Forbidden("not yours".to_string()))),
            ActionOutcome::Failed(_)
        ));
    }
}

//! Постраничный список доски объявлений.

use std::ops::RangeInclusive;

use crate::cancel::CancelToken;
use crate::error::{ApiError, ApiResult};
use crate::models::BoardPage;

/// Размер страницы доски объявлений.
pub const NOTICE_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Окно пагинации. Все числа, кроме `page`, приходят с сервера.
pub struct PageWindow {
    /// Текущая страница (состояние представления).
    pub page: u32,
    /// Всего страниц.
    pub total_pages: u32,
    /// Первая кнопка окна.
    pub start_page: u32,
    /// Последняя кнопка окна.
    pub end_page: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::empty(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Элемент управления пагинатора.
pub enum PagerControl {
    /// В начало.
    First,
    /// Назад.
    Prev,
    /// Конкретная страница.
    Number(u32),
    /// Вперёд.
    Next,
    /// В конец.
    Last,
}

impl PageWindow {
    fn empty(page: u32) -> Self {
        Self {
            page,
            total_pages: 1,
            start_page: 1,
            end_page: 1,
        }
    }

    /// Окно из ответа сервера. Отсутствующие числа заполняются так:
    /// `total_pages` → 1, `start_page` → 1, `end_page` → `total_pages`.
    pub fn from_server<T>(page: u32, server: &BoardPage<T>) -> Self {
        let total_pages = server.total_pages.filter(|n| *n > 0).unwrap_or(1);
        let start_page = server.start_page.filter(|n| *n > 0).unwrap_or(1);
        let end_page = server.end_page.filter(|n| *n > 0).unwrap_or(total_pages);
        Self {
            page,
            total_pages,
            start_page,
            end_page,
        }
    }

    /// Номера кнопок: ровно `start_page..=end_page`, без пересчёта на клиенте.
    pub fn buttons(&self) -> RangeInclusive<u32> {
        self.start_page..=self.end_page
    }

    /// Активна ли кнопка с номером `n`.
    pub fn is_active(&self, n: u32) -> bool {
        self.page == n
    }

    /// Полный набор элементов пагинатора в порядке отрисовки.
    pub fn controls(&self) -> Vec<PagerControl> {
        let mut controls = vec![PagerControl::First, PagerControl::Prev];
        controls.extend(self.buttons().map(PagerControl::Number));
        controls.push(PagerControl::Next);
        controls.push(PagerControl::Last);
        controls
    }

    /// Страница, на которую ведёт элемент.
    pub fn target(&self, control: PagerControl) -> u32 {
        match control {
            PagerControl::First => 1,
            PagerControl::Prev => self.page.saturating_sub(1).max(1),
            PagerControl::Number(n) => n,
            PagerControl::Next => (self.page + 1).min(self.total_pages),
            PagerControl::Last => self.total_pages,
        }
    }

    /// Неактивен ли элемент.
    pub fn is_disabled(&self, control: PagerControl) -> bool {
        match control {
            PagerControl::First | PagerControl::Prev => self.page == 1,
            PagerControl::Next | PagerControl::Last => self.page == self.total_pages,
            PagerControl::Number(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
/// Запрос страницы, выданный [`ListState::begin`].
pub struct PageRequest {
    /// Запрошенная страница.
    pub page: u32,
    /// Размер страницы.
    pub page_size: u32,
    /// Токен отмены этого запроса.
    pub token: CancelToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Что представление должно сделать после применения ответа.
pub enum ListOutcome {
    /// Данные показаны.
    Loaded,
    /// Запрошенная страница больше `total_pages`: страница сброшена на 1,
    /// нужен повторный запрос.
    ResetToFirstPage,
    /// 401: один alert и переход на `/login`; ответ больше ничего не меняет.
    RedirectToLogin,
    /// Прочая ошибка: баннер с сообщением и пустой список.
    Failed(String),
    /// Запрос отменён, ответ отброшен.
    Stale,
}

/// Сообщение баннера при ошибке загрузки доски.
pub const LIST_ERROR_MESSAGE: &str = "Не удалось загрузить данные доски.";

#[derive(Debug, Clone)]
/// Состояние постраничного списка.
pub struct ListState<T> {
    page: u32,
    page_size: u32,
    items: Vec<T>,
    window: PageWindow,
    loading: bool,
    error: Option<String>,
}

impl<T> ListState<T> {
    /// Пустой список на первой странице.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            items: Vec::new(),
            window: PageWindow::default(),
            loading: false,
            error: None,
        }
    }

    /// Текущая страница.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Размер страницы.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Элементы текущей страницы.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Окно пагинации.
    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Идёт ли загрузка.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Сообщение баннера.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Меняет страницу. Возвращает `true`, если нужен новый запрос.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        self.window.page = page;
        true
    }

    /// Начинает загрузку текущей страницы.
    pub fn begin(&mut self, token: CancelToken) -> PageRequest {
        self.loading = true;
        self.error = None;
        PageRequest {
            page: self.page,
            page_size: self.page_size,
            token,
        }
    }

    /// Применяет ответ сервера к состоянию.
    pub fn apply(&mut self, request: &PageRequest, result: ApiResult<BoardPage<T>>) -> ListOutcome {
        if request.token.is_cancelled() {
            return ListOutcome::Stale;
        }

        match result {
            Ok(server) => {
                self.loading = false;
                self.window = PageWindow::from_server(request.page, &server);
                self.items = server.items;
                if request.page > self.window.total_pages {
                    self.page = 1;
                    self.window.page = 1;
                    return ListOutcome::ResetToFirstPage;
                }
                ListOutcome::Loaded
            }
            Err(ApiError::Unauthorized) => {
                self.loading = false;
                ListOutcome::RedirectToLogin
            }
            Err(_) => {
                self.loading = false;
                self.items = Vec::new();
                self.window = PageWindow::empty(self.page);
                self.error = Some(LIST_ERROR_MESSAGE.to_string());
                ListOutcome::Failed(LIST_ERROR_MESSAGE.to_string())
            }
        }
    }
}

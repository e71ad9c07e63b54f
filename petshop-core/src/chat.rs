//! Виджет чат-ассистента: переписка, подсказки по текущему маршруту, анимация иконки.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::models::QuickReply;

/// Первое сообщение бота.
pub const GREETING: &str = "Мяу! Я помощник магазина. Спросите что-нибудь или выберите подсказку ниже.";

/// Ответ бота, если сервер чата недоступен.
pub const FALLBACK_REPLY: &str = "Сейчас не получается ответить. Попробуйте чуть позже.";

/// Пауза перед готовым ответом на подсказку.
pub const QUICK_REPLY_DELAY: Duration = Duration::from_millis(500);

/// Количество кадров анимации.
pub const FRAME_COUNT: u32 = 97;

/// Интервал смены кадра.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Автор сообщения.
pub enum Sender {
    /// Пользователь.
    User,
    /// Ассистент.
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Сообщение в переписке.
pub struct ChatMessage {
    /// Текст.
    pub text: String,
    /// Автор.
    pub sender: Sender,
}

#[derive(Debug, Clone, Serialize)]
/// Тело `POST /api/chat`.
pub struct ChatRequest {
    /// Текст пользователя.
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
/// Ответ `POST /api/chat`.
pub struct ChatReply {
    /// Текст ассистента.
    #[serde(default)]
    pub reply: String,
}

#[derive(Debug, Clone, Serialize)]
/// Тело `POST /api/chat/suggestions`.
pub struct SuggestionsRequest {
    /// Маршрут, для которого нужны подсказки.
    pub current_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Ответ `POST /api/chat/suggestions`.
pub struct SuggestionsResponse {
    /// Подсказки.
    #[serde(default)]
    pub suggestions: Vec<QuickReply>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Переписка. Только дописывается, пока виджет смонтирован.
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                text: GREETING.to_string(),
                sender: Sender::Bot,
            }],
        }
    }
}

impl Transcript {
    /// Все сообщения по порядку.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Добавляет сообщение пользователя.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            text: text.into(),
            sender: Sender::User,
        });
    }

    /// Добавляет сообщение ассистента.
    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            text: text.into(),
            sender: Sender::Bot,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Готовый ответ на подсказку, который показывается после [`QUICK_REPLY_DELAY`].
pub struct PendingAnswer {
    /// Текст ассистента.
    pub answer: String,
    /// Куда перейти после ответа.
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Состояние переписки.
pub struct ChatState {
    transcript: Transcript,
    input: String,
    loading: bool,
}

impl ChatState {
    /// Переписка.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Текущий ввод.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Ждём ли ответа.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Кнопка отправки неактивна, пока ждём ответа.
    pub fn can_send(&self) -> bool {
        !self.loading
    }

    /// Обновляет ввод.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Забирает ввод для отправки. Пустой ввод и повторная отправка игнорируются.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.transcript.push_user(text.clone());
        self.input.clear();
        self.loading = true;
        Some(text)
    }

    /// Дописывает ответ сервера или запасной текст.
    pub fn finish_send(&mut self, result: ApiResult<String>) {
        self.loading = false;
        match result {
            Ok(reply) => self.transcript.push_bot(reply),
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                self.transcript.push_bot(FALLBACK_REPLY);
            }
        }
    }

    /// Выбор подсказки: подпись сразу уходит в переписку, ответ откладывается.
    pub fn select_quick_reply(&mut self, reply: &QuickReply) -> PendingAnswer {
        self.transcript.push_user(reply.label.clone());
        PendingAnswer {
            answer: reply.answer.clone(),
            link: reply.link.clone().filter(|l| !l.is_empty()),
        }
    }

    /// Показывает отложенный ответ. Возвращает маршрут для перехода.
    pub fn deliver(&mut self, pending: PendingAnswer) -> Option<String> {
        self.transcript.push_bot(pending.answer);
        pending.link
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Запрос подсказок, выданный [`SuggestionState`].
pub struct SuggestionRequest {
    /// Порядковый номер запроса.
    pub seq: u64,
    /// Маршрут, для которого он выдан.
    pub route: String,
}

#[derive(Debug, Clone)]
/// Открытость виджета и подсказки для текущего маршрута.
///
/// Ответ применяется, только если он отвечает на последний выданный запрос,
/// а виджет всё ещё открыт на том же маршруте.
pub struct SuggestionState {
    open: bool,
    route: String,
    seq: u64,
    suggestions: Vec<QuickReply>,
}

impl SuggestionState {
    /// Закрытый виджет на маршруте `route`.
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            open: false,
            route: route.into(),
            seq: 0,
            suggestions: Vec::new(),
        }
    }

    /// Открыт ли виджет.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Текущий маршрут.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Подсказки.
    pub fn suggestions(&self) -> &[QuickReply] {
        &self.suggestions
    }

    fn issue(&mut self) -> SuggestionRequest {
        self.seq += 1;
        SuggestionRequest {
            seq: self.seq,
            route: self.route.clone(),
        }
    }

    /// Открывает виджет. Запрос выдаётся только при переходе closed→open.
    pub fn open(&mut self) -> Option<SuggestionRequest> {
        if self.open {
            return None;
        }
        self.open = true;
        Some(self.issue())
    }

    /// Закрывает виджет.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Переключает виджет.
    pub fn toggle(&mut self) -> Option<SuggestionRequest> {
        if self.open {
            self.close();
            None
        } else {
            self.open()
        }
    }

    /// Смена маршрута. Запрос выдаётся только для открытого виджета
    /// и только если маршрут действительно изменился.
    pub fn route_changed(&mut self, route: impl Into<String>) -> Option<SuggestionRequest> {
        let route = route.into();
        if route == self.route {
            return None;
        }
        self.route = route;
        if !self.open {
            return None;
        }
        Some(self.issue())
    }

    /// Применяет ответ. Возвращает `true`, если список обновлён.
    /// Ошибка оставляет прежний список.
    pub fn apply(&mut self, request: &SuggestionRequest, result: ApiResult<Vec<QuickReply>>) -> bool {
        if request.seq != self.seq || !self.open || request.route != self.route {
            tracing::debug!(seq = request.seq, route = %request.route, "stale suggestions dropped");
            return false;
        }
        match result {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, route = %request.route, "failed to load chat suggestions");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Номер кадра анимации иконки.
pub struct FrameCycle {
    frame: u32,
}

impl FrameCycle {
    /// Текущий кадр, от 0.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Следующий кадр по кругу.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAME_COUNT;
    }

    /// Путь к картинке текущего кадра.
    pub fn frame_url(&self) -> String {
        format!("/images/cat_frames/frame_{:03}.png", self.frame)
    }
}

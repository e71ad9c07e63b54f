use parking_lot::Mutex;
use petshop_core::cancel::CancelToken;
use petshop_core::chat::{ChatState, QUICK_REPLY_DELAY, SuggestionRequest, SuggestionState};
use petshop_core::models::QuickReply;

use crate::ShopClient;
use crate::api::StorefrontApi;
use crate::cancel::until_cancelled;

impl<A: StorefrontApi> ShopClient<A> {
    /// Отправляет ввод ассистенту. Возвращает `false`, если отправлять нечего.
    pub async fn send_chat(&self, chat: &mut ChatState) -> bool {
        let Some(text) = chat.begin_send() else {
            return false;
        };
        let result = self.api.send_chat(&text).await;
        chat.finish_send(result);
        true
    }

    /// Выполняет выданный запрос подсказок.
    ///
    /// Блокировка берётся только на время применения ответа, поэтому
    /// несколько запросов могут идти параллельно; применится последний выданный.
    pub async fn refresh_suggestions(
        &self,
        state: &Mutex<SuggestionState>,
        request: SuggestionRequest,
        token: CancelToken,
    ) -> bool {
        let call = self.api.chat_suggestions(&request.route);
        let Some(result) = until_cancelled(&token, call).await else {
            return false;
        };
        state.lock().apply(&request, result)
    }

    /// Быстрый ответ без обращения к серверу: подпись сразу, ответ через паузу.
    /// Возвращает маршрут, на который нужно перейти.
    pub async fn quick_reply(&self, chat: &mut ChatState, reply: &QuickReply) -> Option<String> {
        let pending = chat.select_quick_reply(reply);
        tokio::time::sleep(QUICK_REPLY_DELAY).await;
        chat.deliver(pending)
    }
}

#[cfg(test)]
mod tests {
    use petshop_core::ApiError;
    use petshop_core::chat::{FALLBACK_REPLY, Sender};
    use petshop_core::session::SessionContext;

    use super::*;
    use crate::fake::FakeApi;

    fn client(api: &FakeApi) -> ShopClient<FakeApi> {
        ShopClient::with_api(api.clone(), SessionContext::in_memory())
    }

    #[tokio::test]
    async fn blank_message_is_not_sent() {
        let api = FakeApi::new();
        let client = client(&api);
        let mut chat = ChatState::default();
        chat.set_input("  ");

        assert!(!client.send_chat(&mut chat).await);
        assert_eq!(api.count("send_chat"), 0);
    }

    #[tokio::test]
    async fn failure_appends_fallback() {
        let api = FakeApi::new();
        FakeApi::set(&api.chat, Err(ApiError::Network("down".to_string())));
        let client = client(&api);
        let mut chat = ChatState::default();
        chat.set_input("hi");

        assert!(client.send_chat(&mut chat).await);
        let last = chat.transcript().messages().last().expect("message");
        assert_eq!(last.text, FALLBACK_REPLY);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn quick_reply_makes_no_request() {
        let api = FakeApi::new();
        let client = client(&api);
        let mut chat = ChatState::default();
        let reply = QuickReply {
            label: "배송".to_string(),
            answer: "3만원 이상 무료".to_string(),
            link: Some("/support".to_string()),
        };

        let link = client.quick_reply(&mut chat, &reply).await;

        assert_eq!(link.as_deref(), Some("/support"));
        let senders: Vec<Sender> = chat.transcript().messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn suggestions_apply_for_open_widget() {
        let api = FakeApi::new();
        FakeApi::set(
            &api.suggestions,
            Ok(vec![QuickReply {
                label: "a".to_string(),
                answer: "b".to_string(),
                link: None,
            }]),
        );
        let client = client(&api);
        let state = Mutex::new(SuggestionState::new("/main"));
        let request = state.lock().open().expect("open must issue request");

        assert!(client.refresh_suggestions(&state, request, CancelToken::new()).await);
        assert_eq!(state.lock().suggestions().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_suggestions_are_dropped() {
        let api = FakeApi::new();
        FakeApi::set(&api.suggestions, Ok(Vec::new()));
        let client = client(&api);
        let state = Mutex::new(SuggestionState::new("/main"));
        let request = state.lock().open().expect("open must issue request");
        let token = CancelToken::new();
        token.cancel();

        assert!(!client.refresh_suggestions(&state, request, token).await);
        assert_eq!(api.count("chat_suggestions"), 0);
    }
}

use petshop_core::cancel::CancelToken;
use petshop_core::models::BoardSummary;
use petshop_core::pagination::{ListOutcome, ListState};

use crate::ShopClient;
use crate::api::StorefrontApi;
use crate::cancel::until_cancelled;

impl<A: StorefrontApi> ShopClient<A> {
    /// Загружает текущую страницу доски объявлений.
    ///
    /// Без токена сервер не вызывается. Если сервер сообщил, что страниц
    /// меньше запрошенной, страница сбрасывается на первую и запрос повторяется.
    pub async fn load_board(&self, state: &mut ListState<BoardSummary>, token: CancelToken) -> ListOutcome {
        let outcome = self.fetch_board_page(state, &token).await;
        if outcome != ListOutcome::ResetToFirstPage {
            return outcome;
        }
        tracing::debug!("requested page is beyond total pages, reloading first page");
        self.fetch_board_page(state, &token).await
    }

    async fn fetch_board_page(&self, state: &mut ListState<BoardSummary>, token: &CancelToken) -> ListOutcome {
        let request = state.begin(token.clone());
        let result = match self.require_token() {
            Ok(access) => {
                let call = self.api.list_board(&access, request.page, request.page_size);
                match until_cancelled(token, call).await {
                    Some(result) => self.observe(result),
                    None => return ListOutcome::Stale,
                }
            }
            Err(err) => Err(err),
        };

        let outcome = state.apply(&request, result);
        if let ListOutcome::Failed(message) = &outcome {
            tracing::warn!(page = request.page, %message, "board list failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use petshop_core::ApiError;
    use petshop_core::models::BoardPage;
    use petshop_core::pagination::NOTICE_PAGE_SIZE;
    use petshop_core::session::{MemoryTokenStore, SessionContext, SessionEvent};

    use super::*;
    use crate::fake::FakeApi;

    fn row(id: i64) -> BoardSummary {
        BoardSummary {
            id,
            title: format!("row {id}"),
            writer: "cat".to_string(),
            date: "2026-01-04".to_string(),
            view_count: 0,
        }
    }

    fn signed_in() -> SessionContext {
        SessionContext::new(MemoryTokenStore::with_token("t-1"))
    }

    #[tokio::test]
    async fn missing_token_redirects_without_request() {
        let api = FakeApi::new();
        let client = ShopClient::with_api(api.clone(), SessionContext::in_memory());
        let mut state = ListState::new(NOTICE_PAGE_SIZE);

        let outcome = client.load_board(&mut state, CancelToken::new()).await;

        assert_eq!(outcome, ListOutcome::RedirectToLogin);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn loads_page_with_session_token() {
        let api = FakeApi::new();
        FakeApi::set(&api.board, Ok(BoardPage::new(vec![row(1)], 3, 1, 3)));
        let client = ShopClient::with_api(api.clone(), signed_in());
        let mut state = ListState::new(NOTICE_PAGE_SIZE);

        let outcome = client.load_board(&mut state, CancelToken::new()).await;

        assert_eq!(outcome, ListOutcome::Loaded);
        assert_eq!(state.items().len(), 1);
        assert_eq!(
            api.tokens.lock().expect("tokens mutex poisoned").as_slice(),
            &[Some("t-1".to_string())]
        );
    }

    #[tokio::test]
    async fn page_beyond_total_refetches_first_page() {
        let api = FakeApi::new();
        FakeApi::set(&api.board, Ok(BoardPage::new(vec![row(1)], 2, 1, 2)));
        let client = ShopClient::with_api(api.clone(), signed_in());
        let mut state = ListState::new(NOTICE_PAGE_SIZE);
        state.set_page(7);

        let outcome = client.load_board(&mut state, CancelToken::new()).await;

        assert_eq!(outcome, ListOutcome::Loaded);
        assert_eq!(state.page(), 1);
        assert_eq!(api.count("list_board"), 2);
    }

    #[tokio::test]
    async fn unauthorized_expires_session_once() {
        let api = FakeApi::new();
        FakeApi::set(&api.board, Err(ApiError::Unauthorized));
        let session = signed_in();
        let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = events.clone();
        session.subscribe(move |event| sink.lock().expect("events mutex poisoned").push(event));
        let client = ShopClient::with_api(api, session.clone());
        let mut state = ListState::new(NOTICE_PAGE_SIZE);

        assert_eq!(
            client.load_board(&mut state, CancelToken::new()).await,
            ListOutcome::RedirectToLogin
        );
        assert_eq!(
            client.load_board(&mut state, CancelToken::new()).await,
            ListOutcome::RedirectToLogin
        );

        assert!(!session.is_authenticated());
        assert_eq!(
            events.lock().expect("events mutex poisoned").as_slice(),
            &[SessionEvent::Expired]
        );
    }

    #[tokio::test]
    async fn cancelled_token_is_stale() {
        let api = FakeApi::new();
        FakeApi::set(&api.board, Ok(BoardPage::new(vec![row(1)], 1, 1, 1)));
        let client = ShopClient::with_api(api, signed_in());
        let mut state = ListState::new(NOTICE_PAGE_SIZE);
        let token = CancelToken::new();
        token.cancel();

        assert_eq!(client.load_board(&mut state, token).await, ListOutcome::Stale);
        assert!(state.items().is_empty());
    }
}

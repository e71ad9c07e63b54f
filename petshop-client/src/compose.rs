use petshop_core::detail::ActionOutcome;
use petshop_core::post_form::{PostDraft, submission_outcome};

use crate::ShopClient;
use crate::api::StorefrontApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Итог подготовки формы поста.
pub enum PrefillOutcome {
    /// Профиль подставлен, форму можно показывать.
    Ready,
    /// Токена нет или профиль не получен: токен удалён, переход на `/login`.
    RedirectToLogin,
}

impl<A: StorefrontApi> ShopClient<A> {
    /// Подставляет автора и почту из профиля.
    pub async fn prefill_post(&self, draft: &mut PostDraft) -> PrefillOutcome {
        let Ok(access) = self.require_token() else {
            return PrefillOutcome::RedirectToLogin;
        };

        match self.api.fetch_profile(&access).await {
            Ok(profile) => {
                self.session.update_profile(&profile);
                draft.apply_profile(&profile);
                PrefillOutcome::Ready
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load profile for post form");
                if let Err(store_err) = self.session.sign_out() {
                    tracing::warn!(error = %store_err, "failed to clear token");
                }
                PrefillOutcome::RedirectToLogin
            }
        }
    }

    /// Отправляет пост. Без почты и обязательных полей запрос не уходит.
    pub async fn submit_post(&self, draft: &PostDraft) -> ActionOutcome {
        let submission = match draft.build_submission() {
            Ok(submission) => submission,
            Err(err) => return ActionOutcome::Failed(err.to_string()),
        };
        let result = match self.require_token() {
            Ok(access) => self.observe(self.api.create_post(&access, submission).await),
            Err(err) => Err(err),
        };
        if let Ok(created) = &result {
            tracing::info!(id = created.id, board = %draft.board_type, "post created");
        }
        submission_outcome(result)
    }
}

#[cfg(test)]
mod tests {
    use petshop_core::ApiError;
    use petshop_core::models::{CreatedPost, Profile};
    use petshop_core::post_form::{BoardType, DomainChoice};
    use petshop_core::session::{MemoryTokenStore, SessionContext, SessionEvent};

    use super::*;
    use crate::fake::FakeApi;

    fn client(api: &FakeApi) -> ShopClient<FakeApi> {
        ShopClient::with_api(api.clone(), SessionContext::new(MemoryTokenStore::with_token("t")))
    }

    #[tokio::test]
    async fn prefill_without_token_skips_profile() {
        let api = FakeApi::new();
        let client = ShopClient::with_api(api.clone(), SessionContext::in_memory());
        let mut draft = PostDraft::default();

        assert_eq!(client.prefill_post(&mut draft).await, PrefillOutcome::RedirectToLogin);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn prefill_failure_clears_token() {
        let api = FakeApi::new();
        FakeApi::set(&api.profile, Err(ApiError::Network("down".to_string())));
        let client = client(&api);
        let mut draft = PostDraft::default();

        assert_eq!(client.prefill_post(&mut draft).await, PrefillOutcome::RedirectToLogin);
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn prefill_splits_custom_domain() {
        let api = FakeApi::new();
        FakeApi::set(
            &api.profile,
            Ok(Profile {
                user_id: Some("neko".to_string()),
                nickname: Some("냥이".to_string()),
                email: Some("neko@shop.kr".to_string()),
            }),
        );
        let client = client(&api);
        let mut draft = PostDraft::default();

        assert_eq!(client.prefill_post(&mut draft).await, PrefillOutcome::Ready);
        assert_eq!(draft.writer, "냥이");
        assert_eq!(draft.email.domain, DomainChoice::Custom("shop.kr".to_string()));
    }

    #[tokio::test]
    async fn missing_email_blocks_submission() {
        let api = FakeApi::new();
        let client = client(&api);
        let draft = PostDraft {
            title: "t".to_string(),
            writer: "w".to_string(),
            content: "c".to_string(),
            ..PostDraft::default()
        };

        let outcome = client.submit_post(&draft).await;

        assert!(matches!(outcome, ActionOutcome::Failed(_)));
        assert_eq!(api.count("create_post"), 0);
    }

    #[tokio::test]
    async fn submission_goes_to_noticeboard() {
        let api = FakeApi::new();
        FakeApi::set(
            &api.created,
            Ok(CreatedPost {
                id: 42,
                message: None,
            }),
        );
        let client = client(&api);
        let mut draft = PostDraft {
            board_type: BoardType::Free,
            title: "t".to_string(),
            writer: "w".to_string(),
            content: "c".to_string(),
            ..PostDraft::default()
        };
        draft.email.id = "neko".to_string();
        draft.email.domain = DomainChoice::Known("naver.com".to_string());

        let outcome = client.submit_post(&draft).await;

        assert!(matches!(
            outcome,
            ActionOutcome::Succeeded { navigate_to: Some(route), .. } if route == "/noticeboard"
        ));
        let submissions = api.submissions.lock().expect("submissions mutex poisoned");
        assert_eq!(submissions[0].field("boardType"), Some("FREE"));
        assert_eq!(submissions[0].field("email"), Some("neko@naver.com"));
    }

    #[tokio::test]
    async fn rejected_token_on_submit_goes_to_login_once() {
        let api = FakeApi::new();
        FakeApi::set(&api.created, Err(ApiError::Unauthorized));
        let client = client(&api);
        let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = events.clone();
        client
            .session()
            .subscribe(move |event| sink.lock().expect("events mutex poisoned").push(event));
        let mut draft = PostDraft {
            title: "t".to_string(),
            writer: "w".to_string(),
            content: "c".to_string(),
            ..PostDraft::default()
        };
        draft.email.id = "neko".to_string();
        draft.email.domain = DomainChoice::Known("naver.com".to_string());

        let first = client.submit_post(&draft).await;
        let second = client.submit_post(&draft).await;

        assert!(matches!(first, ActionOutcome::RedirectToLogin(_)));
        assert!(matches!(second, ActionOutcome::RedirectToLogin(_)));
        assert_eq!(api.count("create_post"), 1);
        assert_eq!(
            events.lock().expect("events mutex poisoned").as_slice(),
            &[SessionEvent::Expired]
        );
    }
}

use leptos::prelude::*;
use petshop_core::catalog::Cart;
use petshop_core::session::{SessionContext, SessionEvent};
use petshop_core::{ApiError, ApiResult};

use crate::storage::LocalTokenStore;

pub(crate) const LOGIN_REQUIRED: &str = "Войдите, чтобы продолжить.";
pub(crate) const SESSION_EXPIRED: &str = "Сессия истекла. Войдите снова.";

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) session: SessionContext,
    pub(crate) signed_in: RwSignal<bool>,
    pub(crate) nickname: RwSignal<Option<String>>,
    pub(crate) cart: RwSignal<Cart>,
    pub(crate) last_order: RwSignal<Option<Cart>>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        let session = SessionContext::new(LocalTokenStore);
        let signed_in = RwSignal::new(session.is_authenticated());
        let nickname = RwSignal::new(None);

        session.subscribe(move |event| {
            tracing::debug!(?event, "session event");
            let active = matches!(event, SessionEvent::SignedIn);
            signed_in.set(active);
            if !active {
                nickname.set(None);
            }
        });

        Self {
            session,
            signed_in,
            nickname,
            cart: RwSignal::new(Cart::default()),
            last_order: RwSignal::new(None),
        }
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// 401 от сервера сбрасывает сессию; подписчики узнают об этом один раз.
    pub(crate) fn observe<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(ApiError::Unauthorized) = &result
            && self.session.expire()
        {
            tracing::warn!("access token rejected, session expired");
        }
        result
    }

    pub(crate) fn sign_out(&self) {
        if let Err(err) = self.session.sign_out() {
            tracing::warn!(error = %err, "failed to clear token");
        }
    }
}

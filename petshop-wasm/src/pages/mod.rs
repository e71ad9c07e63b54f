use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_params_map;
use petshop_core::cancel::CancelScope;
use petshop_core::detail::ActionOutcome;
use petshop_core::models::BoardPage;
use petshop_core::pagination::{ListOutcome, ListState};
use petshop_core::signup::LOGIN_ROUTE;
use petshop_core::{ApiError, ApiResult, UserNotice};

use crate::dom;
use crate::state::SESSION_EXPIRED;

pub(crate) mod account;
pub(crate) mod board;
pub(crate) mod catalog;
pub(crate) mod mypage;

/// Числовой параметр маршрута; мусор даёт `None`.
pub(crate) fn id_param(name: &'static str) -> Memo<Option<i64>> {
    let params = use_params_map();
    Memo::new(move |_| params.read().get(name).and_then(|raw| raw.parse().ok()))
}

/// Alert с итогом действия и переход, если он нужен.
/// Возвращает `true`, когда страницу надо перечитать.
pub(crate) fn finish(outcome: ActionOutcome, navigate: &impl Fn(&str, NavigateOptions)) -> bool {
    match outcome {
        ActionOutcome::Succeeded {
            message,
            navigate_to,
            refetch,
        } => {
            dom::alert(&message);
            if let Some(route) = navigate_to {
                navigate(&route, NavigateOptions::default());
            }
            refetch
        }
        ActionOutcome::Failed(message) => {
            tracing::error!(%message, "action failed");
            dom::alert(&message);
            false
        }
        ActionOutcome::RedirectToLogin(message) => {
            tracing::warn!(%message, "token rejected by server");
            dom::alert(&message);
            navigate(LOGIN_ROUTE, NavigateOptions::default());
            false
        }
    }
}

/// Показывает ошибку по её классу. Ошибка авторизации уводит на `/login`.
pub(crate) fn report(err: &ApiError, navigate: &impl Fn(&str, NavigateOptions)) {
    tracing::error!(error = %err, "request failed");
    let notice = err.notice();
    dom::alert(notice.message());
    if let UserNotice::RedirectToLogin(_) = notice {
        navigate(LOGIN_ROUTE, NavigateOptions::default());
    }
}

/// Загружает текущую страницу списка. Новый вызов отменяет предыдущий запрос,
/// страница за пределами `total_pages` перезапрашивается с первой.
///
/// Страницы за входом вызывают её только с токеном: без токена alert и
/// переход делает охрана маршрута в `Layout`.
pub(crate) fn load_list<T, F, Fut, N>(
    list: RwSignal<ListState<T>>,
    scope: CancelScope,
    fetch: F,
    navigate: N,
) where
    T: Send + Sync + 'static,
    F: Fn(u32, u32) -> Fut + 'static,
    Fut: Future<Output = ApiResult<BoardPage<T>>> + 'static,
    N: Fn(&str, NavigateOptions) + 'static,
{
    spawn_local(async move {
        loop {
            let Some(request) = list.try_update(|list| list.begin(scope.renew())) else {
                return;
            };
            let result = fetch(request.page, request.page_size).await;
            match list.try_update(|list| list.apply(&request, result)) {
                Some(ListOutcome::ResetToFirstPage) => continue,
                Some(ListOutcome::RedirectToLogin) => {
                    dom::alert(SESSION_EXPIRED);
                    navigate(LOGIN_ROUTE, NavigateOptions::default());
                }
                Some(ListOutcome::Failed(message)) => {
                    tracing::error!(%message, page = request.page, "list load failed");
                }
                Some(ListOutcome::Loaded | ListOutcome::Stale) | None => {}
            }
            return;
        }
    });
}

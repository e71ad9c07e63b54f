use leptos::prelude::*;
use leptos_router::components::{A, Outlet};
use leptos_router::hooks::{use_location, use_navigate};
use petshop_core::router::Route;
use petshop_core::signup::LOGIN_ROUTE;

use crate::components::chat_widget::ChatWidget;
use crate::dom;
use crate::state::{AppState, LOGIN_REQUIRED};

/// Общая навигация, подвал и чат для всех страниц, кроме входа и регистрации.
#[component]
pub(crate) fn Layout() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let location = use_location();

    // Проверка только при смене маршрута: истёкшую сессию на открытой
    // странице обрабатывает сама страница.
    let guard_state = state.clone();
    let guard_navigate = navigate.clone();
    Effect::new(move |_| {
        let route = Route::parse(&location.pathname.get());
        if route.requires_session() && !guard_state.session.is_authenticated() {
            dom::alert(LOGIN_REQUIRED);
            guard_navigate(LOGIN_ROUTE, Default::default());
        }
    });

    let on_logout = {
        let state = state.clone();
        move |_| {
            state.sign_out();
            navigate("/main", Default::default());
        }
    };

    let signed_in = state.signed_in;
    let nickname = state.nickname;
    let cart = state.cart;
    let cart_count = move || cart.with(|cart| cart.lines().len());

    view! {
        <div class="layout">
            <header class="nav">
                <A href="/main">"Petshop"</A>
                <nav>
                    <A href="/category/dog">"Собаки"</A>
                    <A href="/category/cat">"Кошки"</A>
                    <A href="/events">"События"</A>
                    <A href="/noticeboard">"Доска"</A>
                    <A href="/support">"Поддержка"</A>
                </nav>
                <div class="nav-user">
                    <A href="/cart">"Корзина (" {cart_count} ")"</A>
                    <Show
                        when=move || signed_in.get()
                        fallback=|| view! {
                            <A href="/login">"Войти"</A>
                            <A href="/signup">"Регистрация"</A>
                        }
                    >
                        <span>{move || nickname.get().unwrap_or_default()}</span>
                        <A href="/mypage/qna">"Мои вопросы"</A>
                        <A href="/mypage/reviews">"Мои отзывы"</A>
                        <button on:click=on_logout.clone()>"Выйти"</button>
                    </Show>
                </div>
            </header>

            <main class="page">
                <Outlet />
            </main>

            <footer class="footer">
                <p>"Petshop © 2026"</p>
                <A href="/support">"Служба поддержки"</A>
            </footer>

            <ChatWidget />
        </div>
    }
}

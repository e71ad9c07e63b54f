use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use petshop_core::ApiError;
use petshop_core::listing::{Listing, QnaFilter, ReviewFilter, answer_text, fallback_reviews, stars};
use petshop_core::models::{QnaEntry, ReviewEntry};

use crate::api;
use crate::pages::report;
use crate::state::AppState;

#[component]
pub(crate) fn MyQnaPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let listing = RwSignal::new(Listing::<QnaEntry>::default());
    let filter = RwSignal::new(QnaFilter::All);

    // Без токена на вход уводит охрана маршрута.
    if let Some(token) = state.token() {
        spawn_local(async move {
            let result = state.observe(api::my_qna(&token).await);
            if let Err(err @ ApiError::Unauthorized) = &result {
                report(err, &navigate);
            }
            listing.try_update(|l| l.apply(result));
        });
    }

    let filters = move || {
        QnaFilter::ALL
            .into_iter()
            .map(|option| {
                view! {
                    <button
                        class:active=move || filter.get() == option
                        on:click=move |_| filter.set(option)
                    >
                        {option.label()}
                    </button>
                }
            })
            .collect_view()
    };

    let rows = move || {
        let current = filter.get();
        listing.with(|l| {
            l.filtered(|entry| current.matches(entry))
                .into_iter()
                .map(|entry| {
                    let id = entry.id;
                    view! {
                        <li on:click=move |_| listing.update(|l| l.select(id))>
                            <span class="product">{entry.product_name.clone()}</span>
                            <span class="title">{entry.title.clone()}</span>
                            <span class="status">{entry.status.clone()}</span>
                            <span class="date">{entry.created_at.clone()}</span>
                        </li>
                    }
                })
                .collect_view()
        })
    };

    let panel = move || {
        listing.with(|l| {
            l.selected().map(|entry| {
                view! {
                    <aside class="detail-panel">
                        <button on:click=move |_| listing.update(Listing::clear_selection)>"✕"</button>
                        <h2>{entry.title.clone()}</h2>
                        <p class="meta">{entry.product_name.clone()} " · " {entry.kind.clone()}</p>
                        <p>{entry.content.clone()}</p>
                        <h3>"Ответ"</h3>
                        <p>{answer_text(entry).to_string()}</p>
                    </aside>
                }
            })
        })
    };

    view! {
        <section class="mypage">
            <h1>"Мои вопросы"</h1>
            <div class="filters">{filters}</div>
            <Show when=move || !listing.with(Listing::is_loading) fallback=|| view! { <p>"Загрузка..."</p> }>
                <ul class="qna-list">{rows}</ul>
            </Show>
            {panel}
        </section>
    }
}

#[component]
pub(crate) fn MyReviewsPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let listing = RwSignal::new(Listing::<ReviewEntry>::default());
    let filter = RwSignal::new(ReviewFilter::All);

    if let Some(token) = state.token() {
        spawn_local(async move {
            let result = state.observe(api::my_reviews(&token).await);
            if let Err(err @ ApiError::Unauthorized) = &result {
                report(err, &navigate);
                return;
            }
            listing.try_update(|l| l.apply_or(result, fallback_reviews));
        });
    }

    let filters = move || {
        ReviewFilter::ALL
            .into_iter()
            .map(|option| {
                view! {
                    <button
                        class:active=move || filter.get() == option
                        on:click=move |_| filter.set(option)
                    >
                        {option.label()}
                    </button>
                }
            })
            .collect_view()
    };

    let cards = move || {
        let current = filter.get();
        listing.with(|l| {
            l.filtered(|entry| current.matches(entry))
                .into_iter()
                .map(|entry| {
                    let id = entry.id;
                    let images = entry
                        .images
                        .iter()
                        .map(|src| view! { <img src=src.clone() alt="" /> })
                        .collect_view();
                    view! {
                        <article class="review" on:click=move |_| listing.update(|l| l.select(id))>
                            <p class="stars">{stars(entry.rating)}</p>
                            <h2>{entry.title.clone()}</h2>
                            <p class="meta">{entry.product_name.clone()} " · " {entry.created_at.clone()}</p>
                            <p>{entry.content.clone()}</p>
                            <div class="images">{images}</div>
                        </article>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="mypage">
            <h1>"Мои отзывы"</h1>
            <div class="filters">{filters}</div>
            <Show when=move || !listing.with(Listing::is_loading) fallback=|| view! { <p>"Загрузка..."</p> }>
                <div class="review-list">{cards}</div>
            </Show>
        </section>
    }
}

use gloo_timers::future::TimeoutFuture;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};
use petshop_core::cancel::CancelToken;
use petshop_core::chat::{
    ChatState, FRAME_INTERVAL, FrameCycle, QUICK_REPLY_DELAY, Sender, SuggestionRequest,
    SuggestionState,
};
use petshop_core::models::QuickReply;

use crate::api;

fn millis(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

fn fetch_suggestions(state: RwSignal<SuggestionState>, request: SuggestionRequest) {
    spawn_local(async move {
        let result = api::chat_suggestions(&request.route).await;
        state.try_update(|state| state.apply(&request, result));
    });
}

/// Кошка-ассистент в углу экрана.
#[component]
pub(crate) fn ChatWidget() -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();

    let chat = RwSignal::new(ChatState::default());
    let suggestions = RwSignal::new(SuggestionState::new(location.pathname.get_untracked()));
    let frame = RwSignal::new(FrameCycle::default());

    let alive = CancelToken::new();
    on_cleanup({
        let alive = alive.clone();
        move || alive.cancel()
    });

    spawn_local({
        let alive = alive.clone();
        async move {
            loop {
                TimeoutFuture::new(millis(FRAME_INTERVAL)).await;
                if alive.is_cancelled() {
                    break;
                }
                frame.update(FrameCycle::tick);
            }
        }
    });

    Effect::new(move |_| {
        let path = location.pathname.get();
        if let Some(request) = suggestions.try_update(|s| s.route_changed(path)).flatten() {
            fetch_suggestions(suggestions, request);
        }
    });

    let on_toggle = move |_| {
        if let Some(request) = suggestions.try_update(SuggestionState::toggle).flatten() {
            fetch_suggestions(suggestions, request);
        }
    };

    let on_send = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(text) = chat.try_update(ChatState::begin_send).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = api::send_chat(&text).await;
            chat.try_update(|chat| chat.finish_send(result));
        });
    };

    let on_quick_reply = move |reply: QuickReply| {
        let Some(pending) = chat.try_update(|chat| chat.select_quick_reply(&reply)) else {
            return;
        };
        let navigate = navigate.clone();
        let alive = alive.clone();
        spawn_local(async move {
            TimeoutFuture::new(millis(QUICK_REPLY_DELAY)).await;
            if alive.is_cancelled() {
                return;
            }
            if let Some(link) = chat.try_update(|chat| chat.deliver(pending)).flatten() {
                navigate(&link, Default::default());
            }
        });
    };

    let messages = move || {
        chat.with(|chat| {
            chat.transcript()
                .messages()
                .iter()
                .map(|message| {
                    let class = match message.sender {
                        Sender::User => "chat-message user",
                        Sender::Bot => "chat-message bot",
                    };
                    view! { <p class=class>{message.text.clone()}</p> }
                })
                .collect_view()
        })
    };

    let quick_replies = move || {
        suggestions.with(|s| {
            s.suggestions()
                .iter()
                .cloned()
                .map(|reply| {
                    let on_quick_reply = on_quick_reply.clone();
                    let label = reply.label.clone();
                    view! {
                        <button
                            class="quick-reply"
                            on:click=move |_| on_quick_reply(reply.clone())
                        >
                            {label}
                        </button>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="chat-widget">
            <Show when=move || suggestions.with(SuggestionState::is_open)>
                <section class="chat-panel">
                    <div class="chat-messages">{messages}</div>
                    <div class="chat-suggestions">{quick_replies}</div>
                    <form on:submit=on_send>
                        <input
                            placeholder="Сообщение"
                            prop:value=move || chat.with(|c| c.input().to_string())
                            on:input=move |ev| chat.update(|c| c.set_input(event_target_value(&ev)))
                        />
                        <button type="submit" disabled=move || !chat.with(ChatState::can_send)>
                            "Отправить"
                        </button>
                    </form>
                </section>
            </Show>
            <button class="chat-toggle" on:click=on_toggle>
                <img src=move || frame.with(FrameCycle::frame_url) alt="assistant" />
            </button>
        </div>
    }
}

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use petshop_core::cancel::{CancelScope, CancelToken};
use petshop_core::detail::{DELETE_CONFIRM, DetailState, EditState, LoadOutcome};
use petshop_core::models::{BoardSummary, Post};
use petshop_core::pagination::{ListState, NOTICE_PAGE_SIZE};
use petshop_core::post_form::{
    BoardType, DomainChoice, KNOWN_EMAIL_DOMAINS, PostDraft, submission_outcome,
};
use petshop_core::record::{RecordKind, RecordRef};
use petshop_core::signup::LOGIN_ROUTE;
use web_sys::File;

use crate::api;
use crate::components::pager::Pager;
use crate::dom;
use crate::pages::{finish, id_param, load_list};
use crate::state::{AppState, LOGIN_REQUIRED};

const CUSTOM_DOMAIN: &str = "custom";

#[component]
pub(crate) fn NoticeboardPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let list = RwSignal::new(ListState::<BoardSummary>::new(NOTICE_PAGE_SIZE));
    let scope = CancelScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });

    let reload = {
        let state = state.clone();
        move || {
            let state = state.clone();
            let fetch = move |page, per_page| {
                let state = state.clone();
                async move {
                    let token = state.session.require_token()?;
                    state.observe(api::list_board(&token, page, per_page).await)
                }
            };
            load_list(list, scope.clone(), fetch, navigate.clone());
        }
    };
    if state.session.is_authenticated() {
        reload();
    }

    let on_select = move |page: u32| {
        if list.try_update(|list| list.set_page(page)).unwrap_or(false) {
            reload();
        }
    };

    let rows = move || {
        list.with(|list| {
            list.items()
                .iter()
                .map(|row| {
                    let href = RecordRef::board(row.id).detail_route();
                    view! {
                        <tr>
                            <td>{row.id}</td>
                            <td><A href=href>{row.title.clone()}</A></td>
                            <td>{row.writer.clone()}</td>
                            <td>{row.date.clone()}</td>
                            <td>{row.view_count}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="board">
            <h1>"Доска объявлений"</h1>
            <A href="/write">"Написать"</A>
            <Show when=move || list.with(|l| l.error().is_some())>
                <div class="error-banner">{move || list.with(|l| l.error().map(str::to_string))}</div>
            </Show>
            <Show when=move || list.with(ListState::is_loading)>
                <p>"Загрузка..."</p>
            </Show>
            <table>
                <thead>
                    <tr>
                        <th>"№"</th>
                        <th>"Заголовок"</th>
                        <th>"Автор"</th>
                        <th>"Дата"</th>
                        <th>"Просмотры"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
            <Pager window=Signal::derive(move || list.with(ListState::window)) on_select=on_select />
        </section>
    }
}

fn load_detail(
    state: AppState,
    detail: RwSignal<Option<DetailState>>,
    record: RecordRef,
    token: CancelToken,
    navigate: impl Fn(&str, NavigateOptions) + 'static,
) {
    spawn_local(async move {
        let access = state.token();
        let result = api::get_record(access.as_deref(), record).await;
        let result = if access.is_some() { state.observe(result) } else { result };

        let outcome = detail
            .try_update(|detail| detail.as_mut().map(|d| d.apply_load(&token, result)))
            .flatten();
        if let Some(LoadOutcome::Failed {
            message,
            navigate_to,
        }) = outcome
        {
            tracing::warn!(record = %record.api_path(), %message, "record load failed");
            dom::alert(&message);
            navigate(&navigate_to, NavigateOptions::default());
        }
    });
}

fn answers_view(post: &Post) -> impl IntoView + use<> {
    post.answers
        .iter()
        .map(|answer| {
            view! {
                <li class="answer">
                    <p class="meta">{answer.writer.clone()} " · " {answer.date.clone()}</p>
                    <p>{answer.content.clone()}</p>
                </li>
            }
        })
        .collect_view()
}

/// Страница записи доски или события; вид записи задаёт маршрут.
#[component]
pub(crate) fn DetailPage(kind: RecordKind) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let id = id_param("id");

    let detail = RwSignal::new(None::<DetailState>);
    let scope = CancelScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });

    let load = {
        let state = state.clone();
        let scope = scope.clone();
        let navigate = navigate.clone();
        move |record: RecordRef| {
            load_detail(state.clone(), detail, record, scope.renew(), navigate.clone());
        }
    };

    Effect::new({
        let load = load.clone();
        move |_| {
            let Some(id) = id.get() else {
                detail.set(None);
                return;
            };
            let record = RecordRef { kind, id };
            detail.set(Some(DetailState::new(record)));
            load(record);
        }
    });

    let on_delete = {
        let state = state.clone();
        let navigate = navigate.clone();
        move |_| {
            let Some(record) = detail.with_untracked(|d| d.as_ref().map(DetailState::record)) else {
                return;
            };
            if !dom::confirm(DELETE_CONFIRM) {
                return;
            }
            let state = state.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                let result = match state.session.require_token() {
                    Ok(token) => state.observe(api::delete_record(&token, record).await),
                    Err(err) => Err(err),
                };
                let outcome = detail
                    .try_update(|d| d.as_ref().map(|d| d.delete_outcome(result)))
                    .flatten();
                if let Some(outcome) = outcome {
                    finish(outcome, &navigate);
                }
            });
        }
    };

    let on_answer = {
        let state = state.clone();
        let navigate = navigate.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let begun = detail
                .try_update(|d| d.as_mut().map(|d| d.begin_answer().map(|c| (d.record(), c))))
                .flatten();
            let (record, content) = match begun {
                Some(Ok(begun)) => begun,
                Some(Err(message)) => {
                    dom::alert(message);
                    return;
                }
                None => return,
            };

            let state = state.clone();
            let navigate = navigate.clone();
            let load = load.clone();
            spawn_local(async move {
                let result = match state.session.require_token() {
                    Ok(token) => state.observe(api::post_answer(&token, record, &content).await),
                    Err(err) => Err(err),
                };
                let outcome = detail
                    .try_update(|d| d.as_mut().map(|d| d.finish_answer(result)))
                    .flatten();
                if let Some(outcome) = outcome
                    && finish(outcome, &navigate)
                {
                    load(record);
                }
            });
        }
    };

    let access = move || detail.with(|d| d.as_ref().map(DetailState::access).unwrap_or_default());
    let post = move || detail.with(|d| d.as_ref().and_then(|d| d.post().cloned()));

    view! {
        <section class="detail">
            <Show
                when=move || post().is_some()
                fallback=move || {
                    let loading = detail.with(|d| d.as_ref().is_some_and(DetailState::is_loading));
                    if loading { "Загрузка..." } else { "Запись не найдена." }
                }
            >
                {move || {
                    post().map(|post| {
                        view! {
                            <article>
                                <h1>{post.title.clone()}</h1>
                                <p class="meta">
                                    {post.writer.clone()} " · " {post.date.clone()} " · "
                                    {post.category.clone()} " · просмотров: " {post.view_count}
                                </p>
                                {post.img_url.clone().map(|src| view! { <img src=src alt="" /> })}
                                <div class="content">{post.content.clone()}</div>
                                <ul class="answers">{answers_view(&post)}</ul>
                            </article>
                        }
                    })
                }}
                <div class="actions">
                    <A href=kind.list_route()>"К списку"</A>
                    <Show when=move || access().can_edit>
                        <A href=move || {
                            detail.with(|d| d.as_ref().map(|d| d.record().edit_route()).unwrap_or_default())
                        }>"Редактировать"</A>
                    </Show>
                    <Show when=move || access().can_delete>
                        <button on:click=on_delete.clone()>"Удалить"</button>
                    </Show>
                </div>
                <Show when=move || access().can_answer>
                    <form class="answer-form" on:submit=on_answer.clone()>
                        <textarea
                            placeholder="Ответ администратора"
                            prop:value=move || {
                                detail.with(|d| d.as_ref().map(|d| d.answer_draft().to_string()).unwrap_or_default())
                            }
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                detail.update(|d| {
                                    if let Some(d) = d {
                                        d.set_answer_draft(value);
                                    }
                                });
                            }
                        ></textarea>
                        <button
                            type="submit"
                            disabled=move || detail.with(|d| d.as_ref().is_some_and(DetailState::is_submitting))
                        >
                            "Ответить"
                        </button>
                    </form>
                </Show>
            </Show>
        </section>
    }
}

#[component]
pub(crate) fn EditPage(kind: RecordKind) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let id = id_param("id");
    let edit = RwSignal::new(None::<EditState>);

    Effect::new({
        let state = state.clone();
        let navigate = navigate.clone();
        move |_| {
            let Some(id) = id.get() else {
                edit.set(None);
                return;
            };
            let record = RecordRef { kind, id };
            edit.set(Some(EditState::new(record)));

            // Без токена на вход уводит охрана маршрута.
            let Some(access) = state.token() else {
                return;
            };
            let state = state.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                let result = state.observe(api::get_record(Some(&access), record).await);
                let loaded = edit
                    .try_update(|e| e.as_mut().map(|e| e.apply_load(result)))
                    .flatten();
                if let Some(LoadOutcome::Failed {
                    message,
                    navigate_to,
                }) = loaded
                {
                    dom::alert(&message);
                    navigate(&navigate_to, NavigateOptions::default());
                }
            });
        }
    });

    let on_save = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some((record, validated)) =
            edit.with_untracked(|e| e.as_ref().map(|e| (e.record(), e.validate())))
        else {
            return;
        };
        let changes = match validated {
            Ok(changes) => changes,
            Err(message) => {
                dom::alert(message);
                return;
            }
        };

        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = match state.session.require_token() {
                Ok(token) => state.observe(api::update_record(&token, record, &changes).await),
                Err(err) => Err(err),
            };
            let outcome = edit
                .try_update(|e| e.as_ref().map(|e| e.save_outcome(result)))
                .flatten();
            if let Some(outcome) = outcome {
                finish(outcome, &navigate);
            }
        });
    };

    let field = move |read: fn(&EditState) -> &str| {
        move || edit.with(|e| e.as_ref().map(|e| read(e).to_string()).unwrap_or_default())
    };

    view! {
        <section class="edit">
            <h1>{kind.edit_title()}</h1>
            <Show
                when=move || edit.with(|e| e.as_ref().is_some_and(|e| !e.is_loading()))
                fallback=|| view! { <p>"Загрузка..."</p> }
            >
                <form on:submit=on_save.clone()>
                    <input
                        placeholder="Заголовок"
                        prop:value=field(EditState::title)
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit.update(|e| {
                                if let Some(e) = e {
                                    e.set_title(value);
                                }
                            });
                        }
                    />
                    <textarea
                        placeholder="Текст"
                        prop:value=field(EditState::content)
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit.update(|e| {
                                if let Some(e) = e {
                                    e.set_content(value);
                                }
                            });
                        }
                    ></textarea>
                    <button type="submit">"Сохранить"</button>
                </form>
            </Show>
        </section>
    }
}

fn domain_value(choice: &DomainChoice) -> String {
    match choice {
        DomainChoice::Unselected => String::new(),
        DomainChoice::Known(domain) => domain.clone(),
        DomainChoice::Custom(_) => CUSTOM_DOMAIN.to_string(),
    }
}

fn parse_domain(value: &str) -> DomainChoice {
    match value {
        "" => DomainChoice::Unselected,
        CUSTOM_DOMAIN => DomainChoice::Custom(String::new()),
        known => DomainChoice::Known(known.to_string()),
    }
}

fn board_options() -> impl IntoView {
    BoardType::ALL
        .into_iter()
        .map(|board| view! { <option value=board.as_str()>{board.label()}</option> })
        .collect_view()
}

fn domain_options() -> impl IntoView {
    KNOWN_EMAIL_DOMAINS
        .into_iter()
        .map(|domain| view! { <option value=domain>{domain}</option> })
        .collect_view()
}

/// Форма поста. Автор и почта подставляются из профиля до первого показа.
#[component]
pub(crate) fn WritePage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let draft = RwSignal::new(PostDraft::default());
    let file = RwSignal::new_local(None::<File>);
    let ready = RwSignal::new(false);
    let submitting = RwSignal::new(false);

    if let Ok(token) = state.session.require_token() {
        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::fetch_profile(&token).await {
                Ok(profile) => {
                    state.session.update_profile(&profile);
                    state.nickname.set(profile.nickname.clone());
                    draft.try_update(|d| d.apply_profile(&profile));
                    ready.try_set(true);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to load profile for post form");
                    state.sign_out();
                    dom::alert(LOGIN_REQUIRED);
                    navigate(LOGIN_ROUTE, NavigateOptions::default());
                }
            }
        });
    }

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let submission = match draft.with_untracked(PostDraft::build_submission) {
            Ok(submission) => submission,
            Err(err) => {
                dom::alert(&err.to_string());
                return;
            }
        };
        submitting.set(true);
        let attachment = file.get_untracked();
        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = match state.session.require_token() {
                Ok(token) => state.observe(api::create_post(&token, submission, attachment).await),
                Err(err) => Err(err),
            };
            if let Ok(created) = &result {
                tracing::info!(id = created.id, "post created");
            }
            finish(submission_outcome(result), &navigate);
            submitting.try_set(false);
        });
    };

    view! {
        <section class="write">
            <h1>"Новый пост"</h1>
            <Show when=move || ready.get() fallback=|| view! { <p>"Загрузка профиля..."</p> }>
                <form on:submit=on_submit.clone()>
                    <select
                        prop:value=move || draft.with(|d| d.board_type.as_str())
                        on:change=move |ev| {
                            if let Ok(board) = event_target_value(&ev).parse() {
                                draft.update(|d| d.board_type = board);
                            }
                        }
                    >
                        {board_options()}
                    </select>
                    <input
                        placeholder="Заголовок"
                        prop:value=move || draft.with(|d| d.title.clone())
                        on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                    />
                    <div class="row">
                        <input
                            placeholder="Автор"
                            prop:value=move || draft.with(|d| d.writer.clone())
                            disabled=move || draft.with(|d| d.writer_locked)
                            on:input=move |ev| draft.update(|d| d.writer = event_target_value(&ev))
                        />
                        <button type="button" on:click=move |_| draft.update(PostDraft::toggle_writer_lock)>
                            {move || if draft.with(|d| d.writer_locked) { "Изменить" } else { "Зафиксировать" }}
                        </button>
                    </div>
                    <div class="row">
                        <input
                            placeholder="Почта"
                            prop:value=move || draft.with(|d| d.email.id.clone())
                            disabled=move || draft.with(|d| d.email_locked)
                            on:input=move |ev| draft.update(|d| d.email.id = event_target_value(&ev))
                        />
                        "@"
                        <select
                            prop:value=move || draft.with(|d| domain_value(&d.email.domain))
                            disabled=move || draft.with(|d| d.email_locked)
                            on:change=move |ev| {
                                draft.update(|d| d.email.domain = parse_domain(&event_target_value(&ev)))
                            }
                        >
                            <option value="">"Выберите домен"</option>
                            {domain_options()}
                            <option value=CUSTOM_DOMAIN>"Другой"</option>
                        </select>
                        <Show when=move || draft.with(|d| d.email.domain.is_custom())>
                            <input
                                placeholder="домен"
                                prop:value=move || draft.with(|d| d.email.domain.domain().to_string())
                                disabled=move || draft.with(|d| d.email_locked)
                                on:input=move |ev| {
                                    draft.update(|d| d.email.domain = DomainChoice::Custom(event_target_value(&ev)))
                                }
                            />
                        </Show>
                        <button type="button" on:click=move |_| draft.update(PostDraft::toggle_email_lock)>
                            {move || if draft.with(|d| d.email_locked) { "Изменить" } else { "Зафиксировать" }}
                        </button>
                    </div>
                    <textarea
                        placeholder="Текст"
                        prop:value=move || draft.with(|d| d.content.clone())
                        on:input=move |ev| draft.update(|d| d.content = event_target_value(&ev))
                    ></textarea>
                    <input type="file" on:change=move |ev| file.set(dom::selected_file(&ev)) />
                    <button type="submit" disabled=move || submitting.get()>"Опубликовать"</button>
                </form>
            </Show>
        </section>
    }
}

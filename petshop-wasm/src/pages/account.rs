use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use petshop_core::signup::{
    FindIdRequest, IdCheckState, LoginRequest, PetGender, PetType, ResetPasswordRequest,
    SignupForm, login_failure_message, recovery_message,
};

use crate::api;
use crate::dom;
use crate::pages::finish;
use crate::state::AppState;

const GENDERS: [(PetGender, &str); 3] = [
    (PetGender::Male, "Мальчик"),
    (PetGender::Female, "Девочка"),
    (PetGender::Neutral, "Не указан"),
];

#[component]
pub(crate) fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let user_id = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let loading = RwSignal::new(false);

    let on_login = move |ev: SubmitEvent| {
        ev.prevent_default();

        let request = match LoginRequest::new(&user_id.get(), &password.get()) {
            Ok(request) => request,
            Err(message) => {
                dom::alert(message);
                return;
            }
        };

        loading.set(true);
        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::login(&request).await {
                Ok(auth) => match state.session.sign_in(&auth) {
                    Ok(()) => {
                        tracing::info!(user_id = %request.user_id, "signed in");
                        state
                            .nickname
                            .set(auth.user.and_then(|profile| profile.nickname));
                        navigate("/main", Default::default());
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to store token");
                        dom::alert(&err.to_string());
                    }
                },
                Err(err) => {
                    tracing::warn!(error = %err, "login rejected");
                    dom::alert(&login_failure_message(&err));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <main class="page auth">
            <h1>"Вход"</h1>
            <form on:submit=on_login>
                <input
                    placeholder="Логин"
                    on:input=move |ev| user_id.set(event_target_value(&ev))
                />
                <input
                    placeholder="Пароль"
                    type="password"
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || loading.get()>"Войти"</button>
            </form>
            <p>
                <A href="/signup">"Регистрация"</A>
                " · "
                <A href="/find-account">"Забыли логин или пароль?"</A>
            </p>
        </main>
    }
}

fn pet_fields(form: RwSignal<SignupForm>, index: usize) -> impl IntoView {
    let pet = move || form.with(|f| f.pets().get(index).cloned().unwrap_or_default());
    let edit = move |apply: &dyn Fn(&mut petshop_core::signup::PetInput)| {
        form.update(|f| {
            if let Some(pet) = f.pet_mut(index) {
                apply(pet);
            }
        });
    };

    let type_options = move || {
        form.with(|f| f.allowed_pet_types())
            .into_iter()
            .map(|pet_type| {
                let selected = move || pet().pet_type == Some(pet_type);
                view! {
                    <option value=pet_type.as_str() selected=selected>
                        {pet_type.label()}
                    </option>
                }
            })
            .collect_view()
    };

    view! {
        <fieldset class="pet">
            <input
                placeholder="Кличка"
                prop:value=move || pet().name
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(&|p| p.name = value.clone());
                }
            />
            <select on:change=move |ev| {
                let value = event_target_value(&ev);
                edit(&|p| p.pet_type = value.parse().ok());
            }>
                <option value="">"Вид"</option>
                {type_options}
            </select>
            <select on:change=move |ev| {
                let value = event_target_value(&ev);
                edit(&|p| p.gender = value.parse().ok());
            }>
                <option value="">"Пол"</option>
                {GENDERS
                    .into_iter()
                    .map(|(gender, label)| view! { <option value=gender.as_str()>{label}</option> })
                    .collect_view()}
            </select>
            <input
                type="date"
                prop:value=move || pet().birthday
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(&|p| p.birthday = value.clone());
                }
            />
            <input
                placeholder="Порода"
                prop:value=move || pet().breed
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(&|p| p.breed = value.clone());
                }
            />
            <input
                placeholder="Вес"
                prop:value=move || pet().weight
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(&|p| p.weight = value.clone());
                }
            />
            <button
                type="button"
                on:click=move |_| {
                    if !form.try_update(|f| f.remove_pet(index)).unwrap_or(false) {
                        dom::alert("Нужен хотя бы один питомец.");
                    }
                }
            >
                "Удалить"
            </button>
        </fieldset>
    }
}

#[component]
pub(crate) fn SignupPage() -> impl IntoView {
    let navigate = use_navigate();
    let form = RwSignal::new(SignupForm::default());
    let loading = RwSignal::new(false);

    let on_check_id = move |_| {
        let Some(user_id) = form.try_update(SignupForm::begin_id_check).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = api::check_user_id(&user_id).await;
            form.update(|f| f.apply_id_check(result));
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let request = match form.try_update(SignupForm::build_request) {
            Some(Ok(request)) => request,
            Some(Err(errors)) => {
                dom::alert(errors.first().unwrap_or_default());
                return;
            }
            None => return,
        };

        loading.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = api::register(&request).await;
            if let Some(outcome) = form.try_update(|f| f.finish_register(result)) {
                finish(outcome, &navigate);
            }
            loading.set(false);
        });
    };

    let text_input = move |placeholder: &'static str,
                           kind: &'static str,
                           read: fn(&SignupForm) -> String,
                           write: fn(&mut SignupForm, String)| {
        view! {
            <input
                placeholder=placeholder
                type=kind
                prop:value=move || form.with(read)
                on:input=move |ev| form.update(|f| write(f, event_target_value(&ev)))
            />
        }
    };

    let id_check_message = move || {
        form.with(|f| match f.id_check() {
            IdCheckState::NotChecked => None,
            IdCheckState::Checked { ok, message } => {
                let class = if *ok { "hint ok" } else { "hint error" };
                Some(view! { <p class=class>{message.clone()}</p> })
            }
        })
    };

    let interests = move || {
        PetType::ALL
            .into_iter()
            .map(|pet_type| {
                view! {
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.interests().contains(&pet_type))
                            on:change=move |_| form.update(|f| f.toggle_interest(pet_type))
                        />
                        {pet_type.label()}
                    </label>
                }
            })
            .collect_view()
    };

    let pets = move || {
        (0..form.with(|f| f.pets().len()))
            .map(|index| pet_fields(form, index))
            .collect_view()
    };

    view! {
        <main class="page auth">
            <h1>"Регистрация"</h1>
            <form on:submit=on_submit>
                <div class="row">
                    <input
                        placeholder="Логин"
                        prop:value=move || form.with(|f| f.user_id().to_string())
                        on:input=move |ev| form.update(|f| f.set_user_id(event_target_value(&ev)))
                    />
                    <button type="button" on:click=on_check_id>"Проверить"</button>
                </div>
                {id_check_message}
                {text_input("Пароль", "password", |f| f.password.clone(), |f, v| f.password = v)}
                {text_input(
                    "Повторите пароль",
                    "password",
                    |f| f.password_confirm.clone(),
                    |f, v| f.password_confirm = v,
                )}
                {text_input("Ник", "text", |f| f.nickname.clone(), |f, v| f.nickname = v)}
                {text_input("Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                {text_input("Телефон", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
                {text_input(
                    "Адрес доставки",
                    "text",
                    |f| f.default_address.clone(),
                    |f, v| f.default_address = v,
                )}

                <fieldset>
                    <legend>"Интересы"</legend>
                    {interests}
                </fieldset>

                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(SignupForm::has_pet)
                        on:change=move |_| form.update(SignupForm::toggle_has_pet)
                    />
                    "У меня есть питомец"
                </label>
                <Show when=move || form.with(SignupForm::has_pet)>
                    {pets}
                    <button type="button" on:click=move |_| form.update(SignupForm::add_pet)>
                        "Добавить питомца"
                    </button>
                </Show>

                <p class="error">{move || form.with(|f| f.server_message().map(str::to_string))}</p>
                <button type="submit" disabled=move || loading.get()>"Зарегистрироваться"</button>
            </form>
            <A href="/login">"Уже есть аккаунт? Войти"</A>
        </main>
    }
}

#[component]
pub(crate) fn FindAccountPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let reset_user_id = RwSignal::new(String::new());
    let reset_email = RwSignal::new(String::new());
    let result = RwSignal::new(None::<String>);

    let on_find_id = move |ev: SubmitEvent| {
        ev.prevent_default();
        let request = match FindIdRequest::new(&email.get()) {
            Ok(request) => request,
            Err(message) => {
                dom::alert(message);
                return;
            }
        };
        spawn_local(async move {
            let reply = api::find_id(&request).await;
            result.set(Some(recovery_message(reply)));
        });
    };

    let on_reset = move |ev: SubmitEvent| {
        ev.prevent_default();
        let request = match ResetPasswordRequest::new(&reset_user_id.get(), &reset_email.get()) {
            Ok(request) => request,
            Err(message) => {
                dom::alert(message);
                return;
            }
        };
        spawn_local(async move {
            let reply = api::reset_password(&request).await;
            result.set(Some(recovery_message(reply)));
        });
    };

    view! {
        <main class="page auth">
            <h1>"Восстановление аккаунта"</h1>
            <h2>"Найти логин"</h2>
            <form on:submit=on_find_id>
                <input placeholder="Email" on:input=move |ev| email.set(event_target_value(&ev)) />
                <button type="submit">"Найти"</button>
            </form>

            <h2>"Сбросить пароль"</h2>
            <form on:submit=on_reset>
                <input
                    placeholder="Логин"
                    on:input=move |ev| reset_user_id.set(event_target_value(&ev))
                />
                <input
                    placeholder="Email"
                    on:input=move |ev| reset_email.set(event_target_value(&ev))
                />
                <button type="submit">"Сбросить"</button>
            </form>

            <Show when=move || result.with(Option::is_some)>
                <p class="result">{move || result.get().unwrap_or_default()}</p>
            </Show>
            <A href="/login">"Ко входу"</A>
        </main>
    }
}

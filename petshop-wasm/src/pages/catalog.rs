use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};
use petshop_core::cancel::CancelScope;
use petshop_core::catalog::{CartLine, FREE_SHIPPING_THRESHOLD, ProductQuery, format_price};
use petshop_core::detail::SUPPORT_ROUTE;
use petshop_core::models::{EventList, Product, ProductSummary};
use petshop_core::pagination::ListState;
use petshop_core::record::RecordRef;

use crate::api;
use crate::components::pager::Pager;
use crate::dom;
use crate::pages::{id_param, load_list, report};
use crate::state::AppState;

const PRODUCT_PAGE_SIZE: u32 = 12;

const SUB_CATEGORIES: [(&str, &str); 4] = [
    ("food", "Корм"),
    ("snack", "Лакомства"),
    ("toy", "Игрушки"),
    ("supplies", "Товары для ухода"),
];

fn category_links(pet: &'static str) -> impl IntoView {
    SUB_CATEGORIES
        .into_iter()
        .map(move |(sub, label)| {
            view! { <A href=format!("/category/{pet}/{sub}")>{label}</A> }
        })
        .collect_view()
}

#[component]
pub(crate) fn MainPage() -> impl IntoView {
    view! {
        <section class="main">
            <h1>"Всё для собак и кошек"</h1>
            <div class="tiles">
                <div class="tile">
                    <A href="/category/dog">"Собаки"</A>
                    <nav>{category_links("dog")}</nav>
                </div>
                <div class="tile">
                    <A href="/category/cat">"Кошки"</A>
                    <nav>{category_links("cat")}</nav>
                </div>
            </div>
            <p class="promo">
                "Бесплатная доставка от " {format_price(FREE_SHIPPING_THRESHOLD)}
            </p>
            <A href="/events">"Текущие акции"</A>
        </section>
    }
}

/// Товары категории `/category/:pet[/:sub]` постранично.
#[component]
pub(crate) fn CategoryPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let params = use_params_map();

    let list = RwSignal::new(ListState::<ProductSummary>::new(PRODUCT_PAGE_SIZE));
    let scope = CancelScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });

    let category = Memo::new(move |_| {
        let params = params.read();
        (params.get("pet").unwrap_or_default(), params.get("sub"))
    });

    let reload = move || {
        let (pet, sub) = category.get_untracked();
        let fetch = move |page, _per_page| {
            let query = ProductQuery {
                page,
                ..ProductQuery::new(pet.clone(), sub.clone())
            };
            async move { api::list_products(&query).await }
        };
        load_list(list, scope.clone(), fetch, navigate.clone());
    };

    Effect::new({
        let reload = reload.clone();
        move |_| {
            category.track();
            list.set(ListState::new(PRODUCT_PAGE_SIZE));
            reload();
        }
    });

    let on_select = move |page: u32| {
        if list.try_update(|list| list.set_page(page)).unwrap_or(false) {
            reload();
        }
    };

    let cart = state.cart;
    let cards = move || {
        list.with(|list| {
            list.items()
                .iter()
                .cloned()
                .map(|product| {
                    let line = CartLine::from(&product);
                    view! {
                        <div class="product-card">
                            {product.img_url.clone().map(|src| view! { <img src=src alt="" /> })}
                            <A href=format!("/product/{}", product.id)>{product.name.clone()}</A>
                            <p class="price">{format_price(product.price)}</p>
                            <button on:click=move |_| {
                                cart.update(|cart| cart.add(line.clone()));
                                dom::alert("Товар добавлен в корзину.");
                            }>"В корзину"</button>
                        </div>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="category">
            <h1>{move || {
                let (pet, sub) = category.get();
                match sub {
                    Some(sub) => format!("{pet} / {sub}"),
                    None => pet,
                }
            }}</h1>
            <Show when=move || list.with(|l| l.error().is_some())>
                <div class="error-banner">{move || list.with(|l| l.error().map(str::to_string))}</div>
            </Show>
            <div class="grid">{cards}</div>
            <Pager window=Signal::derive(move || list.with(ListState::window)) on_select=on_select />
        </section>
    }
}

#[component]
pub(crate) fn ProductPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let id = id_param("id");
    let product = RwSignal::new(None::<Product>);
    let quantity = RwSignal::new(1_u32);

    Effect::new(move |_| {
        let Some(id) = id.get() else {
            return;
        };
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::get_product(id).await {
                Ok(loaded) => {
                    product.try_set(Some(loaded));
                }
                Err(err) => report(&err, &navigate),
            }
        });
    });

    let cart = state.cart;
    let on_add = move |_| {
        let Some(item) = product.get_untracked() else {
            return;
        };
        let line = CartLine {
            quantity: quantity.get_untracked().max(1),
            ..CartLine::from(&item)
        };
        cart.update(|cart| cart.add(line));
        dom::alert("Товар добавлен в корзину.");
    };

    view! {
        <section class="product">
            <Show when=move || product.with(Option::is_some) fallback=|| view! { <p>"Загрузка..."</p> }>
                {move || {
                    product.get().map(|item| {
                        view! {
                            <article>
                                {item.img_url.clone().map(|src| view! { <img src=src alt="" /> })}
                                <h1>{item.name.clone()}</h1>
                                <p class="price">{format_price(item.price)}</p>
                                <p>{item.description.clone()}</p>
                            </article>
                        }
                    })
                }}
                <input
                    type="number"
                    min="1"
                    prop:value=move || quantity.get().to_string()
                    on:input=move |ev| {
                        quantity.set(event_target_value(&ev).parse().unwrap_or(1));
                    }
                />
                <button on:click=on_add>"В корзину"</button>
            </Show>
        </section>
    }
}

#[component]
pub(crate) fn CartPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let cart = state.cart;
    let last_order = state.last_order;

    let rows = move || {
        cart.with(|cart| {
            cart.lines()
                .iter()
                .map(|line| {
                    let product_id = line.product_id;
                    view! {
                        <tr>
                            <td>{line.name.clone()}</td>
                            <td>{format_price(line.price)}</td>
                            <td>
                                <input
                                    type="number"
                                    min="0"
                                    prop:value=line.quantity.to_string()
                                    on:change=move |ev| {
                                        let quantity = event_target_value(&ev).parse().unwrap_or(0);
                                        cart.update(|cart| cart.set_quantity(product_id, quantity));
                                    }
                                />
                            </td>
                            <td>{format_price(line.total())}</td>
                            <td>
                                <button on:click=move |_| cart.update(|cart| cart.remove(product_id))>
                                    "✕"
                                </button>
                            </td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    let on_order = move |_| {
        if cart.with_untracked(|cart| cart.is_empty()) {
            dom::alert("Корзина пуста.");
            return;
        }
        let order = cart.get_untracked();
        last_order.set(Some(order));
        cart.update(|cart| cart.clear());
        navigate("/order-complete", Default::default());
    };

    view! {
        <section class="cart">
            <h1>"Корзина"</h1>
            <Show
                when=move || !cart.with(|cart| cart.is_empty())
                fallback=|| view! { <p>"В корзине пока ничего нет."</p> }
            >
                <table>
                    <tbody>{rows}</tbody>
                </table>
                <dl class="totals">
                    <dt>"Товары"</dt>
                    <dd>{move || format_price(cart.with(|c| c.subtotal()))}</dd>
                    <dt>"Доставка"</dt>
                    <dd>{move || format_price(cart.with(|c| c.shipping()))}</dd>
                    <dt>"Итого"</dt>
                    <dd>{move || format_price(cart.with(|c| c.total()))}</dd>
                </dl>
                <Show when=move || cart.with(|c| c.until_free_shipping() > 0)>
                    <p class="hint">
                        "До бесплатной доставки: "
                        {move || format_price(cart.with(|c| c.until_free_shipping()))}
                    </p>
                </Show>
                <button on:click=on_order.clone()>"Оформить заказ"</button>
            </Show>
        </section>
    }
}

#[component]
pub(crate) fn OrderCompletePage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let last_order = state.last_order;

    view! {
        <section class="order-complete">
            <h1>"Заказ оформлен"</h1>
            {move || {
                last_order.with(|order| {
                    order.as_ref().map(|order| {
                        let lines = order
                            .lines()
                            .iter()
                            .map(|line| view! { <li>{line.name.clone()} " × " {line.quantity}</li> })
                            .collect_view();
                        view! {
                            <ul>{lines}</ul>
                            <p>"К оплате: " {format_price(order.total())}</p>
                        }
                    })
                })
            }}
            <A href="/main">"Продолжить покупки"</A>
        </section>
    }
}

#[component]
pub(crate) fn SupportPage() -> impl IntoView {
    view! {
        <section class="support">
            <h1>"Служба поддержки"</h1>
            <p>"Ответы на частые вопросы подскажет ассистент в углу экрана."</p>
            <p>"Если вопрос остался, задайте его на доске в разделе Q&A."</p>
            <A href="/write">"Задать вопрос"</A>
            " · "
            <A href="/noticeboard">"Доска объявлений"</A>
        </section>
    }
}

/// Список событий. Администратор видит ссылку на создание.
#[component]
pub(crate) fn EventsPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let events = RwSignal::new(None::<EventList>);

    spawn_local({
        let state = state.clone();
        async move {
            let access = state.token();
            let result = api::list_events(access.as_deref()).await;
            let result = if access.is_some() { state.observe(result) } else { result };
            match result {
                Ok(list) => {
                    events.try_set(Some(list));
                }
                Err(err) => {
                    events.try_set(Some(EventList {
                        items: Vec::new(),
                        is_admin: false,
                    }));
                    report(&err, &navigate);
                }
            }
        }
    });

    let items = move || {
        events.with(|events| {
            events
                .iter()
                .flat_map(|list| list.items.iter())
                .map(|event| {
                    view! {
                        <li>
                            <A href=RecordRef::event(event.id).detail_route()>{event.title.clone()}</A>
                            <span class="meta">{event.date.clone()}</span>
                        </li>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="events">
            <h1>"События и акции"</h1>
            <Show when=move || events.with(|e| e.as_ref().is_some_and(|e| e.is_admin))>
                <A href="/write">"Добавить событие"</A>
            </Show>
            <Show when=move || events.with(Option::is_some) fallback=|| view! { <p>"Загрузка..."</p> }>
                <ul>{items}</ul>
            </Show>
            <A href=SUPPORT_ROUTE>"Вопросы по акциям"</A>
        </section>
    }
}

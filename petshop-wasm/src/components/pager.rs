use leptos::prelude::*;
use petshop_core::pagination::{PageWindow, PagerControl};

fn label(control: PagerControl) -> String {
    match control {
        PagerControl::First => "«".to_string(),
        PagerControl::Prev => "‹".to_string(),
        PagerControl::Number(n) => n.to_string(),
        PagerControl::Next => "›".to_string(),
        PagerControl::Last => "»".to_string(),
    }
}

/// Кнопки ровно из окна сервера.
#[component]
pub(crate) fn Pager<F>(#[prop(into)] window: Signal<PageWindow>, on_select: F) -> impl IntoView
where
    F: Fn(u32) + Clone + 'static,
{
    let controls = move || {
        let window = window.get();
        window
            .controls()
            .into_iter()
            .map(|control| {
                let on_select = on_select.clone();
                let target = window.target(control);
                let active = matches!(control, PagerControl::Number(n) if window.is_active(n));
                view! {
                    <button
                        class:active=active
                        disabled=window.is_disabled(control)
                        on:click=move |_| on_select(target)
                    >
                        {label(control)}
                    </button>
                }
            })
            .collect_view()
    };

    view! { <div class="pager">{controls}</div> }
}

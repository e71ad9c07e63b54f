use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement};

pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window()
        && window.alert_with_message(message).is_err()
    {
        tracing::warn!(%message, "alert is not available");
    }
}

pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Первый выбранный файл из `<input type="file">`.
pub(crate) fn selected_file(ev: &web_sys::Event) -> Option<File> {
    let input = ev.target()?.dyn_into::<HtmlInputElement>().ok()?;
    input.files()?.get(0)
}

use petshop_core::session::{StoreError, TOKEN_STORAGE_KEY, TokenStore, parse_token};
use web_sys::Storage;

fn local_storage() -> Result<Storage, StoreError> {
    let window =
        web_sys::window().ok_or_else(|| StoreError::Unavailable("window is not available".to_string()))?;
    window
        .local_storage()
        .map_err(|_| StoreError::Unavailable("failed to access localStorage".to_string()))?
        .ok_or_else(|| StoreError::Unavailable("localStorage is not available".to_string()))
}

/// Токен в `localStorage` под ключом `accessToken`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn load(&self) -> Option<String> {
        let storage = local_storage().ok()?;
        let raw = storage.get_item(TOKEN_STORAGE_KEY).ok()??;
        parse_token(&raw)
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        local_storage()?
            .set_item(TOKEN_STORAGE_KEY, token)
            .map_err(|_| StoreError::Write("failed to save token".to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        local_storage()?
            .remove_item(TOKEN_STORAGE_KEY)
            .map_err(|_| StoreError::Write("failed to clear token".to_string()))
    }
}

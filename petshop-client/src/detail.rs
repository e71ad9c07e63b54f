use petshop_core::cancel::CancelToken;
use petshop_core::detail::{ActionOutcome, DetailState, EditState, LoadOutcome};

use crate::ShopClient;
use crate::api::StorefrontApi;
use crate::cancel::until_cancelled;

impl<A: StorefrontApi> ShopClient<A> {
    /// Загружает запись для страницы деталей. Токен прикладывается, если есть.
    pub async fn load_record(&self, state: &mut DetailState, token: CancelToken) -> LoadOutcome {
        let record = state.record();
        let access = self.session.token();
        let call = self.api.get_record(access.as_deref(), record);
        let Some(result) = until_cancelled(&token, call).await else {
            return LoadOutcome::Stale;
        };
        let result = if access.is_some() { self.observe(result) } else { result };

        let outcome = state.apply_load(&token, result);
        if let LoadOutcome::Failed { message, .. } = &outcome {
            tracing::warn!(record = %record.api_path(), %message, "record load failed");
        }
        outcome
    }

    /// Публикует ответ администратора и перечитывает запись.
    pub async fn submit_answer(&self, state: &mut DetailState) -> ActionOutcome {
        let content = match state.begin_answer() {
            Ok(content) => content,
            Err(message) => return ActionOutcome::Failed(message.to_string()),
        };
        let result = match self.require_token() {
            Ok(access) => {
                let result = self.api.post_answer(&access, state.record(), &content).await;
                self.observe(result)
            }
            Err(err) => Err(err),
        };

        let outcome = state.finish_answer(result);
        if let ActionOutcome::Succeeded { refetch: true, .. } = outcome {
            self.load_record(state, CancelToken::new()).await;
        }
        outcome
    }

    /// Удаляет запись. Подтверждение спрашивает вызывающая сторона.
    pub async fn delete_record(&self, state: &DetailState) -> ActionOutcome {
        let result = match self.require_token() {
            Ok(access) => {
                let result = self.api.delete_record(&access, state.record()).await;
                self.observe(result)
            }
            Err(err) => Err(err),
        };
        state.delete_outcome(result)
    }

    /// Заполняет форму редактирования.
    pub async fn load_edit(&self, state: &mut EditState) -> LoadOutcome {
        let access = self.session.token();
        let result = self.api.get_record(access.as_deref(), state.record()).await;
        let result = if access.is_some() { self.observe(result) } else { result };
        state.apply_load(result)
    }

    /// Сохраняет изменения. Пустые поля до сервера не доходят.
    pub async fn save_edit(&self, state: &EditState) -> ActionOutcome {
        let edit = match state.validate() {
            Ok(edit) => edit,
            Err(message) => return ActionOutcome::Failed(message.to_string()),
        };
        let result = match self.require_token() {
            Ok(access) => {
                let result = self.api.update_record(&access, state.record(), &edit).await;
                self.observe(result)
            }
            Err(err) => Err(err),
        };
        state.save_outcome(result)
    }
}

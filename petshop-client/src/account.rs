use petshop_core::detail::ActionOutcome;
use petshop_core::models::Profile;
use petshop_core::session::Session;
use petshop_core::signup::{
    FindIdRequest, LoginRequest, ResetPasswordRequest, SignupForm, login_failure_message,
    recovery_message,
};

use crate::ShopClient;
use crate::api::StorefrontApi;
use crate::error::{ShopClientError, ShopClientResult};

impl<A: StorefrontApi> ShopClient<A> {
    /// Вход. Токен сохраняется через контекст сессии.
    pub async fn login(&self, user_id: &str, password: &str) -> ShopClientResult<Session> {
        let request = LoginRequest::new(user_id, password)
            .map_err(|message| ShopClientError::InvalidInput(message.to_string()))?;

        let auth = self.api.login(&request).await.map_err(|err| {
            tracing::warn!(user_id = %request.user_id, error = %err, "login failed");
            ShopClientError::InvalidInput(login_failure_message(&err))
        })?;

        self.session.sign_in(&auth)?;
        tracing::info!(user_id = %request.user_id, "signed in");
        self.session
            .session()
            .ok_or_else(|| ShopClientError::InvalidInput("session was not stored".to_string()))
    }

    /// Выход. Память очищается даже если хранилище недоступно.
    pub fn logout(&self) -> ShopClientResult<()> {
        self.session.sign_out()?;
        Ok(())
    }

    /// Профиль текущего пользователя.
    pub async fn profile(&self) -> ShopClientResult<Profile> {
        let access = self.require_token()?;
        let result = self.api.fetch_profile(&access).await;
        let profile = self.observe(result)?;
        self.session.update_profile(&profile);
        Ok(profile)
    }

    /// Регистрация. При ошибке полей запрос не отправляется, а первая
    /// ошибка возвращается как текст alert.
    pub async fn register(&self, form: &mut SignupForm) -> ActionOutcome {
        let request = match form.build_request() {
            Ok(request) => request,
            Err(errors) => {
                return ActionOutcome::Failed(errors.first().unwrap_or_default().to_string());
            }
        };
        let result = self.api.register(&request).await;
        if let Err(err) = &result {
            tracing::warn!(user_id = %request.user_id, error = %err, "register failed");
        }
        form.finish_register(result)
    }

    /// Проверка логина на занятость.
    pub async fn check_user_id(&self, form: &mut SignupForm) {
        let Some(user_id) = form.begin_id_check() else {
            return;
        };
        let result = self.api.check_user_id(&user_id).await;
        form.apply_id_check(result);
    }

    /// Напоминание логина на почту.
    pub async fn find_id(&self, email: &str) -> ShopClientResult<String> {
        let request = FindIdRequest::new(email)
            .map_err(|message| ShopClientError::InvalidInput(message.to_string()))?;
        Ok(recovery_message(self.api.find_id(&request).await))
    }

    /// Сброс пароля.
    pub async fn reset_password(&self, user_id: &str, email: &str) -> ShopClientResult<String> {
        let request = ResetPasswordRequest::new(user_id, email)
            .map_err(|message| ShopClientError::InvalidInput(message.to_string()))?;
        Ok(recovery_message(self.api.reset_password(&request).await))
    }
}

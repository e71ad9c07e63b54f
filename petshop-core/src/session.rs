//! Явный контекст сессии.
//!
//! Единственный источник правды о токене: все защищённые представления
//! получают [`SessionContext`] и подписываются на [`SessionEvent`], вместо того
//! чтобы читать хранилище самостоятельно. Синхронизация между вкладками
//! браузера не поддерживается.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, Profile};

/// Ключ, под которым браузерный клиент хранит токен.
pub const TOKEN_STORAGE_KEY: &str = "accessToken";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Ошибки постоянного хранилища токена.
pub enum StoreError {
    /// Хранилище недоступно (нет `window`, `localStorage`, файла).
    #[error("token storage is unavailable: {0}")]
    Unavailable(String),
    /// Не удалось записать или удалить токен.
    #[error("token storage write failed: {0}")]
    Write(String),
}

/// Постоянное хранилище единственной строки токена.
pub trait TokenStore: Send + Sync {
    /// Читает сохранённый токен; пустая строка считается отсутствием.
    fn load(&self) -> Option<String>;
    /// Сохраняет токен.
    fn save(&self, token: &str) -> Result<(), StoreError>;
    /// Удаляет токен.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Нормализует сырой токен из хранилища.
pub fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[derive(Debug, Default)]
/// Хранилище в памяти процесса.
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Хранилище с заранее положенным токеном.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(parse_token(&token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock() = parse_token(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.token.lock() = None;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Сессия пользователя. Для доступа к защищённым страницам важен только токен.
pub struct Session {
    /// Логин.
    pub user_id: Option<String>,
    /// Ник.
    pub nickname: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Access token.
    pub access_token: String,
}

impl Session {
    fn from_token(token: String) -> Self {
        Self {
            user_id: None,
            nickname: None,
            email: None,
            access_token: token,
        }
    }

    fn apply_profile(&mut self, profile: &Profile) {
        if profile.user_id.is_some() {
            self.user_id.clone_from(&profile.user_id);
        }
        if profile.nickname.is_some() {
            self.nickname.clone_from(&profile.nickname);
        }
        if profile.email.is_some() {
            self.email.clone_from(&profile.email);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Событие, рассылаемое всем подписчикам контекста.
pub enum SessionEvent {
    /// Пользователь вошёл.
    SignedIn,
    /// Пользователь вышел явно.
    SignedOut,
    /// Сервер отверг токен (401).
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Идентификатор подписки.
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(SessionEvent) + Send + Sync>;

struct SessionInner {
    session: RwLock<Option<Session>>,
    store: Box<dyn TokenStore>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
/// Разделяемый контекст сессии. Клоны видят одно и то же состояние.
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}

impl SessionContext {
    /// Создаёт контекст и восстанавливает токен из хранилища.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let session = store.load().map(Session::from_token);
        Self {
            inner: Arc::new(SessionInner {
                session: RwLock::new(session),
                store: Box::new(store),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Контекст без постоянного хранилища.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::default())
    }

    /// Текущий токен.
    pub fn token(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Снимок текущей сессии.
    pub fn session(&self) -> Option<Session> {
        self.inner.session.read().clone()
    }

    /// Есть ли токен.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.read().is_some()
    }

    /// Токен для защищённой операции или [`ApiError::Unauthorized`].
    pub fn require_token(&self) -> ApiResult<String> {
        self.token().ok_or(ApiError::Unauthorized)
    }

    /// Сохраняет токен после входа и оповещает подписчиков.
    pub fn sign_in(&self, auth: &AuthResponse) -> Result<(), StoreError> {
        self.inner.store.save(&auth.access_token)?;

        let mut session = Session::from_token(auth.access_token.clone());
        if let Some(profile) = &auth.user {
            session.apply_profile(profile);
        }
        *self.inner.session.write() = Some(session);

        self.broadcast(SessionEvent::SignedIn);
        Ok(())
    }

    /// Дополняет сессию данными профиля.
    pub fn update_profile(&self, profile: &Profile) {
        if let Some(session) = self.inner.session.write().as_mut() {
            session.apply_profile(profile);
        }
    }

    /// Явный выход. Память очищается даже при ошибке хранилища.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        let stored = self.inner.store.clear();
        let had_session = self.inner.session.write().take().is_some();
        if had_session {
            self.broadcast(SessionEvent::SignedOut);
        }
        stored
    }

    /// Инвалидирует сессию после 401.
    ///
    /// Возвращает `true`, только если сессия была активна, поэтому несколько
    /// одновременных 401 дают ровно одно событие [`SessionEvent::Expired`].
    pub fn expire(&self) -> bool {
        let had_session = self.inner.session.write().take().is_some();
        if !had_session {
            return false;
        }
        if let Err(err) = self.inner.store.clear() {
            tracing::warn!(error = %err, "failed to clear expired token");
        }
        self.broadcast(SessionEvent::Expired);
        true
    }

    /// Подписка на события сессии.
    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Отписка. Возвращает `false` для неизвестного id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn broadcast(&self, event: SessionEvent) {
        // слушатели вызываются вне lock, чтобы они могли сами менять подписки
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(token: &str) -> AuthResponse {
        AuthResponse {
            access_token: token.to_string(),
            user: Some(Profile {
                user_id: Some("neko".to_string()),
                nickname: Some("냥이".to_string()),
                email: Some("neko@gmail.com".to_string()),
            }),
        }
    }

    fn recorder(ctx: &SessionContext) -> Arc<Mutex<Vec<SessionEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        ctx.subscribe(move |event| sink.lock().push(event));
        events
    }

    #[test]
    fn restores_token_from_store() {
        let ctx = SessionContext::new(MemoryTokenStore::with_token("  abc  "));
        assert_eq!(ctx.token().as_deref(), Some("abc"));
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn blank_stored_token_means_signed_out() {
        let ctx = SessionContext::new(MemoryTokenStore::with_token("   "));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.require_token(), Err(ApiError::Unauthorized));
    }

    #[test]
    fn clones_share_state_and_broadcast_sign_in() {
        let ctx = SessionContext::in_memory();
        let other = ctx.clone();
        let events = recorder(&other);

        ctx.sign_in(&auth("t1")).expect("sign_in must succeed");

        assert_eq!(other.token().as_deref(), Some("t1"));
        let session = other.session().expect("session must exist");
        assert_eq!(session.nickname.as_deref(), Some("냥이"));
        assert_eq!(*events.lock(), vec![SessionEvent::SignedIn]);
    }

    #[test]
    fn expire_broadcasts_exactly_once() {
        let ctx = SessionContext::new(MemoryTokenStore::with_token("t"));
        let events = recorder(&ctx);

        assert!(ctx.expire());
        assert!(!ctx.expire());

        assert_eq!(*events.lock(), vec![SessionEvent::Expired]);
        assert!(ctx.token().is_none());
    }

    #[test]
    fn sign_out_without_session_is_silent() {
        let ctx = SessionContext::in_memory();
        let events = recorder(&ctx);
        ctx.sign_out().expect("sign_out must succeed");
        assert!(events.lock().is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let ctx = SessionContext::in_memory();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let id = ctx.subscribe(move |event| sink.lock().push(event));

        assert!(ctx.unsubscribe(id));
        assert!(!ctx.unsubscribe(id));
        ctx.sign_in(&auth("t")).expect("sign_in must succeed");
        assert!(events.lock().is_empty());
    }

    #[test]
    fn update_profile_fills_missing_fields() {
        let ctx = SessionContext::new(MemoryTokenStore::with_token("t"));
        ctx.update_profile(&Profile {
            user_id: None,
            nickname: Some("nick".to_string()),
            email: None,
        });
        let session = ctx.session().expect("session must exist");
        assert_eq!(session.nickname.as_deref(), Some("nick"));
        assert!(session.email.is_none());
    }
}

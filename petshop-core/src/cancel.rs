//! Структурная отмена запросов.
//!
//! Каждый запрос представления получает [`CancelToken`]. Ответ, чей токен уже
//! отменён, отбрасывается без изменения состояния. [`CancelScope`] хранит токен
//! текущего запроса одной «заботы» (список, подсказки чата и т.п.): новый запрос
//! отменяет предыдущий, а удаление последнего клона scope отменяет текущий.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    wakers: Mutex<Vec<Waker>>,
}

#[derive(Debug, Clone, Default)]
/// Токен отмены одного запроса. Клоны разделяют состояние.
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl CancelToken {
    /// Новый неотменённый токен.
    pub fn new() -> Self {
        Self::default()
    }

    /// Отменяет токен и будит всех, кто ждёт [`CancelToken::cancelled`].
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let wakers = std::mem::take(&mut *self.inner.wakers.lock());
        for waker in wakers {
            waker.wake();
        }
    }

    /// Был ли токен отменён.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Future, который завершается при отмене токена.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled { token: self }
    }
}

/// Future из [`CancelToken::cancelled`].
#[derive(Debug)]
pub struct Cancelled<'a> {
    token: &'a CancelToken,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.token.is_cancelled() {
            return Poll::Ready(());
        }

        let mut wakers = self.token.inner.wakers.lock();
        // cancel() мог проскочить между проверкой и захватом lock
        if self.token.is_cancelled() {
            return Poll::Ready(());
        }
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

#[derive(Debug, Default)]
struct ScopeInner {
    current: Mutex<CancelToken>,
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.current.get_mut().cancel();
    }
}

#[derive(Debug, Clone, Default)]
/// Владелец токена текущего запроса одной заботы представления.
pub struct CancelScope {
    inner: Arc<ScopeInner>,
}

impl CancelScope {
    /// Пустой scope с неотменённым токеном.
    pub fn new() -> Self {
        Self::default()
    }

    /// Отменяет текущий токен и выдаёт новый.
    pub fn renew(&self) -> CancelToken {
        let mut current = self.inner.current.lock();
        current.cancel();
        *current = CancelToken::new();
        current.clone()
    }

    /// Токен текущего запроса.
    pub fn current(&self) -> CancelToken {
        self.inner.current.lock().clone()
    }

    /// Отменяет текущий запрос (размонтирование представления).
    pub fn cancel(&self) {
        self.inner.current.lock().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::task::Wake;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn renew_cancels_previous_token() {
        let scope = CancelScope::new();
        let first = scope.renew();
        let second = scope.renew();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn dropping_last_scope_clone_cancels_current() {
        let scope = CancelScope::new();
        let token = scope.renew();
        let clone = scope.clone();
        drop(scope);
        assert!(!token.is_cancelled());
        drop(clone);
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancelled_future_wakes_on_cancel() {
        let token = CancelToken::new();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(counter.clone());
        let mut cx = Context::from_waker(&waker);

        let mut fut = token.cancelled();
        assert!(Pin::new(&mut fut).poll(&mut cx).is_pending());
        // повторный poll не плодит wakers
        assert!(Pin::new(&mut fut).poll(&mut cx).is_pending());

        token.cancel();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert!(Pin::new(&mut fut).poll(&mut cx).is_ready());
    }
}

use std::future::Future;

use petshop_core::cancel::CancelToken;

/// Ждёт `fut`, пока не отменён `token`. При отмене возвращает `None`,
/// а сам `fut` сбрасывается вместе с незавершённым запросом.
pub async fn until_cancelled<F: Future>(token: &CancelToken, fut: F) -> Option<F::Output> {
    if token.is_cancelled() {
        return None;
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        out = fut => Some(out),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let token = CancelToken::new();
        assert_eq!(until_cancelled(&token, async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn cancel_drops_pending_future() {
        let token = CancelToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let out = until_cancelled(&token, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            1
        })
        .await;
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn already_cancelled_returns_immediately() {
        let token = CancelToken::new();
        token.cancel();
        let out = until_cancelled(&token, std::future::pending::<u8>()).await;
        assert_eq!(out, None);
    }
}

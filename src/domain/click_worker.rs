//! Background writer draining the click queue into the ledger.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

/// Runs until the sending side of the channel is dropped.
///
/// Each event is written with a bounded exponential backoff; an event that
/// still fails is dropped with a warning and a metrics increment. Nothing in
/// here can reach back into a redirect response - by the time an event is on
/// the channel, that response has been sent.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<dyn ClickRepository>,
) {
    while let Some(event) = rx.recv().await {
        let code = event.code.clone();
        let new_click = event.into_new_click();

        // 50ms, 100ms, 200ms (jittered), then give up.
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .map(jitter)
            .take(3);
        let result = Retry::spawn(strategy, || {
            let clicks = clicks.clone();
            let new_click = new_click.clone();
            async move { clicks.record(new_click).await }
        })
        .await;

        match result {
            Ok(()) => {
                metrics::counter!("clicks_recorded").increment(1);
            }
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "dropping click event after retries");
                metrics::counter!("clicks_dropped").increment(1);
            }
        }
    }

    tracing::info!("click queue closed, worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::click_event::RequestContext;
    use crate::domain::repositories::MockClickRepository;
    use crate::error::AppError;
    use serde_json::json;

    fn event(code: &str) -> ClickEvent {
        ClickEvent::from_context(code.to_string(), None, &RequestContext::default())
    }

    #[tokio::test]
    async fn test_worker_records_events() {
        let mut mock = MockClickRepository::new();
        mock.expect_record()
            .withf(|c| c.code == "abc123")
            .times(1)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_click_worker(rx, Arc::new(mock)));

        tx.send(event("abc123")).await.unwrap();
        drop(tx);

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_retries_then_succeeds() {
        let mut mock = MockClickRepository::new();
        let mut calls = 0;
        mock.expect_record().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(AppError::internal("transient", json!({})))
            } else {
                Ok(())
            }
        });

        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_click_worker(rx, Arc::new(mock)));

        tx.send(event("retry1")).await.unwrap();
        drop(tx);

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_drops_after_exhausted_retries() {
        let mut mock = MockClickRepository::new();
        // Initial attempt plus three retries.
        mock.expect_record()
            .times(4)
            .returning(|_| Err(AppError::internal("down", json!({}))));

        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_click_worker(rx, Arc::new(mock)));

        tx.send(event("doomed")).await.unwrap();
        drop(tx);

        // Worker exits cleanly even though every write failed.
        handle.await.unwrap();
    }
}

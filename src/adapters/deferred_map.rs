use crate::domain::model::MapPoint;
use crate::domain::ports::MapPresentation;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

async fn wait_until_ready(ready: &mut watch::Receiver<bool>) -> bool {
    loop {
        if *ready.borrow_and_update() {
            return true;
        }
        if ready.changed().await.is_err() {
            return false;
        }
    }
}

/// Holds commands back until the surface has signalled readiness. The bound
/// starts with the first command and is shared by all later ones; once it has
/// expired commands are sent without waiting.
pub struct DeferredMap<M: MapPresentation> {
    inner: M,
    ready: watch::Receiver<bool>,
    bound: Duration,
    deadline: Option<Instant>,
    is_ready: bool,
}

impl<M: MapPresentation> DeferredMap<M> {
    pub fn new(inner: M, ready: watch::Receiver<bool>, bound: Duration) -> Self {
        Self {
            inner,
            ready,
            bound,
            deadline: None,
            is_ready: false,
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    async fn await_ready(&mut self) {
        if self.is_ready {
            return;
        }
        let deadline = *self
            .deadline
            .get_or_insert_with(|| Instant::now() + self.bound);

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            // 已逾時：不再等待，只看目前狀態
            self.is_ready = *self.ready.borrow();
            if !self.is_ready {
                tracing::debug!("Map surface still not ready, sending command without waiting");
            }
            return;
        }

        match tokio::time::timeout(remaining, wait_until_ready(&mut self.ready)).await {
            Ok(true) => self.is_ready = true,
            Ok(false) => {
                tracing::warn!("⚠️ Map surface closed before it was ready, sending command anyway")
            }
            Err(_) => tracing::warn!(
                "⚠️ Map surface not ready after {:?}, sending command anyway",
                self.bound
            ),
        }
    }
}

#[async_trait]
impl<M: MapPresentation> MapPresentation for DeferredMap<M> {
    async fn render(&mut self, points: &[MapPoint]) -> Result<()> {
        self.await_ready().await;
        self.inner.render(points).await
    }

    async fn set_start(&mut self, latitude: f64, longitude: f64) -> Result<()> {
        self.await_ready().await;
        self.inner.set_start(latitude, longitude).await
    }

    async fn clear(&mut self) -> Result<()> {
        self.await_ready().await;
        self.inner.clear().await
    }

    async fn fit_to_view(&mut self) -> Result<()> {
        self.await_ready().await;
        self.inner.fit_to_view().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CountingMap {
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl MapPresentation for CountingMap {
        async fn render(&mut self, _points: &[MapPoint]) -> Result<()> {
            self.calls.lock().unwrap().push("render");
            Ok(())
        }

        async fn set_start(&mut self, _latitude: f64, _longitude: f64) -> Result<()> {
            self.calls.lock().unwrap().push("set_start");
            Ok(())
        }

        async fn clear(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push("clear");
            Ok(())
        }

        async fn fit_to_view(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push("fit_to_view");
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_waits_for_readiness() {
        let (tx, rx) = watch::channel(false);
        let inner = CountingMap::default();
        let mut map = DeferredMap::new(inner.clone(), rx, Duration::from_secs(5));

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            tx.send_replace(true);
        });

        let started = Instant::now();
        map.clear().await.unwrap();
        let waited = started.elapsed();

        assert!(waited >= Duration::from_millis(200));
        assert!(waited < Duration::from_secs(5));
        assert_eq!(*inner.calls.lock().unwrap(), vec!["clear"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_sent_after_bound_when_never_ready() {
        let (_tx, rx) = watch::channel(false);
        let inner = CountingMap::default();
        let mut map = DeferredMap::new(inner.clone(), rx, Duration::from_secs(3));

        let started = Instant::now();
        map.fit_to_view().await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(*inner.calls.lock().unwrap(), vec!["fit_to_view"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bound_is_spent_once_per_surface() {
        let (tx, rx) = watch::channel(false);
        let inner = CountingMap::default();
        let mut map = DeferredMap::new(inner.clone(), rx, Duration::from_secs(3));

        let started = Instant::now();
        map.clear().await.unwrap();
        map.set_start(-5.7, -35.1).await.unwrap();
        map.render(&[]).await.unwrap();
        map.fit_to_view().await.unwrap();

        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(3));
        assert!(waited < Duration::from_secs(4));
        assert_eq!(
            *inner.calls.lock().unwrap(),
            vec!["clear", "set_start", "render", "fit_to_view"]
        );

        // 逾時後才就緒也會被記住
        tx.send_replace(true);
        map.clear().await.unwrap();
        assert!(map.is_ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_commands_share_remaining_bound() {
        let (tx, rx) = watch::channel(false);
        let inner = CountingMap::default();
        let mut map = DeferredMap::new(inner.clone(), rx, Duration::from_secs(3));

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            tx.send_replace(true);
        });

        let started = Instant::now();
        map.clear().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        map.render(&[]).await.unwrap();

        // 3 秒上限 + 中間的 1 秒，第二個指令不再等待
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!map.is_ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_surface_is_not_delayed() {
        let (tx, rx) = watch::channel(false);
        tx.send_replace(true);
        let inner = CountingMap::default();
        let mut map = DeferredMap::new(inner.clone(), rx, Duration::from_secs(3));

        let started = Instant::now();
        map.set_start(-5.7, -35.1).await.unwrap();
        map.render(&[]).await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(1));
        assert_eq!(*inner.calls.lock().unwrap(), vec!["set_start", "render"]);
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_block() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let inner = CountingMap::default();
        let mut map = DeferredMap::new(inner.clone(), rx, Duration::from_secs(30));

        map.clear().await.unwrap();
        assert_eq!(*inner.calls.lock().unwrap(), vec!["clear"]);
    }
}

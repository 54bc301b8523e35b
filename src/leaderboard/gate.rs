//! Render rate limiting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Proof that a render slot was acquired. Dropping it frees the slot.
pub struct RenderPermit {
    _guard: Box<dyn Send>,
}

impl RenderPermit {
    pub fn new(guard: impl Send + 'static) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

/// Mutual exclusion for leaderboard renders.
///
/// `acquire` either yields a permit or gives up after the gate's patience
/// window, in which case the requested render is suppressed.
#[async_trait]
pub trait RenderGate: Send + Sync {
    async fn acquire(&self) -> Option<RenderPermit>;
}

/// One render at a time for the whole process, every chat included.
pub struct ProcessGate {
    lock: Arc<Mutex<()>>,
    patience: Duration,
}

impl ProcessGate {
    pub fn new() -> Self {
        Self::with_patience(Duration::from_millis(50))
    }

    pub fn with_patience(patience: Duration) -> Self {
        Self {
            lock: Arc::new(Mutex::new(())),
            patience,
        }
    }
}

impl Default for ProcessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenderGate for ProcessGate {
    async fn acquire(&self) -> Option<RenderPermit> {
        match timeout(self.patience, Arc::clone(&self.lock).lock_owned()).await {
            Ok(guard) => Some(RenderPermit::new(guard)),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_acquire_waits_for_drop() {
        let gate = ProcessGate::new();

        let permit = gate.acquire().await;
        assert!(permit.is_some());
        assert!(gate.acquire().await.is_none());

        drop(permit);
        assert!(gate.acquire().await.is_some());
    }
}

//! Per-process record of installed translation pairs.

use crate::language::Language;
use bharata_core::AppResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tokio::sync::watch;

type Pair = (Language, Language);

/// Remembers, for each (source, target) pair, whether its translation model
/// is usable.
///
/// The first caller for a pair spawns the install as its own task; every
/// caller, including the first, then waits on that task's result. A caller
/// that gives up early (a request timeout) leaves the install running, and
/// later callers wait on the same attempt. The result, success or failure,
/// is kept for the life of the cache.
#[derive(Debug, Default)]
pub struct PairCache {
    pairs: Mutex<HashMap<Pair, watch::Receiver<Option<bool>>>>,
}

impl PairCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the pair is installed, running `install` at most once.
    ///
    /// Returns whether the pair is usable. Identity pairs need no install.
    /// Must be called from within a tokio runtime.
    pub async fn ensure<F, Fut>(&self, source: Language, target: Language, install: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        if source == target {
            return true;
        }

        let mut receiver = self.receiver(source, target, install);
        let ready = match receiver.wait_for(Option::is_some).await {
            Ok(state) => state.unwrap_or(false),
            // The install task ended without reporting
            Err(_) => false,
        };
        ready
    }

    /// Install result for a pair, if an attempt has finished.
    pub fn status(&self, source: Language, target: Language) -> Option<bool> {
        let pairs = self.pairs.lock().unwrap_or_else(|e| e.into_inner());
        pairs.get(&(source, target)).and_then(|rx| *rx.borrow())
    }

    /// Pairs whose install succeeded, sorted.
    pub fn installed_pairs(&self) -> Vec<Pair> {
        let pairs = self.pairs.lock().unwrap_or_else(|e| e.into_inner());
        let mut installed: Vec<Pair> = pairs
            .iter()
            .filter(|(_, rx)| *rx.borrow() == Some(true))
            .map(|(pair, _)| *pair)
            .collect();
        installed.sort();
        installed
    }

    // The lock is only held to look up or register the pair, never across an await.
    fn receiver<F, Fut>(&self, source: Language, target: Language, install: F) -> watch::Receiver<Option<bool>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        let mut pairs = self.pairs.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(rx) = pairs.get(&(source, target)) {
            return rx.clone();
        }

        let (tx, rx) = watch::channel(None);
        pairs.insert((source, target), rx.clone());

        tracing::info!("Installing translation pair {}->{}", source, target);
        let attempt = install();
        tokio::spawn(async move {
            let usable = match attempt.await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Translation pair {}->{} unavailable: {}", source, target, e);
                    false
                }
            };
            // Receivers live in the map for the life of the cache
            let _ = tx.send(Some(usable));
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bharata_core::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_identity_pair_needs_no_install() {
        let cache = PairCache::new();
        let installed = cache
            .ensure(Language::English, Language::English, || async {
                Err(AppError::Other("must not run".to_string()))
            })
            .await;
        assert!(installed);
        assert!(cache.installed_pairs().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_installs_once() {
        let cache = Arc::new(PairCache::new());
        let installs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = cache.clone();
            let installs = installs.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .ensure(Language::English, Language::Hindi, || async move {
                        installs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(installs.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(Language::English, Language::Hindi), Some(true));
        assert_eq!(
            cache.installed_pairs(),
            vec![(Language::English, Language::Hindi)]
        );
    }

    #[tokio::test]
    async fn test_failed_install_is_remembered() {
        let cache = PairCache::new();
        let attempts = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let attempts = attempts.clone();
            let ok = cache
                .ensure(Language::English, Language::Tamil, || async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Llm("pull failed".to_string()))
                })
                .await;
            assert!(!ok);
        }

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(Language::English, Language::Tamil), Some(false));
        assert_eq!(cache.status(Language::English, Language::French), None);
        assert!(cache.installed_pairs().is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_wait_does_not_restart_install() {
        let cache = PairCache::new();
        let installs = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let installs = installs.clone();
            let waited = tokio::time::timeout(
                Duration::from_millis(10),
                cache.ensure(Language::English, Language::Urdu, || async move {
                    installs.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(150)).await;
                    Ok(())
                }),
            )
            .await;
            assert!(waited.is_err());
        }

        assert_eq!(installs.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(Language::English, Language::Urdu), None);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.status(Language::English, Language::Urdu), Some(true));

        let ready = cache
            .ensure(Language::English, Language::Urdu, || async {
                Err(AppError::Other("must not run".to_string()))
            })
            .await;
        assert!(ready);
        assert_eq!(installs.load(Ordering::SeqCst), 1);
    }
}

//! Vault context manager
//!
//! Owns the live [`VaultContext`] and coordinates rebuilds:
//! - at most one rebuild runs at a time; overlapping requests are rejected
//! - a failed rebuild leaves the previous context in place
//! - readers always see the last successfully built (or loaded) context

use super::models::VaultContext;
use super::notifier::{LogNotifier, Notice, Notifier};
use crate::compactor::ContextCompactor;
use crate::config::{SharedSettings, VaultContextSettings};
use crate::error::Result;
use crate::metrics::{RebuildMetrics, OUTCOME_COMPLETED, OUTCOME_CONFLICT, OUTCOME_FAILED};
use crate::scanner::{NoteSource, VaultScanner};
use crate::storage::ContextStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

/// Status shown when nothing has been built or loaded
pub const NO_CONTEXT_STATUS: &str = "No context built yet";

/// Result of a rebuild request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    Completed { note_count: usize },
    /// Another rebuild was running; nothing was done
    AlreadyInProgress,
    Failed { error: String },
}

/// Holds the rebuilding flag and clears it when dropped
struct RebuildGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RebuildGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RebuildGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Coordinates scanning, compaction and persistence of the vault context
pub struct VaultContextManager {
    scanner: VaultScanner,
    compactor: ContextCompactor,
    store: Arc<dyn ContextStore>,
    notifier: Arc<dyn Notifier>,
    settings: SharedSettings,
    context: RwLock<Option<Arc<VaultContext>>>,
    /// Set while a rebuild runs; starts false
    is_rebuilding: AtomicBool,
    metrics: RebuildMetrics,
}

impl VaultContextManager {
    /// Create a manager that reports notices to the log
    pub fn new(
        source: Arc<dyn NoteSource>,
        store: Arc<dyn ContextStore>,
        settings: SharedSettings,
    ) -> Result<Self> {
        Ok(Self {
            scanner: VaultScanner::new(source),
            compactor: ContextCompactor::new(),
            store,
            notifier: Arc::new(LogNotifier),
            settings,
            context: RwLock::new(None),
            is_rebuilding: AtomicBool::new(false),
            metrics: RebuildMetrics::new()?,
        })
    }

    /// Send notices to `notifier` instead of the log
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Snapshot of the current settings, with the token budget clamped
    pub fn settings(&self) -> VaultContextSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .normalized()
    }

    /// Shared settings handle, for hosts that edit settings in place
    pub fn settings_handle(&self) -> SharedSettings {
        Arc::clone(&self.settings)
    }

    /// Load the persisted context, if any
    pub async fn initialize(&self) {
        let loaded = self.store.load().await;
        match &loaded {
            Some(ctx) => info!("Loaded vault context ({} notes)", ctx.note_count),
            None => debug!("No stored vault context"),
        }
        self.replace_context(loaded.map(Arc::new));
    }

    /// Rescan the vault and rebuild the context.
    ///
    /// Never returns an error: failures are logged, reported through the
    /// notifier and leave the current context untouched.
    pub async fn rebuild(&self) -> RebuildOutcome {
        let _guard = match RebuildGuard::acquire(&self.is_rebuilding) {
            Some(guard) => guard,
            None => {
                self.notifier.notify(Notice::RebuildInProgress);
                self.metrics.record_outcome(OUTCOME_CONFLICT);
                return RebuildOutcome::AlreadyInProgress;
            }
        };

        self.notifier.notify(Notice::RebuildStarted);
        let timer = self.metrics.rebuild_duration.start_timer();
        let settings = self.settings();

        let outcome = match self.build(&settings).await {
            Ok(context) => {
                let context = Arc::new(context);
                let note_count = context.note_count;

                self.replace_context(Some(Arc::clone(&context)));
                self.store.save(&context).await;

                self.metrics.notes.set(note_count as f64);
                self.metrics
                    .compacted_chars
                    .set(context.compacted_context.chars().count() as f64);
                self.metrics.record_outcome(OUTCOME_COMPLETED);
                self.notifier.notify(Notice::RebuildSucceeded { note_count });

                RebuildOutcome::Completed { note_count }
            }
            Err(e) => {
                error!("Failed to rebuild vault context: {}", e);
                self.metrics.record_outcome(OUTCOME_FAILED);
                self.notifier.notify(Notice::RebuildFailed);

                RebuildOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        timer.observe_duration();
        outcome
    }

    async fn build(&self, settings: &VaultContextSettings) -> Result<VaultContext> {
        let scan = self.scanner.scan(settings).await?;
        Ok(self.compactor.compact(&scan, settings.max_context_tokens))
    }

    /// Compacted context for prompt priming; `None` when disabled or not built
    pub fn get_context(&self) -> Option<String> {
        if !self.settings().enabled {
            return None;
        }
        self.current()
            .map(|ctx| ctx.compacted_context.clone())
    }

    /// The full current record, regardless of the enabled flag
    pub fn get_full_context(&self) -> Option<Arc<VaultContext>> {
        self.current()
    }

    /// Drop the current context and the persisted record
    pub async fn clear(&self) {
        self.replace_context(None);
        self.store.clear().await;
        self.metrics.notes.set(0.0);
        self.metrics.compacted_chars.set(0.0);
        info!("Cleared vault context");
    }

    pub fn is_rebuilding(&self) -> bool {
        self.is_rebuilding.load(Ordering::Acquire)
    }

    /// Build status for display, e.g. in a settings panel
    pub fn status_line(&self) -> String {
        self.current()
            .map(|ctx| ctx.status_line())
            .unwrap_or_else(|| NO_CONTEXT_STATUS.to_string())
    }

    pub fn metrics(&self) -> &RebuildMetrics {
        &self.metrics
    }

    fn current(&self) -> Option<Arc<VaultContext>> {
        self.context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_context(&self, context: Option<Arc<VaultContext>>) {
        *self.context.write().unwrap_or_else(PoisonError::into_inner) = context;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::notifier::RecordingNotifier;
    use crate::error::ContextError;
    use crate::scanner::NoteEntry;
    use crate::storage::MemoryContextStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready};

    /// Fixed notes, with optional failure and an optional gate that holds
    /// listing until released
    #[derive(Default)]
    struct TestSource {
        notes: Vec<(String, String, String)>,
        fail: AtomicBool,
        scans: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl TestSource {
        fn new(notes: &[(&str, &str, &str)]) -> Self {
            Self {
                notes: notes
                    .iter()
                    .map(|(p, f, c)| (p.to_string(), f.to_string(), c.to_string()))
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl NoteSource for TestSource {
        async fn list_notes(&self) -> Result<Vec<NoteEntry>> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(ContextError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "vault unavailable",
                )));
            }
            Ok(self
                .notes
                .iter()
                .map(|(p, f, _)| NoteEntry::new(p.clone(), f))
                .collect())
        }

        async fn read_note(&self, path: &str) -> Result<String> {
            self.notes
                .iter()
                .find(|(p, _, _)| p == path)
                .map(|(_, _, c)| c.clone())
                .ok_or_else(|| ContextError::NoteNotFound(path.to_string()))
        }
    }

    fn sample_source() -> TestSource {
        TestSource::new(&[
            ("a.md", "/", "Apollo apollo apollo. #space #space"),
            ("b.md", "/", "More apollo notes."),
            ("Projects/c.md", "Projects", "Project Apollo plan. Project Apollo budget."),
        ])
    }

    fn enabled_settings() -> SharedSettings {
        VaultContextSettings {
            enabled: true,
            ..Default::default()
        }
        .shared()
    }

    struct Fixture {
        manager: VaultContextManager,
        source: Arc<TestSource>,
        store: Arc<MemoryContextStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(source: TestSource, settings: SharedSettings) -> Fixture {
        let source = Arc::new(source);
        let store = Arc::new(MemoryContextStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let manager = VaultContextManager::new(source.clone(), store.clone(), settings)
            .unwrap()
            .with_notifier(notifier.clone());
        Fixture {
            manager,
            source,
            store,
            notifier,
        }
    }

    #[tokio::test]
    async fn test_rebuild_success() {
        let f = fixture(sample_source(), enabled_settings());

        let outcome = f.manager.rebuild().await;
        assert_eq!(outcome, RebuildOutcome::Completed { note_count: 3 });

        let ctx = f.manager.get_full_context().unwrap();
        assert_eq!(ctx.note_count, 3);
        assert!(ctx.topics.contains(&"apollo".to_string()));
        assert_eq!(f.store.save_count(), 1);
        assert!(!f.manager.is_rebuilding());
        assert_eq!(
            f.notifier.notices(),
            vec![
                Notice::RebuildStarted,
                Notice::RebuildSucceeded { note_count: 3 }
            ]
        );
        assert_eq!(f.manager.metrics().outcome_count(OUTCOME_COMPLETED), 1);
    }

    #[tokio::test]
    async fn test_get_context_respects_enabled_flag() {
        let settings = enabled_settings();
        let f = fixture(sample_source(), settings.clone());
        assert_eq!(f.manager.get_context(), None);

        f.manager.rebuild().await;
        let compacted = f.manager.get_context().unwrap();
        assert!(compacted.starts_with("VAULT CONTEXT (3 notes):"));

        settings.write().unwrap().enabled = false;
        assert_eq!(f.manager.get_context(), None);
        assert!(f.manager.get_full_context().is_some());
    }

    #[tokio::test]
    async fn test_failure_preserves_previous_context() {
        let f = fixture(sample_source(), enabled_settings());
        f.manager.rebuild().await;
        let before = f.manager.get_full_context().unwrap();

        f.source.fail.store(true, Ordering::SeqCst);
        let outcome = f.manager.rebuild().await;

        assert!(matches!(outcome, RebuildOutcome::Failed { .. }));
        assert_eq!(f.manager.get_full_context().unwrap(), before);
        assert_eq!(f.store.save_count(), 1);
        assert_eq!(f.notifier.notices().last(), Some(&Notice::RebuildFailed));
        assert!(!f.manager.is_rebuilding());
    }

    #[tokio::test]
    async fn test_flag_released_after_failure() {
        let f = fixture(sample_source(), enabled_settings());
        f.source.fail.store(true, Ordering::SeqCst);
        assert!(matches!(f.manager.rebuild().await, RebuildOutcome::Failed { .. }));
        assert!(f.manager.get_full_context().is_none());

        f.source.fail.store(false, Ordering::SeqCst);
        assert_eq!(
            f.manager.rebuild().await,
            RebuildOutcome::Completed { note_count: 3 }
        );
    }

    #[tokio::test]
    async fn test_overlapping_rebuilds_run_once() {
        let gate = Arc::new(Notify::new());
        let mut source = sample_source();
        source.gate = Some(gate.clone());
        let f = fixture(source, enabled_settings());

        let mut first = tokio_test::task::spawn(f.manager.rebuild());
        assert_pending!(first.poll());
        assert!(f.manager.is_rebuilding());

        let second = f.manager.rebuild().await;
        assert_eq!(second, RebuildOutcome::AlreadyInProgress);
        assert!(f.manager.get_full_context().is_none());

        gate.notify_one();
        let outcome = assert_ready!(first.poll());
        assert_eq!(outcome, RebuildOutcome::Completed { note_count: 3 });

        assert_eq!(f.source.scans.load(Ordering::SeqCst), 1);
        assert_eq!(f.store.save_count(), 1);
        assert!(f.notifier.notices().contains(&Notice::RebuildInProgress));
        assert_eq!(f.manager.metrics().outcome_count(OUTCOME_CONFLICT), 1);
        assert!(!f.manager.is_rebuilding());
    }

    #[tokio::test]
    async fn test_initialize_loads_stored_context() {
        let f = fixture(sample_source(), enabled_settings());
        f.manager.rebuild().await;
        let built = f.manager.get_full_context().unwrap();

        let manager = VaultContextManager::new(f.source.clone(), f.store.clone(), enabled_settings())
            .unwrap();
        assert!(manager.get_full_context().is_none());
        manager.initialize().await;
        assert_eq!(manager.get_full_context().unwrap(), built);
    }

    #[tokio::test]
    async fn test_initialize_ignores_other_version() {
        let f = fixture(sample_source(), enabled_settings());
        f.manager.rebuild().await;
        let mut ctx = (*f.manager.get_full_context().unwrap()).clone();
        ctx.version = 2;

        let store = Arc::new(MemoryContextStore::with_raw_record(
            serde_json::to_string(&ctx).unwrap(),
        ));
        let manager = VaultContextManager::new(f.source.clone(), store, enabled_settings()).unwrap();
        manager.initialize().await;
        assert!(manager.get_full_context().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let f = fixture(sample_source(), enabled_settings());
        f.manager.rebuild().await;
        assert!(f.store.raw_record().is_some());

        f.manager.clear().await;
        assert!(f.manager.get_full_context().is_none());
        assert!(f.store.raw_record().is_none());
        assert_eq!(f.manager.status_line(), NO_CONTEXT_STATUS);
    }

    #[tokio::test]
    async fn test_settings_read_at_rebuild_time() {
        let settings = enabled_settings();
        let f = fixture(sample_source(), settings.clone());

        settings.write().unwrap().max_context_tokens = 10;
        f.manager.rebuild().await;
        assert_eq!(f.manager.get_context().unwrap().chars().count(), 40);

        {
            let mut s = settings.write().unwrap();
            s.max_context_tokens = 2000;
            s.exclude_patterns = vec!["Projects/**".to_string()];
        }
        assert_eq!(
            f.manager.rebuild().await,
            RebuildOutcome::Completed { note_count: 2 }
        );
    }

    #[tokio::test]
    async fn test_zero_budget_uses_default() {
        let settings = VaultContextSettings {
            enabled: true,
            max_context_tokens: 0,
            ..Default::default()
        }
        .shared();
        let f = fixture(sample_source(), settings);
        assert_eq!(f.manager.settings().max_context_tokens, 2000);

        f.manager.rebuild().await;
        assert!(!f.manager.get_context().unwrap().ends_with("..."));
    }
}

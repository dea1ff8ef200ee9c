// Default port adapters for embeddings without a browser environment.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::ports::{Clock, KeyValueStorage, Notifier};

/// Process-local storage scope. A browser embedding substitutes adapters
/// over localStorage/sessionStorage; tests and native hosts use this one.
#[derive(Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("storage mutex poisoned");
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut guard = self.entries.lock().expect("storage mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut guard = self.entries.lock().expect("storage mutex poisoned");
        guard.remove(key);
    }
}

// System clock adapter used outside tests.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Notifier that routes toasts into the log; hosts with a UI substitute
/// their own implementation.
#[derive(Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(kind = "success", "{message}");
    }

    fn error(&self, message: &str) {
        info!(kind = "error", "{message}");
    }

    fn info(&self, message: &str) {
        info!(kind = "info", "{message}");
    }
}

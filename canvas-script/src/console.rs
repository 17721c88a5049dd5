//! The user-facing console: an ordered, observable message log.

use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use canvas_core::{Observers, SubscriptionId};
use serde::{Deserialize, Serialize};

/// How a console line should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Harness lifecycle tracing.
    Debug,
    /// Script output (`print`/`debug`).
    Info,
    /// Successful completion.
    Success,
    /// Recoverable anomaly.
    Warning,
    /// Fault report.
    Error,
}

impl Severity {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One console line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    /// Line text.
    pub text: String,
    /// When the line was appended.
    pub timestamp: SystemTime,
    /// Styling.
    pub severity: Severity,
}

impl ConsoleMessage {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            timestamp: SystemTime::now(),
            severity,
        }
    }
}

/// Change notification from a [`MessageLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogChange {
    /// A message was appended at `index`.
    Appended {
        /// Position in the log.
        index: usize,
        /// The new message.
        message: ConsoleMessage,
    },
    /// The log was emptied.
    Cleared,
}

#[derive(Debug, Default)]
struct LogInner {
    messages: RwLock<Vec<ConsoleMessage>>,
    observers: Observers<LogChange>,
}

/// Shared, insertion-ordered console log.
///
/// Appending and clearing are the only mutations. Observers run
/// synchronously on the appending thread, which for script output is the
/// background worker.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    inner: Arc<LogInner>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn append(&self, message: ConsoleMessage) {
        let index = {
            let mut messages = self
                .inner
                .messages
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            messages.push(message.clone());
            messages.len() - 1
        };
        self.inner
            .observers
            .notify(&LogChange::Appended { index, message });
    }

    /// Append a line with the given severity.
    pub fn push(&self, text: impl Into<String>, severity: Severity) {
        self.append(ConsoleMessage::new(text, severity));
    }

    /// Append a debug line.
    pub fn debug(&self, text: impl Into<String>) {
        self.push(text, Severity::Debug);
    }

    /// Append an info line.
    pub fn info(&self, text: impl Into<String>) {
        self.push(text, Severity::Info);
    }

    /// Append a success line.
    pub fn success(&self, text: impl Into<String>) {
        self.push(text, Severity::Success);
    }

    /// Append a warning line.
    pub fn warning(&self, text: impl Into<String>) {
        self.push(text, Severity::Warning);
    }

    /// Append an error line.
    pub fn error(&self, text: impl Into<String>) {
        self.push(text, Severity::Error);
    }

    /// Remove every message.
    pub fn clear(&self) {
        self.inner
            .messages
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
        self.inner.observers.notify(&LogChange::Cleared);
    }

    /// Copy of the full ordered log.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ConsoleMessage> {
        self.inner
            .messages
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Texts of all messages, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.inner
            .messages
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .messages
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a change observer.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LogChange) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(callback)
    }

    /// Remove a change observer.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }
}

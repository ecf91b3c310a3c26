//! Bounded, time-indexed buffer of recent chat messages.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use super::now_unix_millis;

/// Errors raised when appending to the chat log.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The message body was empty.
    #[error("chat message must not be empty")]
    EmptyText,
    /// The message body exceeded the configured bound.
    #[error("chat message exceeds {max} bytes (got {actual})")]
    TextTooLong {
        /// Configured upper bound in bytes.
        max: usize,
        /// Actual size of the rejected message.
        actual: usize,
    },
}

/// A single retained chat message.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unix-millisecond timestamp assigned at append time.
    pub timestamp_ms: u64,
    /// id of the authoring player.
    pub author_id: i64,
    /// Nick of the authoring player, captured from their session.
    pub author_nick: String,
    /// Message body.
    pub text: String,
}

/// Rolling chat buffer: messages older than the retention window, or beyond
/// the hard count cap, are evicted oldest-first.
pub struct ChatLog {
    messages: Mutex<VecDeque<ChatMessage>>,
    retention: Duration,
    cap: usize,
    max_text_bytes: usize,
}

impl ChatLog {
    /// Create an empty log with the given retention window, count cap, and
    /// per-message size bound.
    pub fn new(retention: Duration, cap: usize, max_text_bytes: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            retention,
            cap,
            max_text_bytes,
        }
    }

    /// Append a message authored by an authenticated session.
    ///
    /// The timestamp is assigned here and never goes backwards, even if the
    /// system clock does, so the buffer stays sorted.
    pub async fn append(
        &self,
        author_id: i64,
        author_nick: String,
        text: String,
    ) -> Result<ChatMessage, ChatError> {
        if text.is_empty() {
            return Err(ChatError::EmptyText);
        }
        if text.len() > self.max_text_bytes {
            return Err(ChatError::TextTooLong {
                max: self.max_text_bytes,
                actual: text.len(),
            });
        }

        let mut messages = self.messages.lock().await;

        let now = now_unix_millis();
        let timestamp_ms = match messages.back() {
            Some(last) => now.max(last.timestamp_ms),
            None => now,
        };

        let message = ChatMessage {
            timestamp_ms,
            author_id,
            author_nick,
            text,
        };
        messages.push_back(message.clone());

        Self::evict(&mut messages, self.retention, self.cap, now);
        Ok(message)
    }

    /// All retained messages strictly newer than `since_ms`, oldest first.
    ///
    /// A `since_ms` older than the retention window is clamped to the window
    /// boundary, so callers asking for ancient history get at most one
    /// window's worth of messages, never an error and never an unbounded
    /// result.
    pub async fn since(&self, since_ms: u64) -> Vec<ChatMessage> {
        let mut messages = self.messages.lock().await;

        let now = now_unix_millis();
        Self::evict(&mut messages, self.retention, self.cap, now);

        let floor = now.saturating_sub(duration_millis(self.retention));
        let cutoff = since_ms.max(floor);

        messages
            .iter()
            .filter(|message| message.timestamp_ms > cutoff)
            .cloned()
            .collect()
    }

    /// Number of retained messages.
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// True when nothing is retained.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop messages outside the retention window, then trim to the count
    /// cap. The buffer is sorted, so eviction only pops from the front.
    fn evict(messages: &mut VecDeque<ChatMessage>, retention: Duration, cap: usize, now: u64) {
        let floor = now.saturating_sub(duration_millis(retention));
        while matches!(messages.front(), Some(front) if front.timestamp_ms < floor) {
            messages.pop_front();
        }
        while messages.len() > cap {
            messages.pop_front();
        }
    }
}

/// Whole milliseconds of a duration, saturating at `u64::MAX`.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

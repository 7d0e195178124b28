//! Bounded, newest-first history of human-readable turn events.

use std::collections::VecDeque;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

pub const DEFAULT_LOG_CAPACITY: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Monotonic per-game sequence number, used by displays to find new entries.
    pub seq: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.timestamp % 86_400;
        write!(
            f,
            "[{:02}:{:02}:{:02}] {}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            self.message
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_seq: u64,
}

impl GameLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    /// Push at the front; the oldest entry falls off the back once full.
    pub fn push(&mut self, message: impl Into<String>) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.entries.push_front(LogEntry {
            seq: self.next_seq,
            timestamp,
            message: message.into(),
        });
        self.next_seq += 1;
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries with a sequence number at or after `seq`, oldest first.
    pub fn since(&self, seq: u64) -> Vec<&LogEntry> {
        self.entries.iter().rev().filter(|e| e.seq >= seq).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries ever pushed, including evicted ones.
    pub fn total_pushed(&self) -> u64 {
        self.next_seq
    }
}

impl Default for GameLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

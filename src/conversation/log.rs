//! Append-only conversation log
//!
//! Entries are ordered by strictly increasing sequence numbers. `reset`
//! clears the log, restarts numbering, and seeds the fixed welcome entry,
//! so the log is never empty.

use super::types::{ConversationEntry, Role};

/// Greeting shown at the start of every conversation
pub const WELCOME_MESSAGE: &str = "Hello! How can I help you today? \
    You can type a message or click the microphone button to speak.";

#[derive(Debug, Clone)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    next_sequence: u64,
}

impl ConversationLog {
    /// Create a log seeded with the welcome entry
    pub fn new() -> Self {
        let mut log = Self {
            entries: Vec::new(),
            next_sequence: 0,
        };
        log.reset();
        log
    }

    /// Append an entry, assigning the next sequence number.
    ///
    /// Returns the created entry so the caller can emit its render event.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> ConversationEntry {
        let entry = ConversationEntry::new(role, text.into(), self.next_sequence);
        self.next_sequence += 1;
        self.entries.push(entry.clone());
        entry
    }

    /// Clear all entries, restart numbering, and seed the welcome entry.
    ///
    /// Returns the welcome entry for event emission.
    pub fn reset(&mut self) -> ConversationEntry {
        self.entries.clear();
        self.next_sequence = 0;
        self.append(Role::Assistant, WELCOME_MESSAGE)
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_contains_only_welcome() {
        let log = ConversationLog::new();
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
        let entry = &log.entries()[0];
        assert_eq!(entry.role, Role::Assistant);
        assert_eq!(entry.text, WELCOME_MESSAGE);
        assert_eq!(entry.sequence, 0);
    }

    #[test]
    fn test_append_assigns_increasing_sequences() {
        let mut log = ConversationLog::new();
        let a = log.append(Role::User, "first");
        let b = log.append(Role::Assistant, "second");
        let c = log.append(Role::ToolOutput, "third");
        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
        assert_eq!(c.sequence, 3);
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_entries_keep_append_order() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "one");
        log.append(Role::Assistant, "two");

        let sequences: Vec<u64> = log.entries().iter().map(|e| e.sequence).collect();
        let mut sorted = sequences.clone();
        sorted.sort_unstable();
        assert_eq!(sequences, sorted);
        assert_eq!(log.last().map(|e| e.text.as_str()), Some("two"));
    }

    #[test]
    fn test_reset_leaves_single_welcome_entry() {
        let mut log = ConversationLog::new();
        for i in 0..10 {
            log.append(Role::User, format!("message {}", i));
        }

        let welcome = log.reset();
        assert_eq!(log.len(), 1);
        assert_eq!(welcome.text, WELCOME_MESSAGE);
        assert_eq!(welcome.role, Role::Assistant);
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "before");
        log.append(Role::Assistant, "reply");

        let welcome = log.reset();
        assert_eq!(welcome.sequence, 0);

        let next = log.append(Role::User, "after");
        assert_eq!(next.sequence, 1);
    }

    #[test]
    fn test_returned_entry_matches_stored_entry() {
        let mut log = ConversationLog::new();
        let returned = log.append(Role::User, "hello");
        assert_eq!(log.last(), Some(&returned));
    }
}

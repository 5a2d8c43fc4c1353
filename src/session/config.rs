//! Session configuration

use std::time::Duration;

use crate::language::Language;

/// Default delay between a primary message and its staggered follow-up
pub const DEFAULT_STAGGER_DELAY: Duration = Duration::from_millis(500);

/// Tunables for a chat session
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Presentation delay between related entries (primary message before
    /// tool output, transcription before reply). Zero disables staggering
    /// and lets flows run without sleeping.
    pub stagger_delay: Duration,

    /// Initial transcription language
    pub language: Language,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stagger_delay: DEFAULT_STAGGER_DELAY,
            language: Language::Auto,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stagger delay
    pub fn with_stagger_delay(mut self, delay: Duration) -> Self {
        self.stagger_delay = delay;
        self
    }

    /// Disable staggering; deferred entries are appended immediately
    pub fn without_stagger(mut self) -> Self {
        self.stagger_delay = Duration::ZERO;
        self
    }

    /// Set the initial transcription language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

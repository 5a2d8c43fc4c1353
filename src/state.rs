//! Interaction state for a conversation session
//!
//! The session is in exactly one of three states at any time:
//! - **Idle**: accepting user input
//! - **Recording**: microphone held, audio being captured
//! - **Processing**: one network operation in flight
//!
//! Input affordances are enabled exactly when the state is idle; anything
//! attempted while recording or processing is dropped, not queued.

/// Session interaction state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// Ready for input
    #[default]
    Idle,
    /// Actively recording audio from the microphone
    Recording,
    /// A network operation is in flight
    Processing,
}

impl InteractionState {
    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, InteractionState::Recording)
    }

    /// Check if a network operation is in flight
    pub fn is_processing(&self) -> bool {
        matches!(self, InteractionState::Processing)
    }

    /// Check if idle
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Check if in an active state (not idle)
    pub fn is_active(&self) -> bool {
        !self.is_idle()
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "Idle"),
            InteractionState::Recording => write!(f, "Recording"),
            InteractionState::Processing => write!(f, "Processing"),
        }
    }
}

/// User-visible status line
///
/// Every interaction outcome maps to one of these. `Display` produces the
/// exact text shown to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusLine {
    /// Ready for input
    #[default]
    Ready,
    /// Chat request in flight
    Processing,
    /// Audio upload in flight
    Transcribing,
    /// Settings save in flight
    SavingSettings,
    /// Microphone live
    Recording,
    /// Recording stopped, upload about to start
    RecordingStopped,
    /// Chat request succeeded
    ResponseReceived,
    /// Audio upload produced a transcription
    TranscriptionComplete,
    /// Settings save acknowledged
    SettingsSaved,
    /// Backend returned no AI response
    ResponseFailed,
    /// Backend returned no transcription
    TranscriptionFailed,
    /// Backend rejected the settings save
    SettingsSaveFailed,
    /// Transport-level failure, with detail
    RequestError(String),
    /// Microphone acquisition failed, with detail
    MicrophoneError(String),
    /// Pending transcription model is not in the model list
    TranscriptionModelMissing,
    /// Pending transcription model cannot transcribe audio
    TranscriptionModelWarning,
}

impl std::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLine::Ready => {
                write!(f, "Type a message or click the microphone to speak")
            }
            StatusLine::Processing => write!(f, "⏳ Processing..."),
            StatusLine::Transcribing => write!(f, "⏳ Transcribing..."),
            StatusLine::SavingSettings => write!(f, "⏳ Saving settings..."),
            StatusLine::Recording => write!(f, "🎙️ Recording..."),
            StatusLine::RecordingStopped => write!(f, "🛑 Stopped recording"),
            StatusLine::ResponseReceived => write!(f, "✅ Response received"),
            StatusLine::TranscriptionComplete => write!(f, "✅ Transcription complete!"),
            StatusLine::SettingsSaved => write!(f, "✅ Settings saved successfully"),
            StatusLine::ResponseFailed => write!(f, "❌ Failed to get response"),
            StatusLine::TranscriptionFailed => write!(f, "❌ Failed to transcribe"),
            StatusLine::SettingsSaveFailed => write!(f, "❌ Failed to save settings"),
            StatusLine::RequestError(detail) => write!(f, "❌ Error: {}", detail),
            StatusLine::MicrophoneError(detail) => {
                write!(f, "❌ Error accessing microphone: {}", detail)
            }
            StatusLine::TranscriptionModelMissing => {
                write!(f, "❌ Error: Transcription model not found")
            }
            StatusLine::TranscriptionModelWarning => {
                write!(f, "⚠️ Warning: Selected transcription model cannot transcribe audio")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        let state = InteractionState::default();
        assert!(state.is_idle());
        assert!(!state.is_active());
    }

    #[test]
    fn test_state_predicates() {
        assert!(InteractionState::Recording.is_recording());
        assert!(InteractionState::Recording.is_active());
        assert!(InteractionState::Processing.is_processing());
        assert!(InteractionState::Processing.is_active());
        assert!(!InteractionState::Idle.is_recording());
        assert!(!InteractionState::Idle.is_processing());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(InteractionState::Idle.to_string(), "Idle");
        assert_eq!(InteractionState::Recording.to_string(), "Recording");
        assert_eq!(InteractionState::Processing.to_string(), "Processing");
    }

    #[test]
    fn test_default_status_is_ready() {
        assert_eq!(StatusLine::default(), StatusLine::Ready);
    }

    #[test]
    fn test_status_display_texts() {
        assert_eq!(
            StatusLine::Ready.to_string(),
            "Type a message or click the microphone to speak"
        );
        assert_eq!(StatusLine::Processing.to_string(), "⏳ Processing...");
        assert_eq!(StatusLine::Recording.to_string(), "🎙️ Recording...");
        assert_eq!(StatusLine::RecordingStopped.to_string(), "🛑 Stopped recording");
        assert_eq!(StatusLine::ResponseReceived.to_string(), "✅ Response received");
        assert_eq!(
            StatusLine::TranscriptionComplete.to_string(),
            "✅ Transcription complete!"
        );
        assert_eq!(
            StatusLine::SettingsSaved.to_string(),
            "✅ Settings saved successfully"
        );
        assert_eq!(StatusLine::ResponseFailed.to_string(), "❌ Failed to get response");
        assert_eq!(
            StatusLine::TranscriptionFailed.to_string(),
            "❌ Failed to transcribe"
        );
    }

    #[test]
    fn test_status_display_with_detail() {
        assert_eq!(
            StatusLine::RequestError("connection refused".to_string()).to_string(),
            "❌ Error: connection refused"
        );
        assert_eq!(
            StatusLine::MicrophoneError("Permission denied".to_string()).to_string(),
            "❌ Error accessing microphone: Permission denied"
        );
        assert_eq!(
            StatusLine::TranscriptionModelWarning.to_string(),
            "⚠️ Warning: Selected transcription model cannot transcribe audio"
        );
    }
}

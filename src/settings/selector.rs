//! Committed vs. pending model selection
//!
//! Dropdown selections only touch the pending settings; the committed
//! settings change when the backend acknowledges a save (or when settings
//! are loaded). Validation is advisory for a transcription model that
//! cannot transcribe and a hard stop for an id missing from the model set.

use super::types::{ModelDescriptor, Settings};

/// Problem with the pending selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionIssue {
    /// Pending transcription model id is not in the model set; save refuses
    UnknownTranscriptionModel,
    /// Pending transcription model cannot transcribe; save needs confirmation
    CannotTranscribe,
}

#[derive(Debug, Clone, Default)]
pub struct ModelSelector {
    models: Vec<ModelDescriptor>,
    committed: Settings,
    pending: Settings,
}

impl ModelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the model set wholesale
    pub fn load_models(&mut self, models: Vec<ModelDescriptor>) {
        self.models = models;
    }

    /// Replace the committed settings wholesale; pending follows
    pub fn load_settings(&mut self, settings: Settings) {
        self.pending = settings.clone();
        self.committed = settings;
    }

    /// Update the pending transcription model (no other side effect)
    pub fn select_transcription_model(&mut self, id: impl Into<String>) {
        self.pending.transcription_model = id.into();
    }

    /// Update the pending response model (no other side effect)
    pub fn select_response_model(&mut self, id: impl Into<String>) {
        self.pending.response_model = id.into();
    }

    /// Check the pending transcription selection against the model set
    pub fn validate(&self) -> Option<SelectionIssue> {
        match self.find(&self.pending.transcription_model) {
            None => Some(SelectionIssue::UnknownTranscriptionModel),
            Some(model) if !model.can_transcribe => Some(SelectionIssue::CannotTranscribe),
            Some(_) => None,
        }
    }

    /// Models eligible for the transcription dropdown
    pub fn transcription_models(&self) -> Vec<&ModelDescriptor> {
        self.models.iter().filter(|m| m.can_transcribe).collect()
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn committed(&self) -> &Settings {
        &self.committed
    }

    pub fn pending(&self) -> &Settings {
        &self.pending
    }

    fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.model == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, can_transcribe: bool) -> ModelDescriptor {
        ModelDescriptor {
            provider: "openai".to_string(),
            model: id.to_string(),
            can_transcribe,
            multimodal: false,
        }
    }

    fn loaded_selector() -> ModelSelector {
        let mut selector = ModelSelector::new();
        selector.load_models(vec![
            model("gpt-4o-transcribe", true),
            model("whisper-1", true),
            model("gpt-4o", false),
        ]);
        selector.load_settings(Settings {
            transcription_model: "gpt-4o-transcribe".to_string(),
            response_model: "gpt-4o".to_string(),
        });
        selector
    }

    #[test]
    fn test_load_models_replaces_wholesale() {
        let mut selector = loaded_selector();
        assert_eq!(selector.models().len(), 3);

        selector.load_models(vec![model("whisper-1", true)]);
        assert_eq!(selector.models().len(), 1);
        assert_eq!(selector.models()[0].model, "whisper-1");
    }

    #[test]
    fn test_load_settings_aligns_pending() {
        let selector = loaded_selector();
        assert_eq!(selector.pending(), selector.committed());
        assert_eq!(selector.committed().transcription_model, "gpt-4o-transcribe");
    }

    #[test]
    fn test_selection_updates_pending_only() {
        let mut selector = loaded_selector();
        selector.select_transcription_model("whisper-1");
        selector.select_response_model("gpt-4o");

        assert_eq!(selector.pending().transcription_model, "whisper-1");
        assert_eq!(selector.committed().transcription_model, "gpt-4o-transcribe");
    }

    #[test]
    fn test_validate_accepts_transcribing_model() {
        let selector = loaded_selector();
        assert_eq!(selector.validate(), None);
    }

    #[test]
    fn test_validate_flags_unknown_model() {
        let mut selector = loaded_selector();
        selector.select_transcription_model("does-not-exist");
        assert_eq!(
            selector.validate(),
            Some(SelectionIssue::UnknownTranscriptionModel)
        );
    }

    #[test]
    fn test_validate_flags_non_transcribing_model() {
        let mut selector = loaded_selector();
        selector.select_transcription_model("gpt-4o");
        assert_eq!(selector.validate(), Some(SelectionIssue::CannotTranscribe));
    }

    #[test]
    fn test_validate_before_any_load_flags_unknown() {
        let selector = ModelSelector::new();
        assert_eq!(
            selector.validate(),
            Some(SelectionIssue::UnknownTranscriptionModel)
        );
    }

    #[test]
    fn test_transcription_models_filtered() {
        let selector = loaded_selector();
        let eligible = selector.transcription_models();
        assert_eq!(eligible.len(), 2);
        assert!(eligible.iter().all(|m| m.can_transcribe));
    }
}

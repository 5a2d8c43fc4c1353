use serde::{Deserialize, Serialize};

/// A model offered by the backend
///
/// Field names match the backend wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub can_transcribe: bool,
    #[serde(default)]
    pub multimodal: bool,
}

impl ModelDescriptor {
    /// Label shown in the model dropdowns
    pub fn display_label(&self) -> String {
        if self.multimodal {
            format!("{} - {} (Multimodal)", self.provider, self.model)
        } else {
            format!("{} - {}", self.provider, self.model)
        }
    }
}

/// Wire shape of the model listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

/// Selected model ids, as stored by the backend
///
/// Serializes to exactly the two fields the save endpoint expects;
/// deserialization ignores whatever else the backend keeps alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub transcription_model: String,
    #[serde(default)]
    pub response_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(provider: &str, model: &str, multimodal: bool) -> ModelDescriptor {
        ModelDescriptor {
            provider: provider.to_string(),
            model: model.to_string(),
            can_transcribe: false,
            multimodal,
        }
    }

    #[test]
    fn test_display_label() {
        let plain = descriptor("openai", "gpt-4o-transcribe", false);
        assert_eq!(plain.display_label(), "openai - gpt-4o-transcribe");

        let multimodal = descriptor("openai", "gpt-4o", true);
        assert_eq!(multimodal.display_label(), "openai - gpt-4o (Multimodal)");
    }

    #[test]
    fn test_settings_tolerate_extra_fields() {
        let json = r#"{
            "transcription_model": "gpt-4o-transcribe",
            "response_model": "gpt-4o",
            "system_prompt": "You are a helpful assistant."
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.transcription_model, "gpt-4o-transcribe");
        assert_eq!(settings.response_model, "gpt-4o");
    }

    #[test]
    fn test_settings_serialize_two_fields_only() {
        let settings = Settings {
            transcription_model: "whisper-1".to_string(),
            response_model: "gpt-4o".to_string(),
        };
        let value = serde_json::to_value(&settings).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["transcription_model"], "whisper-1");
        assert_eq!(object["response_model"], "gpt-4o");
    }

    #[test]
    fn test_model_list_defaults_missing_flags() {
        let json = r#"{"models": [{"provider": "groq", "model": "llama-3.3-70b"}]}"#;
        let list: ModelList = serde_json::from_str(json).unwrap();
        assert_eq!(list.models.len(), 1);
        assert!(!list.models[0].can_transcribe);
        assert!(!list.models[0].multimodal);
    }
}

//! Extraction prompts and per-call parameters

use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in extracting structured information from clinical notes. \
Your goal is to output the requested information strictly as a JSON object. \
Do not include any explanations, apologies, or introductory text outside the JSON structure. \
Only include fields that are explicitly mentioned or clearly implied in the input text.";

pub const DEFAULT_USER_PROMPT: &str = "Analyze the following clinical note and extract the key information into a JSON object. \
Use the following guidelines for categorization:\n\
- 'device': The main equipment (e.g., CPAP, wheelchair). Use 'product' if the request is for 'supplies'.\n\
- 'mask_type': Specific style for respiratory masks (e.g., full face).\n\
- 'type': General characteristic (e.g., lightweight, portable).\n\
- 'features': Integrated parts/capabilities (e.g., elevating leg rests, trapeze bar).\n\
- 'add_ons': Optional enhancements (e.g., humidifier).\n\
- 'accessories': External items needed for use (e.g., mouthpiece, tubing).\n\
- 'components': Individual items listed for a 'product' like supplies (e.g., filters, headgear).\n\
Also identify fields like 'diagnosis', 'qualifier', 'SpO2', 'usage', 'mobility_status', 'compliance_status', 'ordering_provider', etc., as applicable. \
Use lists for multiple items (like features, add_ons, accessories, components, usage).\n\
**Important:** Avoid using descriptive adjectives or qualifiers in the extracted values \
(e.g., use 'exertion' not 'during exertion', 'sleep' not 'during sleep'). Extract only the core noun or concept.";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 250;

/// System and user prompt sent with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Replace either half, keeping the current value for `None`
    pub fn with_overrides(&self, system: Option<String>, user: Option<String>) -> Self {
        Self {
            system: system.unwrap_or_else(|| self.system.clone()),
            user: user.unwrap_or_else(|| self.user.clone()),
        }
    }

    /// User message body: the user prompt followed by the clinical note
    pub fn render_user_content(&self, input_text: &str) -> String {
        format!("{}\n\nInput Text:\n{}", self.user, input_text)
    }
}

impl Default for PromptPair {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT)
    }
}

/// Sampling parameters and model for a single call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub model: String,
}

impl Default for CallParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_content_appends_input_after_prompt() {
        let prompts = PromptPair::new("sys", "Extract things.");
        assert_eq!(
            prompts.render_user_content("Needs a CPAP."),
            "Extract things.\n\nInput Text:\nNeeds a CPAP."
        );
    }

    #[test]
    fn overrides_keep_unset_half() {
        let prompts = PromptPair::default().with_overrides(Some("custom".to_string()), None);
        assert_eq!(prompts.system, "custom");
        assert_eq!(prompts.user, DEFAULT_USER_PROMPT);
    }

    #[test]
    fn default_params() {
        let params = CallParams::default();
        assert_eq!(params.model, "gpt-4o-mini");
        assert_eq!(params.max_tokens, 250);
        assert!((params.temperature - 0.3).abs() < f32::EPSILON);
    }
}

use serde::{Deserialize, Serialize};

/// Whether the generator writes a fresh reply or reworks text the user already wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    #[default]
    Reply,
    #[serde(alias = "improvement")]
    Improve,
}

/// Length budget. Unrecognised values fall back to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LengthTier {
    Short,
    #[default]
    Medium,
    Long,
}

impl From<&str> for LengthTier {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "short" => LengthTier::Short,
            "long" => LengthTier::Long,
            _ => LengthTier::Medium,
        }
    }
}

impl From<String> for LengthTier {
    fn from(raw: String) -> Self {
        LengthTier::from(raw.as_str())
    }
}

/// Everything the compiler needs for one prompt. Optional text fields that are
/// blank are treated the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    pub context: String,
    pub platform: String,
    pub tone: String,
    pub length: LengthTier,
    pub mode: PromptMode,
    /// Writing style saved in the user's settings. Wins over `style_override`.
    pub settings_style: Option<String>,
    pub style_override: Option<String>,
    pub guardian_text: Option<String>,
    /// Auth-provider subject of the requesting user, if signed in.
    pub principal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPrompt {
    pub prompt: String,
    /// Label to record for analytics: preset name, "custom", legacy name or "unknown".
    pub tone_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_tier_parses_known_values() {
        assert_eq!(LengthTier::from("short"), LengthTier::Short);
        assert_eq!(LengthTier::from(" LONG "), LengthTier::Long);
        assert_eq!(LengthTier::from("medium"), LengthTier::Medium);
    }

    #[test]
    fn test_length_tier_unknown_falls_back_to_medium() {
        assert_eq!(LengthTier::from("gigantic"), LengthTier::Medium);
        assert_eq!(LengthTier::from(""), LengthTier::Medium);
    }

    #[test]
    fn test_length_tier_deserializes_leniently() {
        let tier: LengthTier = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(tier, LengthTier::Medium);
        let tier: LengthTier = serde_json::from_str("\"short\"").unwrap();
        assert_eq!(tier, LengthTier::Short);
    }

    #[test]
    fn test_mode_accepts_improvement_alias() {
        let mode: PromptMode = serde_json::from_str("\"improvement\"").unwrap();
        assert_eq!(mode, PromptMode::Improve);
        let mode: PromptMode = serde_json::from_str("\"reply\"").unwrap();
        assert_eq!(mode, PromptMode::Reply);
    }
}

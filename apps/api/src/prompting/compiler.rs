//! Prompt rendering: pure string assembly from a request and a resolved tone.
//!
//! Line order: main instruction, style, guardian, length budget, dash rule,
//! output contract, failure sentinel. Empty lines are dropped.

use crate::prompting::prompts::{
    failure_sentinel, is_twitter, length_clause, output_contract, DASH_RULE,
    DEFAULT_PLATFORM_LABEL, TWITTER_LABEL,
};
use crate::prompting::request::{CompiledPrompt, PromptMode, PromptRequest};
use crate::prompting::tone::{resolve_tone, ResolvedTone, ToneLookup};

/// Resolves the requested tone and renders the prompt.
pub async fn compile(lookup: &dyn ToneLookup, request: &PromptRequest) -> CompiledPrompt {
    let tone = resolve_tone(
        lookup,
        &request.tone,
        request.principal.as_deref(),
        request.mode,
    )
    .await;

    CompiledPrompt {
        prompt: render_prompt(request, &tone),
        tone_type: tone.class.label().to_string(),
    }
}

pub fn render_prompt(request: &PromptRequest, tone: &ResolvedTone) -> String {
    let style = non_blank(request.settings_style.as_deref())
        .or_else(|| non_blank(request.style_override.as_deref()))
        .map(|style| format!("Important: Follow this custom writing style: {style}."))
        .unwrap_or_default();

    let guardian = non_blank(request.guardian_text.as_deref())
        .map(|text| format!("IMPORTANT - Do NOT: {text}."))
        .unwrap_or_default();

    let lines = [
        main_instruction(request, tone),
        style,
        guardian,
        length_clause(request.mode, request.length, &request.platform),
        DASH_RULE.to_string(),
        output_contract(request.mode).to_string(),
        failure_sentinel(request.mode).to_string(),
    ];

    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn main_instruction(request: &PromptRequest, tone: &ResolvedTone) -> String {
    let tone_text = tone.render_text.trim().trim_end_matches('.').trim_end();
    let context = request.context.trim();

    match request.mode {
        PromptMode::Improve => format!(
            "Improve this text to make it more {}: \"{context}\".",
            tone_text.to_lowercase()
        ),
        PromptMode::Reply => format!(
            "{tone_text} to this {} post: \"{context}\".",
            platform_label(&request.platform)
        ),
    }
}

fn platform_label(platform: &str) -> &str {
    let platform = platform.trim();
    if is_twitter(platform) {
        TWITTER_LABEL
    } else if platform.is_empty() {
        DEFAULT_PLATFORM_LABEL
    } else {
        platform
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::errors::AppError;
    use crate::prompting::request::LengthTier;
    use crate::prompting::tone::{ToneClass, ToneDefinition, DEFAULT_REPLY_INSTRUCTION};

    /// Tone table with no rows, as before the tones migration ran.
    struct EmptyTones;

    #[async_trait]
    impl ToneLookup for EmptyTones {
        async fn find_preset(&self, _name: &str) -> Result<Option<ToneDefinition>, AppError> {
            Ok(None)
        }

        async fn find_custom(
            &self,
            _name: &str,
            _principal: &str,
        ) -> Result<Option<ToneDefinition>, AppError> {
            Ok(None)
        }
    }

    fn funny() -> ResolvedTone {
        ResolvedTone {
            render_text: "Write a funny reply".to_string(),
            class: ToneClass::Preset("joke".to_string()),
        }
    }

    fn reply_request(platform: &str) -> PromptRequest {
        PromptRequest {
            context: "Shipped my first Rust crate today".to_string(),
            platform: platform.to_string(),
            tone: "joke".to_string(),
            length: LengthTier::Medium,
            mode: PromptMode::Reply,
            ..Default::default()
        }
    }

    #[test]
    fn test_reply_on_x_renders_twitter_label_and_ceiling() {
        let prompt = render_prompt(&reply_request("x"), &funny());
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(
            lines[0],
            "Write a funny reply to this X (Twitter) post: \"Shipped my first Rust crate today\"."
        );
        assert!(lines.contains(&"Keep each reply under 180 characters."));
        assert!(lines.contains(&DASH_RULE));
        assert!(lines.contains(&output_contract(PromptMode::Reply)));
        assert!(lines.contains(&failure_sentinel(PromptMode::Reply)));
    }

    #[test]
    fn test_minimal_reply_has_exactly_the_fixed_lines() {
        let prompt = render_prompt(&reply_request("x"), &funny());
        assert_eq!(prompt.lines().count(), 5);
    }

    #[test]
    fn test_other_platforms_render_raw_name() {
        let prompt = render_prompt(&reply_request("LinkedIn"), &funny());
        assert!(prompt.starts_with("Write a funny reply to this LinkedIn post:"));
        assert!(prompt.contains("Keep each reply under 300 characters."));
    }

    #[test]
    fn test_blank_platform_renders_social_media() {
        let prompt = render_prompt(&reply_request("  "), &funny());
        assert!(prompt.starts_with("Write a funny reply to this social media post:"));
    }

    #[test]
    fn test_trailing_period_in_tone_text_is_not_doubled() {
        let tone = ResolvedTone {
            render_text: "Write a confident, assertive reply.".to_string(),
            class: ToneClass::Preset("confident".to_string()),
        };
        let prompt = render_prompt(&reply_request("x"), &tone);
        assert!(prompt.starts_with("Write a confident, assertive reply to this X (Twitter) post:"));
    }

    #[test]
    fn test_improve_mode_lowercases_tone_text() {
        let request = PromptRequest {
            context: "we should meet tmrw".to_string(),
            platform: "linkedin".to_string(),
            mode: PromptMode::Improve,
            length: LengthTier::Short,
            ..Default::default()
        };
        let tone = ResolvedTone {
            render_text: "Friendly And Warm".to_string(),
            class: ToneClass::Custom,
        };

        let prompt = render_prompt(&request, &tone);
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(
            lines[0],
            "Improve this text to make it more friendly and warm: \"we should meet tmrw\"."
        );
        assert!(lines[1].starts_with("Keep it concise"));
        assert!(lines.contains(&output_contract(PromptMode::Improve)));
        assert!(lines.contains(&failure_sentinel(PromptMode::Improve)));
        assert!(!prompt.contains("characters"));
    }

    #[test]
    fn test_improve_mode_default_quality() {
        let request = PromptRequest {
            context: "draft".to_string(),
            mode: PromptMode::Improve,
            ..Default::default()
        };
        let tone = ResolvedTone {
            render_text: "polished and professional".to_string(),
            class: ToneClass::Unknown,
        };

        let prompt = render_prompt(&request, &tone);
        assert!(prompt.starts_with(
            "Improve this text to make it more polished and professional: \"draft\"."
        ));
    }

    #[test]
    fn test_settings_style_wins_over_override() {
        let request = PromptRequest {
            settings_style: Some("short and dry".to_string()),
            style_override: Some("bubbly".to_string()),
            ..reply_request("x")
        };

        let prompt = render_prompt(&request, &funny());
        assert!(prompt.contains("Important: Follow this custom writing style: short and dry."));
        assert!(!prompt.contains("bubbly"));
    }

    #[test]
    fn test_override_used_when_settings_style_blank() {
        let request = PromptRequest {
            settings_style: Some("   ".to_string()),
            style_override: Some("bubbly".to_string()),
            ..reply_request("x")
        };

        let prompt = render_prompt(&request, &funny());
        assert_eq!(
            prompt.lines().nth(1),
            Some("Important: Follow this custom writing style: bubbly.")
        );
    }

    #[test]
    fn test_guardian_clause_follows_style() {
        let request = PromptRequest {
            style_override: Some("bubbly".to_string()),
            guardian_text: Some("mention competitors".to_string()),
            ..reply_request("x")
        };

        let prompt = render_prompt(&request, &funny());
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines[2], "IMPORTANT - Do NOT: mention competitors.");
        assert_eq!(lines[3], "Keep each reply under 180 characters.");
    }

    #[test]
    fn test_blank_guardian_is_omitted() {
        let request = PromptRequest {
            guardian_text: Some("".to_string()),
            ..reply_request("x")
        };
        let prompt = render_prompt(&request, &funny());
        assert!(!prompt.contains("Do NOT"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let request = PromptRequest {
            settings_style: Some("casual".to_string()),
            guardian_text: Some("use hashtags".to_string()),
            ..reply_request("twitter")
        };
        let first = render_prompt(&request, &funny());
        for _ in 0..10 {
            assert_eq!(render_prompt(&request, &funny()), first);
        }
    }

    #[test]
    fn test_output_is_trimmed() {
        let prompt = render_prompt(&reply_request("x"), &funny());
        assert_eq!(prompt, prompt.trim());
    }

    #[tokio::test]
    async fn test_compile_labels_legacy_tone_and_uses_default_text() {
        let compiled = compile(&EmptyTones, &reply_request("x")).await;

        assert_eq!(compiled.tone_type, "joke");
        assert!(compiled.prompt.starts_with(&format!(
            "{DEFAULT_REPLY_INSTRUCTION} to this X (Twitter) post:"
        )));
    }

    #[tokio::test]
    async fn test_compile_labels_unknown_tone() {
        let request = PromptRequest {
            tone: "sarcastic".to_string(),
            ..reply_request("x")
        };
        let compiled = compile(&EmptyTones, &request).await;
        assert_eq!(compiled.tone_type, "unknown");
    }
}

//! Tone resolution: maps a requested tone name to the text substituted into the prompt.
//!
//! Precedence is fixed: active preset → requester's active custom tone → legacy
//! preset name → unknown. A preset always wins over a same-named custom tone,
//! including for the custom tone's owner, so users cannot shadow system presets.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::AppError;
use crate::prompting::request::PromptMode;

/// Tone names that predate the tones table. Still accepted so old records and
/// old extension builds keep resolving.
pub const LEGACY_TONES: &[&str] = &["neutral", "joke", "support", "idea", "question", "confident"];

pub const DEFAULT_REPLY_INSTRUCTION: &str = "Write a helpful, balanced reply";
pub const DEFAULT_IMPROVE_QUALITY: &str = "polished and professional";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToneScope {
    Preset,
    /// Owned by exactly one principal (auth-provider subject).
    Custom { owner: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneDefinition {
    pub name: String,
    pub instructions: Option<String>,
    pub description: Option<String>,
    pub scope: ToneScope,
    pub is_active: bool,
}

impl ToneDefinition {
    /// Explicit instructions, else the description, else the mode default.
    pub fn render_text(&self, mode: PromptMode) -> String {
        non_blank(self.instructions.as_deref())
            .or_else(|| non_blank(self.description.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| default_render_text(mode).to_string())
    }
}

pub fn default_render_text(mode: PromptMode) -> &'static str {
    match mode {
        PromptMode::Reply => DEFAULT_REPLY_INSTRUCTION,
        PromptMode::Improve => DEFAULT_IMPROVE_QUALITY,
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Tone storage as seen by the resolver. Carried in `AppState` as `Arc<dyn ToneLookup>`.
#[async_trait]
pub trait ToneLookup: Send + Sync {
    async fn find_preset(&self, name: &str) -> Result<Option<ToneDefinition>, AppError>;

    async fn find_custom(
        &self,
        name: &str,
        principal: &str,
    ) -> Result<Option<ToneDefinition>, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToneClass {
    Preset(String),
    Custom,
    Legacy(String),
    Unknown,
}

impl ToneClass {
    pub fn label(&self) -> &str {
        match self {
            ToneClass::Preset(name) | ToneClass::Legacy(name) => name,
            ToneClass::Custom => "custom",
            ToneClass::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTone {
    pub render_text: String,
    pub class: ToneClass,
}

/// Resolves `name` for an optional principal. Lookup failures are logged and treated
/// as "no match", so the result degrades toward legacy/unknown instead of erroring.
pub async fn resolve_tone(
    lookup: &dyn ToneLookup,
    name: &str,
    principal: Option<&str>,
    mode: PromptMode,
) -> ResolvedTone {
    let name = name.trim().to_lowercase();

    let preset = lookup.find_preset(&name).await.unwrap_or_else(|e| {
        warn!("Preset tone lookup for '{name}' failed: {e}");
        None
    });
    if let Some(tone) = preset.filter(|t| t.is_active && t.scope == ToneScope::Preset) {
        return ResolvedTone {
            render_text: tone.render_text(mode),
            class: ToneClass::Preset(tone.name),
        };
    }

    if let Some(principal) = principal.map(str::trim).filter(|p| !p.is_empty()) {
        let custom = lookup
            .find_custom(&name, principal)
            .await
            .unwrap_or_else(|e| {
                warn!("Custom tone lookup for '{name}' failed: {e}");
                None
            });
        let owned = |t: &ToneDefinition| {
            t.is_active && matches!(&t.scope, ToneScope::Custom { owner } if owner == principal)
        };
        if let Some(tone) = custom.filter(owned) {
            return ResolvedTone {
                render_text: tone.render_text(mode),
                class: ToneClass::Custom,
            };
        }
    }

    let class = if LEGACY_TONES.contains(&name.as_str()) {
        ToneClass::Legacy(name)
    } else {
        ToneClass::Unknown
    };

    ResolvedTone {
        render_text: default_render_text(mode).to_string(),
        class,
    }
}

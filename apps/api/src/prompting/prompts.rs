// Fixed prompt fragments for the reply / improve generator.
// Every rendered prompt ends with DASH_RULE, the output contract and the failure sentinel.

use crate::prompting::request::{LengthTier, PromptMode};

/// Substitution rule for dashes. Included verbatim in every prompt.
pub const DASH_RULE: &str = "Never use em dashes (—) or en dashes (–). \
    Use commas, periods, or semicolons instead. \
    Before returning, scan your output and replace any em or en dash with a comma or period.";

pub const REPLY_OUTPUT_CONTRACT: &str = "Return exactly three distinct reply variations as a single JSON object \
    of the form {\"variations\": [\"reply 1\", \"reply 2\", \"reply 3\"]}. \
    Do not include any text outside the JSON.";

pub const IMPROVE_OUTPUT_CONTRACT: &str = "Return exactly three distinct improved versions as a single JSON object \
    of the form {\"variations\": [\"version 1\", \"version 2\", \"version 3\"]}. \
    Do not include any text outside the JSON.";

pub const REPLY_FAILURE_SENTINEL: &str = "If you cannot generate a valid reply, \
    return {\"variations\": [\"error\",\"error\",\"error\"]}.";

pub const IMPROVE_FAILURE_SENTINEL: &str = "If you cannot improve this text, \
    return {\"variations\": [\"error\",\"error\",\"error\"]}.";

/// Label substituted for X/Twitter platform keys.
pub const TWITTER_LABEL: &str = "X (Twitter)";

/// Label used when the request names no platform.
pub const DEFAULT_PLATFORM_LABEL: &str = "social media";

const IMPROVE_LENGTH: [&str; 3] = [
    "Keep it concise: tighten the wording and cut anything that does not add meaning.",
    "Keep it balanced: stay close to the original length while improving clarity and flow.",
    "Make it expansive: elaborate with more detail, examples, and depth than the original.",
];

/// Character ceilings for short / medium / long replies.
const TWITTER_REPLY_CEILINGS: [u32; 3] = [100, 180, 280];
const DEFAULT_REPLY_CEILINGS: [u32; 3] = [150, 300, 600];

fn tier_index(tier: LengthTier) -> usize {
    match tier {
        LengthTier::Short => 0,
        LengthTier::Medium => 1,
        LengthTier::Long => 2,
    }
}

pub fn is_twitter(platform: &str) -> bool {
    let p = platform.trim();
    p.eq_ignore_ascii_case("x") || p.eq_ignore_ascii_case("twitter")
}

pub fn reply_char_ceiling(tier: LengthTier, twitter: bool) -> u32 {
    let table = if twitter {
        TWITTER_REPLY_CEILINGS
    } else {
        DEFAULT_REPLY_CEILINGS
    };
    table[tier_index(tier)]
}

pub fn length_clause(mode: PromptMode, tier: LengthTier, platform: &str) -> String {
    match mode {
        PromptMode::Improve => IMPROVE_LENGTH[tier_index(tier)].to_string(),
        PromptMode::Reply => format!(
            "Keep each reply under {} characters.",
            reply_char_ceiling(tier, is_twitter(platform))
        ),
    }
}

pub fn output_contract(mode: PromptMode) -> &'static str {
    match mode {
        PromptMode::Reply => REPLY_OUTPUT_CONTRACT,
        PromptMode::Improve => IMPROVE_OUTPUT_CONTRACT,
    }
}

pub fn failure_sentinel(mode: PromptMode) -> &'static str {
    match mode {
        PromptMode::Reply => REPLY_FAILURE_SENTINEL,
        PromptMode::Improve => IMPROVE_FAILURE_SENTINEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitter_detection() {
        assert!(is_twitter("x"));
        assert!(is_twitter("X"));
        assert!(is_twitter(" Twitter "));
        assert!(!is_twitter("linkedin"));
        assert!(!is_twitter("xing"));
    }

    #[test]
    fn test_twitter_ceilings_are_tighter_for_every_tier() {
        for tier in [LengthTier::Short, LengthTier::Medium, LengthTier::Long] {
            assert!(reply_char_ceiling(tier, true) < reply_char_ceiling(tier, false));
        }
    }

    #[test]
    fn test_ceilings_grow_with_tier() {
        for twitter in [true, false] {
            assert!(
                reply_char_ceiling(LengthTier::Short, twitter)
                    < reply_char_ceiling(LengthTier::Medium, twitter)
            );
            assert!(
                reply_char_ceiling(LengthTier::Medium, twitter)
                    < reply_char_ceiling(LengthTier::Long, twitter)
            );
        }
    }

    #[test]
    fn test_reply_length_clause_for_twitter_medium() {
        assert_eq!(
            length_clause(PromptMode::Reply, LengthTier::Medium, "x"),
            "Keep each reply under 180 characters."
        );
        assert_eq!(
            length_clause(PromptMode::Reply, LengthTier::Long, "linkedin"),
            "Keep each reply under 600 characters."
        );
    }

    #[test]
    fn test_improve_length_clause_is_qualitative() {
        assert!(length_clause(PromptMode::Improve, LengthTier::Short, "x").starts_with("Keep it concise"));
        assert!(length_clause(PromptMode::Improve, LengthTier::Medium, "x").starts_with("Keep it balanced"));
        assert!(length_clause(PromptMode::Improve, LengthTier::Long, "x").starts_with("Make it expansive"));
    }

    #[test]
    fn test_contracts_demand_three_variations_json() {
        for mode in [PromptMode::Reply, PromptMode::Improve] {
            assert!(output_contract(mode).contains("exactly three"));
            assert!(output_contract(mode).contains("{\"variations\": ["));
            assert!(failure_sentinel(mode).contains("{\"variations\": [\"error\",\"error\",\"error\"]}"));
        }
    }
}

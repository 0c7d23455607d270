//! Prompt text for the summarisation backends.
//!
//! Every instruction sent to a model lives here so both backends share one
//! source of truth and tests can inspect prompts without a network call.

use crate::config::Level;
use crate::error::SummaryError;

/// System message sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful summarization assistant.";

/// The instruction prefix for a summary level.
pub fn instruction(level: Level) -> &'static str {
    match level {
        Level::Short => "Give a one-sentence TL;DR summary:",
        Level::Medium => "Summarize this in around 150 words:",
        Level::Long => "Summarize this in detail within 500 words:",
    }
}

/// Look up the instruction for a caller-supplied level string.
///
/// Rejects anything outside `short`, `medium`, `long` with
/// [`SummaryError::InvalidLevel`].
pub fn build_prompt(level: &str) -> Result<&'static str, SummaryError> {
    Ok(instruction(level.parse()?))
}

/// User message for a whole-document request: instruction, blank line, text.
pub fn user_message(level: Level, text: &str) -> String {
    format!("{}\n\n{}", instruction(level), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_an_instruction() {
        for level in Level::ALL {
            assert!(!instruction(level).is_empty(), "{level}");
        }
    }

    #[test]
    fn instructions_are_distinct() {
        assert_ne!(instruction(Level::Short), instruction(Level::Medium));
        assert_ne!(instruction(Level::Medium), instruction(Level::Long));
    }

    #[test]
    fn build_prompt_accepts_known_levels() {
        assert_eq!(
            build_prompt("short").unwrap(),
            "Give a one-sentence TL;DR summary:"
        );
        assert!(build_prompt("medium").unwrap().contains("150 words"));
        assert!(build_prompt("long").unwrap().contains("500 words"));
    }

    #[test]
    fn build_prompt_rejects_unknown_level() {
        for bad in ["", "tldr", "extra-long"] {
            assert!(matches!(
                build_prompt(bad),
                Err(SummaryError::InvalidLevel { .. })
            ));
        }
    }

    #[test]
    fn user_message_prefixes_instruction() {
        let msg = user_message(Level::Short, "Deep learning has revolutionized AI.");
        assert_eq!(
            msg,
            "Give a one-sentence TL;DR summary:\n\nDeep learning has revolutionized AI."
        );
    }
}

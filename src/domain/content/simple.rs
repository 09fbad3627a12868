//! Spoken responses and SSML detection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SSML_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^<speak\b[^>]*>(.*?)</speak>$").expect("SSML pattern is a valid regex")
});

/// True when the whole string is a single `<speak>` element.
pub fn is_ssml(text: &str) -> bool {
    SSML_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .is_some_and(|body| !body.as_str().to_ascii_lowercase().contains("</speak"))
}

/// A spoken response with optional display text.
///
/// Exactly one of `text_to_speech` or `ssml` is set by the constructors;
/// SSML is detected from the speech string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_to_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl SimpleResponse {
    pub fn new(speech: impl Into<String>) -> Self {
        let speech = speech.into();
        if is_ssml(&speech) {
            Self {
                ssml: Some(speech),
                ..Default::default()
            }
        } else {
            Self {
                text_to_speech: Some(speech),
                ..Default::default()
            }
        }
    }

    pub fn with_display_text(mut self, display_text: impl Into<String>) -> Self {
        let text = display_text.into();
        self.display_text = if text.is_empty() { None } else { Some(text) };
        self
    }

    /// The speech string, whichever field carries it.
    pub fn speech(&self) -> Option<&str> {
        self.ssml.as_deref().or(self.text_to_speech.as_deref())
    }

    /// True when there is something to say.
    pub fn has_speech(&self) -> bool {
        self.speech().map(|s| !s.trim().is_empty()).unwrap_or(false)
    }

    pub fn is_ssml(&self) -> bool {
        self.ssml.is_some()
    }
}

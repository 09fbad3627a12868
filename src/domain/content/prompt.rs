//! The single argument type accepted by ask and tell.

use super::rich_response::RichResponse;
use super::simple::{is_ssml, SimpleResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Speech; SSML is detected from the string.
    Text(String),
    /// Speech with optional display text.
    Simple(SimpleResponse),
    /// A full rich response.
    Rich(RichResponse),
}

impl Prompt {
    /// True for text or simple prompts without speech and for empty rich
    /// responses.
    pub fn is_empty(&self) -> bool {
        match self {
            Prompt::Text(text) => text.trim().is_empty(),
            Prompt::Simple(simple) => !simple.has_speech(),
            Prompt::Rich(rich) => rich.is_empty(),
        }
    }

    /// True when the prompt's speech is SSML; for rich prompts the first
    /// simple response decides.
    pub fn is_ssml(&self) -> bool {
        match self {
            Prompt::Text(text) => is_ssml(text),
            Prompt::Simple(simple) => simple.is_ssml(),
            Prompt::Rich(rich) => rich.first_simple().map(SimpleResponse::is_ssml).unwrap_or(false),
        }
    }

    /// The prompt as a simple response, unless it is rich.
    pub fn as_simple(&self) -> Option<SimpleResponse> {
        match self {
            Prompt::Text(text) => Some(SimpleResponse::new(text.as_str())),
            Prompt::Simple(simple) => Some(simple.clone()),
            Prompt::Rich(_) => None,
        }
    }

    /// The prompt as a rich response holding its speech.
    pub fn into_rich(self) -> RichResponse {
        match self {
            Prompt::Rich(rich) => rich,
            other => {
                let mut rich = RichResponse::new();
                if let Some(simple) = other.as_simple() {
                    rich.add_simple_response(simple);
                }
                rich
            }
        }
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<SimpleResponse> for Prompt {
    fn from(simple: SimpleResponse) -> Self {
        Prompt::Simple(simple)
    }
}

impl From<RichResponse> for Prompt {
    fn from(rich: RichResponse) -> Self {
        Prompt::Rich(rich)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prompt_detects_ssml() {
        let simple = Prompt::from("<speak>hi</speak>").as_simple().unwrap();
        assert!(simple.is_ssml());
    }

    #[test]
    fn text_prompt_becomes_single_item_rich_response() {
        let rich = Prompt::from("hello").into_rich();
        assert_eq!(rich.items().len(), 1);
        assert!(rich.ensure_leading_speech().is_ok());
    }

    #[test]
    fn emptiness() {
        assert!(Prompt::from("  ").is_empty());
        assert!(Prompt::from(RichResponse::new()).is_empty());
        assert!(!Prompt::from("hi").is_empty());
    }
}

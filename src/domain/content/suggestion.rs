//! Suggestion chips.

use serde::{Deserialize, Serialize};

/// A suggestion chip; selecting it sends its title as the user's query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A chip that opens an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOutSuggestion {
    pub destination_name: String,
    pub url: String,
}

impl LinkOutSuggestion {
    pub fn new(destination_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            destination_name: destination_name.into(),
            url: url.into(),
        }
    }
}

//! Wire-format generation and source format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema generation of the conversation webhook protocol.
///
/// - `V1`: snake_case request fields, integer enums, `assistant.intent.action.*`,
///   `inputValueSpec` wrapper for permission and option intents
/// - `V2`: camelCase request fields, named enums, `actions.intent.*`
///
/// Replies use camelCase keys in both generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiGeneration {
    V1,
    #[default]
    V2,
}

impl ApiGeneration {
    /// Maps a numeric protocol version onto a generation.
    ///
    /// Anything from 2 upwards speaks the v2 schema.
    pub fn from_version_number(version: i64) -> Self {
        if version >= 2 {
            ApiGeneration::V2
        } else {
            ApiGeneration::V1
        }
    }

    /// Returns true for the legacy (v1) schema.
    pub fn is_legacy(&self) -> bool {
        matches!(self, ApiGeneration::V1)
    }

    /// The version number echoed back in the response header.
    pub fn version_number(&self) -> u8 {
        match self {
            ApiGeneration::V1 => 1,
            ApiGeneration::V2 => 2,
        }
    }
}

impl fmt::Display for ApiGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version_number())
    }
}

/// Which wrapper the turn arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// The raw conversation request posted directly by the Assistant.
    ActionsSdk,
    /// The Dialogflow fulfillment wrapper around the raw request.
    Dialogflow,
}

impl SourceFormat {
    /// Returns true if named intent contexts are available for this format.
    pub fn supports_contexts(&self) -> bool {
        matches!(self, SourceFormat::Dialogflow)
    }
}

/// The `{format, generation}` pair resolved once per turn.
///
/// Passed by value into every builder that emits wire payloads so that no
/// downstream code needs to re-inspect headers or body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolContext {
    pub format: SourceFormat,
    pub generation: ApiGeneration,
}

impl ProtocolContext {
    pub fn new(format: SourceFormat, generation: ApiGeneration) -> Self {
        Self { format, generation }
    }

    pub fn is_legacy(&self) -> bool {
        self.generation.is_legacy()
    }
}

impl fmt::Display for ProtocolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.format {
            SourceFormat::ActionsSdk => "actions_sdk",
            SourceFormat::Dialogflow => "dialogflow",
        };
        write!(f, "{}/{}", format, self.generation)
    }
}

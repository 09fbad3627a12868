//! Resolves the protocol context of a turn from headers and body shape.

use serde_json::Value;
use tracing::debug;

use super::names::{ACTIONS_API_VERSION_HEADER, ASSISTANT_API_VERSION_HEADER};
use super::{ApiGeneration, ProtocolContext, SourceFormat};
use crate::domain::request::WireEnvelope;

/// Stateless resolver for `ApiGeneration` and `SourceFormat`.
///
/// Precedence for the generation:
/// 1. `Google-Actions-API-Version` header (integer, `>= 2` is v2)
/// 2. `Google-Assistant-API-Version` header (`v1` is v1, anything else v2)
/// 3. `originalRequest.version` in a Dialogflow body (missing or
///    unparseable is v1)
/// 4. v2
pub struct VersionResolver;

impl VersionResolver {
    /// Resolves both halves of the protocol context.
    pub fn resolve(envelope: &WireEnvelope) -> ProtocolContext {
        let context = ProtocolContext::new(
            Self::resolve_format(envelope.body()),
            Self::resolve_generation(envelope),
        );
        debug!(protocol = %context, "resolved protocol context");
        context
    }

    /// Resolves the schema generation. Never fails.
    pub fn resolve_generation(envelope: &WireEnvelope) -> ApiGeneration {
        if let Some(version) = envelope
            .header(ACTIONS_API_VERSION_HEADER)
            .and_then(|v| v.trim().parse::<i64>().ok())
        {
            return ApiGeneration::from_version_number(version);
        }

        if let Some(legacy) = envelope.header(ASSISTANT_API_VERSION_HEADER) {
            return if legacy.trim() == "v1" {
                ApiGeneration::V1
            } else {
                ApiGeneration::V2
            };
        }

        if let Some(original) = envelope.body().get("originalRequest") {
            return original
                .get("version")
                .and_then(parse_embedded_version)
                .map(ApiGeneration::from_version_number)
                .unwrap_or(ApiGeneration::V1);
        }

        ApiGeneration::V2
    }

    /// A body carrying a Dialogflow `result` or `originalRequest` is the
    /// wrapped format; everything else is a raw conversation request.
    pub fn resolve_format(body: &Value) -> SourceFormat {
        let wrapped = body.get("result").map_or(false, Value::is_object)
            || body.get("originalRequest").map_or(false, Value::is_object);
        if wrapped {
            SourceFormat::Dialogflow
        } else {
            SourceFormat::ActionsSdk
        }
    }
}

fn parse_embedded_version(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

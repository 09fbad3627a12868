//! Wire enums that changed representation between generations.
//!
//! v1 sends these as integers (sometimes stringified), v2 as names. Both are
//! accepted on the way in; the named form is written on the way out.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnum {
    Number(i64),
    Text(String),
}

/// Stage of the conversation reported with each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationType {
    #[default]
    Unspecified,
    New,
    Active,
}

impl ConversationType {
    fn from_number(n: i64) -> Self {
        match n {
            1 => ConversationType::New,
            2 => ConversationType::Active,
            _ => ConversationType::Unspecified,
        }
    }

    fn from_text(s: &str) -> Self {
        match s {
            "NEW" => ConversationType::New,
            "ACTIVE" => ConversationType::Active,
            other => other
                .parse::<i64>()
                .map(Self::from_number)
                .unwrap_or(ConversationType::Unspecified),
        }
    }

    /// The integer form used by v1 payloads.
    pub fn legacy_code(&self) -> u8 {
        match self {
            ConversationType::Unspecified => 0,
            ConversationType::New => 1,
            ConversationType::Active => 2,
        }
    }
}

impl<'de> Deserialize<'de> for ConversationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEnum::deserialize(deserializer)? {
            RawEnum::Number(n) => Self::from_number(n),
            RawEnum::Text(s) => Self::from_text(&s),
        })
    }
}

/// How the user produced the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    #[default]
    Unspecified,
    Touch,
    Voice,
    Keyboard,
}

impl InputType {
    fn from_number(n: i64) -> Self {
        match n {
            1 => InputType::Touch,
            2 => InputType::Voice,
            3 => InputType::Keyboard,
            _ => InputType::Unspecified,
        }
    }

    fn from_text(s: &str) -> Self {
        match s {
            "TOUCH" => InputType::Touch,
            "VOICE" => InputType::Voice,
            "KEYBOARD" => InputType::Keyboard,
            other => other
                .parse::<i64>()
                .map(Self::from_number)
                .unwrap_or(InputType::Unspecified),
        }
    }

    pub fn legacy_code(&self) -> u8 {
        match self {
            InputType::Unspecified => 0,
            InputType::Touch => 1,
            InputType::Voice => 2,
            InputType::Keyboard => 3,
        }
    }
}

impl<'de> Deserialize<'de> for InputType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEnum::deserialize(deserializer)? {
            RawEnum::Number(n) => Self::from_number(n),
            RawEnum::Text(s) => Self::from_text(&s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod conversation_type {
        use super::*;

        #[test]
        fn accepts_v1_integers() {
            let parsed: ConversationType = serde_json::from_value(json!(1)).unwrap();
            assert_eq!(parsed, ConversationType::New);
            let parsed: ConversationType = serde_json::from_value(json!(2)).unwrap();
            assert_eq!(parsed, ConversationType::Active);
        }

        #[test]
        fn accepts_stringified_integers() {
            let parsed: ConversationType = serde_json::from_value(json!("2")).unwrap();
            assert_eq!(parsed, ConversationType::Active);
        }

        #[test]
        fn accepts_v2_names() {
            let parsed: ConversationType = serde_json::from_value(json!("NEW")).unwrap();
            assert_eq!(parsed, ConversationType::New);
        }

        #[test]
        fn unknown_values_are_unspecified() {
            let parsed: ConversationType = serde_json::from_value(json!("SOMETHING")).unwrap();
            assert_eq!(parsed, ConversationType::Unspecified);
            let parsed: ConversationType = serde_json::from_value(json!(9)).unwrap();
            assert_eq!(parsed, ConversationType::Unspecified);
        }

        #[test]
        fn serializes_as_name() {
            assert_eq!(serde_json::to_value(ConversationType::Active).unwrap(), json!("ACTIVE"));
            assert_eq!(ConversationType::Active.legacy_code(), 2);
        }
    }

    mod input_type {
        use super::*;

        #[test]
        fn maps_full_integer_table() {
            let table = [
                (0, InputType::Unspecified),
                (1, InputType::Touch),
                (2, InputType::Voice),
                (3, InputType::Keyboard),
            ];
            for (code, expected) in table {
                let parsed: InputType = serde_json::from_value(json!(code)).unwrap();
                assert_eq!(parsed, expected);
                assert_eq!(expected.legacy_code() as i64, code);
            }
        }

        #[test]
        fn accepts_v2_names() {
            let parsed: InputType = serde_json::from_value(json!("KEYBOARD")).unwrap();
            assert_eq!(parsed, InputType::Keyboard);
        }
    }
}

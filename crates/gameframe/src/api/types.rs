use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Opaque identifier of the player, handed to the game on load.
/// Numeric or string; immutable for the lifetime of one play session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl UserId {
    /// Numeric view of the identifier, if it has one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            UserId::Numeric(n) => Some(*n),
            UserId::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, UserId::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Numeric(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Numeric(n)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId::Text(s)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UserId::Numeric(n) => serializer.serialize_i64(*n),
            UserId::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(UserId::Numeric(n)),
            // GameMaker numbers are doubles; integral ones are still ids.
            Raw::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(UserId::Numeric(f as i64))
            }
            Raw::Float(f) => Ok(UserId::Text(f.to_string())),
            Raw::Text(s) => Ok(UserId::Text(s)),
        }
    }
}

/// One answered question inside a results payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    #[serde(deserialize_with = "lenient::count")]
    pub question_number: u32,
    /// Answer as the game reported it (usually a Likert score).
    #[serde(default)]
    pub value: Value,
}

/// Questionnaire results posted by the game, partial or final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResults {
    pub user_id: UserId,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_partial: bool,
    #[serde(deserialize_with = "lenient::count")]
    pub total_questions: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub answered_questions: u32,
    #[serde(default)]
    pub responses: Vec<QuestionResponse>,
}

impl GameResults {
    pub fn is_final(&self) -> bool {
        !self.is_partial
    }

    /// Fraction of questions answered, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        (self.answered_questions as f64 / self.total_questions as f64).min(1.0)
    }
}

/// Deserializers tolerant of GameMaker's JSON, where every number is a
/// double and booleans are often 0/1.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let n = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match n {
            Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
            _ => Err(D::Error::custom(format!("expected a non-negative integer, got {}", value))),
        }
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.as_f64().map(|n| n != 0.0).unwrap_or(false)),
            Value::String(s) => match s.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(D::Error::custom(format!("expected a boolean, got {:?}", s))),
            },
            _ => Err(D::Error::custom(format!("expected a boolean, got {}", value))),
        }
    }
}

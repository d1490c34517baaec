// file: src/models/spec.rs
// description: structured vehicle specification records and best-effort model output parsing
// reference: internal data structures

use crate::error::Result;
use crate::llm::prompts::NO_SPECS_FOUND;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub engine_type_and_displacement: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub horsepower: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub torque: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fuel_economy: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub acceleration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub top_speed: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notable_features: Option<String>,
}

impl SpecEntry {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of the spec extraction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecExtraction {
    Entries(Vec<SpecEntry>),
    /// The model answered with something that is not a spec array.
    Raw { raw: String },
    /// No spec document had content, so no extraction call was made.
    NotFound,
}

impl SpecExtraction {
    /// Parse a model response; anything that is not spec objects is kept verbatim.
    pub fn parse(response: &str) -> Self {
        let candidate = strip_code_fence(response);

        let entries = match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .map(object_to_entry)
                .collect::<Option<Vec<_>>>(),
            Ok(object @ Value::Object(_)) => {
                object_to_entry(object).filter(|entry| !entry.is_empty()).map(|entry| vec![entry])
            }
            _ => None,
        };

        match entries {
            Some(entries) => Self::Entries(entries),
            None => Self::Raw {
                raw: response.to_string(),
            },
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw { .. })
    }

    pub fn entries(&self) -> &[SpecEntry] {
        match self {
            Self::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// Pretty JSON for the synthesis prompt, or the "no specs" marker.
    pub fn to_prompt_document(&self) -> Result<String> {
        match self {
            Self::NotFound => Ok(NO_SPECS_FOUND.to_string()),
            _ => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Serialize for SpecExtraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Entries(entries) => entries.serialize(serializer),
            Self::Raw { raw } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("raw", raw)?;
                map.end()
            }
            Self::NotFound => serializer.serialize_str(NO_SPECS_FOUND),
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop the info string (e.g. "json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

// serde would also fill a struct from a sequence by position; only objects are specs
fn object_to_entry(value: Value) -> Option<SpecEntry> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(value_to_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other @ Value::Object(_) => Some(other.to_string()),
    }
}

// file: src/search/normalizer.rs
// description: classifies search backend responses and adapts hits into (url, markdown) pairs
// reference: firecrawl v1/v2 search response schemas

use serde_json::{Map, Value};
use thiserror::Error;

const ITEM_URL_KEYS: [&str; 2] = ["url", "sourceURL"];
const METADATA_URL_KEYS: [&str; 5] = ["sourceURL", "url", "source_url", "og_url", "ogUrl"];

/// A search response, classified once by its top-level shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// A bare array of hits.
    List(Vec<Value>),
    /// `{"data": [...]}`
    Data(Vec<Value>),
    /// `{"web": [...]}` or `{"data": {"web": [...]}}`
    Web(Vec<Value>),
    /// Anything else; carries no hits.
    Unrecognized,
}

/// One search hit reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResult {
    pub url: Option<String>,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("search hit is a JSON {kind}, not an object")]
    NotAnObject { kind: &'static str },

    #[error("search hit {} has no markdown content", .url.as_deref().unwrap_or("<no url>"))]
    MissingMarkdown { url: Option<String> },
}

impl SearchResponse {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            Value::Object(mut map) => {
                match map.remove("data") {
                    Some(Value::Array(items)) if !items.is_empty() || !map.contains_key("web") => {
                        return Self::Data(items);
                    }
                    Some(Value::Object(mut data)) => {
                        if let Some(Value::Array(web)) = data.remove("web") {
                            return Self::Web(web);
                        }
                    }
                    _ => {}
                }

                match map.remove("web") {
                    Some(Value::Array(web)) => Self::Web(web),
                    _ => Self::Unrecognized,
                }
            }
            _ => Self::Unrecognized,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Data(_) => "data",
            Self::Web(_) => "web",
            Self::Unrecognized => "unrecognized",
        }
    }

    pub fn items(&self) -> &[Value] {
        match self {
            Self::List(items) | Self::Data(items) | Self::Web(items) => items,
            Self::Unrecognized => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn normalized(&self) -> impl Iterator<Item = Result<NormalizedResult, NormalizeError>> + '_ {
        self.items().iter().map(normalize_item)
    }
}

/// Adapt one raw hit. The first non-empty URL candidate wins; markdown comes
/// from `markdown` or else `data.markdown`.
pub fn normalize_item(item: &Value) -> Result<NormalizedResult, NormalizeError> {
    let Value::Object(fields) = item else {
        return Err(NormalizeError::NotAnObject {
            kind: json_kind(item),
        });
    };

    let url = resolve_url(fields);

    let markdown = text_field(fields, "markdown").or_else(|| {
        fields
            .get("data")
            .and_then(Value::as_object)
            .and_then(|data| text_field(data, "markdown"))
    });

    match markdown {
        Some(markdown) if !markdown.trim().is_empty() => Ok(NormalizedResult {
            url,
            markdown: markdown.to_string(),
        }),
        _ => Err(NormalizeError::MissingMarkdown { url }),
    }
}

fn resolve_url(fields: &Map<String, Value>) -> Option<String> {
    let direct = ITEM_URL_KEYS.iter().find_map(|key| text_field(fields, key));

    direct
        .or_else(|| {
            let metadata = fields.get("metadata").and_then(Value::as_object)?;
            METADATA_URL_KEYS
                .iter()
                .find_map(|key| text_field(metadata, key))
        })
        .map(str::to_string)
}

fn text_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Frontmatter codec
//!
//! A note file is a `---` delimited YAML block followed by the markdown body:
//!
//! ```text
//! ---
//! created: Jan 17, 2025 08:30:00 UTC
//! modified: Jan 17, 2025 09:12:45 UTC
//! type: daily
//! tags:
//! - work
//! properties:
//!   mood: calm
//! ---
//! Body text, stored verbatim.
//! ```
//!
//! Decoding never fails. Anything it cannot understand is replaced by a
//! default and reported as a [`ParseFallback`] so callers can log it.

use crate::domain::{NoteMetadata, NoteType};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Delimiter line opening and closing the metadata block
pub const DELIMITER: &str = "---";

/// Human-readable timestamp format used when writing frontmatter
pub const DATE_FORMAT: &str = "%b %d, %Y %H:%M:%S UTC";

fn ordinal_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(\d+)(st|nd|rd|th)\b").unwrap())
}

/// A non-fatal decoding problem that was replaced by a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFallback {
    /// The text does not start with a delimiter line
    MissingFrontmatter,
    /// An opening delimiter without a closing one
    UnterminatedFrontmatter,
    /// The block is not a YAML mapping
    InvalidYaml(String),
    MissingField(&'static str),
    InvalidDate { field: &'static str, value: String },
    UnknownType(String),
    InvalidTags(String),
    InvalidProperties(String),
    DroppedProperty(String),
}

impl ParseFallback {
    /// Whether the whole block was discarded and the text treated as body
    pub fn discards_block(&self) -> bool {
        matches!(
            self,
            ParseFallback::MissingFrontmatter
                | ParseFallback::UnterminatedFrontmatter
                | ParseFallback::InvalidYaml(_)
        )
    }
}

impl fmt::Display for ParseFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFallback::MissingFrontmatter => write!(f, "no frontmatter block"),
            ParseFallback::UnterminatedFrontmatter => {
                write!(f, "frontmatter block has no closing delimiter")
            }
            ParseFallback::InvalidYaml(e) => write!(f, "frontmatter is not valid YAML: {}", e),
            ParseFallback::MissingField(field) => write!(f, "missing field '{}'", field),
            ParseFallback::InvalidDate { field, value } => {
                write!(f, "unparseable date in '{}': {}", field, value)
            }
            ParseFallback::UnknownType(t) => write!(f, "unknown note type '{}'", t),
            ParseFallback::InvalidTags(e) => write!(f, "invalid tags: {}", e),
            ParseFallback::InvalidProperties(e) => write!(f, "invalid properties: {}", e),
            ParseFallback::DroppedProperty(key) => {
                write!(f, "dropped non-scalar property '{}'", key)
            }
        }
    }
}

/// Result of decoding a note file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub metadata: NoteMetadata,
    pub body: String,
    pub fallbacks: Vec<ParseFallback>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

#[derive(Serialize)]
struct FrontmatterOut<'a> {
    created: String,
    modified: String,
    #[serde(rename = "type")]
    note_type: NoteType,
    tags: &'a [String],
    properties: &'a BTreeMap<String, String>,
}

/// Format a timestamp the way frontmatter stores it
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a frontmatter date: the native format, then ISO-8601, then the
/// legacy `Jan 17th, 2025` form.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATE_FORMAT) {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let without_ordinal = ordinal_regex().replace_all(value, "$1");
    NaiveDate::parse_from_str(&without_ordinal, "%b %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(&without_ordinal, "%B %d, %Y"))
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Serialize metadata as a frontmatter block and append `body` verbatim.
pub fn encode(metadata: &NoteMetadata, body: &str) -> Result<String> {
    let out = FrontmatterOut {
        created: format_date(&metadata.created),
        modified: format_date(&metadata.modified),
        note_type: metadata.note_type,
        tags: &metadata.tags,
        properties: &metadata.properties,
    };
    let yaml = serde_yaml::to_string(&out)?;

    Ok(format!("{}\n{}{}\n{}", DELIMITER, yaml, DELIMITER, body))
}

enum Block<'a> {
    Absent,
    Unterminated,
    Present { yaml: &'a str, body: &'a str },
}

fn split_block(text: &str) -> Block<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = match text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return Block::Absent,
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == DELIMITER {
            return Block::Present {
                yaml: &rest[..offset],
                body: &rest[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    Block::Unterminated
}

/// Split a note file into metadata and body. Never fails.
pub fn decode(text: &str, now: DateTime<Utc>) -> Decoded {
    let whole_text = |reason: ParseFallback| Decoded {
        metadata: NoteMetadata::new(NoteType::Document, now),
        body: text.to_string(),
        fallbacks: vec![reason],
    };

    let (yaml, body) = match split_block(text) {
        Block::Absent => return whole_text(ParseFallback::MissingFrontmatter),
        Block::Unterminated => return whole_text(ParseFallback::UnterminatedFrontmatter),
        Block::Present { yaml, body } => (yaml, body),
    };

    if yaml.trim().is_empty() {
        return decode_fields(serde_yaml::Mapping::new(), body, now);
    }

    let fields = match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => map,
        Ok(Value::Null) => serde_yaml::Mapping::new(),
        Ok(_) => {
            return whole_text(ParseFallback::InvalidYaml(
                "expected a mapping".to_string(),
            ))
        }
        Err(e) => return whole_text(ParseFallback::InvalidYaml(e.to_string())),
    };

    decode_fields(fields, body, now)
}

fn decode_fields(fields: serde_yaml::Mapping, body: &str, now: DateTime<Utc>) -> Decoded {
    let mut fallbacks = Vec::new();
    let created = decode_date(fields.get("created"), "created", now, &mut fallbacks);
    let modified = decode_date(fields.get("modified"), "modified", now, &mut fallbacks);
    let note_type = decode_type(fields.get("type"), &mut fallbacks);
    let tags = decode_tags(fields.get("tags"), &mut fallbacks);
    let properties = decode_properties(fields.get("properties"), &mut fallbacks);

    Decoded {
        metadata: NoteMetadata {
            created,
            modified,
            note_type,
            tags,
            properties,
        },
        body: body.to_string(),
        fallbacks,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn decode_date(
    value: Option<&Value>,
    field: &'static str,
    now: DateTime<Utc>,
    fallbacks: &mut Vec<ParseFallback>,
) -> DateTime<Utc> {
    let parsed = match value {
        None | Some(Value::Null) => {
            fallbacks.push(ParseFallback::MissingField(field));
            return now;
        }
        // Epoch milliseconds, as written by the old database backend
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Some(other) => scalar_to_string(other).and_then(|s| parse_date(&s)),
    };

    parsed.unwrap_or_else(|| {
        let raw = value.and_then(scalar_to_string).unwrap_or_default();
        fallbacks.push(ParseFallback::InvalidDate { field, value: raw });
        now
    })
}

fn decode_type(value: Option<&Value>, fallbacks: &mut Vec<ParseFallback>) -> NoteType {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        fallbacks.push(ParseFallback::MissingField("type"));
        return NoteType::Document;
    };

    let raw = scalar_to_string(value).unwrap_or_default();
    NoteType::from_str(&raw).unwrap_or_else(|_| {
        fallbacks.push(ParseFallback::UnknownType(raw));
        NoteType::Document
    })
}

fn decode_tags(value: Option<&Value>, fallbacks: &mut Vec<ParseFallback>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => {
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                match scalar_to_string(item) {
                    Some(tag) => tags.push(tag),
                    None => fallbacks.push(ParseFallback::InvalidTags(
                        "skipped a non-scalar tag".to_string(),
                    )),
                }
            }
            tags
        }
        // Comma separated, as the old database backend stored them
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Some(_) => {
            fallbacks.push(ParseFallback::InvalidTags(
                "expected a list of strings".to_string(),
            ));
            Vec::new()
        }
    }
}

fn decode_properties(
    value: Option<&Value>,
    fallbacks: &mut Vec<ParseFallback>,
) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();

    match value {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(map)) => {
            for (key, value) in map {
                let Some(key) = scalar_to_string(key) else {
                    fallbacks.push(ParseFallback::InvalidProperties(
                        "skipped a non-scalar key".to_string(),
                    ));
                    continue;
                };
                match scalar_to_string(value) {
                    Some(v) => {
                        properties.insert(key, v);
                    }
                    None => fallbacks.push(ParseFallback::DroppedProperty(key)),
                }
            }
        }
        // A JSON object string, as the old database backend stored them
        Some(Value::String(s)) => {
            match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(s) {
                Ok(map) => {
                    for (key, value) in map {
                        match value {
                            serde_json::Value::String(v) => {
                                properties.insert(key, v);
                            }
                            serde_json::Value::Number(_) | serde_json::Value::Bool(_) => {
                                properties.insert(key, value.to_string());
                            }
                            _ => fallbacks.push(ParseFallback::DroppedProperty(key)),
                        }
                    }
                }
                Err(e) => fallbacks.push(ParseFallback::InvalidProperties(e.to_string())),
            }
        }
        Some(_) => fallbacks.push(ParseFallback::InvalidProperties(
            "expected a mapping".to_string(),
        )),
    }

    properties
}

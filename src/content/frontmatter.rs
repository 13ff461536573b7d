//! Front-matter parsing
//!
//! Posts open with a `---` delimited block of `key: value` lines. Values are
//! coerced loosely: quoted strings are unquoted, bracketed values are read as
//! JSON arrays, numeric strings become numbers and everything else stays a
//! string. Input without a well-formed block is all body.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

lazy_static! {
    static ref FRONT_MATTER_RE: Regex =
        Regex::new(r"^---\s*\n([\s\S]*?)\n---\s*\n([\s\S]*)$").unwrap();
    static ref NUMBER_RE: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
}

/// Front-matter block parser
pub struct FrontMatter;

impl FrontMatter {
    /// Split a document into its metadata and markdown body.
    pub fn parse(content: &str) -> (Metadata, &str) {
        let Some(caps) = FRONT_MATTER_RE.captures(content) else {
            return (Metadata::default(), content);
        };

        let header = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        let mut metadata = Metadata::default();
        for line in header.split('\n') {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            let mut value = value.trim().to_string();
            if key == "image" {
                value = rewrite_image_path(&value);
            }

            metadata.insert(key, coerce_value(key, value));
        }

        (metadata, body)
    }
}

/// Make `./public/...` and `./...` image references site-absolute
fn rewrite_image_path(value: &str) -> String {
    if let Some(rest) = value.strip_prefix("./public/") {
        format!("/{}", rest)
    } else if let Some(rest) = value.strip_prefix("./") {
        format!("/{}", rest)
    } else {
        value.to_string()
    }
}

fn coerce_value(key: &str, value: String) -> Value {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Value::String(value[1..value.len() - 1].to_string());
    }

    if value.starts_with('[') && value.ends_with(']') {
        return match serde_json::from_str::<Value>(&value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Front-matter key {:?} is not a valid array: {}", key, e);
                Value::String(value)
            }
        };
    }

    if let Some(number) = parse_number(&value) {
        return number;
    }

    Value::String(value)
}

/// Finite decimal numbers only; integers stay integral
fn parse_number(value: &str) -> Option<Value> {
    if !NUMBER_RE.is_match(value) {
        return None;
    }
    let is_integral = !value.contains(['.', 'e', 'E']);
    if is_integral {
        if let Ok(n) = value.parse::<i64>() {
            return Some(Value::from(n));
        }
    }
    let n = value.parse::<f64>().ok().filter(|n| n.is_finite())?;
    serde_json::Number::from_f64(n).map(Value::Number)
}

/// Post metadata in front-matter order. Unknown keys are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, Value>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// A scalar field as text (numbers are printed)
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn date(&self) -> Option<String> {
        self.text("date")
    }

    pub fn author(&self) -> Option<String> {
        self.text("author")
    }

    pub fn description(&self) -> Option<String> {
        self.text("description")
    }

    /// The cover image, if one is set and non-empty
    pub fn image(&self) -> Option<&str> {
        self.0
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Tags given either as an array or a single string
    pub fn tags(&self) -> Vec<String> {
        match self.0.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn comments(&self) -> Option<u64> {
        self.0.get("comments").and_then(Value::as_u64)
    }

    /// Parse the `date` field into a sortable timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date().as_deref().and_then(parse_date_string)
    }

    /// Write the metadata back as a front-matter block.
    ///
    /// Strings are always quoted so that parsing the block again yields the
    /// same values. Multi-line strings cannot be represented.
    pub fn to_front_matter(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.0 {
            let rendered = match value {
                Value::String(s) => format!("\"{}\"", s),
                other => other.to_string(),
            };
            out.push_str(&format!("{}: {}\n", key, rendered));
        }
        out.push_str("---\n");
        out
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, compared in UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

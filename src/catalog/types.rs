use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Normalized listing record served by `/trending`, `/search` and stored in
/// the manual override file.
///
/// Decoding never rejects an object: text fields take any scalar, `year` keeps
/// whatever was sent and unknown keys ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub poster: String,
    #[serde(default)]
    pub year: Year,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieEntry {
    pub fn new(
        title: impl Into<String>,
        poster: impl Into<String>,
        year: impl Into<Year>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            poster: poster.into(),
            year: year.into(),
            category: category.into(),
            extra: Map::new(),
        }
    }
}

/// Release year as it appears on the wire.
///
/// Catalog entries carry a 4-character string (or empty), the static lists
/// carry integers, and admin entries keep whatever the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
    Other(Value),
}

impl Default for Year {
    fn default() -> Self {
        Year::Text(String::new())
    }
}

impl From<i64> for Year {
    fn from(year: i64) -> Self {
        Year::Number(year)
    }
}

impl From<i32> for Year {
    fn from(year: i32) -> Self {
        Year::Number(year.into())
    }
}

impl From<&str> for Year {
    fn from(year: &str) -> Self {
        Year::Text(year.to_string())
    }
}

impl From<String> for Year {
    fn from(year: String) -> Self {
        Year::Text(year)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{}", n),
            Year::Text(s) => f.write_str(s),
            Year::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Any JSON value as text: `null` is empty, strings are kept, anything else
/// is its JSON rendering.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// TMDB wire types. Only the fields we map are decoded, all optional.

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TmdbMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl TmdbMovie {
    pub fn into_entry(self, image_base_url: &str) -> MovieEntry {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .or(self.name)
            .unwrap_or_default();

        let poster = match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", image_base_url, path),
            _ => String::new(),
        };

        let year: String = self
            .release_date
            .unwrap_or_default()
            .chars()
            .take(4)
            .collect();

        MovieEntry {
            title,
            poster,
            year: Year::Text(year),
            category: "Unknown".to_string(),
            extra: Map::new(),
        }
    }
}

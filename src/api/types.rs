use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::types::lenient_string;
use crate::catalog::{MovieEntry, Year};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingResponse {
    pub trending: Vec<MovieEntry>,
    pub most_searched: Vec<MovieEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<MovieEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindRequest {
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// `/admin/add` body. Any JSON object decodes; fields of the wrong type are
/// kept as sent rather than failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminAddRequest {
    #[serde(default, deserialize_with = "text_only")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub poster: String,
    #[serde(default)]
    pub year: Year,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
}

impl AdminAddRequest {
    pub fn into_entry(self) -> MovieEntry {
        MovieEntry {
            title: self.title,
            poster: self.poster,
            year: self.year,
            category: self.category,
            extra: Map::new(),
        }
    }
}

// A password is only ever a string; anything else counts as absent.
fn text_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAddResponse {
    pub ok: bool,
    pub manual_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// The "most searched" shelf. Static for now.
pub fn most_searched() -> Vec<MovieEntry> {
    vec![
        MovieEntry::new(
            "KGF Chapter 2",
            "https://via.placeholder.com/150x225?text=KGF2",
            2022,
            "Bollywood",
        ),
        MovieEntry::new(
            "Inception",
            "https://via.placeholder.com/150x225?text=Inception",
            2010,
            "Hollywood",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_request_accepts_any_field_types() {
        let req: AdminAddRequest = serde_json::from_value(json!({
            "password": "letmein",
            "title": 1917,
            "year": 2019.0,
            "poster": null
        }))
        .unwrap();
        assert_eq!(req.password.as_deref(), Some("letmein"));

        let entry = req.into_entry();
        assert_eq!(entry.title, "1917");
        assert_eq!(entry.poster, "");
        assert_eq!(entry.year, Year::Other(json!(2019.0)));
        assert_eq!(entry.category, "");
    }

    #[test]
    fn test_non_string_password_is_absent() {
        let req: AdminAddRequest = serde_json::from_value(json!({"password": 1234})).unwrap();
        assert!(req.password.is_none());
    }
}

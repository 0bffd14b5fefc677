use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Body returned by `/find`.
///
/// Whatever JSON object the model produced is kept as-is, whatever the types
/// of its fields. Known keys missing from the reply are filled with empty
/// defaults; `year` is only present when the model gave one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct StoryIdentification(Map<String, Value>);

const KNOWN_TEXT_FIELDS: [&str; 4] = ["movie", "category", "explanation", "poster"];

impl From<Map<String, Value>> for StoryIdentification {
    fn from(mut fields: Map<String, Value>) -> Self {
        for key in KNOWN_TEXT_FIELDS {
            fields.entry(key).or_insert_with(|| Value::String(String::new()));
        }
        fields
            .entry("recommendations")
            .or_insert_with(|| Value::Array(Vec::new()));
        Self(fields)
    }
}

impl Default for StoryIdentification {
    fn default() -> Self {
        Map::new().into()
    }
}

impl StoryIdentification {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => fields.into(),
            _ => Self::default(),
        }
    }

    /// Sample answer served when no language-model key is configured.
    pub fn sample() -> Self {
        Self::from_json(json!({
            "movie": "Inception",
            "category": "Hollywood",
            "explanation": "A thief who enters people's dreams to steal ideas is given a chance to have his past crimes forgiven if he can implant an idea into someone's mind.",
            "recommendations": ["Interstellar", "Memento", "Shutter Island", "The Prestige", "Tenet"],
            "poster": "https://via.placeholder.com/300x450?text=Inception",
            "year": 2010,
        }))
    }

    /// Answer served when the language-model call itself failed.
    pub fn ai_error() -> Self {
        Self::from_json(json!({
            "movie": "Unknown",
            "category": "Unknown",
            "explanation": "AI error",
        }))
    }

    /// Best effort for a reply that is not a JSON object.
    pub fn from_raw_reply(reply: &str) -> Self {
        let movie = reply.lines().next().unwrap_or("Unknown");
        Self::from_json(json!({
            "movie": movie,
            "category": "Unknown",
            "explanation": reply,
        }))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `movie` as text, or `""` when the model sent something else.
    pub fn movie(&self) -> &str {
        self.text("movie")
    }

    pub fn category(&self) -> &str {
        self.text("category")
    }

    pub fn explanation(&self) -> &str {
        self.text("explanation")
    }

    fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

// Gemini generateContent wire types.

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

impl GenerateRequest {
    pub fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, or `None` if it carries no text part.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

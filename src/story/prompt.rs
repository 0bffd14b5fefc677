use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::types::StoryIdentification;
use crate::outcome::Outcome;

static CODE_FENCE: OnceLock<Regex> = OnceLock::new();

fn code_fence() -> &'static Regex {
    CODE_FENCE.get_or_init(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").unwrap())
}

pub fn build_prompt(story: &str, lang: &str) -> String {
    format!(
        "You are a movie expert. A user wrote a story fragment. Identify the most likely movie title, \
         category (Bollywood/Hollywood/South Indian/Tollywood), short explanation (3-5 lines), year, \
         and 5 similar movie recommendations. Provide JSON only.\n\
         \n\
         Story: {}\n\
         Language: {}\n",
        story, lang
    )
}

/// Interpret a model reply: any JSON object is a success and is kept as-is,
/// anything else degrades to the raw text.
pub fn parse_reply(reply: &str) -> Outcome<StoryIdentification> {
    let body = code_fence()
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply);

    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(fields) => Outcome::Success(fields.into()),
        Err(_) => Outcome::Degraded(StoryIdentification::from_raw_reply(reply)),
    }
}

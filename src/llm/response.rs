//! Lenient parsing of free-form completion output

use regex::Regex;
use std::fmt;

/// Why no JSON object could be cut out of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonExtractError {
    /// The response contains no opening brace at all.
    NoObject,
    /// An opening brace was found but never closed.
    Unbalanced,
}

impl fmt::Display for JsonExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonExtractError::NoObject => write!(f, "no JSON object in response"),
            JsonExtractError::Unbalanced => write!(f, "unbalanced braces in response"),
        }
    }
}

impl std::error::Error for JsonExtractError {}

/// Return the first balanced `{ ... }` substring. Braces inside JSON string
/// literals are ignored. An opening brace that never closes is skipped and the
/// scan resumes at the next one.
pub fn extract_json_object(raw: &str) -> Result<&str, JsonExtractError> {
    let mut start = raw.find('{').ok_or(JsonExtractError::NoObject)?;

    loop {
        if let Some(end) = balanced_end(&raw[start..]) {
            return Ok(&raw[start..start + end]);
        }
        match raw[start + 1..].find('{') {
            Some(next) => start += 1 + next,
            None => return Err(JsonExtractError::Unbalanced),
        }
    }
}

/// Byte length of the object opening at the start of `text`, if it closes.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Ordered year-count patterns, most specific first.
pub struct YearsParser {
    patterns: Vec<Regex>,
    any_integer: Regex,
}

impl YearsParser {
    pub const MAX_YEARS: u32 = 50;

    pub fn new() -> Result<Self, regex::Error> {
        let patterns = [
            r"(?i)(\d+)\+?\s*(?:years?|yrs?)\s+of\s+professional\s+experience",
            r"(?i)(\d+)\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:work\s+)?experience",
            r"(?i)(\d+)\+?\s*(?:years?|yrs?)\b",
            r"^\s*(\d+)\s*\.?\s*$",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            any_integer: Regex::new(r"\d+")?,
        })
    }

    /// First plausible year count in the response, trying patterns in order
    /// and then any integer at all.
    pub fn parse(&self, response: &str) -> Option<u32> {
        for pattern in &self.patterns {
            let found = pattern
                .captures_iter(response)
                .filter_map(|cap| cap.get(1))
                .find_map(|m| Self::plausible(m.as_str()));
            if found.is_some() {
                return found;
            }
        }

        self.any_integer
            .find_iter(response)
            .find_map(|m| Self::plausible(m.as_str()))
    }

    fn plausible(digits: &str) -> Option<u32> {
        digits
            .parse::<u32>()
            .ok()
            .filter(|years| *years <= Self::MAX_YEARS)
    }
}

/// Split a comma-separated answer into trimmed tokens, dropping empty and
/// single-character entries.
pub fn split_skill_list(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

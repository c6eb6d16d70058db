//! Structured job requirements read from a posting via the completion service

use crate::llm::prompts::PromptTemplates;
use crate::llm::response::{extract_json_object, JsonExtractError};
use crate::llm::CompletionService;
use crate::processing::skill_set::{normalize, SkillSet};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// What a job posting asks for. `None` means the posting (or the service)
/// did not say.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub required_years: Option<f64>,
    pub required_skills: Option<SkillSet>,
    pub preferred_skills: Option<SkillSet>,
    pub required_education: Option<String>,
    pub experience_level: Option<String>,
    pub industry: Option<String>,
}

impl JobRequirements {
    /// Required years, with "unspecified" folded into 0.
    pub fn years_or_zero(&self) -> f64 {
        self.required_years.unwrap_or(0.0)
    }

    pub fn required_or_empty(&self) -> SkillSet {
        self.required_skills.clone().unwrap_or_default()
    }

    pub fn preferred_or_empty(&self) -> SkillSet {
        self.preferred_skills.clone().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Error, Debug)]
pub enum RequirementsError {
    #[error("could not locate requirements object: {0}")]
    Extract(#[from] JsonExtractError),

    #[error("requirements object is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("requirements payload is not a JSON object")]
    NotAnObject,
}

const MAX_REQUIRED_YEARS: f64 = 50.0;

pub struct RequirementsParser {
    prompts: PromptTemplates,
}

impl RequirementsParser {
    pub fn new(prompts: PromptTemplates) -> Self {
        Self { prompts }
    }

    /// Requirements of the posting. Any failure yields the empty record.
    pub async fn parse<C: CompletionService>(&self, service: &C, job_text: &str) -> JobRequirements {
        let prompt = self.prompts.render_requirements(job_text);
        let raw = match service.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Requirements: completion service failed ({}), requirements unknown", e);
                return JobRequirements::default();
            }
        };

        match Self::parse_response(&raw) {
            Ok(requirements) => {
                info!(
                    "Parsed job requirements: {} required, {} preferred skills",
                    requirements.required_skills.as_ref().map_or(0, SkillSet::len),
                    requirements.preferred_skills.as_ref().map_or(0, SkillSet::len)
                );
                requirements
            }
            Err(e) => {
                warn!("Requirements: {}, requirements unknown", e);
                JobRequirements::default()
            }
        }
    }

    /// Decode a raw service response, tolerating prose around the object,
    /// numeric strings for years, and comma-separated strings for skill lists.
    pub fn parse_response(raw: &str) -> Result<JobRequirements, RequirementsError> {
        let object = extract_json_object(raw)?;
        let value: Value = serde_json::from_str(object)?;
        let fields = value.as_object().ok_or(RequirementsError::NotAnObject)?;

        Ok(JobRequirements {
            required_years: years_field(fields, "required_years"),
            required_skills: skills_field(fields, "required_skills"),
            preferred_skills: skills_field(fields, "preferred_skills"),
            required_education: text_field(fields, "required_education"),
            experience_level: text_field(fields, "experience_level"),
            industry: text_field(fields, "industry"),
        })
    }
}

fn years_field(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    let years = match fields.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }?;

    if years.is_finite() && (0.0..=MAX_REQUIRED_YEARS).contains(&years) {
        Some(years)
    } else {
        debug!("Discarding implausible {} value {}", name, years);
        None
    }
}

/// First unsigned decimal number in a string such as "5+" or "3-5 years".
fn leading_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    rest[..end].trim_end_matches('.').parse().ok()
}

fn skills_field(fields: &Map<String, Value>, name: &str) -> Option<SkillSet> {
    let skills = match fields.get(name)? {
        Value::Array(items) => normalize(items.iter().filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })),
        Value::String(s) => normalize(s.split(',')),
        _ => return None,
    };

    (!skills.is_empty()).then_some(skills)
}

fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::TASK_REQUIREMENTS;
    use crate::llm::{OfflineCompletion, ScriptedCompletion};

    #[test]
    fn test_full_object() {
        let raw = r#"Here you go:
{
  "required_years": 5,
  "required_skills": ["Python", "Django", "python"],
  "preferred_skills": ["TensorFlow"],
  "required_education": "BSc Computer Science",
  "experience_level": "Senior",
  "industry": "FinTech"
}"#;
        let requirements = RequirementsParser::parse_response(raw).unwrap();
        assert_eq!(requirements.required_years, Some(5.0));
        assert_eq!(
            requirements.required_or_empty().into_vec(),
            vec!["Python", "Django"]
        );
        assert_eq!(requirements.preferred_or_empty().into_vec(), vec!["TensorFlow"]);
        assert_eq!(requirements.experience_level.as_deref(), Some("Senior"));
        assert_eq!(requirements.industry.as_deref(), Some("FinTech"));
    }

    #[test]
    fn test_lenient_field_shapes() {
        let raw = r#"{"required_years": "5+ years", "required_skills": "Rust, Tokio , ,Kafka",
                      "preferred_skills": [], "industry": "   "}"#;
        let requirements = RequirementsParser::parse_response(raw).unwrap();
        assert_eq!(requirements.required_years, Some(5.0));
        assert_eq!(
            requirements.required_or_empty().into_vec(),
            vec!["Rust", "Tokio", "Kafka"]
        );
        assert!(requirements.preferred_skills.is_none());
        assert!(requirements.industry.is_none());
        assert!(requirements.required_education.is_none());
    }

    #[test]
    fn test_object_after_stray_brace() {
        let raw = "Fill in {field names as needed. Answer: {\"required_years\": 4, \"industry\": \"Retail\"}";
        let requirements = RequirementsParser::parse_response(raw).unwrap();
        assert_eq!(requirements.required_years, Some(4.0));
        assert_eq!(requirements.industry.as_deref(), Some("Retail"));
    }

    #[test]
    fn test_calendar_year_discarded() {
        let requirements =
            RequirementsParser::parse_response(r#"{"required_years": 2020, "industry": "Retail"}"#)
                .unwrap();
        assert_eq!(requirements.required_years, None);
        assert_eq!(requirements.industry.as_deref(), Some("Retail"));
    }

    #[test]
    fn test_error_kinds_are_distinguishable() {
        assert!(matches!(
            RequirementsParser::parse_response("no structure at all"),
            Err(RequirementsError::Extract(JsonExtractError::NoObject))
        ));
        assert!(matches!(
            RequirementsParser::parse_response("{ required_years: five }"),
            Err(RequirementsError::Decode(_))
        ));
        assert!(RequirementsParser::parse_response("{}").unwrap().is_empty());
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("3-5 years"), Some(3.0));
        assert_eq!(leading_number("2.5"), Some(2.5));
        assert_eq!(leading_number("several"), None);
    }

    #[tokio::test]
    async fn test_parse_falls_back_to_default() {
        let parser = RequirementsParser::new(PromptTemplates::default());
        assert!(parser.parse(&OfflineCompletion, "Job text").await.is_empty());

        let garbled = ScriptedCompletion::new().reply(&[TASK_REQUIREMENTS], "I cannot help with that.");
        assert!(parser.parse(&garbled, "Job text").await.is_empty());

        let good = ScriptedCompletion::new()
            .reply(&[TASK_REQUIREMENTS], r#"{"required_years": 3, "required_skills": ["Go"]}"#);
        let requirements = parser.parse(&good, "Job text").await;
        assert_eq!(requirements.years_or_zero(), 3.0);
    }
}

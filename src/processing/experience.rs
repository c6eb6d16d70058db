//! Years-of-experience estimation from resume text

use crate::error::{Result, ResumeMatchError};
use crate::llm::prompts::PromptTemplates;
use crate::llm::response::YearsParser;
use crate::llm::CompletionService;
use chrono::Datelike;
use log::{debug, warn};
use regex::Regex;

const EARLIEST_YEAR: i32 = 1990;
const LATEST_YEAR: i32 = 2030;
const MAX_YEARS: f64 = YearsParser::MAX_YEARS as f64;

/// Deterministic pass summing professional date ranges line by line.
///
/// Overlapping roles on different lines each contribute their full span.
pub struct DateRangeAnalyzer {
    exclusion: Regex,
    role: Regex,
    range: Regex,
    reference_year: i32,
}

impl DateRangeAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_reference_year(chrono::Local::now().year())
    }

    /// Resolve open-ended ranges ("2019 - Present") against `reference_year`.
    pub fn with_reference_year(reference_year: i32) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| ResumeMatchError::Processing(format!("Invalid date pattern: {}", e)))
        };

        Ok(Self {
            exclusion: compile(
                r"(?i)\b(?:internships?|interns?|part-times?|academics?|students?|research\s+assistants?)\b",
            )?,
            role: compile(
                r"(?i)\b(?:engineers?|developers?|managers?|analysts?|consultants?|specialists?|leads?|seniors?|juniors?)\b",
            )?,
            range: compile(
                r"(?i)\b(\d{4})\s*(?:-|–|—|\bto\b|\buntil\b)\s*(\d{4}|present|now|current)\b",
            )?,
            reference_year,
        })
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Total years across qualifying lines, clamped to 50; 0 when nothing counts.
    pub fn total_years(&self, text: &str) -> f64 {
        let total: i32 = text.lines().map(|line| self.line_years(line)).sum();
        (total as f64).min(MAX_YEARS)
    }

    fn line_years(&self, line: &str) -> i32 {
        if self.exclusion.is_match(line) || !self.role.is_match(line) {
            return 0;
        }

        self.range
            .captures_iter(line)
            .filter_map(|cap| {
                let start: i32 = cap.get(1)?.as_str().parse().ok()?;
                let end = self.resolve_end(cap.get(2)?.as_str())?;
                if Self::in_bounds(start) && Self::in_bounds(end) && start <= end {
                    Some(end - start)
                } else {
                    debug!("Discarding implausible range {}-{}", start, end);
                    None
                }
            })
            .sum()
    }

    fn resolve_end(&self, token: &str) -> Option<i32> {
        match token.to_ascii_lowercase().as_str() {
            "present" | "now" | "current" => Some(self.reference_year),
            digits => digits.parse().ok(),
        }
    }

    fn in_bounds(year: i32) -> bool {
        (EARLIEST_YEAR..=LATEST_YEAR).contains(&year)
    }
}

/// Date ranges first, then a constrained question to the completion service.
pub struct ExperienceEstimator {
    date_ranges: DateRangeAnalyzer,
    years_parser: YearsParser,
    prompts: PromptTemplates,
}

impl ExperienceEstimator {
    pub fn new(date_ranges: DateRangeAnalyzer, prompts: PromptTemplates) -> Result<Self> {
        let years_parser = YearsParser::new()
            .map_err(|e| ResumeMatchError::Processing(format!("Invalid years pattern: {}", e)))?;

        Ok(Self {
            date_ranges,
            years_parser,
            prompts,
        })
    }

    /// Never fails: service errors and unparseable answers count as 0 years.
    pub async fn estimate<C: CompletionService>(&self, service: &C, resume_text: &str) -> f64 {
        let from_dates = self.date_ranges.total_years(resume_text);
        if from_dates > 0.0 {
            debug!("Experience from date ranges: {} years", from_dates);
            return from_dates;
        }

        debug!("No qualifying date ranges, asking completion service for experience");
        let prompt = self.prompts.render_experience(resume_text);
        match service.complete(&prompt).await {
            Ok(response) => match self.years_parser.parse(&response) {
                Some(years) => years as f64,
                None => {
                    warn!("Experience: no year count in service response, using 0");
                    0.0
                }
            },
            Err(e) => {
                warn!("Experience: completion service failed ({}), using 0", e);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::TASK_EXPERIENCE;
    use crate::llm::{OfflineCompletion, ScriptedCompletion};

    fn analyzer() -> DateRangeAnalyzer {
        DateRangeAnalyzer::with_reference_year(2024).unwrap()
    }

    fn estimator() -> ExperienceEstimator {
        ExperienceEstimator::new(analyzer(), PromptTemplates::default()).unwrap()
    }

    #[test]
    fn test_closed_range_counts() {
        assert_eq!(analyzer().total_years("Senior Engineer at Acme (2020-2023)"), 3.0);
    }

    #[test]
    fn test_internship_line_excluded() {
        assert_eq!(analyzer().total_years("Intern at Acme (2020-2023)"), 0.0);
        assert_eq!(
            analyzer().total_years("Software Engineering Internship, 2018 - 2019"),
            0.0
        );
        assert_eq!(
            analyzer().total_years("Research Assistant, Data Analyst 2015-2017"),
            0.0
        );
    }

    #[test]
    fn test_open_range_uses_reference_year() {
        assert_eq!(analyzer().total_years("Engineer at Acme (2019-Present)"), 5.0);
        assert_eq!(analyzer().total_years("Lead Developer, 2021 to now"), 3.0);
    }

    #[test]
    fn test_separators() {
        let analyzer = analyzer();
        assert_eq!(analyzer.total_years("Developer 2010 – 2012"), 2.0);
        assert_eq!(analyzer.total_years("Developer 2010—2013"), 3.0);
        assert_eq!(analyzer.total_years("Consultant from 2014 until 2018"), 4.0);
    }

    #[test]
    fn test_line_without_role_keyword_ignored() {
        assert_eq!(analyzer().total_years("University of Somewhere 2012-2016"), 0.0);
    }

    #[test]
    fn test_out_of_bounds_and_reversed_ranges_discarded() {
        let analyzer = analyzer();
        assert_eq!(analyzer.total_years("Engineer 1985-1995"), 0.0);
        assert_eq!(analyzer.total_years("Engineer 2023-2020"), 0.0);
        assert_eq!(analyzer.total_years("Engineer 2020-2035"), 0.0);
    }

    #[test]
    fn test_overlapping_lines_both_count() {
        let text = "Senior Engineer, Acme, 2018-2022\nConsultant, Side Co, 2019-2021";
        assert_eq!(analyzer().total_years(text), 6.0);
    }

    #[test]
    fn test_total_is_clamped() {
        let text = "Engineer 1990-2030\nManager 1990-2030";
        assert_eq!(analyzer().total_years(text), 50.0);
    }

    #[tokio::test]
    async fn test_date_ranges_skip_the_service() {
        let service = ScriptedCompletion::new().reply(&[TASK_EXPERIENCE], "40");
        let years = estimator()
            .estimate(&service, "Senior Engineer at Acme (2020-2023)")
            .await;
        assert_eq!(years, 3.0);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_service_fallback_parses_years() {
        let service = ScriptedCompletion::new()
            .reply(&[TASK_EXPERIENCE], "The candidate has 6 years of professional experience.");
        let years = estimator().estimate(&service, "Worked at several startups.").await;
        assert_eq!(years, 6.0);
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_yields_zero() {
        assert_eq!(estimator().estimate(&OfflineCompletion, "No dates here").await, 0.0);

        let garbage = ScriptedCompletion::new().reply(&[TASK_EXPERIENCE], "unknown");
        assert_eq!(estimator().estimate(&garbage, "No dates here").await, 0.0);
    }
}

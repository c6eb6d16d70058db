//! Match scoring and recommendation tiers

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::skill_set::SkillSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience score when the posting states no requirement.
pub const NEUTRAL_EXPERIENCE_SCORE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationLevel {
    #[serde(rename = "Strongly Recommended")]
    StronglyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider Applying")]
    ConsiderApplying,
    #[serde(rename = "Weak Match")]
    WeakMatch,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
    /// Only produced when the analysis itself failed
    #[serde(rename = "Error")]
    Error,
}

impl RecommendationLevel {
    /// Tier for an overall score; thresholds are checked highest first.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            RecommendationLevel::StronglyRecommended
        } else if score >= 0.70 {
            RecommendationLevel::Recommended
        } else if score >= 0.50 {
            RecommendationLevel::ConsiderApplying
        } else if score >= 0.30 {
            RecommendationLevel::WeakMatch
        } else {
            RecommendationLevel::NotRecommended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationLevel::StronglyRecommended => "Strongly Recommended",
            RecommendationLevel::Recommended => "Recommended",
            RecommendationLevel::ConsiderApplying => "Consider Applying",
            RecommendationLevel::WeakMatch => "Weak Match",
            RecommendationLevel::NotRecommended => "Not Recommended",
            RecommendationLevel::Error => "Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecommendationLevel::StronglyRecommended => {
                "Excellent match! Your profile aligns very well with this position."
            }
            RecommendationLevel::Recommended => {
                "Good match. You meet most of the key requirements for this role."
            }
            RecommendationLevel::ConsiderApplying => {
                "Moderate match. You have some relevant qualifications but there are gaps."
            }
            RecommendationLevel::WeakMatch => {
                "Weak match. Significant gaps exist between your profile and the requirements."
            }
            RecommendationLevel::NotRecommended => {
                "Poor match. This position may not be suitable for your current profile."
            }
            RecommendationLevel::Error => "Unable to analyze match due to an error.",
        }
    }

    pub fn color(&self) -> MatchColor {
        match self {
            RecommendationLevel::StronglyRecommended => MatchColor::Green,
            RecommendationLevel::Recommended => MatchColor::Blue,
            RecommendationLevel::ConsiderApplying => MatchColor::Orange,
            RecommendationLevel::WeakMatch => MatchColor::Yellow,
            RecommendationLevel::NotRecommended => MatchColor::Red,
            RecommendationLevel::Error => MatchColor::Gray,
        }
    }
}

impl fmt::Display for RecommendationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchColor {
    Green,
    Blue,
    Orange,
    Yellow,
    Red,
    Gray,
}

impl fmt::Display for MatchColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchColor::Green => "green",
            MatchColor::Blue => "blue",
            MatchColor::Orange => "orange",
            MatchColor::Yellow => "yellow",
            MatchColor::Red => "red",
            MatchColor::Gray => "gray",
        };
        write!(f, "{}", name)
    }
}

/// Complete scored comparison of one resume against one job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub overall_score: f64,
    pub skill_score: f64,
    pub experience_score: f64,
    pub skill_match_percentage: f64,
    pub experience_match_percentage: f64,
    pub recommendation_level: RecommendationLevel,
    pub recommendation_text: String,
    pub color: MatchColor,
    pub resume_years: f64,
    pub required_years: f64,
    pub matched_skills: SkillSet,
    pub missing_required_skills: SkillSet,
    pub missing_preferred_skills: SkillSet,
    pub experience_level: Option<String>,
    pub industry: Option<String>,
    pub error: Option<String>,
}

impl MatchAnalysis {
    /// Zeroed result for an analysis that could not be completed.
    pub fn failed(reason: impl Into<String>) -> Self {
        let level = RecommendationLevel::Error;
        Self {
            overall_score: 0.0,
            skill_score: 0.0,
            experience_score: 0.0,
            skill_match_percentage: 0.0,
            experience_match_percentage: 0.0,
            recommendation_level: level,
            recommendation_text: level.description().to_string(),
            color: level.color(),
            resume_years: 0.0,
            required_years: 0.0,
            matched_skills: SkillSet::new(),
            missing_required_skills: SkillSet::new(),
            missing_preferred_skills: SkillSet::new(),
            experience_level: None,
            industry: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn overall_percentage(&self) -> f64 {
        to_percentage(self.overall_score)
    }
}

/// Weighted skill/experience scorer. Weights are validated once at construction.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    weights: ScoringConfig,
}

impl MatchScorer {
    pub fn new(weights: ScoringConfig) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringConfig {
        &self.weights
    }

    pub fn score(
        &self,
        resume_skills: &SkillSet,
        job_skills: &SkillSet,
        required_skills: &SkillSet,
        preferred_skills: &SkillSet,
        resume_years: f64,
        required_years: f64,
    ) -> MatchAnalysis {
        let skill_score = self.skill_score(resume_skills, required_skills, preferred_skills);
        let experience_score = experience_score(resume_years, required_years);
        let overall_score = self.overall_score(skill_score, experience_score);
        let level = RecommendationLevel::from_score(overall_score);

        MatchAnalysis {
            overall_score,
            skill_score,
            experience_score,
            skill_match_percentage: to_percentage(skill_score),
            experience_match_percentage: to_percentage(experience_score),
            recommendation_level: level,
            recommendation_text: level.description().to_string(),
            color: level.color(),
            resume_years,
            required_years,
            matched_skills: job_skills.intersection(resume_skills),
            missing_required_skills: required_skills.difference(resume_skills),
            missing_preferred_skills: preferred_skills.difference(resume_skills),
            experience_level: None,
            industry: None,
            error: None,
        }
    }

    pub fn skill_score(
        &self,
        resume_skills: &SkillSet,
        required_skills: &SkillSet,
        preferred_skills: &SkillSet,
    ) -> f64 {
        let required = coverage(required_skills, resume_skills);
        let preferred = coverage(preferred_skills, resume_skills);
        clamp_unit(
            self.weights.required_skill_weight * required
                + self.weights.preferred_skill_weight * preferred,
        )
    }

    /// Weighted combination rounded to two decimals.
    pub fn overall_score(&self, skill_score: f64, experience_score: f64) -> f64 {
        let combined = self.weights.skill_weight * skill_score
            + self.weights.experience_weight * experience_score;
        round_to(clamp_unit(combined), 2)
    }
}

/// Share of `wanted` present in `have`; 0 when nothing is wanted.
fn coverage(wanted: &SkillSet, have: &SkillSet) -> f64 {
    if wanted.is_empty() {
        return 0.0;
    }
    wanted.intersection(have).len() as f64 / wanted.len() as f64
}

/// 0.8 baseline at the requirement, rising to at most 0.9 once the excess
/// reaches half the requirement, falling linearly to 0 below it.
pub fn experience_score(resume_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 {
        return NEUTRAL_EXPERIENCE_SCORE;
    }

    let score = if resume_years >= required_years {
        let excess = (resume_years - required_years).min(required_years * 0.5);
        0.8 + 0.2 * excess / required_years
    } else {
        (0.8 - 0.8 * (required_years - resume_years) / required_years).max(0.0)
    };
    clamp_unit(score)
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Score in [0, 1] as a percentage with one decimal.
pub fn to_percentage(score: f64) -> f64 {
    round_to(clamp_unit(score) * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skill_set::normalize;

    fn scorer() -> MatchScorer {
        MatchScorer::new(ScoringConfig::default()).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_experience_without_requirement_is_neutral() {
        assert_eq!(experience_score(0.0, 0.0), 0.8);
        assert_eq!(experience_score(12.0, 0.0), 0.8);
    }

    #[test]
    fn test_experience_above_requirement() {
        assert!(approx(experience_score(8.0, 4.0), 0.9));
        assert!(approx(experience_score(4.0, 4.0), 0.8));
        assert!(approx(experience_score(5.0, 4.0), 0.85));
        assert!(approx(experience_score(40.0, 4.0), 0.9));
    }

    #[test]
    fn test_experience_below_requirement() {
        assert!(approx(experience_score(2.0, 4.0), 0.4));
        assert!(approx(experience_score(0.0, 4.0), 0.0));
        let score = experience_score(3.9, 4.0);
        assert!(score < 0.8 && score > 0.7);
    }

    #[test]
    fn test_skill_score_terms() {
        let scorer = scorer();
        let resume = normalize(["python"]);
        let required = normalize(["Python", "Django", "React"]);
        let empty = SkillSet::new();

        assert!(approx(scorer.skill_score(&resume, &required, &empty), 0.7 / 3.0));
        assert_eq!(scorer.skill_score(&resume, &empty, &empty), 0.0);

        let everything = normalize(["Python", "Django", "React", "AWS"]);
        let preferred = normalize(["AWS"]);
        assert!(approx(scorer.skill_score(&everything, &required, &preferred), 1.0));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(
            RecommendationLevel::from_score(0.85),
            RecommendationLevel::StronglyRecommended
        );
        assert_eq!(
            RecommendationLevel::from_score(0.849),
            RecommendationLevel::Recommended
        );
        assert_eq!(RecommendationLevel::from_score(0.70), RecommendationLevel::Recommended);
        assert_eq!(
            RecommendationLevel::from_score(0.5),
            RecommendationLevel::ConsiderApplying
        );
        assert_eq!(RecommendationLevel::from_score(0.3), RecommendationLevel::WeakMatch);
        assert_eq!(
            RecommendationLevel::from_score(0.0),
            RecommendationLevel::NotRecommended
        );
    }

    #[test]
    fn test_reference_scenario() {
        let resume = normalize(["Python", "Flask", "MySQL", "Git"]);
        let required = normalize(["Python", "Django", "React", "AWS", "Docker", "PostgreSQL"]);
        let preferred = normalize(["TensorFlow"]);
        let job = required.union(&preferred);

        let analysis = scorer().score(&resume, &job, &required, &preferred, 2.0, 5.0);

        assert!(approx(analysis.skill_score, 0.7 / 6.0));
        assert!(approx(analysis.experience_score, 0.32));
        assert_eq!(analysis.overall_score, 0.2);
        assert_eq!(analysis.recommendation_level, RecommendationLevel::NotRecommended);
        assert_eq!(analysis.color, MatchColor::Red);
        assert_eq!(analysis.skill_match_percentage, 11.7);
        assert_eq!(analysis.experience_match_percentage, 32.0);
        assert_eq!(analysis.matched_skills.into_vec(), vec!["Python"]);
        assert_eq!(
            analysis.missing_required_skills.into_vec(),
            vec!["Django", "React", "AWS", "Docker", "PostgreSQL"]
        );
        assert_eq!(analysis.missing_preferred_skills.into_vec(), vec!["TensorFlow"]);
        assert!(analysis.error.is_none());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoringConfig {
            skill_weight: 0.5,
            experience_weight: 0.6,
            ..ScoringConfig::default()
        };
        assert!(MatchScorer::new(weights).is_err());
    }

    #[test]
    fn test_failed_analysis_is_zeroed() {
        let analysis = MatchAnalysis::failed("boom");
        assert_eq!(analysis.overall_score, 0.0);
        assert_eq!(analysis.recommendation_level, RecommendationLevel::Error);
        assert_eq!(analysis.color, MatchColor::Gray);
        assert!(analysis.missing_required_skills.is_empty());
        assert_eq!(analysis.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_serializes_display_strings() {
        let analysis = MatchAnalysis::failed("x");
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["recommendation_level"], "Error");
        assert_eq!(json["color"], "gray");

        let level = serde_json::to_value(RecommendationLevel::ConsiderApplying).unwrap();
        assert_eq!(level, "Consider Applying");
    }
}

//! Match engine sequencing requirements, experience, skills and scoring

use crate::config::{Config, ScoringConfig};
use crate::error::Result;
use crate::llm::prompts::PromptTemplates;
use crate::llm::CompletionService;
use crate::processing::experience::{DateRangeAnalyzer, ExperienceEstimator};
use crate::processing::requirements::{JobRequirements, RequirementsParser};
use crate::processing::scoring::{MatchAnalysis, MatchScorer};
use crate::processing::skill_catalog::SkillCatalogMatcher;
use crate::processing::skill_set::{normalize, SkillSet};
use crate::processing::skills::{SkillContext, SkillExtractor};
use crate::processing::tailoring::add_skills_to_resume;
use crate::processing::target::{TargetPlan, TargetPlanner};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Computes a [`MatchAnalysis`] for one resume/job pair at a time.
///
/// The completion service and configuration are injected at construction and
/// never mutated afterwards.
pub struct MatchEngine<C> {
    service: C,
    scoring: ScoringConfig,
    requirements: RequirementsParser,
    experience: ExperienceEstimator,
    skills: SkillExtractor,
}

/// Analysis plus the plan for reaching a requested score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetedMatch {
    pub analysis: MatchAnalysis,
    /// Absent when the analysis itself failed
    pub plan: Option<TargetPlan>,
    /// Planned skills that were written into `enhanced_resume`
    #[serde(default, skip_serializing_if = "SkillSet::is_empty")]
    pub skills_added: SkillSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_resume: Option<String>,
}

impl TargetedMatch {
    pub fn without_plan(analysis: MatchAnalysis) -> Self {
        Self {
            analysis,
            plan: None,
            skills_added: SkillSet::new(),
            enhanced_resume: None,
        }
    }
}

/// Everything one pipeline run produced, kept for follow-up planning.
struct PipelineOutput {
    analysis: MatchAnalysis,
    requirements: JobRequirements,
    resume_skills: SkillSet,
    scorer: MatchScorer,
}

impl<C: CompletionService> MatchEngine<C> {
    pub fn new(config: &Config, service: C) -> Result<Self> {
        Self::with_date_ranges(config, service, DateRangeAnalyzer::new()?)
    }

    /// Construct with a specific date-range analyzer, e.g. one pinned to a
    /// reference year.
    pub fn with_date_ranges(config: &Config, service: C, date_ranges: DateRangeAnalyzer) -> Result<Self> {
        let prompts = PromptTemplates::default();
        let catalog = SkillCatalogMatcher::new()?;
        info!("Skill catalog loaded with {} skills", catalog.skill_count());

        Ok(Self {
            service,
            scoring: config.scoring.clone(),
            requirements: RequirementsParser::new(prompts.clone()),
            experience: ExperienceEstimator::new(date_ranges, prompts.clone())?,
            skills: SkillExtractor::new(catalog, prompts),
        })
    }

    pub fn catalog(&self) -> &SkillCatalogMatcher {
        self.skills.catalog()
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    /// Never fails: a pipeline error produces [`MatchAnalysis::failed`].
    pub async fn compute_match(&self, resume_text: &str, job_text: &str) -> MatchAnalysis {
        match self.try_compute_match(resume_text, job_text).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Match computation failed: {}", e);
                MatchAnalysis::failed(e.to_string())
            }
        }
    }

    /// Like [`compute_match`](Self::compute_match) but surfaces the pipeline error.
    pub async fn try_compute_match(&self, resume_text: &str, job_text: &str) -> Result<MatchAnalysis> {
        Ok(self.run_pipeline(resume_text, job_text).await?.analysis)
    }

    /// Run the match, plan which missing skills reach `target_pct` percent and
    /// write those skills into a copy of the resume.
    pub async fn compute_match_with_target(
        &self,
        resume_text: &str,
        job_text: &str,
        target_pct: f64,
    ) -> TargetedMatch {
        match self.run_pipeline(resume_text, job_text).await {
            Ok(output) => {
                let planner = TargetPlanner::new(&output.scorer, self.catalog());
                let plan = planner.plan(
                    &output.analysis,
                    &output.requirements,
                    &output.resume_skills,
                    target_pct,
                );
                let tailored = add_skills_to_resume(resume_text, &plan.skills_needed);
                if !tailored.skills_added.is_empty() {
                    info!("Added {} skills to the resume: {}", tailored.skills_added.len(), tailored.skills_added);
                }
                let enhanced_resume = (!tailored.skills_added.is_empty()).then_some(tailored.text);
                TargetedMatch {
                    analysis: output.analysis,
                    plan: Some(plan),
                    skills_added: tailored.skills_added,
                    enhanced_resume,
                }
            }
            Err(e) => {
                error!("Match computation failed: {}", e);
                TargetedMatch::without_plan(MatchAnalysis::failed(e.to_string()))
            }
        }
    }

    async fn run_pipeline(&self, resume_text: &str, job_text: &str) -> Result<PipelineOutput> {
        let start_time = Instant::now();

        let scorer = MatchScorer::new(self.scoring.clone())?;

        // 1. Job requirements
        let requirements = self.requirements.parse(&self.service, job_text).await;

        // 2. Candidate experience
        let resume_years = self.experience.estimate(&self.service, resume_text).await;

        // 3. Skills on both sides
        let resume_skills = normalize(
            &self
                .skills
                .extract(&self.service, resume_text, SkillContext::Resume)
                .await,
        );
        let job_skills = normalize(
            &self
                .skills
                .extract(&self.service, job_text, SkillContext::JobDescription)
                .await,
        );

        // 4. Scoring
        let mut analysis = scorer.score(
            &resume_skills,
            &job_skills,
            &requirements.required_or_empty(),
            &requirements.preferred_or_empty(),
            resume_years,
            requirements.years_or_zero(),
        );
        analysis.experience_level = requirements.experience_level.clone();
        analysis.industry = requirements.industry.clone();

        info!(
            "Match computed in {}ms: {:.0}% ({})",
            start_time.elapsed().as_millis(),
            analysis.overall_percentage(),
            analysis.recommendation_level
        );

        Ok(PipelineOutput {
            analysis,
            requirements,
            resume_skills,
            scorer,
        })
    }
}

//! Report structure handed to the output formatters

use crate::processing::analyzer::TargetedMatch;
use crate::processing::scoring::MatchAnalysis;
use crate::processing::skill_set::SkillSet;
use crate::processing::target::TargetPlan;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One match run with the metadata needed to present it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub analysis: MatchAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_plan: Option<TargetPlan>,
    /// Planned skills written into the enhanced resume
    #[serde(default, skip_serializing_if = "SkillSet::is_empty")]
    pub skills_added: SkillSet,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub resume_path: String,
    pub job_path: String,
    /// True when no completion service was available
    pub offline: bool,
    pub processing_time_ms: u64,
}

impl MatchReport {
    pub fn new(analysis: MatchAnalysis, metadata: ReportMetadata) -> Self {
        Self {
            analysis,
            target_plan: None,
            skills_added: SkillSet::new(),
            metadata,
        }
    }

    pub fn from_targeted(targeted: TargetedMatch, metadata: ReportMetadata) -> Self {
        Self {
            analysis: targeted.analysis,
            target_plan: targeted.plan,
            skills_added: targeted.skills_added,
            metadata,
        }
    }
}

impl ReportMetadata {
    pub fn new(resume_path: impl Into<String>, job_path: impl Into<String>) -> Self {
        Self {
            generated_at: SystemTime::now(),
            resume_path: resume_path.into(),
            job_path: job_path.into(),
            offline: false,
            processing_time_ms: 0,
        }
    }
}

//! Skill, experience and requirements analysis plus match scoring

pub mod analyzer;
pub mod experience;
pub mod requirements;
pub mod scoring;
pub mod skill_catalog;
pub mod skill_set;
pub mod skills;
pub mod tailoring;
pub mod target;

pub use analyzer::{MatchEngine, TargetedMatch};
pub use requirements::JobRequirements;
pub use scoring::{MatchAnalysis, MatchColor, RecommendationLevel};
pub use skill_set::{normalize, SkillSet};

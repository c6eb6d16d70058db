//! Planning which missing skills would lift a match to a target score

use crate::processing::requirements::JobRequirements;
use crate::processing::scoring::{to_percentage, MatchAnalysis, MatchScorer};
use crate::processing::skill_catalog::{SkillCatalogMatcher, SkillCategory};
use crate::processing::skill_set::SkillSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Skills that usually come next once the key skill is known.
const RELATED_SKILLS: &[(&str, &[&str])] = &[
    ("Python", &["Django", "Flask", "FastAPI", "AWS", "TensorFlow", "PyTorch", "Pandas", "NumPy", "Scikit-learn"]),
    ("Flask", &["Django", "FastAPI", "PostgreSQL"]),
    ("Django", &["Flask", "FastAPI", "PostgreSQL"]),
    ("JavaScript", &["TypeScript", "React", "Angular", "Vue.js", "Node.js", "Express.js"]),
    ("TypeScript", &["JavaScript", "React", "Angular", "Node.js"]),
    ("Node.js", &["Express.js", "TypeScript", "MongoDB"]),
    ("React", &["Redux", "TypeScript", "Next.js"]),
    ("HTML", &["CSS", "JavaScript"]),
    ("CSS", &["HTML", "Sass", "Tailwind CSS", "Bootstrap"]),
    ("SQL", &["PostgreSQL", "MySQL", "MongoDB", "Python"]),
    ("Java", &["Spring Boot", "Kotlin", "Scala"]),
    ("Docker", &["Kubernetes"]),
    ("AWS", &["Terraform", "Docker"]),
];

/// Useful next to almost any stack; ranked above unrelated skills.
const BROADLY_USEFUL: &[&str] = &["Docker", "AWS", "Git", "Kubernetes", "Linux", "Azure", "GCP"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPlan {
    /// Requested overall percentage, clamped to [0, 100]
    pub target_score: f64,
    pub current_score: f64,
    /// Overall percentage once `skills_needed` are added
    pub projected_score: f64,
    pub skills_needed: SkillSet,
    pub reachable: bool,
}

pub struct TargetPlanner<'a> {
    scorer: &'a MatchScorer,
    catalog: &'a SkillCatalogMatcher,
}

impl<'a> TargetPlanner<'a> {
    pub fn new(scorer: &'a MatchScorer, catalog: &'a SkillCatalogMatcher) -> Self {
        Self { scorer, catalog }
    }

    pub fn plan(
        &self,
        analysis: &MatchAnalysis,
        requirements: &JobRequirements,
        resume_skills: &SkillSet,
        target_pct: f64,
    ) -> TargetPlan {
        let target_score = if target_pct.is_nan() { 0.0 } else { target_pct.clamp(0.0, 100.0) };
        let current_score = analysis.overall_percentage();

        if target_score <= current_score {
            return TargetPlan {
                target_score,
                current_score,
                projected_score: current_score,
                skills_needed: SkillSet::new(),
                reachable: true,
            };
        }

        let required = requirements.required_or_empty();
        let preferred = requirements.preferred_or_empty();
        let candidates = self.candidates(analysis, resume_skills);

        let mut augmented = resume_skills.clone();
        let mut skills_needed = SkillSet::new();
        let mut projected_score = current_score;

        for skill in candidates.iter() {
            augmented.insert(skill);
            skills_needed.insert(skill);
            projected_score = self.projected(&augmented, &required, &preferred, analysis);
            debug!("Adding {} projects {:.1}%", skill, projected_score);
            if projected_score >= target_score {
                return TargetPlan {
                    target_score,
                    current_score,
                    projected_score,
                    skills_needed,
                    reachable: true,
                };
            }
        }

        TargetPlan {
            target_score,
            current_score,
            projected_score,
            skills_needed,
            reachable: false,
        }
    }

    /// Missing required skills, then missing preferred ones. Within each group,
    /// skills related to the resume come first, then broadly useful ones.
    fn candidates(&self, analysis: &MatchAnalysis, resume_skills: &SkillSet) -> SkillSet {
        let mut candidates = SkillSet::new();
        candidates.extend(self.prioritize(&analysis.missing_required_skills, resume_skills));
        candidates.extend(self.prioritize(&analysis.missing_preferred_skills, resume_skills));
        candidates
    }

    /// Stable ordering of `missing` by [`Self::priority`].
    pub fn prioritize<'s>(&self, missing: &'s SkillSet, resume_skills: &SkillSet) -> Vec<&'s str> {
        let related = related_skills(resume_skills);
        // Languages only relate through the table
        let known: HashSet<SkillCategory> = resume_skills
            .iter()
            .filter_map(|skill| self.catalog.category_of(skill))
            .filter(|category| *category != SkillCategory::ProgrammingLanguage)
            .collect();

        let mut ordered: Vec<&str> = missing.iter().collect();
        ordered.sort_by_key(|skill| self.priority(skill, &related, &known));
        ordered
    }

    /// 0 for skills related to the resume, 1 for broadly useful ones, 2 otherwise.
    fn priority(&self, skill: &str, related: &SkillSet, known: &HashSet<SkillCategory>) -> u8 {
        let shares_category = self
            .catalog
            .category_of(skill)
            .is_some_and(|category| known.contains(&category));

        if related.contains(skill) || shares_category {
            0
        } else if BROADLY_USEFUL.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            1
        } else {
            2
        }
    }

    fn projected(
        &self,
        resume_skills: &SkillSet,
        required: &SkillSet,
        preferred: &SkillSet,
        analysis: &MatchAnalysis,
    ) -> f64 {
        let skill_score = self.scorer.skill_score(resume_skills, required, preferred);
        to_percentage(self.scorer.overall_score(skill_score, analysis.experience_score))
    }
}

/// Every skill the relationship table links to something on the resume.
fn related_skills(resume_skills: &SkillSet) -> SkillSet {
    RELATED_SKILLS
        .iter()
        .filter(|(key, _)| resume_skills.contains(key))
        .flat_map(|(_, related)| related.iter())
        .collect()
}

//! Skill extraction: completion service first, catalog as fallback

use crate::error::Result;
use crate::llm::prompts::PromptTemplates;
use crate::llm::response::split_skill_list;
use crate::llm::CompletionService;
use crate::processing::skill_catalog::SkillCatalogMatcher;
use crate::processing::skill_set::{normalize, SkillSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Fewer service-provided skills than this and the answer is treated as degenerate.
pub const MIN_SERVICE_SKILLS: usize = 3;

/// Which document is being read. Only affects prompt framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillContext {
    Resume,
    JobDescription,
}

impl SkillContext {
    pub fn label(&self) -> &'static str {
        match self {
            SkillContext::Resume => "RESUME",
            SkillContext::JobDescription => "JOB DESCRIPTION",
        }
    }
}

/// Combine the two strategies' results.
///
/// A service answer with at least [`MIN_SERVICE_SKILLS`] entries stands on its
/// own. A shorter one is merged with the catalog result, service entries
/// first. A failed call yields the catalog result alone.
pub fn merge_skill_results<E, F>(service: std::result::Result<SkillSet, E>, catalog: F) -> SkillSet
where
    E: std::fmt::Display,
    F: FnOnce() -> SkillSet,
{
    match service {
        Ok(skills) if skills.len() >= MIN_SERVICE_SKILLS => skills,
        Ok(skills) => {
            debug!(
                "Service returned {} skills, merging with catalog matches",
                skills.len()
            );
            skills.union(&catalog())
        }
        Err(e) => {
            warn!("Skill extraction: completion service failed ({}), using catalog", e);
            catalog()
        }
    }
}

pub struct SkillExtractor {
    catalog: SkillCatalogMatcher,
    prompts: PromptTemplates,
}

impl SkillExtractor {
    pub fn new(catalog: SkillCatalogMatcher, prompts: PromptTemplates) -> Self {
        Self { catalog, prompts }
    }

    pub fn catalog(&self) -> &SkillCatalogMatcher {
        &self.catalog
    }

    /// Skills named in `text`. Never fails.
    pub async fn extract<C: CompletionService>(
        &self,
        service: &C,
        text: &str,
        context: SkillContext,
    ) -> SkillSet {
        let service_result = self.ask_service(service, text, context).await;
        merge_skill_results(service_result, || self.catalog.match_text(text))
    }

    async fn ask_service<C: CompletionService>(
        &self,
        service: &C,
        text: &str,
        context: SkillContext,
    ) -> Result<SkillSet> {
        let prompt = self.prompts.render_skills(context.label(), text);
        let response = service.complete(&prompt).await?;
        Ok(normalize(split_skill_list(&response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::TASK_SKILLS;
    use crate::llm::{OfflineCompletion, ScriptedCompletion};

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(SkillCatalogMatcher::new().unwrap(), PromptTemplates::default())
    }

    const RESUME: &str = "Backend developer using Python, Flask and MySQL. Git daily.";

    #[tokio::test]
    async fn test_service_answer_used_when_rich_enough() {
        let service = ScriptedCompletion::new()
            .reply(&[TASK_SKILLS], "Python, Flask, MySQL, python, REST design");
        let skills = extractor().extract(&service, RESUME, SkillContext::Resume).await;
        assert_eq!(skills.into_vec(), vec!["Python", "Flask", "MySQL", "REST design"]);
    }

    #[tokio::test]
    async fn test_degenerate_answer_merged_with_catalog() {
        let service = ScriptedCompletion::new().reply(&[TASK_SKILLS], "Team Player, x");
        let skills = extractor().extract(&service, RESUME, SkillContext::Resume).await;
        assert_eq!(
            skills.into_vec(),
            vec!["Team Player", "Python", "Flask", "MySQL", "Git"]
        );
    }

    #[tokio::test]
    async fn test_service_failure_falls_back_to_catalog() {
        let skills = extractor()
            .extract(&OfflineCompletion, RESUME, SkillContext::Resume)
            .await;
        assert_eq!(skills.into_vec(), vec!["Python", "Flask", "MySQL", "Git"]);
    }

    #[tokio::test]
    async fn test_context_label_reaches_prompt() {
        let service = ScriptedCompletion::new()
            .reply(&[TASK_SKILLS, "<JOB DESCRIPTION>"], "Rust, Tokio, Kafka")
            .fail(&[TASK_SKILLS]);
        let extractor = extractor();

        let job = extractor
            .extract(&service, "Rust role", SkillContext::JobDescription)
            .await;
        assert_eq!(job.into_vec(), vec!["Rust", "Tokio", "Kafka"]);

        let resume = extractor.extract(&service, "Rust role", SkillContext::Resume).await;
        assert_eq!(resume.into_vec(), vec!["Rust"]);
    }

    #[test]
    fn test_merge_policy() {
        let catalog = || normalize(["Python", "Docker"]);

        let rich: std::result::Result<SkillSet, String> = Ok(normalize(["A1", "B2", "C3"]));
        assert_eq!(merge_skill_results(rich, catalog).len(), 3);

        let thin: std::result::Result<SkillSet, String> = Ok(normalize(["python"]));
        assert_eq!(
            merge_skill_results(thin, catalog).into_vec(),
            vec!["python", "Docker"]
        );

        let failed: std::result::Result<SkillSet, String> = Err("down".to_string());
        assert_eq!(
            merge_skill_results(failed, catalog).into_vec(),
            vec!["Python", "Docker"]
        );
    }
}

//! Prompt templates for the constrained questions asked of the completion service

/// Header lines identifying each kind of prompt.
pub const TASK_SKILLS: &str = "TASK: SKILL EXTRACTION";
pub const TASK_EXPERIENCE: &str = "TASK: PROFESSIONAL EXPERIENCE YEARS";
pub const TASK_REQUIREMENTS: &str = "TASK: JOB REQUIREMENTS";

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub skills: String,
    pub experience: String,
    pub requirements: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            skills: SKILLS_TEMPLATE.to_string(),
            experience: EXPERIENCE_TEMPLATE.to_string(),
            requirements: REQUIREMENTS_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_skills(&self, document_label: &str, text: &str) -> String {
        self.skills
            .replace("{task}", TASK_SKILLS)
            .replace("{label}", document_label)
            .replace("{text}", text)
    }

    pub fn render_experience(&self, resume_text: &str) -> String {
        self.experience
            .replace("{task}", TASK_EXPERIENCE)
            .replace("{text}", resume_text)
    }

    pub fn render_requirements(&self, job_text: &str) -> String {
        self.requirements
            .replace("{task}", TASK_REQUIREMENTS)
            .replace("{text}", job_text)
    }
}

const SKILLS_TEMPLATE: &str = r#"{task}

Extract every skill mentioned in the {label} below. Look for:
- programming languages
- frameworks and libraries
- databases
- cloud platforms and infrastructure tools
- CI/CD and developer tooling
- frontend technologies
- data science and machine learning tools
- methodologies (Agile, Scrum, ...)
- operating systems, shells and infrastructure-as-code tools
- soft skills (leadership, communication, ...)

<{label}>
{text}
</{label}>

Answer with a single comma-separated list of skill names and nothing else.
No numbering, no headings, no explanations."#;

const EXPERIENCE_TEMPLATE: &str = r#"{task}

How many years of professional, full-time work experience does the candidate
in this resume have? Do not count internships, part-time jobs, academic
positions, student jobs or research assistant roles.

<RESUME>
{text}
</RESUME>

Answer with a single integer and nothing else."#;

const REQUIREMENTS_TEMPLATE: &str = r#"{task}

Read the job posting below and return a single JSON object with exactly these
fields:
{
  "required_years": <number of years of experience required>,
  "required_skills": [<skills the posting requires>],
  "preferred_skills": [<skills the posting lists as preferred or nice to have>],
  "required_education": "<degree or education requirement>",
  "experience_level": "<entry, mid, senior, lead, ...>",
  "industry": "<industry of the employer>"
}

required_years must be a duration in years (for example 5), never a calendar
year such as 2020. Use 0 when the posting does not state one.

<JOB POSTING>
{text}
</JOB POSTING>

Return only the JSON object."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_prompt_carries_label_and_text() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_skills("RESUME", "Rust and Tokio at Acme");

        assert!(prompt.starts_with(TASK_SKILLS));
        assert!(prompt.contains("<RESUME>"));
        assert!(prompt.contains("</RESUME>"));
        assert!(prompt.contains("Rust and Tokio at Acme"));
        assert!(prompt.contains("comma-separated"));
    }

    #[test]
    fn test_requirements_prompt_warns_about_calendar_years() {
        let prompt = PromptTemplates::default().render_requirements("Senior role");
        assert!(prompt.starts_with(TASK_REQUIREMENTS));
        assert!(prompt.contains("never a calendar"));
        assert!(prompt.contains("\"required_years\""));
        assert!(prompt.contains("Senior role"));
    }

    #[test]
    fn test_task_headers_are_distinct() {
        let templates = PromptTemplates::default();
        let experience = templates.render_experience("text");
        assert!(experience.contains(TASK_EXPERIENCE));
        assert!(!experience.contains(TASK_SKILLS));
        assert!(!experience.contains(TASK_REQUIREMENTS));
    }
}

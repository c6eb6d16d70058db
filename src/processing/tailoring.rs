//! Writing planned skills back into the resume text

use crate::processing::skill_set::SkillSet;
use serde::{Deserialize, Serialize};

/// Headers recognized as the resume's skills section, compared lowercase.
const SKILLS_HEADERS: &[&str] = &[
    "skills",
    "technical skills",
    "core skills",
    "key skills",
    "core competencies",
    "skills & tools",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub text: String,
    /// Skills written into `text`, in plan order
    pub skills_added: SkillSet,
}

/// Add `skills` to the resume's skills section, appending a new `SKILLS:`
/// section when none exists. Skills already named in that section are
/// left out. The rest of the text is kept line for line.
pub fn add_skills_to_resume(resume_text: &str, skills: &SkillSet) -> TailoredResume {
    let lines: Vec<&str> = resume_text.lines().collect();
    let header = lines.iter().position(|line| is_skills_header(line));

    let existing = match header {
        Some(idx) => section_text(&lines, idx).to_lowercase(),
        None => String::new(),
    };
    let skills_added: SkillSet = skills
        .iter()
        .filter(|skill| !mentions(&existing, &skill.to_lowercase()))
        .collect();

    if skills_added.is_empty() {
        return TailoredResume {
            text: resume_text.to_string(),
            skills_added,
        };
    }

    let text = match header {
        Some(idx) => {
            let indent: String = lines[idx].chars().take_while(|c| c.is_whitespace()).collect();
            let mut output: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
            output.insert(idx + 1, format!("{}- {}", indent, skills_added));
            let mut text = output.join("\n");
            if resume_text.ends_with('\n') {
                text.push('\n');
            }
            text
        }
        None => format!("{}\n\nSKILLS:\n- {}\n", resume_text.trim_end(), skills_added),
    };

    TailoredResume { text, skills_added }
}

fn is_skills_header(line: &str) -> bool {
    let title = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase();
    SKILLS_HEADERS.contains(&title.as_str())
}

/// Lines after the header up to the next blank line.
fn section_text(lines: &[&str], header: usize) -> String {
    lines
        .iter()
        .skip(header + 1)
        .take_while(|line| !line.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole-word, already-lowercased containment.
fn mentions(haystack: &str, needle: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skill_set::normalize;

    #[test]
    fn test_inserts_under_existing_header() {
        let resume = "JANE DOE\n\n  SKILLS:\n  - Python, Flask\n\nEDUCATION:\nBSc\n";
        let tailored = add_skills_to_resume(resume, &normalize(["Django", "AWS"]));

        assert_eq!(
            tailored.text,
            "JANE DOE\n\n  SKILLS:\n  - Django, AWS\n  - Python, Flask\n\nEDUCATION:\nBSc\n"
        );
        assert_eq!(tailored.skills_added.into_vec(), vec!["Django", "AWS"]);
    }

    #[test]
    fn test_markdown_header_and_known_skills() {
        let resume = "# Jane\n## Technical Skills\nPython, Docker\n";
        let tailored = add_skills_to_resume(resume, &normalize(["docker", "Kubernetes"]));

        assert_eq!(tailored.text, "# Jane\n## Technical Skills\n- Kubernetes\nPython, Docker\n");
        assert_eq!(tailored.skills_added.into_vec(), vec!["Kubernetes"]);
    }

    #[test]
    fn test_appends_section_when_missing() {
        let resume = "John Doe\nEngineer at Acme (2020-2023)\n\n";
        let tailored = add_skills_to_resume(resume, &normalize(["React"]));
        assert_eq!(
            tailored.text,
            "John Doe\nEngineer at Acme (2020-2023)\n\nSKILLS:\n- React\n"
        );
    }

    #[test]
    fn test_nothing_to_add_keeps_text() {
        let resume = "Skills\nJava, Go\n";
        let tailored = add_skills_to_resume(resume, &normalize(["Java"]));
        assert_eq!(tailored.text, resume);
        assert!(tailored.skills_added.is_empty());

        let tailored = add_skills_to_resume(resume, &SkillSet::new());
        assert_eq!(tailored.text, resume);
    }

    #[test]
    fn test_whole_word_mentions() {
        assert!(mentions("python, java", "java"));
        assert!(!mentions("javascript", "java"));
        assert!(mentions("c++ and rust", "c++"));
    }
}

//! Console and JSON presentation of match reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeMatchError};
use crate::output::report::MatchReport;
use crate::processing::scoring::MatchColor;
use crate::processing::skill_set::SkillSet;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting match reports
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Human-readable terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// Structured output for scripting
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        if self.use_colors {
            let color = if level == 1 { Color::Blue } else { Color::Cyan };
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_badge(&self, label: &str, tag: MatchColor) -> String {
        if self.use_colors {
            format!("[{}]", label.color(terminal_color(tag)).bold())
        } else {
            format!("[{}]", label)
        }
    }

    fn format_skill_list(&self, title: &str, skills: &SkillSet, color: Color) -> String {
        if skills.is_empty() {
            return String::new();
        }
        let mut output = format!("{} ({}):\n", title, skills.len());
        for skill in skills {
            output.push_str(&format!("  • {}\n", self.colorize(skill, color)));
        }
        output
    }

    fn format_bar(&self, percentage: f64) -> String {
        const WIDTH: usize = 20;
        let filled = ((percentage / 100.0) * WIDTH as f64).round().clamp(0.0, WIDTH as f64) as usize;
        format!("{}{}", "■".repeat(filled), "·".repeat(WIDTH - filled))
    }
}

/// Terminal color for a tier tag. The terminal has no orange, so it is
/// approximated with a true-color value.
pub fn terminal_color(tag: MatchColor) -> Color {
    match tag {
        MatchColor::Green => Color::Green,
        MatchColor::Blue => Color::Blue,
        MatchColor::Orange => Color::TrueColor { r: 255, g: 165, b: 0 },
        MatchColor::Yellow => Color::Yellow,
        MatchColor::Red => Color::Red,
        MatchColor::Gray => Color::BrightBlack,
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms{}\n",
            chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
                .format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms,
            if report.metadata.offline { " | offline" } else { "" }
        ));

        if let Some(error) = &analysis.error {
            output.push_str(&format!(
                "\n{} {}\n{}\n",
                self.format_badge(analysis.recommendation_level.as_str(), analysis.color),
                analysis.recommendation_text,
                self.colorize(error, Color::Red)
            ));
            return Ok(output);
        }

        // Verdict
        output.push_str(&self.format_header("Verdict", 2));
        output.push_str(&format!(
            "Overall Match: {:.0}% {}\n",
            analysis.overall_percentage(),
            self.format_badge(analysis.recommendation_level.as_str(), analysis.color)
        ));
        output.push_str(&format!("{}\n", analysis.recommendation_text));

        // Scores
        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!(
            "Skills      {} {:>5.1}%\n",
            self.format_bar(analysis.skill_match_percentage),
            analysis.skill_match_percentage
        ));
        output.push_str(&format!(
            "Experience  {} {:>5.1}%\n",
            self.format_bar(analysis.experience_match_percentage),
            analysis.experience_match_percentage
        ));
        let required = if analysis.required_years > 0.0 {
            format!("{:.0}", analysis.required_years)
        } else {
            "not stated".to_string()
        };
        output.push_str(&format!(
            "Years: {:.0} on resume, {} required\n",
            analysis.resume_years, required
        ));

        // Skills
        output.push_str(&self.format_header("Skills", 3));
        output.push_str(&self.format_skill_list("Matched", &analysis.matched_skills, Color::Green));
        output.push_str(&self.format_skill_list(
            "Missing (required)",
            &analysis.missing_required_skills,
            Color::Red,
        ));
        output.push_str(&self.format_skill_list(
            "Missing (preferred)",
            &analysis.missing_preferred_skills,
            Color::Yellow,
        ));

        if let Some(plan) = &report.target_plan {
            output.push_str(&self.format_header(&format!("Path to {:.0}%", plan.target_score), 2));
            if plan.skills_needed.is_empty() {
                output.push_str(&format!(
                    "{}\n",
                    self.colorize("Current match already meets the target.", Color::Green)
                ));
            } else {
                output.push_str(&self.format_skill_list("Add", &plan.skills_needed, Color::Cyan));
                output.push_str(&self.format_skill_list(
                    "Added to resume",
                    &report.skills_added,
                    Color::Green,
                ));
                let outcome = format!("Projected match: {:.0}%", plan.projected_score);
                if plan.reachable {
                    output.push_str(&format!("{}\n", self.colorize(&outcome, Color::Green)));
                } else {
                    output.push_str(&format!(
                        "{} (target not reachable through skills alone)\n",
                        self.colorize(&outcome, Color::Yellow)
                    ));
                }
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!("Resume: {}\n", report.metadata.resume_path));
            output.push_str(&format!("Job:    {}\n", report.metadata.job_path));
            if let Some(level) = &analysis.experience_level {
                output.push_str(&format!("Experience level: {}\n", level));
            }
            if let Some(industry) = &analysis.industry {
                output.push_str(&format!("Industry: {}\n", industry));
            }
            output.push_str(&format!(
                "Raw scores: overall {:.2}, skills {:.4}, experience {:.4}\n",
                analysis.overall_score, analysis.skill_score, analysis.experience_score
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Format with the formatter for `format`.
pub fn render(report: &MatchReport, format: OutputFormat, use_colors: bool, detailed: bool) -> Result<String> {
    match format {
        OutputFormat::Console => ConsoleFormatter::new(use_colors, detailed).format_report(report),
        OutputFormat::Json => JsonFormatter::new(true).format_report(report),
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        ResumeMatchError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_match{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_match{}.json", base_name, timestamp_suffix),
    }
}

/// Where `--save` should write: a directory gets a suggested file name.
pub fn resolve_save_path(requested: &Path, format: OutputFormat, resume_name: &str) -> PathBuf {
    if requested.is_dir() {
        requested.join(suggest_filename(format, resume_name, true))
    } else {
        requested.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::output::report::ReportMetadata;
    use crate::processing::scoring::{MatchAnalysis, MatchScorer};
    use crate::processing::skill_set::normalize;
    use crate::processing::target::TargetPlan;
    use tempfile::TempDir;

    fn sample_report() -> MatchReport {
        let scorer = MatchScorer::new(ScoringConfig::default()).unwrap();
        let required = normalize(["Python", "Django"]);
        let preferred = normalize(["AWS"]);
        let resume = normalize(["Python", "Flask"]);
        let job = required.union(&preferred);
        let analysis = scorer.score(&resume, &job, &required, &preferred, 4.0, 3.0);
        MatchReport::new(analysis, ReportMetadata::new("cv.txt", "job.md"))
    }

    #[test]
    fn test_console_plain_output() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("RESUME MATCH ANALYSIS"));
        assert!(output.contains("[Consider Applying]"));
        assert!(output.contains("Missing (required) (1):"));
        assert!(output.contains("  • Django"));
        assert!(output.contains("Resume: cv.txt"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_console_target_and_error_sections() {
        let mut report = sample_report();
        report.target_plan = Some(TargetPlan {
            target_score: 90.0,
            current_score: 54.0,
            projected_score: 84.0,
            skills_needed: normalize(["Django", "AWS"]),
            reachable: false,
        });
        report.skills_added = normalize(["Django"]);
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(output.contains("Path to 90%"));
        assert!(output.contains("target not reachable"));
        assert!(output.contains("Added to resume (1):\n  • Django"));

        let failed = MatchReport::new(MatchAnalysis::failed("boom"), ReportMetadata::new("a", "b"));
        let output = ConsoleFormatter::new(false, false).format_report(&failed).unwrap();
        assert!(output.contains("[Error]"));
        assert!(output.contains("boom"));
        assert!(!output.contains("Score Breakdown"));
    }

    #[test]
    fn test_json_output() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["analysis"]["recommendation_level"], "Consider Applying");
        assert_eq!(value["analysis"]["color"], "orange");
        assert_eq!(value["analysis"]["missing_preferred_skills"][0], "AWS");
        assert!(value.get("target_plan").is_none());
        assert!(value.get("skills_added").is_none());
    }

    #[test]
    fn test_save_and_filenames() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("out.json");
        save_report_to_file("{}", &nested).unwrap();
        assert_eq!(std::fs::read_to_string(&nested).unwrap(), "{}");

        assert_eq!(suggest_filename(OutputFormat::Json, "docs/cv.md", false), "cv_match.json");
        let resolved = resolve_save_path(dir.path(), OutputFormat::Console, "cv.txt");
        assert!(resolved.starts_with(dir.path()));
        assert!(resolved.to_string_lossy().ends_with(".txt"));
    }
}

//! Plain-text extraction from supported document formats

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Render markdown as plain text, one block element per line.
///
/// Line structure matters downstream: experience estimation reads dates and
/// job titles line by line.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_) | Tag::TableRow) => {
                text.push('\n')
            }
            Event::End(Tag::TableCell) => text.push_str(" | "),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_markdown_blocks_become_lines() {
        let markdown = "# Jane Doe\n\n## Experience\n\n- **Senior Engineer**, Acme (2020-2023)\n- Developer at `Initech` 2017-2020\n\nLikes *Rust*\nand Go.\n";
        assert_eq!(
            markdown_to_text(markdown),
            "Jane Doe\nExperience\nSenior Engineer, Acme (2020-2023)\nDeveloper at Initech 2017-2020\nLikes Rust and Go."
        );
    }

    #[tokio::test]
    async fn test_extractors_read_files() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("resume.txt");
        let md = dir.path().join("job.md");
        std::fs::write(&txt, "Python developer\n").unwrap();
        std::fs::write(&md, "* Python\n* Docker\n").unwrap();

        assert_eq!(PlainTextExtractor.extract(&txt).await.unwrap(), "Python developer\n");
        assert_eq!(MarkdownExtractor.extract(&md).await.unwrap(), "Python\nDocker");
        assert!(PlainTextExtractor.extract(&dir.path().join("missing.txt")).await.is_err());
    }
}

//! Input manager routing files to the matching extractor

use crate::error::{Result, ResumeMatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Reading markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Pdf => {
                return Err(ResumeMatchError::UnsupportedFormat(format!(
                    "PDF input is not supported, convert {} to .txt or .md first",
                    path.display()
                )));
            }
            FileType::Unknown => {
                return Err(ResumeMatchError::UnsupportedFormat(format!(
                    "Expected a .txt or .md file: {}",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(ResumeMatchError::InvalidInput(format!(
                "File contains no text: {}",
                path.display()
            )));
        }

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_routing_and_cache() {
        let dir = TempDir::new().unwrap();
        let resume = dir.path().join("resume.md");
        std::fs::write(&resume, "# Jane\n\nRust developer").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.extract_text(&resume).await.unwrap(), "Jane\nRust developer");
        assert_eq!(manager.cache_size(), 1);

        std::fs::write(&resume, "changed").unwrap();
        assert_eq!(manager.extract_text(&resume).await.unwrap(), "Jane\nRust developer");

        manager.clear_cache();
        assert_eq!(manager.extract_text(&resume).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_rejected_inputs() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("resume.pdf");
        let empty = dir.path().join("empty.txt");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        std::fs::write(&empty, "  \n").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert!(matches!(
            manager.extract_text(&pdf).await,
            Err(ResumeMatchError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_text(&empty).await,
            Err(ResumeMatchError::InvalidInput(_))
        ));
        assert!(matches!(
            manager.extract_text(&dir.path().join("nope.txt")).await,
            Err(ResumeMatchError::InvalidInput(_))
        ));
    }
}

//! Completion-service integration

pub mod completion;
pub mod prompts;
pub mod response;

pub use completion::{ChatCompletionClient, CompletionService, OfflineCompletion, ScriptedCompletion};

pub mod builder;
pub mod template;

pub use builder::{ChatPrompt, PromptBuilder};

//! LabQuest AI gateway library
//!
//! Modules:
//! - `api`: Axum HTTP handlers and router setup used by the binary.
//! - `provider`: Chat-completion client, wire types and the transport trait.
//! - `prompt`: Prompt templates with `{{placeholder}}` rendering.
//! - `gateway`: Reply interpretation, fallback synthesis and the public operations.
//! - `models`: Request/result records shared with the UI layer.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `ChatClient`,
//! `PromptBuilder`, and `QuestionGateway`.
pub mod api;
pub mod provider;
pub mod prompt;
pub mod gateway;
pub mod models;
pub mod config;
pub mod error;

pub use config::Config;
pub use provider::client::ChatClient;
pub use prompt::builder::PromptBuilder;
pub use gateway::service::QuestionGateway;

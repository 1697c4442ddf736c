pub mod client;
pub mod scripted;
pub mod types;

pub use client::{ChatClient, ChatTransport};
pub use scripted::ScriptedTransport;

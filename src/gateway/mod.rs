pub mod fallback;
pub mod interpreter;
pub mod service;

pub use service::QuestionGateway;

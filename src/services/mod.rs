pub mod executor;
pub mod llm;
pub mod speech;

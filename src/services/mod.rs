pub mod llm;
pub mod prompts;
pub mod session;
pub mod variables;

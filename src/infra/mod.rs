pub mod llm;
pub mod process;
pub mod scripted;

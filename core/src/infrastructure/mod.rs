pub mod image;
pub mod llm;
pub mod preferences;

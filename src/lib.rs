pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod search;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use generator::context::GeneratorContext;
pub use generator::workflow::{Pipeline, launch};
pub use types::{CompanyInfo, ResearchState};

pub mod company;
pub mod state;

pub use company::{CompanyAnalysis, CompanyInfo, TriState, UNKNOWN};
pub use state::{ResearchState, StageOutput};

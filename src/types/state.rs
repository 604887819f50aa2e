use serde::{Deserialize, Serialize};

use crate::types::company::CompanyInfo;

/// 在流水线各阶段之间传递的调研状态
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ResearchState {
    query: String,
    pub extracted_tools: Vec<String>,
    pub company_info: Vec<CompanyInfo>,
    pub analysis: String,
}

/// 各阶段的产出，每个变体只对应它所负责的字段
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    ExtractedTools(Vec<String>),
    CompanyInfo(Vec<CompanyInfo>),
    Analysis(String),
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// 将阶段产出合并进状态
    pub fn apply(&mut self, output: StageOutput) {
        match output {
            StageOutput::ExtractedTools(tools) => self.extracted_tools = tools,
            StageOutput::CompanyInfo(companies) => self.company_info = companies,
            StageOutput::Analysis(analysis) => self.analysis = analysis,
        }
    }
}

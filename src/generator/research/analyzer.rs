use crate::generator::prompts;
use crate::llm::{ChatMessage, LanguageModel};
use crate::types::CompanyAnalysis;

/// 基于官网内容的结构化分析
pub struct ContentAnalyzer<'a> {
    llm: &'a dyn LanguageModel,
}

impl<'a> ContentAnalyzer<'a> {
    pub fn new(llm: &'a dyn LanguageModel) -> Self {
        Self { llm }
    }

    /// 分析失败时返回 [`CompanyAnalysis::unknown`]，调用方无需处理错误
    pub async fn analyze(&self, company_name: &str, content: &str) -> CompanyAnalysis {
        let messages = vec![
            ChatMessage::system(prompts::TOOL_ANALYSIS_SYSTEM),
            ChatMessage::user(prompts::tool_analysis_user(company_name, content)),
        ];

        match self.llm.complete_structured(&messages).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(company = company_name, error = %format!("{:#}", e), "content analysis failed, using unknown defaults");
                CompanyAnalysis::unknown()
            }
        }
    }
}

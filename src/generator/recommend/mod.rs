//! 推荐阶段：基于调研记录生成简短的推荐结论

use anyhow::Result;

use crate::generator::context::GeneratorContext;
use crate::generator::prompts;
use crate::generator::types::Stage;
use crate::generator::workflow::TimingKeys;
use crate::llm::ChatMessage;
use crate::types::{CompanyInfo, ResearchState, StageOutput};

#[derive(Default)]
pub struct RecommendationStage;

impl Stage for RecommendationStage {
    fn name(&self) -> &'static str {
        TimingKeys::RECOMMEND
    }

    async fn execute(
        &self,
        context: &GeneratorContext,
        state: &ResearchState,
    ) -> Result<StageOutput> {
        tracing::info!(companies = state.company_info.len(), "generating recommendations");

        let company_data = serialize_companies(&state.company_info)?;
        let messages = vec![
            ChatMessage::system(prompts::RECOMMENDATIONS_SYSTEM),
            ChatMessage::user(prompts::recommendations_user(state.query(), &company_data)),
        ];
        let analysis = context.llm.complete(&messages).await?;

        Ok(StageOutput::Analysis(analysis))
    }

    fn degraded(
        &self,
        _context: &GeneratorContext,
        _state: &ResearchState,
        error: &anyhow::Error,
    ) -> StageOutput {
        tracing::error!(error = %format!("{:#}", error), "recommendation failed");
        StageOutput::Analysis(format!("Recommendation unavailable: {:#}", error))
    }
}

/// 按顺序将每条记录序列化为 JSON，并以 ", " 连接
pub fn serialize_companies(companies: &[CompanyInfo]) -> Result<String> {
    let serialized = companies
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serialized.join(", "))
}

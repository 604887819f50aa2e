//! 工具发现阶段：从对比类文章中找出候选工具名称

use anyhow::Result;

use crate::generator::context::GeneratorContext;
use crate::generator::prompts;
use crate::generator::types::Stage;
use crate::generator::workflow::TimingKeys;
use crate::llm::ChatMessage;
use crate::search::ScrapeFormat;
use crate::types::{ResearchState, StageOutput};
use crate::utils::text::truncate_chars;

#[derive(Default)]
pub struct ToolExtractionStage;

impl Stage for ToolExtractionStage {
    fn name(&self) -> &'static str {
        TimingKeys::EXTRACT_TOOLS
    }

    async fn execute(
        &self,
        context: &GeneratorContext,
        state: &ResearchState,
    ) -> Result<StageOutput> {
        tracing::info!(query = state.query(), "finding tools from articles");

        let all_content = self.collect_article_content(context, state.query()).await?;
        if all_content.trim().is_empty() {
            tracing::warn!("no article content collected, skipping tool extraction");
            return Ok(StageOutput::ExtractedTools(vec![]));
        }

        let messages = vec![
            ChatMessage::system(prompts::TOOL_EXTRACTION_SYSTEM),
            ChatMessage::user(prompts::tool_extraction_user(state.query(), &all_content)),
        ];
        let response = context.llm.complete(&messages).await?;
        let tool_names = parse_tool_names(&response);

        tracing::info!(tools = %tool_names.join(", "), "extracted tools");
        Ok(StageOutput::ExtractedTools(tool_names))
    }

    fn degraded(
        &self,
        _context: &GeneratorContext,
        _state: &ResearchState,
        error: &anyhow::Error,
    ) -> StageOutput {
        tracing::error!(error = %format!("{:#}", error), "tool extraction failed");
        StageOutput::ExtractedTools(vec![])
    }
}

impl ToolExtractionStage {
    /// 搜索对比文章并拼接正文片段，优先使用搜索结果自带的内容，否则抓取页面
    pub(crate) async fn collect_article_content(
        &self,
        context: &GeneratorContext,
        query: &str,
    ) -> Result<String> {
        let pipeline = &context.config.pipeline;
        let article_query = format!("{} tools and comparison and the best alternatives", query);
        let response = context
            .search
            .search(&article_query, pipeline.extraction_results)
            .await?;

        let mut all_content = String::new();
        for item in response.items() {
            let Some(url) = item.url.as_deref() else {
                continue;
            };
            if is_blocked(url, &pipeline.blocked_domains) {
                tracing::debug!(url, "skipping blocked domain");
                continue;
            }

            if let Some(text) = item.content_text.as_deref().filter(|t| !t.trim().is_empty()) {
                push_snippet(&mut all_content, text, pipeline.snippet_chars);
                continue;
            }

            match context.scraper.scrape(url, &[ScrapeFormat::Markdown]).await {
                Ok(scraped) => {
                    if let Some(markdown) = scraped.markdown() {
                        push_snippet(&mut all_content, &markdown, pipeline.snippet_chars);
                    }
                }
                Err(e) => tracing::warn!(url, error = %e, "scrape failed, skipping article"),
            }
        }

        Ok(all_content)
    }
}

/// url 是否包含任一被屏蔽的域名
pub fn is_blocked(url: &str, blocked_domains: &[String]) -> bool {
    blocked_domains
        .iter()
        .any(|domain| url.contains(domain.as_str()))
}

fn push_snippet(buffer: &mut String, text: &str, max_chars: usize) {
    buffer.push_str(truncate_chars(text, max_chars));
    buffer.push_str("\n\n");
}

/// 每行一个工具名；保留顺序与重复项
pub fn parse_tool_names(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

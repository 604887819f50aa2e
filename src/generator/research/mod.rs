//! 调研阶段：为每个候选工具查找官网、抓取页面并做结构化分析
//!
//! 每个工具的调研相互独立，经 [`do_parallel_with_limit`] 以有限并发执行，
//! 结果顺序与选定的工具顺序一致。

use anyhow::{Result, anyhow};
use std::time::Duration;
use tokio::time::{Instant, timeout_at};

use crate::config::PipelineConfig;
use crate::generator::context::GeneratorContext;
use crate::generator::types::Stage;
use crate::generator::workflow::TimingKeys;
use crate::search::ScrapeFormat;
use crate::types::{CompanyAnalysis, CompanyInfo, ResearchState, StageOutput, UNKNOWN};
use crate::utils::threads::do_parallel_with_limit;

pub mod analyzer;

pub use analyzer::ContentAnalyzer;

#[derive(Default)]
pub struct ResearchStage;

impl Stage for ResearchStage {
    fn name(&self) -> &'static str {
        TimingKeys::RESEARCH
    }

    /// 各工具各自限时，已完成的记录不会因整体超时而丢失
    fn timeout(&self, _pipeline: &PipelineConfig) -> Option<Duration> {
        None
    }

    async fn execute(
        &self,
        context: &GeneratorContext,
        state: &ResearchState,
    ) -> Result<StageOutput> {
        let selection_timeout = Duration::from_secs(context.config.pipeline.stage_timeout_seconds);
        let tool_names = tokio::time::timeout(selection_timeout, self.select_tool_names(context, state))
            .await
            .map_err(|_| {
                anyhow!(
                    "tool selection timed out after {}s",
                    selection_timeout.as_secs()
                )
            })?;
        tracing::info!(
            tools = %tool_names.join(", "),
            max_parallels = context.config.pipeline.max_parallels,
            "researching tools"
        );

        let futures = tool_names
            .iter()
            .map(|name| self.research_tool(context, name))
            .collect();
        let companies = do_parallel_with_limit(futures, context.config.pipeline.max_parallels).await;

        Ok(StageOutput::CompanyInfo(companies))
    }

    fn degraded(
        &self,
        context: &GeneratorContext,
        state: &ResearchState,
        error: &anyhow::Error,
    ) -> StageOutput {
        tracing::error!(error = %format!("{:#}", error), "research failed, keeping unenriched records");
        let companies = selected_from_extracted(state, context.config.pipeline.max_tools)
            .unwrap_or_else(|| vec![UNKNOWN.to_string()])
            .into_iter()
            .map(|name| CompanyInfo::new(name, "", ""))
            .collect();
        StageOutput::CompanyInfo(companies)
    }
}

impl ResearchStage {
    /// 选出待调研的工具：优先使用抽取结果，否则用原始查询搜索标题，最后兜底为 Unknown
    pub async fn select_tool_names(
        &self,
        context: &GeneratorContext,
        state: &ResearchState,
    ) -> Vec<String> {
        let pipeline = &context.config.pipeline;
        if let Some(names) = selected_from_extracted(state, pipeline.max_tools) {
            return names;
        }

        tracing::warn!("no extracted tools, falling back to direct search results");
        let titles: Vec<String> = match context
            .search
            .search(state.query(), pipeline.fallback_results)
            .await
        {
            Ok(response) => response
                .items()
                .into_iter()
                .filter_map(|item| item.title)
                .take(pipeline.max_tools)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "fallback search failed");
                vec![]
            }
        };

        if titles.is_empty() {
            vec![UNKNOWN.to_string()]
        } else {
            titles
        }
    }

    /// 调研单个工具；搜索、抓取失败或超时只会让记录保持未增强状态
    pub async fn research_tool(&self, context: &GeneratorContext, tool_name: &str) -> CompanyInfo {
        let budget = Duration::from_secs(context.config.pipeline.tool_timeout_seconds);
        let deadline = Instant::now() + budget;

        let (mut company, url) = match timeout_at(deadline, self.lookup_company(context, tool_name)).await {
            Ok(found) => found,
            Err(_) => {
                tracing::warn!(tool = tool_name, "official website search timed out");
                return CompanyInfo::new(tool_name, "", "");
            }
        };

        let Some(url) = url else {
            tracing::debug!(tool = tool_name, "no official website found");
            return company;
        };

        match timeout_at(deadline, self.analyze_website(context, tool_name, &url)).await {
            Ok(Some(analysis)) => company.enrich(analysis),
            Ok(None) => {}
            Err(_) => tracing::warn!(
                tool = tool_name,
                timeout_seconds = budget.as_secs(),
                "website analysis timed out, keeping search details"
            ),
        }

        company
    }

    /// 搜索官网，立即用首条结果的地址与描述建立记录
    async fn lookup_company(
        &self,
        context: &GeneratorContext,
        tool_name: &str,
    ) -> (CompanyInfo, Option<String>) {
        let query = format!("{} official website", tool_name);
        let first = match context.search.search(&query, 1).await {
            Ok(response) => response.items().into_iter().next(),
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "official website search failed");
                None
            }
        };

        let (url, description) = first
            .map(|item| (item.url, item.content_text))
            .unwrap_or_default();
        let company = CompanyInfo::new(
            tool_name,
            description.unwrap_or_default(),
            url.clone().unwrap_or_default(),
        );
        (company, url)
    }

    /// 抓取官网并做结构化分析；页面没有内容时返回 `None`
    async fn analyze_website(
        &self,
        context: &GeneratorContext,
        tool_name: &str,
        url: &str,
    ) -> Option<CompanyAnalysis> {
        let markdown = match context.scraper.scrape(url, &[ScrapeFormat::Markdown]).await {
            Ok(scraped) => scraped.markdown(),
            Err(e) => {
                tracing::warn!(tool = tool_name, url, error = %e, "scrape failed");
                None
            }
        }?;

        Some(
            ContentAnalyzer::new(context.llm.as_ref())
                .analyze(tool_name, &markdown)
                .await,
        )
    }
}

fn selected_from_extracted(state: &ResearchState, max_tools: usize) -> Option<Vec<String>> {
    if state.extracted_tools.is_empty() {
        return None;
    }
    Some(
        state
            .extracted_tools
            .iter()
            .take(max_tools)
            .cloned()
            .collect(),
    )
}

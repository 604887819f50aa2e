//! 搜索与抓取服务 - 流水线依赖的外部协作者接口

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

mod firecrawl;
pub mod normalize;

pub use firecrawl::{FirecrawlClient, FirecrawlError};
pub use normalize::{RawScrapeResponse, RawSearchResponse, SearchItem};

/// 抓取时请求的内容格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeFormat {
    Markdown,
}

#[async_trait]
pub trait SearchService: Send + Sync {
    /// 执行网页搜索，最多返回 `limit` 条结果
    async fn search(&self, query: &str, limit: usize) -> Result<RawSearchResponse>;
}

#[async_trait]
pub trait ScrapeService: Send + Sync {
    /// 抓取单个页面
    async fn scrape(&self, url: &str, formats: &[ScrapeFormat]) -> Result<RawScrapeResponse>;
}

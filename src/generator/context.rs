use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::Config,
    llm::{LLMClient, LanguageModel},
    search::{FirecrawlClient, ScrapeService, SearchService},
};

/// 流水线运行所需的配置与外部协作者
#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 语言模型
    pub llm: Arc<dyn LanguageModel>,
    /// 网页搜索
    pub search: Arc<dyn SearchService>,
    /// 页面抓取
    pub scraper: Arc<dyn ScrapeService>,
}

impl GeneratorContext {
    /// 使用 rig LLM 客户端与 Firecrawl 创建上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm = Arc::new(LLMClient::new(config.llm.clone())?);
        let firecrawl = Arc::new(FirecrawlClient::new(&config.search)?);

        Ok(Self::with_services(config, llm, firecrawl.clone(), firecrawl))
    }

    /// 注入自定义的协作者实现
    pub fn with_services(
        config: Config,
        llm: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchService>,
        scraper: Arc<dyn ScrapeService>,
    ) -> Self {
        Self {
            config,
            llm,
            search,
            scraper,
        }
    }
}

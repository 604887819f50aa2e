use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// devscout - 面向开发者的工具调研助手
#[derive(Parser, Debug)]
#[command(name = "devscout")]
#[command(
    about = "Researches developer tools for a query: finds candidate tools in comparison articles, analyzes their official websites and recommends one."
)]
#[command(version)]
pub struct Args {
    /// 调研的问题，例如 "vector databases"
    pub query: String,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// LLM Provider (openai, anthropic, deepseek, openrouter, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 高能效模型，用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于长上下文任务，以及作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Firecrawl API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 调研阶段的最大并发数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// 以 JSON 输出完整的调研状态
    #[arg(long)]
    pub json: bool,

    /// 运行前检查模型连接
    #[arg(long)]
    pub check: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(e) => tracing::warn!("{}, keeping provider {}", e, config.llm.provider),
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖搜索与流水线配置
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.pipeline.max_parallels = max_parallels;
        }

        config.verbose = config.verbose || self.verbose;
        config.check_connection = config.check_connection || self.check;

        Ok(config)
    }
}

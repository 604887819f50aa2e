use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "devscout.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "groq" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 启动阶段的致命配置错误
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing FIRECRAWL_API_KEY: set the environment variable, `search.api_key` in devscout.toml, or pass --search-api-key")]
    MissingSearchApiKey,
    #[error("pipeline.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索/抓取服务配置
    pub search: SearchConfig,

    /// 流水线参数
    pub pipeline: PipelineConfig,

    /// 是否启用详细日志
    pub verbose: bool,

    /// 运行前是否检查模型连接
    pub check_connection: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 常规任务使用的模型
    pub model_efficient: String,

    /// 长输入使用的模型，同时作为efficient失败后的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,
}

/// 搜索/抓取服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Firecrawl API KEY
    pub api_key: String,

    /// Firecrawl API基地址
    pub api_base_url: String,

    /// 每次搜索都会追加的查询后缀
    pub query_suffix: String,

    /// 单次HTTP请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 流水线参数
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// 工具发现阶段的搜索结果数
    pub extraction_results: usize,

    /// 没有候选工具时兜底搜索的结果数
    pub fallback_results: usize,

    /// 调研的工具数上限
    pub max_tools: usize,

    /// 每条内容写入提取缓冲区的最大字符数
    pub snippet_chars: usize,

    /// 不参与工具发现的域名
    pub blocked_domains: Vec<String>,

    /// 调研阶段的最大并发数，1 表示逐个处理
    pub max_parallels: usize,

    /// 单个阶段的超时时间（秒）；调研阶段只用于工具选择
    pub stage_timeout_seconds: u64,

    /// 调研单个工具的时间上限（秒），超时保留搜索得到的官网与描述
    pub tool_timeout_seconds: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 校验启动所必需的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.api_key.trim().is_empty() {
            return Err(ConfigError::MissingSearchApiKey);
        }
        let pipeline = &self.pipeline;
        for (name, value) in [
            ("extraction_results", pipeline.extraction_results),
            ("fallback_results", pipeline.fallback_results),
            ("max_tools", pipeline.max_tools),
            ("snippet_chars", pipeline.snippet_chars),
            ("max_parallels", pipeline.max_parallels),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(name));
            }
        }
        if pipeline.tool_timeout_seconds == 0 {
            return Err(ConfigError::ZeroLimit("tool_timeout_seconds"));
        }
        Ok(())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.groq.com/openai/v1"),
            model_efficient: String::from("openai/gpt-oss-20b"),
            model_powerful: String::from("openai/gpt-oss-120b"),
            max_tokens: 8192,
            temperature: 0.4,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("FIRECRAWL_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.firecrawl.dev"),
            query_suffix: String::from("and company pricing official website"),
            timeout_seconds: 60,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extraction_results: 5,
            fallback_results: 4,
            max_tools: 4,
            snippet_chars: 1500,
            blocked_domains: vec![
                "reddit.com".to_string(),
                "redd.it".to_string(),
                "linkedin.com".to_string(),
                "x.com".to_string(),
                "twitter.com".to_string(),
                "youtube.com".to_string(),
                "tiktok.com".to_string(),
            ],
            max_parallels: 3,
            stage_timeout_seconds: 600,
            tool_timeout_seconds: 240,
        }
    }
}

//! rig provider 适配：按配置创建客户端，并把各家的 Agent/Extractor 收敛成统一枚举

use anyhow::Result;
use rig::{agent::Agent, client::CompletionClient, completion::Prompt, extractor::Extractor};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{LLMConfig, LLMProvider};

type OllamaModel = rig::providers::ollama::CompletionModel<reqwest::Client>;

/// 对各 provider 变体做同样的处理
macro_rules! for_each_provider {
    ($value:expr, $kind:ident, $inner:ident => $body:expr) => {
        match $value {
            $kind::OpenAI($inner) => $body,
            $kind::Anthropic($inner) => $body,
            $kind::DeepSeek($inner) => $body,
            $kind::OpenRouter($inner) => $body,
            $kind::Ollama($inner) => $body,
        }
    };
}

/// 统一设置 preamble 与采样参数
macro_rules! finish_agent {
    ($builder:expr, $system_prompt:expr, $config:expr) => {
        $builder
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .temperature($config.temperature)
            .build()
    };
}

macro_rules! finish_extractor {
    ($builder:expr, $system_prompt:expr, $config:expr) => {
        $builder
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .build()
    };
}

#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Anthropic(rig::providers::anthropic::Client),
    DeepSeek(rig::providers::deepseek::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let key = config.api_key.as_str();
        let client = match config.provider {
            // Groq 等 OpenAI 兼容服务都走这里，基地址来自配置
            LLMProvider::OpenAI => ProviderClient::OpenAI(
                rig::providers::openai::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::Anthropic => ProviderClient::Anthropic(
                rig::providers::anthropic::ClientBuilder::new(key).build()?,
            ),
            LLMProvider::DeepSeek => ProviderClient::DeepSeek(
                rig::providers::deepseek::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::OpenRouter => ProviderClient::OpenRouter(
                rig::providers::openrouter::Client::builder(key).build(),
            ),
            LLMProvider::Ollama => {
                ProviderClient::Ollama(rig::providers::ollama::Client::builder().build())
            }
        };
        Ok(client)
    }

    pub fn create_agent(&self, model: &str, system_prompt: &str, config: &LLMConfig) -> ProviderAgent {
        match self {
            // Groq 不支持 responses API，固定使用 chat completions
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(finish_agent!(
                client.completion_model(model).completions_api().into_agent_builder(),
                system_prompt,
                config
            )),
            ProviderClient::Anthropic(client) => {
                ProviderAgent::Anthropic(finish_agent!(client.agent(model), system_prompt, config))
            }
            ProviderClient::DeepSeek(client) => {
                ProviderAgent::DeepSeek(finish_agent!(client.agent(model), system_prompt, config))
            }
            ProviderClient::OpenRouter(client) => {
                ProviderAgent::OpenRouter(finish_agent!(client.agent(model), system_prompt, config))
            }
            ProviderClient::Ollama(client) => {
                ProviderAgent::Ollama(finish_agent!(client.agent(model), system_prompt, config))
            }
        }
    }

    pub fn create_extractor<T>(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> ProviderExtractor<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        match self {
            ProviderClient::OpenAI(client) => ProviderExtractor::OpenAI(finish_extractor!(
                client.extractor_completions_api::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::Anthropic(client) => ProviderExtractor::Anthropic(finish_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::DeepSeek(client) => ProviderExtractor::DeepSeek(finish_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::OpenRouter(client) => ProviderExtractor::OpenRouter(finish_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::Ollama(client) => ProviderExtractor::Ollama(finish_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
        }
    }
}

pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Ollama(Agent<OllamaModel>),
}

impl ProviderAgent {
    /// 单轮对话，不带工具与历史
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        for_each_provider!(self, ProviderAgent, agent => Ok(agent.prompt(prompt).await?))
    }
}

pub enum ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    OpenAI(Extractor<rig::providers::openai::CompletionModel, T>),
    Anthropic(Extractor<rig::providers::anthropic::completion::CompletionModel, T>),
    DeepSeek(Extractor<rig::providers::deepseek::CompletionModel, T>),
    OpenRouter(Extractor<rig::providers::openrouter::CompletionModel, T>),
    Ollama(Extractor<OllamaModel, T>),
}

impl<T> ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    pub async fn extract(&self, prompt: &str) -> Result<T> {
        for_each_provider!(self, ProviderExtractor, extractor => Ok(extractor.extract(prompt).await?))
    }
}

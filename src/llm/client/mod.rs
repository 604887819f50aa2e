//! LLM客户端 - 基于 rig 的 [`LanguageModel`] 实现

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::{
    config::LLMConfig,
    llm::LanguageModel,
    llm::client::utils::evaluate_befitting_model,
    types::CompanyAnalysis,
};

mod providers;
pub mod types;
pub mod utils;

use providers::ProviderClient;
use types::{ChatMessage, split_messages};

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        tracing::info!(provider = %self.config.provider, model = %self.config.model_efficient, "checking model connection");
        match self
            .prompt_without_tools("You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                tracing::info!("model connection ok");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "model connection failed");
                Err(e)
            }
        }
    }

    /// 通用重试逻辑；每次尝试都受单次调用超时约束
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let call_timeout = Duration::from_secs(self.config.timeout_seconds);
        let mut retries = 0;

        loop {
            let outcome = match tokio::time::timeout(call_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "model call timed out after {}s",
                    call_timeout.as_secs()
                )),
            };
            match outcome {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    tracing::warn!(
                        attempt = retries,
                        max_attempts = max_retries,
                        error = %err,
                        "model call failed"
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    /// 结构化数据提取；首选模型多次失败后切换到兜底模型，并把错误信息带入提示词
    pub async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config, system_prompt, user_prompt);

        let mut user_prompt = user_prompt.to_string();
        let mut last_error = None;

        for model in std::iter::once(befitting_model).chain(fallover_model) {
            let extractor = self
                .client
                .create_extractor::<T>(&model, system_prompt, &self.config);

            let prompt = user_prompt.as_str();
            let outcome = self
                .retry_with_backoff(|| async { extractor.extract(prompt).await })
                .await;
            match outcome {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "structured extraction failed");
                    user_prompt = format!(
                        "{}\n\nNote: a previous attempt failed with \"{}\". Make sure the output matches the schema.",
                        user_prompt, e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("no model available for extraction")))
    }

    /// 单轮对话（不使用工具）
    pub async fn prompt_without_tools(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let (model, _) = evaluate_befitting_model(&self.config, system_prompt, user_prompt);
        let agent = self
            .client
            .create_agent(&model, system_prompt, &self.config);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let (system_prompt, user_prompt) = split_messages(messages);
        self.prompt_without_tools(&system_prompt, &user_prompt).await
    }

    async fn complete_structured(&self, messages: &[ChatMessage]) -> Result<CompanyAnalysis> {
        let (system_prompt, user_prompt) = split_messages(messages);
        self.extract::<CompanyAnalysis>(&system_prompt, &user_prompt)
            .await
    }
}

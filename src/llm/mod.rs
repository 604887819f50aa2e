use anyhow::Result;
use async_trait::async_trait;

use crate::types::CompanyAnalysis;

pub mod client;

pub use client::LLMClient;
pub use client::types::{ChatMessage, Role};

/// 流水线使用的语言模型接口
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 文本补全，返回模型的原始回复
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// 结构化输出，回复必须符合 [`CompanyAnalysis`] 的 schema
    async fn complete_structured(&self, messages: &[ChatMessage]) -> Result<CompanyAnalysis>;
}

use std::fmt::{Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 三值布尔：区分“未确定”与“否”
///
/// 序列化为 JSON 的 `true` / `false` / `null`，与结构化输出的 schema 保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::Yes,
            Some(false) => TriState::No,
            None => TriState::Unknown,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unknown => None,
        }
    }
}

impl Display for TriState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TriState::Yes => write!(f, "Yes"),
            TriState::No => write!(f, "No"),
            TriState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// 未能确定时使用的占位文本
pub const UNKNOWN: &str = "Unknown";

/// 从官网内容中抽取的结构化分析结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct CompanyAnalysis {
    /// 定价模式，例如 Free、Freemium、Paid、Enterprise；无法判断时为 Unknown
    #[serde(default = "unknown_text")]
    pub pricing_model: String,
    /// 是否开源；无法判断时为 null
    #[serde(default)]
    #[schemars(with = "Option<bool>")]
    pub is_open_source: TriState,
    /// 使用或支持的技术栈
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// 一句话的产品描述
    #[serde(default)]
    pub description: String,
    /// 是否提供 API/SDK；无法判断时为 null
    #[serde(default)]
    #[schemars(with = "Option<bool>")]
    pub api_available: TriState,
    /// 支持的编程语言
    #[serde(default)]
    pub language_support: Vec<String>,
    /// 可集成的工具或平台
    #[serde(default)]
    pub integration_capabilities: Vec<String>,
}

fn unknown_text() -> String {
    UNKNOWN.to_string()
}

impl CompanyAnalysis {
    /// 分析失败时的统一默认值
    pub fn unknown() -> Self {
        Self {
            pricing_model: unknown_text(),
            is_open_source: TriState::Unknown,
            tech_stack: vec![],
            description: unknown_text(),
            api_available: TriState::Unknown,
            language_support: vec![],
            integration_capabilities: vec![],
        }
    }
}

/// 单个工具/公司的调研记录
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompanyInfo {
    pub name: String,
    pub description: String,
    pub website: String,
    pub pricing_model: String,
    pub is_open_source: TriState,
    pub api_available: TriState,
    pub tech_stack: Vec<String>,
    pub language_support: Vec<String>,
    pub integration_capabilities: Vec<String>,
    /// 预留字段，目前没有任何阶段填充
    pub competitors: Vec<String>,
}

impl CompanyInfo {
    /// 以搜索得到的描述和官网创建未增强的记录
    pub fn new(name: impl Into<String>, description: impl Into<String>, website: impl Into<String>) -> Self {
        let defaults = CompanyAnalysis::unknown();
        Self {
            name: name.into(),
            description: description.into(),
            website: website.into(),
            pricing_model: defaults.pricing_model,
            is_open_source: defaults.is_open_source,
            api_available: defaults.api_available,
            tech_stack: defaults.tech_stack,
            language_support: defaults.language_support,
            integration_capabilities: defaults.integration_capabilities,
            competitors: vec![],
        }
    }

    /// 合并内容分析结果；description 仅在分析结果非空时覆盖
    pub fn enrich(&mut self, analysis: CompanyAnalysis) {
        self.is_open_source = analysis.is_open_source;
        self.pricing_model = analysis.pricing_model;
        self.api_available = analysis.api_available;
        self.tech_stack = analysis.tech_stack;
        self.language_support = analysis.language_support;
        self.integration_capabilities = analysis.integration_capabilities;
        if !analysis.description.is_empty() {
            self.description = analysis.description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state_serializes_as_nullable_bool() {
        assert_eq!(serde_json::to_string(&TriState::Yes).unwrap(), "true");
        assert_eq!(serde_json::to_string(&TriState::No).unwrap(), "false");
        assert_eq!(serde_json::to_string(&TriState::Unknown).unwrap(), "null");

        let parsed: TriState = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, TriState::Unknown);
    }

    #[test]
    fn test_analysis_tolerates_missing_fields() {
        let analysis: CompanyAnalysis =
            serde_json::from_str(r#"{"is_open_source": true, "tech_stack": ["Rust"]}"#).unwrap();

        assert_eq!(analysis.is_open_source, TriState::Yes);
        assert_eq!(analysis.api_available, TriState::Unknown);
        assert_eq!(analysis.pricing_model, "Unknown");
        assert_eq!(analysis.tech_stack, vec!["Rust".to_string()]);
        assert!(analysis.description.is_empty());
    }

    #[test]
    fn test_new_company_uses_unknown_defaults() {
        let company = CompanyInfo::new("Qdrant", "Vector search engine", "https://qdrant.tech");

        assert_eq!(company.pricing_model, "Unknown");
        assert_eq!(company.is_open_source, TriState::Unknown);
        assert_eq!(company.api_available, TriState::Unknown);
        assert!(company.tech_stack.is_empty());
        assert!(company.competitors.is_empty());
    }

    #[test]
    fn test_enrich_keeps_description_when_analysis_is_blank() {
        let mut company = CompanyInfo::new("Weaviate", "from search", "https://weaviate.io");
        let analysis = CompanyAnalysis {
            pricing_model: "Freemium".to_string(),
            is_open_source: TriState::Yes,
            tech_stack: vec!["Go".to_string()],
            description: String::new(),
            api_available: TriState::No,
            language_support: vec!["Python".to_string()],
            integration_capabilities: vec!["LangChain".to_string()],
        };

        company.enrich(analysis);

        assert_eq!(company.description, "from search");
        assert_eq!(company.pricing_model, "Freemium");
        assert_eq!(company.is_open_source, TriState::Yes);
        assert_eq!(company.api_available, TriState::No);
        assert_eq!(company.integration_capabilities, vec!["LangChain".to_string()]);
    }
}

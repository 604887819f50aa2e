//! 搜索/抓取响应的归一化
//!
//! 外部服务返回的结构并不统一：可能直接是条目数组，可能是带 `web`/`data` 字段的映射，
//! 也可能是带 `web` 属性的类型化对象。这里在服务边界一次性选定适配器，
//! 下游只消费 [`SearchItem`]。

use serde_json::{Map, Value};

const URL_KEYS: [&str; 2] = ["url", "link"];
const CONTENT_KEYS: [&str; 4] = ["markdown", "content", "snippet", "description"];

/// 归一化后的搜索条目
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchItem {
    pub url: Option<String>,
    pub title: Option<String>,
    pub content_text: Option<String>,
}

impl SearchItem {
    fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self {
                url: first_text(object, &URL_KEYS),
                title: first_text(object, &["title"]),
                content_text: first_text(object, &CONTENT_KEYS),
            },
            None => Self::default(),
        }
    }
}

/// 暴露 `web` 属性的类型化搜索结果
///
/// 条目保持原始 JSON，逐条归一化；单个条目字段类型不符不会影响其他条目。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchData {
    pub web: Vec<Value>,
}

/// 搜索服务的原始响应
#[derive(Debug, Clone, PartialEq)]
pub enum RawSearchResponse {
    /// 直接就是条目数组
    Sequence(Vec<Value>),
    /// 带 `web` 或 `data` 字段的映射
    Mapping(Map<String, Value>),
    /// 带 `web` 属性的类型化对象
    Object(SearchData),
    Empty,
}

impl RawSearchResponse {
    /// 根据 JSON 的形状选定适配器
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => RawSearchResponse::Sequence(items),
            Value::Object(object) => {
                let envelope_web = object
                    .get("data")
                    .and_then(|data| data.get("web"))
                    .and_then(Value::as_array)
                    .filter(|web| !web.is_empty())
                    .cloned();
                match envelope_web {
                    Some(web) => RawSearchResponse::Object(SearchData { web }),
                    None => RawSearchResponse::Mapping(object),
                }
            }
            _ => RawSearchResponse::Empty,
        }
    }

    /// 转换为统一的条目列表，缺失字段不会报错
    pub fn items(&self) -> Vec<SearchItem> {
        match self {
            RawSearchResponse::Sequence(items) => items.iter().map(SearchItem::from_value).collect(),
            RawSearchResponse::Mapping(object) => ["web", "data"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_array).filter(|v| !v.is_empty()))
                .map(|items| items.iter().map(SearchItem::from_value).collect())
                .unwrap_or_default(),
            RawSearchResponse::Object(data) => data.web.iter().map(SearchItem::from_value).collect(),
            RawSearchResponse::Empty => vec![],
        }
    }
}

/// 抓取得到的类型化文档
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeDocument {
    pub markdown: Option<String>,
}

/// 抓取服务的原始响应
#[derive(Debug, Clone, PartialEq)]
pub enum RawScrapeResponse {
    Document(ScrapeDocument),
    Mapping(Map<String, Value>),
    Empty,
}

impl RawScrapeResponse {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(object) => {
                let document_markdown = object
                    .get("data")
                    .and_then(Value::as_object)
                    .and_then(|data| first_text(data, &["markdown"]));
                match document_markdown {
                    Some(markdown) => RawScrapeResponse::Document(ScrapeDocument {
                        markdown: Some(markdown),
                    }),
                    None => RawScrapeResponse::Mapping(object),
                }
            }
            _ => RawScrapeResponse::Empty,
        }
    }

    /// 页面的 markdown：顶层 `markdown`，否则取 `data` 数组首个元素的 `markdown`/`content`
    pub fn markdown(&self) -> Option<String> {
        match self {
            RawScrapeResponse::Document(document) => non_empty(document.markdown.as_deref()),
            RawScrapeResponse::Mapping(object) => first_text(object, &["markdown"]).or_else(|| {
                object
                    .get("data")
                    .and_then(Value::as_array)
                    .and_then(|data| data.first())
                    .and_then(Value::as_object)
                    .and_then(|first| first_text(first, &["markdown", "content"]))
            }),
            RawScrapeResponse::Empty => None,
        }
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| non_empty(object.get(*key).and_then(Value::as_str)))
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_string)
}

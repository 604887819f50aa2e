// Scripted collaborators for stage and pipeline tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::llm::{ChatMessage, LanguageModel};
use crate::search::{RawScrapeResponse, RawSearchResponse, ScrapeFormat, ScrapeService, SearchService};
use crate::types::CompanyAnalysis;

// =============================================================================
// Search
// =============================================================================

#[derive(Default)]
pub struct FakeSearch {
    responses: HashMap<String, Value>,
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, query: &str, response: Value) -> Self {
        self.responses.insert(query.to_string(), response);
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for FakeSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<RawSearchResponse> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        if self.failing.contains(query) {
            return Err(anyhow!("search failed for {}", query));
        }
        Ok(self
            .responses
            .get(query)
            .cloned()
            .map(RawSearchResponse::from_value)
            .unwrap_or(RawSearchResponse::Empty))
    }
}

// =============================================================================
// Scrape
// =============================================================================

#[derive(Default)]
pub struct FakeScraper {
    pages: HashMap<String, Value>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markdown(mut self, url: &str, markdown: &str) -> Self {
        self.pages
            .insert(url.to_string(), serde_json::json!({ "markdown": markdown }));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScrapeService for FakeScraper {
    async fn scrape(&self, url: &str, _formats: &[ScrapeFormat]) -> Result<RawScrapeResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(anyhow!("scrape failed for {}", url));
        }
        Ok(self
            .pages
            .get(url)
            .cloned()
            .map(RawScrapeResponse::from_value)
            .unwrap_or(RawScrapeResponse::Empty))
    }
}

// =============================================================================
// Language model
// =============================================================================

pub struct FakeLanguageModel {
    completions: Mutex<VecDeque<Result<String, String>>>,
    analysis: Result<CompanyAnalysis, String>,
    delay: Option<Duration>,
    analysis_delays: Vec<(String, Duration)>,
    completion_calls: Mutex<Vec<Vec<ChatMessage>>>,
    structured_calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Default for FakeLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLanguageModel {
    pub fn new() -> Self {
        Self {
            completions: Mutex::new(VecDeque::new()),
            analysis: Err("no scripted analysis".to_string()),
            delay: None,
            analysis_delays: vec![],
            completion_calls: Mutex::new(vec![]),
            structured_calls: Mutex::new(vec![]),
        }
    }

    pub fn with_completion(self, text: &str) -> Self {
        self.completions
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn with_completion_error(self, message: &str) -> Self {
        self.completions
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_analysis(mut self, analysis: CompanyAnalysis) -> Self {
        self.analysis = Ok(analysis);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 分析指定工具时先等待 `delay`
    pub fn with_analysis_delay(mut self, company_name: &str, delay: Duration) -> Self {
        self.analysis_delays
            .push((format!("Company/Tool: {}\n", company_name), delay));
        self
    }

    pub fn completion_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.completion_calls.lock().unwrap().clone()
    }

    pub fn structured_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.structured_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.completion_calls.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.completions.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted completion")),
        }
    }

    async fn complete_structured(&self, messages: &[ChatMessage]) -> Result<CompanyAnalysis> {
        self.structured_calls.lock().unwrap().push(messages.to_vec());
        let delay = self
            .analysis_delays
            .iter()
            .find(|(marker, _)| messages.iter().any(|m| m.text.contains(marker.as_str())))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.analysis.clone().map_err(|message| anyhow!(message))
    }
}

// =============================================================================
// Context
// =============================================================================

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.search.api_key = "fc-test".to_string();
    config.pipeline.max_parallels = 2;
    config
}

pub fn test_context(
    llm: &Arc<FakeLanguageModel>,
    search: &Arc<FakeSearch>,
    scraper: &Arc<FakeScraper>,
) -> GeneratorContext {
    GeneratorContext::with_services(test_config(), llm.clone(), search.clone(), scraper.clone())
}

pub fn sample_analysis() -> CompanyAnalysis {
    CompanyAnalysis {
        pricing_model: "Freemium".to_string(),
        is_open_source: crate::types::TriState::Yes,
        tech_stack: vec!["Rust".to_string()],
        description: "Vector similarity search engine".to_string(),
        api_available: crate::types::TriState::Yes,
        language_support: vec!["Python".to_string(), "Go".to_string()],
        integration_capabilities: vec!["LangChain".to_string()],
    }
}

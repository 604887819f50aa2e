#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::{Config, ConfigError};
    use crate::generator::context::GeneratorContext;
    use crate::generator::testing::{
        FakeLanguageModel, FakeScraper, FakeSearch, sample_analysis, test_config, test_context,
    };
    use crate::generator::workflow::{Pipeline, TimingKeys, TimingScope, launch};
    use crate::types::TriState;

    const ARTICLE_QUERY: &str = "vector databases tools and comparison and the best alternatives";

    #[tokio::test]
    async fn test_full_run_extracts_researches_and_recommends() {
        let search = Arc::new(
            FakeSearch::new()
                .with_response(
                    ARTICLE_QUERY,
                    json!([{"url": "https://blog.example.com/vdb", "markdown": "Pinecone vs Qdrant"}]),
                )
                .with_response(
                    "Pinecone official website",
                    json!([{"url": "https://pinecone.io", "description": "Managed vector DB"}]),
                )
                .with_response(
                    "Qdrant official website",
                    json!([{"url": "https://qdrant.tech", "description": "Open source vector DB"}]),
                ),
        );
        let scraper = Arc::new(
            FakeScraper::new()
                .with_markdown("https://pinecone.io", "# Pinecone")
                .with_markdown("https://qdrant.tech", "# Qdrant"),
        );
        let llm = Arc::new(
            FakeLanguageModel::new()
                .with_completion("Pinecone\nQdrant")
                .with_completion("Pick Qdrant for self-hosting.")
                .with_analysis(sample_analysis()),
        );
        let pipeline = Pipeline::new(test_context(&llm, &search, &scraper));

        let (state, timing) = pipeline.run_with_timing("vector databases").await;

        assert_eq!(state.query(), "vector databases");
        assert_eq!(state.extracted_tools, vec!["Pinecone", "Qdrant"]);
        assert_eq!(state.company_info.len(), 2);
        assert_eq!(state.company_info[0].name, "Pinecone");
        assert_eq!(state.company_info[1].website, "https://qdrant.tech");
        assert_eq!(state.company_info[1].api_available, TriState::Yes);
        assert_eq!(state.analysis, "Pick Qdrant for self-hosting.");

        let phases: Vec<&str> = timing
            .get_phase_durations()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(phases, TimingKeys::get_all_phase_keys());
    }

    #[tokio::test]
    async fn test_blocked_articles_fall_back_to_direct_search_titles() {
        let search = Arc::new(
            FakeSearch::new()
                .with_response(
                    ARTICLE_QUERY,
                    json!([
                        {"url": "https://www.reddit.com/r/databases", "markdown": "thread"},
                        {"url": "https://twitter.com/someone", "markdown": "tweet"}
                    ]),
                )
                .with_response(
                    "vector databases",
                    json!({"web": [{"url": "https://weaviate.io", "title": "Weaviate"}]}),
                ),
        );
        let scraper = Arc::new(FakeScraper::new());
        let llm = Arc::new(FakeLanguageModel::new().with_completion("Weaviate is fine."));
        let pipeline = Pipeline::new(test_context(&llm, &search, &scraper));

        let state = pipeline.run("vector databases").await;

        assert!(state.extracted_tools.is_empty());
        assert_eq!(state.company_info.len(), 1);
        assert_eq!(state.company_info[0].name, "Weaviate");
        assert_eq!(state.analysis, "Weaviate is fine.");
        // 只有推荐阶段调用了模型
        assert_eq!(llm.completion_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_all_collaborators_failing_still_completes() {
        let search = Arc::new(
            FakeSearch::new()
                .failing(ARTICLE_QUERY)
                .failing("vector databases")
                .failing("Unknown official website"),
        );
        let scraper = Arc::new(FakeScraper::new());
        let llm = Arc::new(FakeLanguageModel::new().with_completion_error("service unavailable"));
        let pipeline = Pipeline::new(test_context(&llm, &search, &scraper));

        let state = pipeline.run("vector databases").await;

        assert!(state.extracted_tools.is_empty());
        assert_eq!(state.company_info.len(), 1);
        assert_eq!(state.company_info[0].name, "Unknown");
        assert_eq!(state.company_info[0].pricing_model, "Unknown");
        assert_eq!(state.company_info[0].is_open_source, TriState::Unknown);
        assert_eq!(
            state.analysis,
            "Recommendation unavailable: service unavailable"
        );
    }

    #[tokio::test]
    async fn test_stage_timeout_is_degraded() {
        let mut config = test_config();
        config.pipeline.stage_timeout_seconds = 1;
        let llm = Arc::new(
            FakeLanguageModel::new()
                .with_delay(Duration::from_secs(3))
                .with_completion("too late"),
        );
        let context = GeneratorContext::with_services(
            config,
            llm.clone(),
            Arc::new(FakeSearch::new()),
            Arc::new(FakeScraper::new()),
        );

        let state = Pipeline::new(context).run("vector databases").await;

        assert_eq!(state.company_info[0].name, "Unknown");
        assert!(state.analysis.starts_with("Recommendation unavailable:"));
        assert!(state.analysis.contains("timed out"));
    }

    #[tokio::test]
    async fn test_launch_rejects_missing_search_key() {
        let mut config = Config::default();
        config.search.api_key = String::new();

        let error = launch(&config, "vector databases").await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MissingSearchApiKey)
        );
    }

    #[test]
    fn test_timing_scope_records_phases_in_order() {
        let mut timing = TimingScope::new();
        timing.start_phase("b");
        timing.start_phase("a");
        assert!(timing.end_phase("b").is_some());
        assert!(timing.end_phase("a").is_some());
        assert!(timing.end_phase("missing").is_none());

        let phases: Vec<&str> = timing
            .get_phase_durations()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(phases, vec!["b", "a"]);
        assert!(timing.generate_timing_report().contains("- a: "));
    }
}

use crate::config::LLMConfig;

/// 超过该长度的输入直接交给高质量模型
const EFFICIENT_MODEL_PROMPT_LIMIT: usize = 32 * 1024;

/// 按输入长度选择模型，返回 (首选模型, 兜底模型)
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    if system_prompt.len() + user_prompt.len() <= EFFICIENT_MODEL_PROMPT_LIMIT {
        let fallover = (llm_config.model_powerful != llm_config.model_efficient)
            .then(|| llm_config.model_powerful.clone());
        return (llm_config.model_efficient.clone(), fallover);
    }
    (llm_config.model_powerful.clone(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_prefers_efficient_model() {
        let config = LLMConfig::default();
        let (model, fallover) = evaluate_befitting_model(&config, "sys", "user");

        assert_eq!(model, config.model_efficient);
        assert_eq!(fallover, Some(config.model_powerful.clone()));
    }

    #[test]
    fn test_long_prompt_uses_powerful_model_only() {
        let config = LLMConfig::default();
        let long = "x".repeat(EFFICIENT_MODEL_PROMPT_LIMIT + 1);
        let (model, fallover) = evaluate_befitting_model(&config, "", &long);

        assert_eq!(model, config.model_powerful);
        assert!(fallover.is_none());
    }

    #[test]
    fn test_same_models_have_no_fallover() {
        let config = LLMConfig {
            model_powerful: "same".to_string(),
            model_efficient: "same".to_string(),
            ..Default::default()
        };
        let (_, fallover) = evaluate_befitting_model(&config, "a", "b");
        assert!(fallover.is_none());
    }
}

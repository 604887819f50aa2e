use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::generator::extract::ToolExtractionStage;
use crate::generator::recommend::RecommendationStage;
use crate::generator::research::ResearchStage;
use crate::generator::types::Stage;
use crate::llm::LLMClient;
use crate::types::ResearchState;

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: vec![],
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .push((phase_name.to_string(), duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 按执行顺序获取各阶段的执行时间
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "Total: {:.2}s\n",
            self.get_total_duration().as_secs_f64()
        );
        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!("- {}: {:.3}s\n", phase, duration.as_secs_f64()));
        }
        report
    }
}

/// 阶段名称常量，按执行顺序排列
pub struct TimingKeys;

impl TimingKeys {
    pub const EXTRACT_TOOLS: &'static str = "extract_tools";
    pub const RESEARCH: &'static str = "research";
    pub const RECOMMEND: &'static str = "recommend";

    pub fn get_all_phase_keys() -> Vec<&'static str> {
        vec![Self::EXTRACT_TOOLS, Self::RESEARCH, Self::RECOMMEND]
    }
}

/// 线性流水线：抽取工具 → 调研 → 推荐
pub struct Pipeline {
    context: GeneratorContext,
}

impl Pipeline {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    /// 执行全部阶段，总是返回最终状态；阶段失败以降级产出代替
    pub async fn run(&self, query: &str) -> ResearchState {
        let (state, timing) = self.run_with_timing(query).await;
        tracing::debug!("\n{}", timing.generate_timing_report());
        state
    }

    pub async fn run_with_timing(&self, query: &str) -> (ResearchState, TimingScope) {
        let mut state = ResearchState::new(query);
        let mut timing = TimingScope::new();

        self.execute_stage(&ToolExtractionStage, &mut state, &mut timing)
            .await;
        self.execute_stage(&ResearchStage, &mut state, &mut timing)
            .await;
        self.execute_stage(&RecommendationStage, &mut state, &mut timing)
            .await;

        (state, timing)
    }

    /// 执行单个阶段：限时运行，出错或超时时使用该阶段的降级产出
    async fn execute_stage<S>(&self, stage: &S, state: &mut ResearchState, timing: &mut TimingScope)
    where
        S: Stage,
    {
        let name = stage.name();
        tracing::info!(stage = name, "stage started");
        timing.start_phase(name);

        let run = stage.execute(&self.context, state);
        let result = match stage.timeout(&self.context.config.pipeline) {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "stage '{}' timed out after {}s",
                    name,
                    limit.as_secs()
                )),
            },
            None => run.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(stage = name, error = %format!("{:#}", e), "stage degraded");
                stage.degraded(&self.context, state, &e)
            }
        };
        state.apply(output);

        if let Some(duration) = timing.end_phase(name) {
            tracing::info!(stage = name, elapsed_ms = duration.as_millis() as u64, "stage finished");
        }
    }
}

/// 校验配置并运行一次完整的调研
pub async fn launch(config: &Config, query: &str) -> Result<ResearchState> {
    config.validate()?;

    // 按需在启动时检查模型连接
    if config.check_connection {
        LLMClient::new(config.llm.clone())?.check_connection().await?;
    }

    let context = GeneratorContext::new(config.clone())?;

    Ok(Pipeline::new(context).run(query).await)
}

// Include tests
#[cfg(test)]
mod tests;

use anyhow::Result;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::generator::context::GeneratorContext;
use crate::types::{ResearchState, StageOutput};

/// 流水线中的一个阶段
///
/// `execute` 只读取状态并返回自己负责的字段；失败或超时时由运行器调用
/// `degraded` 生成降级产出，流水线不会因单个阶段而中止。
#[allow(async_fn_in_trait)]
pub trait Stage {
    fn name(&self) -> &'static str;

    /// 运行器施加的整体超时；返回 `None` 表示阶段自行限定各部分的耗时
    fn timeout(&self, pipeline: &PipelineConfig) -> Option<Duration> {
        Some(Duration::from_secs(pipeline.stage_timeout_seconds))
    }

    async fn execute(&self, context: &GeneratorContext, state: &ResearchState)
    -> Result<StageOutput>;

    fn degraded(
        &self,
        context: &GeneratorContext,
        state: &ResearchState,
        error: &anyhow::Error,
    ) -> StageOutput;
}

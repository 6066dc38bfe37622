// ==========================================
// 制造工站报价匹配系统 - 叙述生成接口
// ==========================================
// 职责: 定义报价叙述生成 trait, 实现依赖倒置
// 说明: Engine 层定义 trait, 外部说明生成服务实现适配器
// 红线: 叙述生成失败只记日志, 绝不阻塞或失败核心管道
// ==========================================

use crate::domain::quote::QuotationSnapshot;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

// ==========================================
// NarrativeGenerator - 叙述生成接口
// ==========================================

/// 消费解析/成本汇总, 产出面向用户的自然语言说明
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, snapshot: &QuotationSnapshot) -> Result<String, anyhow::Error>;
}

/// 空实现: 不生成叙述
pub struct NoOpNarrativeGenerator;

#[async_trait]
impl NarrativeGenerator for NoOpNarrativeGenerator {
    async fn generate(&self, _snapshot: &QuotationSnapshot) -> Result<String, anyhow::Error> {
        Ok(String::new())
    }
}

/// 安全调用叙述生成: 任何错误都被吞掉并记警告
///
/// # 返回
/// - Some(text): 生成成功且非空
/// - None: 生成失败或为空
pub async fn generate_narrative_safe(
    generator: &Arc<dyn NarrativeGenerator>,
    snapshot: &QuotationSnapshot,
) -> Option<String> {
    match generator.generate(snapshot).await {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!(snapshot_id = %snapshot.snapshot_id, "叙述生成失败, 已忽略: {}", e);
            None
        }
    }
}

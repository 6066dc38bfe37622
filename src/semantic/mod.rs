// ==========================================
// 制造工站报价匹配系统 - 语义匹配基础设施
// ==========================================
// 职责: 向量化能力接口 + 标准工站描述向量索引
// 说明: Engine 层定义 trait, 外部服务实现适配器,
//       测试注入确定性桩实现, 避免网络调用
// ==========================================

use crate::domain::station::StationMaster;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

// ==========================================
// 错误类型
// ==========================================

/// 向量化服务错误
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("向量化服务调用超时 ({0} ms)")]
    Timeout(u64),

    #[error("向量化服务暂时不可用: {0}")]
    Transient(String),

    #[error("向量化服务错误: {0}")]
    Permanent(String),
}

impl EmbeddingError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, EmbeddingError::Timeout(_) | EmbeddingError::Transient(_))
    }
}

// ==========================================
// EmbeddingClient - 向量化能力接口
// ==========================================

/// 窄能力接口: 文本 → 向量
///
/// 外部向量化服务 (HTTP/本地模型) 以适配器形式实现;
/// 超时与重试策略由调用方 (embed_with_policy) 统一处理
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// 未配置向量化服务时的占位实现: 恒定失败,
/// 解析管道随之降级为 精确/别名 两级
pub struct DisabledEmbeddingClient;

#[async_trait]
impl EmbeddingClient for DisabledEmbeddingClient {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Permanent("向量化服务未配置".to_string()))
    }
}

// ==========================================
// 调用策略
// ==========================================

/// 外部调用的超时/重试策略
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

/// 按策略调用向量化服务: 有界超时 + 有界指数退避重试
///
/// 持久失败返回最后一次错误, 由调用方降级处理
/// (单条提及降级为 Unresolved, 不中断其他提及)
pub async fn embed_with_policy(
    client: &dyn EmbeddingClient,
    text: &str,
    policy: CallPolicy,
) -> Result<Vec<f32>, EmbeddingError> {
    let mut attempt: u32 = 0;
    loop {
        let result = tokio::time::timeout(
            Duration::from_millis(policy.timeout_ms),
            client.embed(text),
        )
        .await;

        let err = match result {
            Ok(Ok(vector)) => return Ok(vector),
            Ok(Err(e)) => e,
            Err(_) => EmbeddingError::Timeout(policy.timeout_ms),
        };

        if !err.is_retryable() || attempt >= policy.max_retries {
            return Err(err);
        }

        let backoff = policy.backoff_ms.saturating_mul(1 << attempt.min(8));
        warn!(attempt = attempt + 1, backoff_ms = backoff, "向量化调用失败, 准备重试: {}", err);
        tokio::time::sleep(Duration::from_millis(backoff)).await;
        attempt += 1;
    }
}

// ==========================================
// 余弦相似度
// ==========================================

/// 余弦相似度; 任一向量为零向量或长度不一致时返回 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ==========================================
// SemanticIndex - 工站描述向量索引
// ==========================================

/// 索引中的一条记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedStation {
    pub code: String,
    pub name: String,
    /// 向量化时使用的源文本
    pub source_text: String,
    pub embedding: Vec<f32>,
}

/// 近邻检索命中
#[derive(Debug, Clone)]
pub struct NearestHit {
    pub code: String,
    pub name: String,
    pub similarity: f64,
}

/// 标准工站描述的预计算向量索引
///
/// 快照加载时构建一次, 之后只读; 线性扫描即可
/// (标准工站规模为数百级, 无需近似索引)
#[derive(Debug, Clone, Default)]
pub struct SemanticIndex {
    entries: Vec<IndexedStation>,
}

impl SemanticIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 对全量标准工站做向量化并建立索引
    ///
    /// 单个工站向量化失败会使该工站缺席索引 (记录警告),
    /// 不中断整体构建
    pub async fn build(
        stations: &[StationMaster],
        client: &dyn EmbeddingClient,
        policy: CallPolicy,
    ) -> Self {
        let mut entries = Vec::with_capacity(stations.len());
        for station in stations {
            let source_text = index_text(station);
            match embed_with_policy(client, &source_text, policy).await {
                Ok(embedding) => entries.push(IndexedStation {
                    code: station.code.clone(),
                    name: station.name.clone(),
                    source_text,
                    embedding,
                }),
                Err(e) => {
                    if !e.is_retryable() {
                        // 持久性失败 (如服务未配置) 不必逐站重试
                        warn!("向量化服务持久失败, 放弃语义索引构建: {}", e);
                        break;
                    }
                    warn!(code = %station.code, "工站描述向量化失败, 该工站缺席语义索引: {}", e);
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 最近邻检索 (余弦相似度最大者)
    pub fn nearest(&self, query: &[f32]) -> Option<NearestHit> {
        let mut best: Option<NearestHit> = None;
        for entry in &self.entries {
            let similarity = cosine_similarity(query, &entry.embedding);
            let replace = match &best {
                None => true,
                Some(b) => {
                    // 同分时按工站码字典序取小, 保证确定性
                    similarity > b.similarity
                        || (similarity == b.similarity && entry.code < b.code)
                }
            };
            if replace {
                best = Some(NearestHit {
                    code: entry.code.clone(),
                    name: entry.name.clone(),
                    similarity,
                });
            }
        }
        best
    }
}

/// 索引向量化的源文本: 工站码 + 名称 + 描述
fn index_text(station: &StationMaster) -> String {
    format!("{} {} {}", station.code, station.name, station.description)
}

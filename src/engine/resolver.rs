// ==========================================
// 制造工站报价匹配系统 - 工站解析引擎
// ==========================================
// 职责: 原始提及 → 标准工站码, 三级回退
//       (精确 → 别名 → 语义), 首个命中即短路
// 红线: 每条解析必须输出 reasoning (可解释性);
//       固定参考快照下解析必须确定且幂等
// 并发: 批量解析有界并发, 单条语义查询失败只降级
//       该条为 Unresolved, 不中断其他提及
// ==========================================

use crate::config::HeuristicConfig;
use crate::domain::station::{
    ResolutionSummary, ResolvedStation, StationAlias, StationMaster, StationMention,
};
use crate::domain::types::{ConfidenceLevel, MatchMethod};
use crate::semantic::{embed_with_policy, CallPolicy, EmbeddingClient, SemanticIndex};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

// ==========================================
// ReferenceSnapshot - 参考数据快照
// ==========================================

/// 一次检索所用的只读参考数据快照
///
/// 加载后不再变化; 同一快照下的解析结果可复现
pub struct ReferenceSnapshot {
    /// 标准工站码 → 主数据
    pub stations: HashMap<String, StationMaster>,
    /// 历史别名 (alias 字段已规范化)
    pub aliases: Vec<StationAlias>,
    /// 工站描述向量索引
    pub index: SemanticIndex,
}

impl ReferenceSnapshot {
    /// 由主数据与别名列表构建快照 (含语义索引向量化)
    pub async fn build(
        stations: Vec<StationMaster>,
        aliases: Vec<StationAlias>,
        client: &dyn EmbeddingClient,
        policy: CallPolicy,
    ) -> Self {
        let index = SemanticIndex::build(&stations, client, policy).await;
        let stations = stations
            .into_iter()
            .map(|s| (s.code.clone(), s))
            .collect();
        Self {
            stations,
            aliases,
            index,
        }
    }

    /// 不建语义索引的快照 (语义服务不可用时的降级形态)
    pub fn without_index(
        stations: Vec<StationMaster>,
        aliases: Vec<StationAlias>,
    ) -> Self {
        let stations = stations
            .into_iter()
            .map(|s| (s.code.clone(), s))
            .collect();
        Self {
            stations,
            aliases,
            index: SemanticIndex::empty(),
        }
    }
}

// ==========================================
// 规范化
// ==========================================

/// 提及名称规范化: 取首个 `/` 或连续空白前的 token,
/// 转大写, 去除 [A-Z0-9_-] 之外的字符
pub fn normalize_mention(name: &str) -> String {
    let head = name
        .split(|c: char| c == '/' || c.is_whitespace())
        .find(|t| !t.is_empty())
        .unwrap_or("");
    head.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

// ==========================================
// StationResolver - 工站解析引擎
// ==========================================
pub struct StationResolver {
    config: Arc<HeuristicConfig>,
    snapshot: Arc<ReferenceSnapshot>,
    embedder: Arc<dyn EmbeddingClient>,
}

impl StationResolver {
    /// 构造函数
    pub fn new(
        config: Arc<HeuristicConfig>,
        snapshot: Arc<ReferenceSnapshot>,
        embedder: Arc<dyn EmbeddingClient>,
    ) -> Self {
        Self {
            config,
            snapshot,
            embedder,
        }
    }

    fn call_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout_ms: self.config.external_timeout_ms,
            max_retries: self.config.external_max_retries,
            backoff_ms: self.config.retry_backoff_ms,
        }
    }

    // ==========================================
    // 批量解析
    // ==========================================

    /// 批量解析 (有界并发, 保持输入顺序)
    ///
    /// # 返回
    /// - 解析结果列表 + 汇总 (resolved + unresolved = total)
    pub async fn resolve_all(
        &self,
        mentions: &[StationMention],
        customer_scope: Option<&str>,
    ) -> (Vec<ResolvedStation>, ResolutionSummary) {
        let results: Vec<ResolvedStation> = stream::iter(mentions.iter().cloned())
            .map(|mention| self.resolve_one(mention, customer_scope))
            .buffered(self.config.resolve_concurrency.max(1))
            .collect()
            .await;

        let summary = ResolutionSummary::from_results(&results);
        (results, summary)
    }

    // ==========================================
    // 单条解析
    // ==========================================

    /// 解析单条提及, 三级回退, 首个命中即短路
    ///
    /// 本方法不返回错误: 外部语义查询失败降级为 Unresolved
    pub async fn resolve_one(
        &self,
        mention: StationMention,
        customer_scope: Option<&str>,
    ) -> ResolvedStation {
        let normalized = normalize_mention(&mention.name);

        if normalized.is_empty() {
            return unresolved(
                mention,
                normalized,
                "规范化后为空串, 无法查询".to_string(),
            );
        }

        // 第一级: 精确匹配标准工站码
        if let Some(station) = self.snapshot.stations.get(&normalized) {
            debug!(code = %station.code, "精确匹配命中");
            return ResolvedStation {
                normalized: normalized.clone(),
                resolved_code: Some(station.code.clone()),
                resolved_name: Some(station.name.clone()),
                confidence: ConfidenceLevel::High,
                method: MatchMethod::Exact,
                reasoning: format!("\"{}\" 与标准工站码 {} 完全一致", normalized, station.code),
                mention,
            };
        }

        // 第二级: 别名匹配 (客户范围优先, 其次全局)
        if let Some((alias, scoped)) = self.lookup_alias(&normalized, customer_scope) {
            let confidence = if alias.confidence >= self.config.alias_high_confidence_min {
                ConfidenceLevel::High
            } else {
                ConfidenceLevel::Medium
            };
            let scope_note = if scoped {
                format!("客户 {} 范围内", customer_scope.unwrap_or(""))
            } else {
                "全局".to_string()
            };
            return ResolvedStation {
                normalized: normalized.clone(),
                resolved_code: Some(alias.canonical_code.clone()),
                resolved_name: self
                    .snapshot
                    .stations
                    .get(&alias.canonical_code)
                    .map(|s| s.name.clone()),
                confidence,
                method: MatchMethod::Alias,
                reasoning: format!(
                    "\"{}\" 命中{}别名 (置信度 {:.2}) → {}",
                    normalized, scope_note, alias.confidence, alias.canonical_code
                ),
                mention,
            };
        }

        // 第三级: 语义近邻 (仅在前两级都失败后)
        self.resolve_semantic(mention, normalized).await
    }

    /// 别名查找: 先客户范围, 后全局; 同名取置信度最高者
    fn lookup_alias(
        &self,
        normalized: &str,
        customer_scope: Option<&str>,
    ) -> Option<(&StationAlias, bool)> {
        if let Some(scope) = customer_scope {
            let scoped = self
                .snapshot
                .aliases
                .iter()
                .filter(|a| a.alias == normalized && a.customer_scope.as_deref() == Some(scope))
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
            if let Some(alias) = scoped {
                return Some((alias, true));
            }
        }

        self.snapshot
            .aliases
            .iter()
            .filter(|a| a.alias == normalized && a.customer_scope.is_none())
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|alias| (alias, false))
    }

    /// 语义近邻解析
    async fn resolve_semantic(
        &self,
        mention: StationMention,
        normalized: String,
    ) -> ResolvedStation {
        if self.snapshot.index.is_empty() {
            return unresolved(mention, normalized, "语义索引不可用, 前两级未命中".to_string());
        }

        // 清洗后的提及 + 描述 (若有) 作为查询文本
        let query_text = match &mention.description {
            Some(desc) => format!("{} {}", mention.name.trim(), desc),
            None => mention.name.trim().to_string(),
        };

        let vector = match embed_with_policy(
            self.embedder.as_ref(),
            &query_text,
            self.call_policy(),
        )
        .await
        {
            Ok(v) => v,
            Err(e) => {
                warn!(mention = %mention.name, "语义查询失败, 该条降级为未解析: {}", e);
                return unresolved(
                    mention,
                    normalized,
                    format!("语义查询失败 ({}), 降级为未解析", e),
                );
            }
        };

        let hit = match self.snapshot.index.nearest(&vector) {
            Some(h) => h,
            None => {
                return unresolved(mention, normalized, "语义索引为空, 无近邻".to_string());
            }
        };

        if hit.similarity < self.config.semantic_accept_min {
            return unresolved(
                mention,
                normalized,
                format!(
                    "语义最近邻 {} 相似度 {:.3} 低于接受阈值 {:.2}",
                    hit.code, hit.similarity, self.config.semantic_accept_min
                ),
            );
        }

        let confidence = if hit.similarity >= self.config.semantic_medium_min {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };

        ResolvedStation {
            normalized,
            resolved_code: Some(hit.code.clone()),
            resolved_name: Some(hit.name.clone()),
            confidence,
            method: MatchMethod::Semantic,
            reasoning: format!(
                "语义近邻命中 {} (余弦相似度 {:.3} ≥ {:.2})",
                hit.code, hit.similarity, self.config.semantic_accept_min
            ),
            mention,
        }
    }
}

/// 构造未解析结果 (resolved_code = None 当且仅当此处)
fn unresolved(mention: StationMention, normalized: String, reasoning: String) -> ResolvedStation {
    ResolvedStation {
        mention,
        normalized,
        resolved_code: None,
        resolved_name: None,
        confidence: ConfidenceLevel::None,
        method: MatchMethod::Unresolved,
        reasoning,
    }
}

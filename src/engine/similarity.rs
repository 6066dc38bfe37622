// ==========================================
// 制造工站报价匹配系统 - 相似度排序引擎
// ==========================================
// 职责: 查询工站集合 vs 候选历史配置的集合相似度
// 规则: 包含式等价 (同码, 或一方为另一方子串) 的 Jaccard
// 平手: |候选工站数 - 查询工站数| 小者优先,
//       再按配置标识字典序 (决策记录见 DESIGN.md)
// ==========================================

use crate::config::HeuristicConfig;
use crate::domain::candidate::{CandidateConfiguration, SimilarityMatch};
use std::cmp::Ordering;
use std::sync::Arc;

// ==========================================
// SimilarityRanker - 相似度排序引擎
// ==========================================
pub struct SimilarityRanker {
    config: Arc<HeuristicConfig>,
}

impl SimilarityRanker {
    /// 构造函数
    pub fn new(config: Arc<HeuristicConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对全部候选打分并排序
    ///
    /// # 返回
    /// - 达到最低相似度的前 K 条; 若无一达标,
    ///   返回分数最高的单条并标记 below_threshold
    pub fn rank(
        &self,
        query_codes: &[String],
        candidates: &[CandidateConfiguration],
    ) -> Vec<SimilarityMatch> {
        if query_codes.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<SimilarityMatch> = candidates
            .iter()
            .map(|c| self.score_candidate(query_codes, c))
            .collect();

        let query_len = query_codes.len() as i64;
        scored.sort_by(|a, b| {
            match b.score.total_cmp(&a.score) {
                Ordering::Equal => {
                    // 平手: 工站数差距小者优先, 再按配置标识字典序
                    let da = (a.station_count as i64 - query_len).abs();
                    let db = (b.station_count as i64 - query_len).abs();
                    da.cmp(&db).then_with(|| a.config_id.cmp(&b.config_id))
                }
                other => other,
            }
        });

        let qualified: Vec<SimilarityMatch> = scored
            .iter()
            .filter(|m| m.score >= self.config.similarity_floor)
            .take(self.config.top_k)
            .cloned()
            .collect();

        if !qualified.is_empty() {
            return qualified;
        }

        // 无一达标: 返回最接近的单条兜底, 显式标记
        scored
            .into_iter()
            .next()
            .map(|mut m| {
                m.below_threshold = true;
                vec![m]
            })
            .unwrap_or_default()
    }

    /// 单个候选打分
    ///
    /// 不变式:
    /// - matched ∪ missing = 查询集合
    /// - matched ∪ extra  = 候选集合 (matched 按查询侧表述)
    pub fn score_candidate(
        &self,
        query_codes: &[String],
        candidate: &CandidateConfiguration,
    ) -> SimilarityMatch {
        let candidate_codes = candidate.codes();

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for q in query_codes {
            if candidate_codes.iter().any(|c| codes_equivalent(q, c)) {
                matched.push(q.clone());
            } else {
                missing.push(q.clone());
            }
        }

        let extra: Vec<String> = candidate_codes
            .iter()
            .filter(|c| !query_codes.iter().any(|q| codes_equivalent(q, c)))
            .cloned()
            .collect();

        // 包含式等价下一个候选码可对应多个查询码,
        // 并集直接由三段分解求和, 保证分数落在 [0,1]
        let intersection = matched.len();
        let union = matched.len() + missing.len() + extra.len();
        let score = if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        };

        SimilarityMatch {
            config_id: candidate.config_id.clone(),
            customer_ref: candidate.customer_ref.clone(),
            score,
            matched,
            missing,
            extra,
            station_count: candidate.station_count(),
            total_manpower: candidate.total_manpower(),
            total_investment: candidate.total_investment(),
            below_threshold: false,
        }
    }
}

// ==========================================
// 包含式等价
// ==========================================

/// 两码等价: 完全相同, 或一方为另一方的子串
/// (近缘码族变体不受集合运算惩罚, 如 RFT 与 RFT2)
fn codes_equivalent(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

// ==========================================
// 制造工站报价匹配系统 - 工站实体
// ==========================================
// 职责: 工站提及、标准工站主数据、解析结果
// 不变式: mention.name 非空; resolved_code 为 None
//         当且仅当 method = Unresolved
// ==========================================

use crate::domain::types::{ConfidenceLevel, MatchMethod, SkipReason};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// StationMention - 原始工站提及
// ==========================================
/// 提取阶段从表格/列表中产出的一条原始提及
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMention {
    /// 原始名称 (非空)
    pub name: String,
    /// 区段/板类分组标签
    pub section: Option<String>,
    /// 描述 (捕获自同行最长的长文本单元格)
    pub description: Option<String>,
    /// 来源行号 (原始文本行, 从 0 计)
    pub source_row: usize,
    /// 原始状态列取值 (若有状态列)
    pub raw_status: Option<String>,
}

impl StationMention {
    pub fn named(name: &str, source_row: usize) -> Self {
        Self {
            name: name.to_string(),
            section: None,
            description: None,
            source_row,
            raw_status: None,
        }
    }
}

// ==========================================
// ExtractionReport - 提取结果与诊断
// ==========================================
/// 提取阶段返回完整提及列表, 以及按原因分类的跳过行计数
///
/// 不变式: included_rows + skipped_empty + skipped_filtered = 总行数;
/// mentions.len() = included_rows - deduplicated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub mentions: Vec<StationMention>,
    /// 纳入的行数 (去重前)
    pub included_rows: usize,
    /// 去重丢弃的提及数
    pub deduplicated: usize,
    /// 因标识为空跳过的行数
    pub skipped_empty: usize,
    /// 因状态过滤跳过的行数
    pub skipped_filtered: usize,
    /// 行级诊断 (行号 -> 跳过原因)
    pub skip_details: Vec<(usize, SkipReason)>,
}

// ==========================================
// StationMaster - 标准工站主数据
// ==========================================
/// 只读参考数据, 由独立的数据管理流程维护
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMaster {
    /// 标准工站码 (如 MBT / CAL / RFT)
    pub code: String,
    /// 工站名称
    pub name: String,
    /// 工站描述 (语义匹配的向量来源文本)
    pub description: String,
    /// 典型人力配置
    pub default_manpower: Option<f64>,
    /// 典型产能 UPH
    pub default_uph: Option<f64>,
    /// 设备单价
    pub unit_price: Option<f64>,
}

// ==========================================
// StationAlias - 历史别名
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationAlias {
    /// 别名 (规范化后的形式)
    pub alias: String,
    /// 对应的标准工站码
    pub canonical_code: String,
    /// 客户范围 (None 表示全局别名)
    pub customer_scope: Option<String>,
    /// 别名自身的置信度 (0..1, 来自历史确认记录)
    pub confidence: f64,
}

// ==========================================
// ResolvedStation - 解析结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedStation {
    /// 来源提及
    pub mention: StationMention,
    /// 规范化后的查询串 (审计用)
    pub normalized: String,
    /// 解析出的标准工站码 (Unresolved 时为 None)
    pub resolved_code: Option<String>,
    /// 解析出的工站名称
    pub resolved_name: Option<String>,
    /// 置信等级
    pub confidence: ConfidenceLevel,
    /// 匹配方法
    pub method: MatchMethod,
    /// 解析依据说明 (审计/界面展示)
    pub reasoning: String,
}

impl ResolvedStation {
    pub fn is_resolved(&self) -> bool {
        self.method != MatchMethod::Unresolved
    }
}

// ==========================================
// ResolutionSummary - 解析汇总
// ==========================================
/// 不变式: resolved + unresolved = total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// 去重后的标准工站码 (保持首次出现顺序)
    pub unique_codes: Vec<String>,
    /// 各匹配方法的计数
    pub method_counts: HashMap<MatchMethod, usize>,
}

impl ResolutionSummary {
    /// 由解析结果列表汇总
    pub fn from_results(results: &[ResolvedStation]) -> Self {
        let total = results.len();
        let mut resolved = 0;
        let mut unique_codes: Vec<String> = Vec::new();
        let mut method_counts: HashMap<MatchMethod, usize> = HashMap::new();

        for r in results {
            *method_counts.entry(r.method).or_insert(0) += 1;
            if let Some(code) = &r.resolved_code {
                resolved += 1;
                if !unique_codes.iter().any(|c| c == code) {
                    unique_codes.push(code.clone());
                }
            }
        }

        Self {
            total,
            resolved,
            unresolved: total - resolved,
            unique_codes,
            method_counts,
        }
    }
}

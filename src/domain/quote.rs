// ==========================================
// 制造工站报价匹配系统 - 成本与报价实体
// ==========================================
// 职责: 成本分解、风险评估、报价快照
// 生命周期: 按需计算, 作为不可变报价快照持久化
// ==========================================

use crate::domain::candidate::SimilarityMatch;
use crate::domain::station::ResolutionSummary;
use crate::domain::types::{Disposition, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InvestmentLine - 投资明细行
// ==========================================
/// 每个工站一行: 数量 × 单价 = 小计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentLine {
    pub station_code: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

// ==========================================
// CostBreakdown - 成本分解
// ==========================================
/// 不变式: 瓶颈 UPH = 所有 UPH > 0 的工站中的最小值;
/// 无 UPH 登记的工站不参与取最小, 但仍计入人力与投资
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// 投资明细
    pub investment_lines: Vec<InvestmentLine>,
    /// 设备投资总额
    pub total_investment: f64,
    /// 总人力
    pub total_manpower: f64,
    /// 瓶颈工站码 (所有工站都无 UPH 时为 None)
    pub bottleneck_station: Option<String>,
    /// 瓶颈 UPH (与 bottleneck_station 同时存在)
    pub bottleneck_uph: Option<f64>,
    /// 月产能 = 瓶颈 UPH × 日运转小时 × 月运转天数
    pub monthly_capacity: Option<f64>,
    /// 单件成本 = (月人力成本 + 摊销后设备投资) / 月产能
    pub cost_per_unit: Option<f64>,
}

// ==========================================
// RiskFactor - 风险因子
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    /// 因子代号 (如 RF_CONTENT / BGA_FINE_PITCH / HIGH_UTILIZATION)
    pub code: String,
    /// 因子说明
    pub detail: String,
    /// 该因子贡献的分值
    pub weight: u32,
}

// ==========================================
// RiskAssessment - 风险评估
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 序数风险分 (各因子权重之和)
    pub score: u32,
    /// 风险等级
    pub level: RiskLevel,
    /// 命中的风险因子
    pub factors: Vec<RiskFactor>,
    /// 处置建议
    pub recommendations: Vec<String>,
}

// ==========================================
// QuotationSnapshot - 报价快照
// ==========================================
/// 下游报表消费的不可变快照, 持久化后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationSnapshot {
    /// 快照标识 (uuid)
    pub snapshot_id: String,
    /// 客户范围 (若提交时指定)
    pub customer_scope: Option<String>,
    /// 生成时间
    pub created_at: DateTime<Utc>,
    /// 解析汇总 (审计)
    pub resolution: ResolutionSummary,
    /// 选中的匹配 (通常为排名第一)
    pub selected_match: SimilarityMatch,
    /// 匹配到的工站
    pub matched_stations: Vec<String>,
    /// 缺失的工站
    pub missing_stations: Vec<String>,
    /// 推断/建议补充的工站 (候选多出的部分)
    pub suggested_stations: Vec<String>,
    /// 成本分解
    pub cost: CostBreakdown,
    /// 风险评估
    pub risk: RiskAssessment,
    /// 最终处置
    pub disposition: Disposition,
}

// ==========================================
// 制造工站报价匹配系统 - 历史配置实体
// ==========================================
// 职责: 候选历史产线配置与相似度匹配结果
// 生命周期: 参考数据只读, 每次检索加载一次
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CandidateStation - 候选配置中的单个工站
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateStation {
    /// 标准工站码
    pub code: String,
    /// 该配置下的人力配置
    pub manpower: f64,
    /// 该配置下的产能 UPH (None 表示未登记)
    pub uph: Option<f64>,
    /// 设备数量
    pub quantity: u32,
    /// 设备单价
    pub unit_price: f64,
}

// ==========================================
// CandidateConfiguration - 候选历史配置
// ==========================================
/// 只读参考数据, 由独立的数据管理流程维护
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfiguration {
    /// 配置标识
    pub config_id: String,
    /// 客户参考号
    pub customer_ref: String,
    /// 工站清单
    pub stations: Vec<CandidateStation>,
}

impl CandidateConfiguration {
    /// 配置包含的工站码集合 (保序)
    pub fn codes(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.code.clone()).collect()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// 总人力
    pub fn total_manpower(&self) -> f64 {
        self.stations.iter().map(|s| s.manpower).sum()
    }

    /// 设备投资总额
    pub fn total_investment(&self) -> f64 {
        self.stations
            .iter()
            .map(|s| f64::from(s.quantity) * s.unit_price)
            .sum()
    }
}

// ==========================================
// SimilarityMatch - 相似度匹配结果
// ==========================================
/// 不变式:
/// - matched ∪ missing = 查询集合
/// - matched ∪ extra  = 候选集合
/// - matched = 查询 ∩ 候选 (含包含式等价)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// 候选配置标识
    pub config_id: String,
    /// 客户参考号
    pub customer_ref: String,
    /// Jaccard 相似度 (0..1)
    pub score: f64,
    /// 双方都有的工站码 (按查询集合表述)
    pub matched: Vec<String>,
    /// 查询有而候选缺的工站码
    pub missing: Vec<String>,
    /// 候选有而查询没要的工站码
    pub extra: Vec<String>,
    /// 候选配置工站总数
    pub station_count: usize,
    /// 候选配置总人力
    pub total_manpower: f64,
    /// 候选配置设备投资总额
    pub total_investment: f64,
    /// 是否为低于门槛的"最接近"兜底结果
    pub below_threshold: bool,
}

impl SimilarityMatch {
    /// 以 0-100 表述的相似度分数 (对外接口用)
    pub fn score_pct(&self) -> f64 {
        (self.score * 100.0 * 10.0).round() / 10.0
    }
}

// ==========================================
// 制造工站报价匹配系统 - 风险评估引擎
// ==========================================
// 职责: 对选中配置做定性风险标记
// 输出: 序数风险分 + 风险等级 + 因子 + 处置建议
// 因子: 射频内容 / BGA·细间距 / 产线利用率过高
// ==========================================

use crate::config::CostParameters;
use crate::domain::candidate::CandidateStation;
use crate::domain::quote::{CostBreakdown, RiskAssessment, RiskFactor};
use crate::domain::types::RiskLevel;
use std::sync::Arc;

/// 射频内容关键词 (工站码/描述扫描)
const RF_KEYWORDS: [&str; 4] = ["rf", "射频", "射頻", "antenna"];

/// BGA / 细间距关键词
const BGA_KEYWORDS: [&str; 5] = ["bga", "fine pitch", "fine-pitch", "细间距", "細間距"];

// ==========================================
// RiskEngine - 风险评估引擎
// ==========================================
pub struct RiskEngine {
    params: Arc<CostParameters>,
}

impl RiskEngine {
    /// 构造函数
    pub fn new(params: Arc<CostParameters>) -> Self {
        Self { params }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 评估选中配置的定性风险
    ///
    /// # 参数
    /// - `stations`: 选中配置的工站清单
    /// - `mention_texts`: 解析阶段收集的名称/描述文本 (关键词扫描)
    /// - `cost`: 成本分解 (取月产能)
    /// - `target_monthly_volume`: 目标月产量 (利用率计算, 可缺省)
    pub fn assess(
        &self,
        stations: &[CandidateStation],
        mention_texts: &[String],
        cost: &CostBreakdown,
        target_monthly_volume: Option<f64>,
    ) -> RiskAssessment {
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();

        // 因子 1: 射频内容
        if let Some(hit) = self.scan_keywords(stations, mention_texts, &RF_KEYWORDS) {
            factors.push(RiskFactor {
                code: "RF_CONTENT".to_string(),
                detail: format!("检测到射频相关内容: {}", hit),
                weight: 2,
            });
            recommendations.push("射频测试需屏蔽箱与校准治具, 建议工程评审确认测试覆盖".to_string());
        }

        // 因子 2: BGA / 细间距
        if let Some(hit) = self.scan_keywords(stations, mention_texts, &BGA_KEYWORDS) {
            factors.push(RiskFactor {
                code: "BGA_FINE_PITCH".to_string(),
                detail: format!("检测到 BGA/细间距元件: {}", hit),
                weight: 2,
            });
            recommendations.push("BGA/细间距元件建议增加 X-Ray 抽检与返修工艺确认".to_string());
        }

        // 因子 3: 产线利用率过高
        if let (Some(capacity), Some(target)) = (cost.monthly_capacity, target_monthly_volume) {
            if capacity > 0.0 {
                let utilization = target / capacity;
                if utilization >= self.params.utilization_warn_ratio {
                    factors.push(RiskFactor {
                        code: "HIGH_UTILIZATION".to_string(),
                        detail: format!(
                            "目标月产量 {:.0} / 月产能 {:.0} = 利用率 {:.0}% (阈值 {:.0}%)",
                            target,
                            capacity,
                            utilization * 100.0,
                            self.params.utilization_warn_ratio * 100.0
                        ),
                        weight: 3,
                    });
                    recommendations.push(
                        "产线利用率接近上限, 建议评估瓶颈工站增机或分流方案".to_string(),
                    );
                }
            }
        }

        let score: u32 = factors.iter().map(|f| f.weight).sum();
        let level = match score {
            0 => RiskLevel::Low,
            1..=3 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };

        RiskAssessment {
            score,
            level,
            factors,
            recommendations,
        }
    }

    /// 对工站码与提及文本做关键词扫描, 返回首个命中的来源描述
    ///
    /// 工站码按 token 前缀比较 (RFT 命中 rf, PERF 不命中),
    /// 自由文本中的 ASCII 关键词按整词比较, CJK 词按包含比较
    fn scan_keywords(
        &self,
        stations: &[CandidateStation],
        mention_texts: &[String],
        keywords: &[&str],
    ) -> Option<String> {
        for station in stations {
            let lower = station.code.to_lowercase();
            if keywords.iter().any(|k| code_keyword_hit(&lower, k)) {
                return Some(format!("工站 {}", station.code));
            }
        }
        for text in mention_texts {
            let lower = text.to_lowercase();
            if let Some(k) = keywords.iter().find(|k| text_keyword_hit(&lower, k)) {
                return Some(format!("文本含 \"{}\"", k));
            }
        }
        None
    }
}

// ==========================================
// 关键词命中判定
// ==========================================

/// 工站码命中: 码内任一字母数字 token 以关键词开头
fn code_keyword_hit(code_lower: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return code_lower.contains(keyword);
    }
    code_lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| !token.is_empty() && token.starts_with(keyword))
}

/// 自由文本命中: ASCII 关键词要求两侧均非字母数字
fn text_keyword_hit(text_lower: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return text_lower.contains(keyword);
    }
    let bytes = text_lower.as_bytes();
    let mut from = 0;
    while let Some(pos) = text_lower[from..].find(keyword) {
        let begin = from + pos;
        let end = begin + keyword.len();
        let left_ok = begin == 0 || !bytes[begin - 1].is_ascii_alphanumeric();
        let right_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if left_ok && right_ok {
            return true;
        }
        from = begin + 1;
    }
    false
}

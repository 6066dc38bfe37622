// ==========================================
// 制造工站报价匹配系统 - 成本与瓶颈估算引擎
// ==========================================
// 职责: 总人力 / 瓶颈产能 / 月产能 / 单件成本 / 投资明细
// 不变式: 瓶颈 UPH = UPH > 0 的工站中的最小值;
//         无 UPH 登记的工站不参与取最小, 但计入人力与投资;
//         所有工站都无 UPH 时瓶颈未定义 (不是 0)
// ==========================================

use crate::config::CostParameters;
use crate::domain::candidate::CandidateStation;
use crate::domain::quote::{CostBreakdown, InvestmentLine};
use std::sync::Arc;

// ==========================================
// CostEstimator - 成本估算引擎
// ==========================================
pub struct CostEstimator {
    params: Arc<CostParameters>,
}

impl CostEstimator {
    /// 构造函数
    pub fn new(params: Arc<CostParameters>) -> Self {
        Self { params }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对选中配置的工站集合做成本分解
    pub fn estimate(&self, stations: &[CandidateStation]) -> CostBreakdown {
        // 投资明细: 每站一行 数量 × 单价
        let investment_lines: Vec<InvestmentLine> = stations
            .iter()
            .map(|s| InvestmentLine {
                station_code: s.code.clone(),
                quantity: s.quantity,
                unit_price: s.unit_price,
                subtotal: f64::from(s.quantity) * s.unit_price,
            })
            .collect();

        let total_investment: f64 = investment_lines.iter().map(|l| l.subtotal).sum();
        let total_manpower: f64 = stations.iter().map(|s| s.manpower).sum();

        // 瓶颈: UPH > 0 的工站中的最小值
        let bottleneck = stations
            .iter()
            .filter_map(|s| s.uph.filter(|u| *u > 0.0).map(|u| (s.code.clone(), u)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let (bottleneck_station, bottleneck_uph) = match bottleneck {
            Some((code, uph)) => (Some(code), Some(uph)),
            None => (None, None),
        };

        // 月产能 = 瓶颈 UPH × 日运转小时 × 月运转天数
        let monthly_capacity = bottleneck_uph
            .map(|uph| uph * self.params.hours_per_day * self.params.days_per_month);

        // 单件成本 = (月人力成本 + 摊销后设备投资) / 月产能
        let cost_per_unit = monthly_capacity.and_then(|capacity| {
            if capacity <= 0.0 {
                return None;
            }
            let monthly_labor = total_manpower * self.params.labor_cost_per_head_month;
            let monthly_amortization = total_investment / self.params.amortization_months;
            Some((monthly_labor + monthly_amortization) / capacity)
        });

        CostBreakdown {
            investment_lines,
            total_investment,
            total_manpower,
            bottleneck_station,
            bottleneck_uph,
            monthly_capacity,
            cost_per_unit,
        }
    }
}

// ==========================================
// CostEstimator / RiskEngine 引擎测试
// ==========================================
// 测试目标: 成本分解不变式与风险分级
// 覆盖范围: 瓶颈取最小 / 无 UPH 未定义 / 月产能与单件成本 /
//           风险因子加权与等级映射
// ==========================================


use station_quote_match::config::CostParameters;
use station_quote_match::domain::types::RiskLevel;
use station_quote_match::engine::{CostEstimator, RiskEngine};
use std::sync::Arc;
use test_helpers::make_candidate_station;

fn estimator() -> CostEstimator {
    CostEstimator::new(Arc::new(CostParameters::default()))
}

fn risk_engine() -> RiskEngine {
    RiskEngine::new(Arc::new(CostParameters::default()))
}

// ==========================================
// 瓶颈
// ==========================================

#[test]
fn test_bottleneck_is_min_positive_uph() {
    let stations = vec![
        make_candidate_station("MBT", 2.0, Some(120.0), 1, 50_000.0),
        make_candidate_station("CAL", 1.0, Some(50.0), 1, 80_000.0),
        make_candidate_station("RFT", 1.0, Some(80.0), 2, 150_000.0),
    ];
    let cost = estimator().estimate(&stations);

    assert_eq!(cost.bottleneck_station.as_deref(), Some("CAL"));
    assert_eq!(cost.bottleneck_uph, Some(50.0));
}

#[test]
fn test_unregistered_uph_excluded_from_bottleneck() {
    // UPH 缺失或为 0 的工站不参与取最小, 但人力与投资照常计入
    let stations = vec![
        make_candidate_station("MBT", 2.0, None, 1, 50_000.0),
        make_candidate_station("PACK", 1.0, Some(0.0), 1, 10_000.0),
        make_candidate_station("CAL", 1.0, Some(60.0), 1, 80_000.0),
    ];
    let cost = estimator().estimate(&stations);

    assert_eq!(cost.bottleneck_station.as_deref(), Some("CAL"));
    assert_eq!(cost.bottleneck_uph, Some(60.0));
    assert!((cost.total_manpower - 4.0).abs() < 1e-9);
    assert!((cost.total_investment - 140_000.0).abs() < 1e-9);
}

#[test]
fn test_all_uph_missing_leaves_bottleneck_undefined() {
    // 未定义不等于 0: 下游字段全部缺省而非填零
    let stations = vec![
        make_candidate_station("MBT", 2.0, None, 1, 50_000.0),
        make_candidate_station("PACK", 1.0, Some(0.0), 1, 10_000.0),
    ];
    let cost = estimator().estimate(&stations);

    assert_eq!(cost.bottleneck_station, None);
    assert_eq!(cost.bottleneck_uph, None);
    assert_eq!(cost.monthly_capacity, None);
    assert_eq!(cost.cost_per_unit, None);
}

// ==========================================
// 月产能与单件成本
// ==========================================

#[test]
fn test_monthly_capacity_from_bottleneck() {
    // 50 UPH × 20 h/day × 26 day/month = 26000
    let stations = vec![make_candidate_station("CAL", 1.0, Some(50.0), 1, 80_000.0)];
    let cost = estimator().estimate(&stations);

    assert_eq!(cost.monthly_capacity, Some(26_000.0));
}

#[test]
fn test_cost_per_unit_formula() {
    // 人力 2 × 6500 + 投资 240000 / 24 期 = 23000 / 月
    // 26000 件/月 → 0.8846.. 元/件
    let stations = vec![
        make_candidate_station("MBT", 1.0, Some(50.0), 1, 40_000.0),
        make_candidate_station("CAL", 1.0, Some(100.0), 2, 100_000.0),
    ];
    let cost = estimator().estimate(&stations);

    assert!((cost.total_investment - 240_000.0).abs() < 1e-9);
    let expected = (2.0 * 6500.0 + 240_000.0 / 24.0) / 26_000.0;
    let unit = cost.cost_per_unit.unwrap();
    assert!((unit - expected).abs() < 1e-9);
}

#[test]
fn test_investment_lines_per_station() {
    let stations = vec![make_candidate_station("RFT", 1.0, Some(80.0), 3, 150_000.0)];
    let cost = estimator().estimate(&stations);

    assert_eq!(cost.investment_lines.len(), 1);
    let line = &cost.investment_lines[0];
    assert_eq!(line.station_code, "RFT");
    assert_eq!(line.quantity, 3);
    assert!((line.subtotal - 450_000.0).abs() < 1e-9);
}

// ==========================================
// 风险分级
// ==========================================

#[test]
fn test_clean_configuration_is_low_risk() {
    let stations = vec![make_candidate_station("MBT", 1.0, Some(100.0), 1, 40_000.0)];
    let cost = estimator().estimate(&stations);
    let risk = risk_engine().assess(&stations, &[], &cost, None);

    assert_eq!(risk.score, 0);
    assert_eq!(risk.level, RiskLevel::Low);
    assert!(risk.factors.is_empty());
    assert!(risk.recommendations.is_empty());
}

#[test]
fn test_rf_station_code_flags_medium_risk() {
    let stations = vec![make_candidate_station("RFT", 1.0, Some(80.0), 1, 150_000.0)];
    let cost = estimator().estimate(&stations);
    let risk = risk_engine().assess(&stations, &[], &cost, None);

    assert_eq!(risk.score, 2);
    assert_eq!(risk.level, RiskLevel::Medium);
    assert_eq!(risk.factors[0].code, "RF_CONTENT");
    assert_eq!(risk.recommendations.len(), 1);
}

#[test]
fn test_rf_plus_bga_text_is_high_risk() {
    // 2 + 2 = 4 → High
    let stations = vec![make_candidate_station("RFT", 1.0, Some(80.0), 1, 150_000.0)];
    let cost = estimator().estimate(&stations);
    let texts = vec!["主板含 BGA 封装芯片".to_string()];
    let risk = risk_engine().assess(&stations, &texts, &cost, None);

    assert_eq!(risk.score, 4);
    assert_eq!(risk.level, RiskLevel::High);
    let codes: Vec<&str> = risk.factors.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["RF_CONTENT", "BGA_FINE_PITCH"]);
}

#[test]
fn test_rf_keyword_requires_word_boundary_in_text() {
    // "performance" / "interface" 内嵌 rf 不算射频内容
    let stations = vec![make_candidate_station("MBT", 1.0, Some(100.0), 1, 40_000.0)];
    let cost = estimator().estimate(&stations);
    let texts = vec!["interface performance check".to_string()];
    let risk = risk_engine().assess(&stations, &texts, &cost, None);

    assert_eq!(risk.score, 0);
    assert!(risk.factors.is_empty());
}

#[test]
fn test_rf_keyword_hits_standalone_word_in_text() {
    let stations = vec![make_candidate_station("MBT", 1.0, Some(100.0), 1, 40_000.0)];
    let cost = estimator().estimate(&stations);
    let texts = vec!["RF calibration fixture".to_string()];
    let risk = risk_engine().assess(&stations, &texts, &cost, None);

    assert_eq!(risk.score, 2);
    assert_eq!(risk.factors[0].code, "RF_CONTENT");
}

#[test]
fn test_rf_code_match_is_prefix_only() {
    // PERF 以 rf 结尾但非 rf 码族
    let stations = vec![make_candidate_station("PERF", 1.0, Some(100.0), 1, 40_000.0)];
    let cost = estimator().estimate(&stations);
    let risk = risk_engine().assess(&stations, &[], &cost, None);

    assert!(risk.factors.is_empty());
}

#[test]
fn test_high_utilization_flagged_at_threshold() {
    // 产能 26000, 目标 23000 → 利用率 0.8846 ≥ 0.85
    let stations = vec![make_candidate_station("CAL", 1.0, Some(50.0), 1, 80_000.0)];
    let cost = estimator().estimate(&stations);
    let risk = risk_engine().assess(&stations, &[], &cost, Some(23_000.0));

    assert_eq!(risk.score, 3);
    assert_eq!(risk.level, RiskLevel::Medium);
    assert_eq!(risk.factors[0].code, "HIGH_UTILIZATION");
}

#[test]
fn test_moderate_utilization_not_flagged() {
    // 利用率 0.5 < 0.85
    let stations = vec![make_candidate_station("CAL", 1.0, Some(50.0), 1, 80_000.0)];
    let cost = estimator().estimate(&stations);
    let risk = risk_engine().assess(&stations, &[], &cost, Some(13_000.0));

    assert_eq!(risk.score, 0);
    assert_eq!(risk.level, RiskLevel::Low);
}

#[test]
fn test_utilization_skipped_without_target() {
    let stations = vec![make_candidate_station("CAL", 1.0, Some(50.0), 1, 80_000.0)];
    let cost = estimator().estimate(&stations);
    let risk = risk_engine().assess(&stations, &[], &cost, None);

    assert!(risk.factors.is_empty());
}

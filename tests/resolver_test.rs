// ==========================================
// StationResolver 引擎测试
// ==========================================
// 测试目标: 三级回退解析 (精确 → 别名 → 语义)
// 覆盖范围: 规范化 / 客户范围别名 / 置信度分级 /
//           语义阈值带 / 外部失败降级 / 幂等性
// ==========================================


use station_quote_match::config::HeuristicConfig;
use station_quote_match::domain::station::StationMention;
use station_quote_match::domain::types::{ConfidenceLevel, MatchMethod};
use station_quote_match::engine::{normalize_mention, ReferenceSnapshot, StationResolver};
use station_quote_match::semantic::CallPolicy;
use std::sync::Arc;
use test_helpers::{fast_config, make_alias, make_station, standard_stations, MapEmbedder};

fn resolver_without_index(
    aliases: Vec<station_quote_match::domain::station::StationAlias>,
) -> StationResolver {
    let snapshot = ReferenceSnapshot::without_index(standard_stations(), aliases);
    StationResolver::new(
        Arc::new(fast_config()),
        Arc::new(snapshot),
        Arc::new(MapEmbedder::new()),
    )
}

fn policy() -> CallPolicy {
    CallPolicy {
        timeout_ms: 200,
        max_retries: 0,
        backoff_ms: 1,
    }
}

// ==========================================
// 规范化
// ==========================================

#[test]
fn test_normalize_takes_head_token_uppercased() {
    assert_eq!(normalize_mention("MBT / Manual Bench Test"), "MBT");
    assert_eq!(normalize_mention("  cal  "), "CAL");
    assert_eq!(normalize_mention("rf&t"), "RFT");
    assert_eq!(normalize_mention("ict-2"), "ICT-2");
    assert_eq!(normalize_mention("///"), "");
}

// ==========================================
// 第一级: 精确匹配
// ==========================================

#[tokio::test]
async fn test_exact_match_is_high_confidence() {
    let resolver = resolver_without_index(vec![]);
    let result = resolver
        .resolve_one(StationMention::named("mbt", 0), None)
        .await;

    assert_eq!(result.resolved_code.as_deref(), Some("MBT"));
    assert_eq!(result.resolved_name.as_deref(), Some("Manual Bench Test"));
    assert_eq!(result.method, MatchMethod::Exact);
    assert_eq!(result.confidence, ConfidenceLevel::High);
    assert!(!result.reasoning.is_empty());
}

#[tokio::test]
async fn test_exact_match_wins_over_alias() {
    // 同名别名指向别处, 精确匹配仍优先
    let resolver = resolver_without_index(vec![make_alias("MBT", "CAL", None, 0.9)]);
    let result = resolver
        .resolve_one(StationMention::named("MBT", 0), None)
        .await;

    assert_eq!(result.resolved_code.as_deref(), Some("MBT"));
    assert_eq!(result.method, MatchMethod::Exact);
}

#[tokio::test]
async fn test_slash_comment_resolves_exact() {
    let resolver = resolver_without_index(vec![]);
    let result = resolver
        .resolve_one(StationMention::named("MBT / Manual Bench Test", 0), None)
        .await;

    assert_eq!(result.normalized, "MBT");
    assert_eq!(result.method, MatchMethod::Exact);
}

// ==========================================
// 第二级: 别名匹配
// ==========================================

#[tokio::test]
async fn test_customer_scoped_alias_wins_over_global() {
    let resolver = resolver_without_index(vec![
        make_alias("FT", "CAL", None, 0.95),
        make_alias("FT", "MBT", Some("ACME"), 0.85),
    ]);

    let scoped = resolver
        .resolve_one(StationMention::named("FT", 0), Some("ACME"))
        .await;
    assert_eq!(scoped.resolved_code.as_deref(), Some("MBT"));
    assert_eq!(scoped.method, MatchMethod::Alias);

    let global = resolver
        .resolve_one(StationMention::named("FT", 0), None)
        .await;
    assert_eq!(global.resolved_code.as_deref(), Some("CAL"));
}

#[tokio::test]
async fn test_alias_confidence_bands() {
    let resolver = resolver_without_index(vec![
        make_alias("FCT1", "MBT", None, 0.85),
        make_alias("FCT2", "MBT", None, 0.6),
    ]);

    let high = resolver
        .resolve_one(StationMention::named("FCT1", 0), None)
        .await;
    assert_eq!(high.confidence, ConfidenceLevel::High);

    let medium = resolver
        .resolve_one(StationMention::named("FCT2", 0), None)
        .await;
    assert_eq!(medium.confidence, ConfidenceLevel::Medium);
}

#[tokio::test]
async fn test_other_customer_alias_not_visible() {
    // 别名只在其客户范围内生效, 无全局兜底时不命中
    let resolver = resolver_without_index(vec![make_alias("FT", "MBT", Some("ACME"), 0.9)]);
    let result = resolver
        .resolve_one(StationMention::named("FT", 0), Some("OTHER"))
        .await;

    assert_eq!(result.method, MatchMethod::Unresolved);
    assert_eq!(result.resolved_code, None);
}

// ==========================================
// 第三级: 语义近邻
// ==========================================

async fn semantic_resolver(
    stations: Vec<station_quote_match::domain::station::StationMaster>,
    embedder: MapEmbedder,
    config: HeuristicConfig,
) -> StationResolver {
    let snapshot = ReferenceSnapshot::build(stations, vec![], &embedder, policy()).await;
    StationResolver::new(Arc::new(config), Arc::new(snapshot), Arc::new(embedder))
}

#[tokio::test]
async fn test_semantic_medium_band() {
    // 相似度 0.8 ≥ 0.75 → Medium
    let embedder = MapEmbedder::new()
        .with("RFT RF Test 射频指标测试", vec![1.0, 0.0])
        .with("CAL Calibration 整机校准", vec![0.0, 1.0])
        .with("radio test", vec![0.8, 0.6]);
    let stations = vec![
        make_station("RFT", "RF Test", "射频指标测试"),
        make_station("CAL", "Calibration", "整机校准"),
    ];
    let resolver = semantic_resolver(stations, embedder, fast_config()).await;

    let result = resolver
        .resolve_one(StationMention::named("radio test", 0), None)
        .await;
    assert_eq!(result.resolved_code.as_deref(), Some("RFT"));
    assert_eq!(result.method, MatchMethod::Semantic);
    assert_eq!(result.confidence, ConfidenceLevel::Medium);
}

#[tokio::test]
async fn test_semantic_low_band() {
    // 相似度 0.65 落在 [0.60, 0.75) → Low
    let embedder = MapEmbedder::new()
        .with("RFT RF Test 射频指标测试", vec![1.0, 0.0])
        .with("radio check", vec![0.65, 0.759934]);
    let stations = vec![make_station("RFT", "RF Test", "射频指标测试")];
    let resolver = semantic_resolver(stations, embedder, fast_config()).await;

    let result = resolver
        .resolve_one(StationMention::named("radio check", 0), None)
        .await;
    assert_eq!(result.resolved_code.as_deref(), Some("RFT"));
    assert_eq!(result.confidence, ConfidenceLevel::Low);
}

#[tokio::test]
async fn test_semantic_below_accept_threshold_rejected() {
    // 相似度 0.5 < 0.60 → 未解析, reasoning 说明阈值
    let embedder = MapEmbedder::new()
        .with("RFT RF Test 射频指标测试", vec![1.0, 0.0])
        .with("pack the box", vec![0.5, 0.866025]);
    let stations = vec![make_station("RFT", "RF Test", "射频指标测试")];
    let resolver = semantic_resolver(stations, embedder, fast_config()).await;

    let result = resolver
        .resolve_one(StationMention::named("pack the box", 0), None)
        .await;
    assert_eq!(result.method, MatchMethod::Unresolved);
    assert!(result.reasoning.contains("低于接受阈值"));
}

#[tokio::test]
async fn test_semantic_query_includes_description() {
    // 查询文本 = 提及名称 + 描述
    let embedder = MapEmbedder::new()
        .with("RFT RF Test 射频指标测试", vec![1.0, 0.0])
        .with("FUNC 射频发射接收指标", vec![0.9, 0.435890]);
    let stations = vec![make_station("RFT", "RF Test", "射频指标测试")];
    let resolver = semantic_resolver(stations, embedder, fast_config()).await;

    let mention = StationMention {
        description: Some("射频发射接收指标".to_string()),
        ..StationMention::named("FUNC", 0)
    };
    let result = resolver.resolve_one(mention, None).await;
    assert_eq!(result.resolved_code.as_deref(), Some("RFT"));
    assert_eq!(result.confidence, ConfidenceLevel::Medium);
}

#[tokio::test]
async fn test_embed_failure_degrades_single_mention() {
    // 索引就绪, 但查询文本无法向量化: 该条降级, 其余不受影响
    let embedder = MapEmbedder::new().with("RFT RF Test 射频指标测试", vec![1.0, 0.0]);
    let stations = vec![make_station("RFT", "RF Test", "射频指标测试")];
    let resolver = semantic_resolver(stations, embedder, fast_config()).await;

    let mentions = vec![
        StationMention::named("RFT", 0),
        StationMention::named("mystery station", 1),
    ];
    let (results, summary) = resolver.resolve_all(&mentions, None).await;

    assert_eq!(results[0].method, MatchMethod::Exact);
    assert_eq!(results[1].method, MatchMethod::Unresolved);
    assert!(results[1].reasoning.contains("语义查询失败"));
    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.unresolved, 1);
}

#[tokio::test]
async fn test_no_index_degrades_to_unresolved() {
    let resolver = resolver_without_index(vec![]);
    let result = resolver
        .resolve_one(StationMention::named("unknown thing", 0), None)
        .await;

    assert_eq!(result.method, MatchMethod::Unresolved);
    assert_eq!(result.confidence, ConfidenceLevel::None);
}

// ==========================================
// 批量解析与汇总
// ==========================================

#[tokio::test]
async fn test_resolve_all_preserves_order_and_summarizes() {
    let resolver = resolver_without_index(vec![]);
    let mentions = vec![
        StationMention::named("MBT", 0),
        StationMention::named("XXX", 1),
        StationMention::named("CAL", 2),
        StationMention::named("mbt", 3),
    ];
    let (results, summary) = resolver.resolve_all(&mentions, None).await;

    let codes: Vec<Option<&str>> = results
        .iter()
        .map(|r| r.resolved_code.as_deref())
        .collect();
    assert_eq!(codes, vec![Some("MBT"), None, Some("CAL"), Some("MBT")]);

    assert_eq!(summary.total, 4);
    assert_eq!(summary.resolved, 3);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.resolved + summary.unresolved, summary.total);
    // 去重保持首次出现顺序
    assert_eq!(summary.unique_codes, vec!["MBT", "CAL"]);
    assert_eq!(summary.method_counts.get(&MatchMethod::Exact), Some(&3));
    assert_eq!(
        summary.method_counts.get(&MatchMethod::Unresolved),
        Some(&1)
    );
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    // 固定快照下重复解析结果逐字节一致
    let embedder = MapEmbedder::new()
        .with("RFT RF Test 射频指标测试", vec![1.0, 0.0])
        .with("radio test", vec![0.8, 0.6]);
    let stations = vec![make_station("RFT", "RF Test", "射频指标测试")];
    let resolver = semantic_resolver(stations, embedder, fast_config()).await;

    let mentions = vec![
        StationMention::named("RFT", 0),
        StationMention::named("radio test", 1),
        StationMention::named("mystery", 2),
    ];
    let (first, _) = resolver.resolve_all(&mentions, None).await;
    let (second, _) = resolver.resolve_all(&mentions, None).await;

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

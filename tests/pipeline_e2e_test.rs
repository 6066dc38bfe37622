// ==========================================
// 全流程集成测试
// ==========================================
// 测试目标: QuoteService 解析 → 排序 → 报价端到端链路
// 覆盖范围: 列表/表格输入 / 状态过滤 / 人工列角色覆盖 /
//           报价快照持久化 / 处置规则 / 文件入口 / 错误路径
// ==========================================


use station_quote_match::api::{ApiError, QuoteService};
use station_quote_match::config::{CostParameters, HeuristicConfig};
use station_quote_match::domain::table::StatusFilter;
use station_quote_match::domain::types::{ColumnRole, Disposition, MatchMethod};
use station_quote_match::engine::SubmissionOptions;
use station_quote_match::repository::{CandidateConfigRepository, StationMasterRepository};
use std::io::Write as _;
use std::sync::Arc;
use tempfile::NamedTempFile;
use test_helpers::{
    create_test_db, fast_config, make_candidate, make_candidate_station, standard_stations,
    HashEmbedder,
};

// ==========================================
// 测试装配
// ==========================================

/// 建库 + 灌入标准工站与两条候选配置, 返回已初始化的服务
async fn seeded_service() -> (NamedTempFile, QuoteService) {
    station_quote_match::logging::init_test();
    let (temp_file, db_path) = create_test_db().unwrap();

    let station_repo = StationMasterRepository::new(&db_path).unwrap();
    station_repo
        .batch_insert_stations(&standard_stations())
        .unwrap();

    let candidate_repo = CandidateConfigRepository::new(&db_path).unwrap();
    candidate_repo
        .insert_configuration(&make_candidate(
            "CFG-2019",
            "CUST-ALPHA",
            vec![
                make_candidate_station("MBT", 2.0, Some(120.0), 1, 50_000.0),
                make_candidate_station("CAL", 1.0, Some(50.0), 1, 80_000.0),
                make_candidate_station("RFT", 1.0, Some(80.0), 2, 150_000.0),
                make_candidate_station("VISUAL", 1.0, Some(200.0), 1, 5_000.0),
            ],
        ))
        .unwrap();
    candidate_repo
        .insert_configuration(&make_candidate(
            "CFG-OTHER",
            "CUST-BETA",
            vec![
                make_candidate_station("AOI", 0.5, Some(300.0), 1, 200_000.0),
                make_candidate_station("ICT", 1.0, Some(150.0), 1, 120_000.0),
            ],
        ))
        .unwrap();

    let service = QuoteService::initialize(
        &db_path,
        Arc::new(fast_config()),
        Arc::new(CostParameters::default()),
        Arc::new(HashEmbedder),
        Arc::new(station_quote_match::engine::NoOpNarrativeGenerator),
    )
    .await
    .unwrap();

    (temp_file, service)
}

// ==========================================
// 解析接口
// ==========================================

#[tokio::test]
async fn test_resolve_simple_list_all_exact() {
    let (_guard, service) = seeded_service().await;

    let response = service
        .resolve_text("MBT\nCAL\nRFT\nMMI", &SubmissionOptions::default())
        .await
        .unwrap();

    assert_eq!(response.summary.total, 4);
    assert_eq!(response.summary.resolved, 4);
    assert!(response
        .results
        .iter()
        .all(|r| r.method == MatchMethod::Exact));
    assert!(!response.audit_id.is_empty());
    assert!(response.warnings.is_empty());
}

#[tokio::test]
async fn test_resolve_table_with_status_filter() {
    let (_guard, service) = seeded_service().await;

    let text = "No\tProcess\tStatus\n1\tMBT\t1\n2\tCAL\t0\n3\tRFT\t1";
    let options = SubmissionOptions {
        status_filter: StatusFilter::matching("1"),
        ..SubmissionOptions::default()
    };
    let response = service.resolve_text(text, &options).await.unwrap();

    assert_eq!(response.summary.unique_codes, vec!["MBT", "RFT"]);
    assert!(response.warnings.iter().any(|w| w.contains("状态过滤")));
}

#[tokio::test]
async fn test_resolve_with_manual_column_override() {
    let (_guard, service) = seeded_service().await;

    // 两列都推不出工站角色, 人工指定首列后通过
    let text = "A\tB\nMBT\t1\nCAL\t2";
    let bare = service
        .resolve_text(text, &SubmissionOptions::default())
        .await;
    assert!(matches!(bare, Err(ApiError::AmbiguousColumns(_))));

    let options = SubmissionOptions {
        column_overrides: vec![(0, ColumnRole::StationId)],
        ..SubmissionOptions::default()
    };
    let response = service.resolve_text(text, &options).await.unwrap();
    assert_eq!(response.summary.unique_codes, vec!["MBT", "CAL"]);
}

// ==========================================
// 报价接口
// ==========================================

#[tokio::test]
async fn test_quote_full_flow_with_persistence() {
    let (_guard, service) = seeded_service().await;

    let response = service
        .quote_text("MBT\nCAL\nRFT", &SubmissionOptions::default())
        .await
        .unwrap();

    // {MBT,CAL,RFT} vs CFG-2019 {MBT,CAL,RFT,VISUAL}: 3/4
    assert_eq!(response.matches.len(), 1);
    let top = &response.matches[0];
    assert_eq!(top.config_id, "CFG-2019");
    assert_eq!(top.score, 75.0);
    assert!(!top.below_threshold);

    let quotation = response.quotation.as_ref().unwrap();
    assert_eq!(quotation.suggested_stations, vec!["VISUAL"]);
    assert!(quotation.missing_stations.is_empty());
    // 瓶颈 = CAL 50 UPH → 月产能 26000
    assert_eq!(quotation.cost.bottleneck_station.as_deref(), Some("CAL"));
    assert_eq!(quotation.cost.monthly_capacity, Some(26_000.0));
    // 全部解析 + 达标匹配 + 风险未到 High → 直接可报价
    assert_eq!(quotation.disposition, Disposition::Proceed);

    // 快照已持久化, 可按 ID 读回
    let stored = service.get_quotation(&quotation.snapshot_id).unwrap();
    assert_eq!(stored.snapshot_id, quotation.snapshot_id);
    assert_eq!(stored.disposition, quotation.disposition);
    assert_eq!(stored.matched_stations, quotation.matched_stations);
}

#[tokio::test]
async fn test_unresolved_mention_forces_review() {
    let (_guard, service) = seeded_service().await;

    let response = service
        .quote_text("MBT\nCAL\nXQZWV", &SubmissionOptions::default())
        .await
        .unwrap();

    assert_eq!(response.summary.unresolved, 1);
    assert!(response.warnings.iter().any(|w| w.contains("未能解析")));

    let quotation = response.quotation.as_ref().unwrap();
    assert_eq!(quotation.disposition, Disposition::ReviewRequired);
}

#[tokio::test]
async fn test_quote_without_candidates_returns_no_quotation() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    StationMasterRepository::new(&db_path)
        .unwrap()
        .batch_insert_stations(&standard_stations())
        .unwrap();

    let service = QuoteService::initialize(
        &db_path,
        Arc::new(fast_config()),
        Arc::new(CostParameters::default()),
        Arc::new(HashEmbedder),
        Arc::new(station_quote_match::engine::NoOpNarrativeGenerator),
    )
    .await
    .unwrap();

    let response = service
        .quote_text("MBT\nCAL", &SubmissionOptions::default())
        .await
        .unwrap();

    assert!(response.matches.is_empty());
    assert!(response.quotation.is_none());
    assert!(response.warnings.iter().any(|w| w.contains("候选")));
}

// ==========================================
// 文件入口
// ==========================================

#[tokio::test]
async fn test_quote_from_csv_file() {
    let (_guard, service) = seeded_service().await;

    let mut csv_file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(csv_file, "No,Process,Status").unwrap();
    writeln!(csv_file, "1,MBT,1").unwrap();
    writeln!(csv_file, "2,CAL,1").unwrap();
    writeln!(csv_file, "3,RFT,0").unwrap();
    csv_file.flush().unwrap();

    let options = SubmissionOptions {
        status_filter: StatusFilter::matching("1"),
        ..SubmissionOptions::default()
    };
    let response = service.quote_file(csv_file.path(), &options).await.unwrap();

    assert_eq!(response.summary.unique_codes, vec!["MBT", "CAL"]);
    assert_eq!(response.matches[0].config_id, "CFG-2019");
}

#[tokio::test]
async fn test_unsupported_file_extension_rejected() {
    let (_guard, service) = seeded_service().await;

    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    let result = service
        .resolve_file(file.path(), &SubmissionOptions::default())
        .await;

    assert!(matches!(result, Err(ApiError::FileError(_))));
}

// ==========================================
// 错误路径
// ==========================================

#[tokio::test]
async fn test_question_input_rejected() {
    let (_guard, service) = seeded_service().await;

    let result = service
        .resolve_text(
            "请问这条产线需要哪些测试工站?",
            &SubmissionOptions::default(),
        )
        .await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_empty_input_rejected() {
    let (_guard, service) = seeded_service().await;

    let result = service
        .resolve_text("   \n  ", &SubmissionOptions::default())
        .await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_table_without_station_column_rejected() {
    let (_guard, service) = seeded_service().await;

    let result = service
        .resolve_text("No\tQty\n1\t2\n2\t3", &SubmissionOptions::default())
        .await;
    assert!(matches!(result, Err(ApiError::AmbiguousColumns(_))));
}

#[tokio::test]
async fn test_initialize_fails_on_empty_reference() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    let result = QuoteService::initialize(
        &db_path,
        Arc::new(HeuristicConfig::default()),
        Arc::new(CostParameters::default()),
        Arc::new(HashEmbedder),
        Arc::new(station_quote_match::engine::NoOpNarrativeGenerator),
    )
    .await;

    assert!(matches!(result, Err(ApiError::ReferenceUnavailable(_))));
}

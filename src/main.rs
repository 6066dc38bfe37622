// ==========================================
// 制造工站报价匹配系统 - 命令行入口
// ==========================================
// 用法:
//   station-quote-match <输入文件> [--db <参考数据库>] [--customer <客户号>]
// 输入文件支持 .txt/.csv/.xlsx/.xls;
// 输出完整报价响应 (JSON) 到标准输出
// ==========================================

use station_quote_match::api::QuoteService;
use station_quote_match::config::{CostParameters, HeuristicConfig};
use station_quote_match::db;
use station_quote_match::engine::narrative::NoOpNarrativeGenerator;
use station_quote_match::engine::pipeline::SubmissionOptions;
use station_quote_match::logging;
use station_quote_match::semantic::DisabledEmbeddingClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// 默认参考数据库路径 (用户数据目录下)
fn default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("station-quote-match")
        .join("reference.db")
        .display()
        .to_string()
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", station_quote_match::APP_NAME);
    tracing::info!("系统版本: {}", station_quote_match::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("用法: {} <输入文件> [--db <参考数据库>] [--customer <客户号>]", args[0]);
        return ExitCode::FAILURE;
    }

    let input_path = PathBuf::from(&args[1]);
    let mut db_path = default_db_path();
    let mut customer_scope = None;

    let mut i = 2;
    while i + 1 < args.len() {
        match args[i].as_str() {
            "--db" => db_path = args[i + 1].clone(),
            "--customer" => customer_scope = Some(args[i + 1].clone()),
            other => {
                eprintln!("未知参数: {}", other);
                return ExitCode::FAILURE;
            }
        }
        i += 2;
    }

    tracing::info!("使用参考数据库: {}", db_path);

    // 确保 schema 就绪 (幂等)
    match db::open_sqlite_connection(&db_path) {
        Ok(conn) => {
            if let Err(e) = db::init_schema(&conn) {
                tracing::error!("schema 初始化失败: {}", e);
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            tracing::error!("无法打开参考数据库 {}: {}", db_path, e);
            return ExitCode::FAILURE;
        }
    }

    // 未配置外部向量化服务: 解析降级为 精确/别名 两级
    let service = match QuoteService::initialize(
        &db_path,
        Arc::new(HeuristicConfig::default()),
        Arc::new(CostParameters::default()),
        Arc::new(DisabledEmbeddingClient),
        Arc::new(NoOpNarrativeGenerator),
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("服务初始化失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = SubmissionOptions {
        customer_scope,
        ..SubmissionOptions::default()
    };

    match service.quote_file(&input_path, &options).await {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("响应序列化失败: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!("报价失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

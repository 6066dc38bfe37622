// ==========================================
// 制造工站报价匹配系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 工站标准化与历史配置匹配的分析核心
//           (页面渲染/账号/审批策略由外部协作方负责)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分析管道业务规则
pub mod engine;

// 导入层 - 上传文件解析
pub mod importer;

// 配置层 - 启发式配置与成本常量
pub mod config;

// 语义层 - 向量化能力与描述索引
pub mod semantic;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ColumnRole, ConfidenceLevel, Disposition, InputShape, MatchMethod, RiskLevel,
};

// 领域实体
pub use domain::{
    CandidateConfiguration, CostBreakdown, ParsedTable, QuotationSnapshot, RawInputBlock,
    ResolutionSummary, ResolvedStation, RiskAssessment, SimilarityMatch, StationMention,
    StatusFilter,
};

// 引擎
pub use engine::{
    ColumnRoleDetector, CostEstimator, InputClassifier, QuotePipeline, RiskEngine,
    SimilarityRanker, StationExtractor, StationResolver, SubmissionOptions, TableParser,
};

// API
pub use api::{QuoteResponse, QuoteService, ResolveResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "制造工站报价匹配系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

// ==========================================
// 制造工站报价匹配系统 - 领域层
// ==========================================
// 职责: 实体定义与领域类型, 无业务规则
// ==========================================

pub mod candidate;
pub mod quote;
pub mod station;
pub mod table;
pub mod types;

// 重导出常用实体
pub use candidate::{CandidateConfiguration, CandidateStation, SimilarityMatch};
pub use quote::{CostBreakdown, InvestmentLine, QuotationSnapshot, RiskAssessment, RiskFactor};
pub use station::{
    ExtractionReport, ResolutionSummary, ResolvedStation, StationAlias, StationMaster,
    StationMention,
};
pub use table::{
    ColumnDetection, ColumnMapping, ParsedTable, RawInputBlock, StatusFilter, TableRow,
};
pub use types::{
    ColumnRole, ConfidenceLevel, Disposition, InputShape, MatchMethod, RiskLevel, RoleSource,
    SkipReason,
};

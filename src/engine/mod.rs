// ==========================================
// 制造工站报价匹配系统 - 引擎层
// ==========================================
// 职责: 实现分析管道的业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL, 所有判定必须输出 reason
// ==========================================

pub mod classifier;
pub mod column_detector;
pub mod cost;
pub mod extractor;
pub mod narrative;
pub mod pipeline;
pub mod resolver;
pub mod risk;
pub mod similarity;
pub mod table_parser;

// 重导出核心引擎
pub use classifier::InputClassifier;
pub use column_detector::ColumnRoleDetector;
pub use cost::CostEstimator;
pub use extractor::StationExtractor;
pub use narrative::{generate_narrative_safe, NarrativeGenerator, NoOpNarrativeGenerator};
pub use pipeline::{
    ParsedDocument, PipelineError, PipelineRun, QuotePipeline, RankOutcome, ResolveOutcome,
    SubmissionOptions,
};
pub use resolver::{normalize_mention, ReferenceSnapshot, StationResolver};
pub use risk::RiskEngine;
pub use similarity::SimilarityRanker;
pub use table_parser::TableParser;

// ==========================================
// 制造工站报价匹配系统 - 配置层
// ==========================================
// 职责: 启发式关键词表、阈值与成本常量
// ==========================================

pub mod heuristics;

pub use heuristics::{ColumnKeywords, CostParameters, HeuristicConfig};

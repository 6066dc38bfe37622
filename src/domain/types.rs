// ==========================================
// 制造工站报价匹配系统 - 领域类型定义
// ==========================================
// 职责: 管道各阶段共享的枚举类型
// 红线: 输入形态只判定一次, 下游按枚举分支
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 输入形态 (Input Shape)
// ==========================================
// 分类器输出的封闭变体, 后续阶段只对它做模式匹配,
// 不允许重新检查原始文本形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputShape {
    Tabular,      // 含列分隔符的表格文本
    SimpleList,   // 多行, 每行一个工站
    InlineList,   // 单行, 逗号/空格分隔
    Unclassified, // 无法判定 (含自然语言/提问)
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputShape::Tabular => write!(f, "TABULAR"),
            InputShape::SimpleList => write!(f, "SIMPLE_LIST"),
            InputShape::InlineList => write!(f, "INLINE_LIST"),
            InputShape::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

// ==========================================
// 列角色 (Column Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnRole {
    StationId,   // 工站标识列
    Status,      // 选用/状态过滤列
    Section,     // 区段/板类分组列
    Description, // 描述列
    Sequence,    // 序号列
    Ignore,      // 无关列
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::StationId => write!(f, "STATION_ID"),
            ColumnRole::Status => write!(f, "STATUS"),
            ColumnRole::Section => write!(f, "SECTION"),
            ColumnRole::Description => write!(f, "DESCRIPTION"),
            ColumnRole::Sequence => write!(f, "SEQUENCE"),
            ColumnRole::Ignore => write!(f, "IGNORE"),
        }
    }
}

// ==========================================
// 列角色来源 (Role Source)
// ==========================================
// 人工指定的角色置信度恒为 1.0, 且不再被启发式推导覆盖
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleSource {
    Keyword, // 表头关键词命中
    Values,  // 数据取值模式推断
    Manual,  // 调用方显式指定
}

// ==========================================
// 解析置信等级 (Confidence Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::None => write!(f, "NONE"),
            ConfidenceLevel::Low => write!(f, "LOW"),
            ConfidenceLevel::Medium => write!(f, "MEDIUM"),
            ConfidenceLevel::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 匹配方法 (Match Method)
// ==========================================
// 不变式: resolved_code 为 None 当且仅当 method = Unresolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMethod {
    Exact,      // 规范化后与标准工站码完全一致
    Alias,      // 命中历史别名
    Semantic,   // 语义向量近邻
    Unresolved, // 三级均未命中
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::Exact => write!(f, "EXACT"),
            MatchMethod::Alias => write!(f, "ALIAS"),
            MatchMethod::Semantic => write!(f, "SEMANTIC"),
            MatchMethod::Unresolved => write!(f, "UNRESOLVED"),
        }
    }
}

// ==========================================
// 行跳过原因 (Skip Reason)
// ==========================================
// 提取阶段的诊断分类: 空标识 vs 状态过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    EmptyIdentifier,
    StatusFiltered,
}

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 报价处置 (Disposition)
// ==========================================
// 下游报表消费的最终处置值, 只有两种取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    #[serde(rename = "Proceed")]
    Proceed,
    #[serde(rename = "Review Required")]
    ReviewRequired,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Proceed => write!(f, "Proceed"),
            Disposition::ReviewRequired => write!(f, "Review Required"),
        }
    }
}

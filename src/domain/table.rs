// ==========================================
// 制造工站报价匹配系统 - 输入与表格实体
// ==========================================
// 职责: 分类/解析/列角色阶段的数据结构
// 生命周期: 仅存活于单次提交的处理过程中
// ==========================================

use crate::domain::types::{ColumnRole, InputShape, RoleSource};
use serde::{Deserialize, Serialize};

// ==========================================
// RawInputBlock - 原始输入块
// ==========================================
/// 分类器对原始文本的判定结果
///
/// 形态只在这里判定一次, 下游阶段只对 `shape` 做模式匹配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInputBlock {
    /// 原始文本
    pub text: String,
    /// 判定的输入形态
    pub shape: InputShape,
    /// 判定置信度 (0..1)
    pub confidence: f64,
    /// 是否疑似自然语言提问 (下游拒绝当作工站数据处理)
    pub is_question: bool,
    /// 判定依据说明
    pub reason: String,
}

// ==========================================
// ParsedTable - 规则化表格
// ==========================================
/// 不变式: 每一行的单元格数恰好等于 column_count (短行以空串补齐)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTable {
    /// 表头单元格 (有序)
    pub headers: Vec<String>,
    /// 数据行 (每行等长)
    pub rows: Vec<TableRow>,
    /// 列数
    pub column_count: usize,
    /// 解析过程中产生的警告 (补齐/表头合并等)
    pub warnings: Vec<String>,
}

impl ParsedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// 数据行, 保留原始行号用于追溯
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// 原始文本中的行号 (从 0 计)
    pub source_line: usize,
    /// 单元格, 长度等于 ParsedTable.column_count
    pub cells: Vec<String>,
}

// ==========================================
// ColumnMapping - 列角色映射
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// 列下标
    pub index: usize,
    /// 表头文本
    pub header: String,
    /// 判定的语义角色
    pub role: ColumnRole,
    /// 判定置信度 (0..1, 人工指定恒为 1.0)
    pub confidence: f64,
    /// 判定来源
    pub source: RoleSource,
    /// 采样值 (前几行数据, 用于审计展示)
    pub sample_values: Vec<String>,
}

// ==========================================
// ColumnDetection - 列角色判定结果
// ==========================================
/// 整体置信度为各列平均值; 未找到工站标识列时恒为 0,
/// 迫使调用方先做人工列角色修正再进入提取阶段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDetection {
    pub mappings: Vec<ColumnMapping>,
    pub overall_confidence: f64,
    pub has_station_column: bool,
}

impl ColumnDetection {
    /// 工站标识列下标 (若有)
    pub fn station_column(&self) -> Option<usize> {
        self.mappings
            .iter()
            .find(|m| m.role == ColumnRole::StationId)
            .map(|m| m.index)
    }

    /// 指定角色的首个列下标
    pub fn column_of(&self, role: ColumnRole) -> Option<usize> {
        self.mappings.iter().find(|m| m.role == role).map(|m| m.index)
    }
}

// ==========================================
// StatusFilter - 状态过滤配置
// ==========================================
/// 提取阶段可选的行过滤: 仅保留状态列取值等于 value 的行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFilter {
    pub enabled: bool,
    /// 匹配值 (如 "1" / "Y")
    pub value: String,
    /// 状态列下标, None 表示沿用列角色判定的状态列
    pub column_index: Option<usize>,
}

impl StatusFilter {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            value: String::new(),
            column_index: None,
        }
    }

    pub fn matching(value: &str) -> Self {
        Self {
            enabled: true,
            value: value.to_string(),
            column_index: None,
        }
    }
}

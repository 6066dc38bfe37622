// ==========================================
// 制造工站报价匹配系统 - 列角色判定引擎
// ==========================================
// 职责: 为每一列赋予语义角色 + 置信度
// 规则: 表头关键词优先 (0.9), 其次取值模式回退
//       (0.7 / 0.5 / 0.3); 人工指定恒为 1.0
// 红线: 未找到工站标识列时整体置信度为 0,
//       必须人工修正后才能进入提取阶段
// ==========================================

use crate::config::HeuristicConfig;
use crate::domain::table::{ColumnDetection, ColumnMapping, ParsedTable};
use crate::domain::types::{ColumnRole, RoleSource};
use std::sync::Arc;

// ==========================================
// ColumnRoleDetector - 列角色判定引擎
// ==========================================
pub struct ColumnRoleDetector {
    config: Arc<HeuristicConfig>,
}

impl ColumnRoleDetector {
    /// 构造函数
    pub fn new(config: Arc<HeuristicConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对表格的每一列判定角色
    pub fn detect(&self, table: &ParsedTable) -> ColumnDetection {
        let mappings: Vec<ColumnMapping> = (0..table.column_count)
            .map(|index| self.detect_column(table, index))
            .collect();

        Self::finalize(mappings)
    }

    /// 应用调用方的显式列角色覆盖
    ///
    /// 人工指定的角色置信度恒为 1.0, 不再被启发式重推导
    pub fn apply_overrides(
        &self,
        detection: ColumnDetection,
        overrides: &[(usize, ColumnRole)],
    ) -> ColumnDetection {
        let mappings = detection
            .mappings
            .into_iter()
            .map(|mut m| {
                if let Some((_, role)) = overrides.iter().find(|(idx, _)| *idx == m.index) {
                    m.role = *role;
                    m.confidence = 1.0;
                    m.source = RoleSource::Manual;
                }
                m
            })
            .collect();

        Self::finalize(mappings)
    }

    /// 汇总: 整体置信度为各列平均, 无工站列时为 0
    fn finalize(mappings: Vec<ColumnMapping>) -> ColumnDetection {
        let has_station_column = mappings.iter().any(|m| m.role == ColumnRole::StationId);
        let overall_confidence = if !has_station_column || mappings.is_empty() {
            0.0
        } else {
            mappings.iter().map(|m| m.confidence).sum::<f64>() / mappings.len() as f64
        };

        ColumnDetection {
            mappings,
            overall_confidence,
            has_station_column,
        }
    }

    // ==========================================
    // 单列判定
    // ==========================================

    fn detect_column(&self, table: &ParsedTable, index: usize) -> ColumnMapping {
        let header = table
            .headers
            .get(index)
            .map(String::as_str)
            .unwrap_or("");
        let samples: Vec<String> = table
            .rows
            .iter()
            .take(self.config.sample_rows)
            .map(|r| r.cells[index].clone())
            .collect();

        // 第一步: 表头关键词 (首个命中即定角色)
        if let Some(role) = self.match_keywords(header) {
            return ColumnMapping {
                index,
                header: header.to_string(),
                role,
                confidence: self.config.keyword_confidence,
                source: RoleSource::Keyword,
                sample_values: samples,
            };
        }

        // 第二步: 取值模式回退
        let (role, confidence) = self.infer_from_values(&samples, index);
        ColumnMapping {
            index,
            header: header.to_string(),
            role,
            confidence,
            source: RoleSource::Values,
            sample_values: samples,
        }
    }

    /// 表头关键词匹配, 顺序: 工站 → 状态 → 区段 → 描述 → 序号
    /// (描述先于序号, 避免 "note" 被 "no" 截获)
    fn match_keywords(&self, header: &str) -> Option<ColumnRole> {
        let lower = header.to_lowercase();
        if lower.is_empty() {
            return None;
        }

        let kw = &self.config.keywords;
        let tables: [(&Vec<String>, ColumnRole); 5] = [
            (&kw.station, ColumnRole::StationId),
            (&kw.status, ColumnRole::Status),
            (&kw.section, ColumnRole::Section),
            (&kw.description, ColumnRole::Description),
            (&kw.sequence, ColumnRole::Sequence),
        ];

        for (keywords, role) in tables {
            if keywords.iter().any(|k| lower.contains(k.as_str())) {
                return Some(role);
            }
        }
        None
    }

    /// 取值模式回退判定
    ///
    /// - 全部取值落在 {空,0,1,true,false,y,n} → 状态列 (0.7)
    /// - 全数字 → 序号列 (0.7)
    /// - 短字母数字/CJK token 且非首列 → 工站列 (0.5)
    /// - 其余 → 忽略 (0.3)
    fn infer_from_values(&self, samples: &[String], index: usize) -> (ColumnRole, f64) {
        let non_empty: Vec<&String> = samples.iter().filter(|v| !v.is_empty()).collect();
        if non_empty.is_empty() {
            return (ColumnRole::Ignore, self.config.ignore_confidence);
        }

        if non_empty.iter().all(|v| is_enum_value(v)) {
            return (ColumnRole::Status, self.config.value_pattern_confidence);
        }

        if non_empty.iter().all(|v| is_numeric(v)) {
            return (ColumnRole::Sequence, self.config.value_pattern_confidence);
        }

        if index != 0
            && non_empty
                .iter()
                .all(|v| is_short_token(v, self.config.station_token_max_len))
        {
            return (ColumnRole::StationId, self.config.weak_station_confidence);
        }

        (ColumnRole::Ignore, self.config.ignore_confidence)
    }
}

// ==========================================
// 取值模式工具
// ==========================================

/// 状态枚举取值
fn is_enum_value(v: &str) -> bool {
    matches!(
        v.to_lowercase().as_str(),
        "0" | "1" | "true" | "false" | "y" | "n" | "yes" | "no"
    )
}

/// 纯数字 (允许小数点)
fn is_numeric(v: &str) -> bool {
    !v.is_empty() && v.parse::<f64>().is_ok()
}

/// 短字母数字/CJK token
fn is_short_token(v: &str, max_len: usize) -> bool {
    v.chars().count() < max_len
        && v.chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '/' || c == ' ' || c == '.')
        && v.chars().any(|c| c.is_alphanumeric())
}

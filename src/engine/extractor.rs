// ==========================================
// 制造工站报价匹配系统 - 工站提取引擎
// ==========================================
// 职责: 按列角色遍历网格, 产出有序去重的工站提及
// 诊断: 纳入/跳过行数按原因分类 (空标识 vs 状态过滤)
// ==========================================

use crate::config::HeuristicConfig;
use crate::domain::station::{ExtractionReport, StationMention};
use crate::domain::table::{ColumnDetection, ParsedTable, StatusFilter};
use crate::domain::types::{ColumnRole, SkipReason};
use crate::engine::classifier::split_inline_tokens;
use std::sync::Arc;

// ==========================================
// StationExtractor - 工站提取引擎
// ==========================================
pub struct StationExtractor {
    config: Arc<HeuristicConfig>,
}

impl StationExtractor {
    /// 构造函数
    pub fn new(config: Arc<HeuristicConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 表格提取
    // ==========================================

    /// 按列角色从表格提取工站提及
    ///
    /// # 参数
    /// - `table`: 规则化表格
    /// - `detection`: 最终列角色映射 (含人工覆盖)
    /// - `filter`: 状态过滤配置
    /// - `capture_description`: 是否捕获描述
    ///   (同行非标识列中最长且超过阈值的单元格)
    pub fn extract_from_table(
        &self,
        table: &ParsedTable,
        detection: &ColumnDetection,
        filter: &StatusFilter,
        capture_description: bool,
    ) -> ExtractionReport {
        let station_col = detection.station_column();
        let section_col = detection.column_of(ColumnRole::Section);
        let status_col = filter
            .column_index
            .or_else(|| detection.column_of(ColumnRole::Status));

        let mut mentions: Vec<StationMention> = Vec::new();
        let mut skip_details: Vec<(usize, SkipReason)> = Vec::new();
        let mut skipped_empty = 0usize;
        let mut skipped_filtered = 0usize;

        let station_col = match station_col {
            Some(idx) => idx,
            None => {
                // 调用方应在列角色判定阶段拦截; 这里返回空结果兜底
                return ExtractionReport {
                    mentions,
                    included_rows: 0,
                    deduplicated: 0,
                    skipped_empty: 0,
                    skipped_filtered: 0,
                    skip_details,
                };
            }
        };

        for row in &table.rows {
            let name = row.cells[station_col].trim();

            // 跳过: 标识为空
            if name.is_empty() {
                skipped_empty += 1;
                skip_details.push((row.source_line, SkipReason::EmptyIdentifier));
                continue;
            }

            let raw_status = status_col.map(|idx| row.cells[idx].clone());

            // 跳过: 状态过滤未命中
            if filter.enabled {
                if let Some(status) = raw_status.as_deref() {
                    if status.trim() != filter.value {
                        skipped_filtered += 1;
                        skip_details.push((row.source_line, SkipReason::StatusFiltered));
                        continue;
                    }
                }
            }

            let section = section_col
                .map(|idx| row.cells[idx].trim().to_string())
                .filter(|s| !s.is_empty());

            let description = if capture_description {
                self.longest_description(&row.cells, station_col)
            } else {
                None
            };

            mentions.push(StationMention {
                name: name.to_string(),
                section,
                description,
                source_row: row.source_line,
                raw_status,
            });
        }

        let included_rows = mentions.len();
        let mentions = dedup_mentions(mentions);
        ExtractionReport {
            included_rows,
            deduplicated: included_rows - mentions.len(),
            mentions,
            skipped_empty,
            skipped_filtered,
            skip_details,
        }
    }

    // ==========================================
    // 列表提取
    // ==========================================

    /// 从简单列表提取 (每行一个工站)
    pub fn extract_from_simple_list(&self, text: &str) -> ExtractionReport {
        let mut mentions = Vec::new();
        let mut skipped_empty = 0usize;
        let mut skip_details = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                skipped_empty += 1;
                skip_details.push((idx, SkipReason::EmptyIdentifier));
                continue;
            }
            mentions.push(StationMention::named(line, idx));
        }

        let included_rows = mentions.len();
        let mentions = dedup_mentions(mentions);
        ExtractionReport {
            included_rows,
            deduplicated: included_rows - mentions.len(),
            mentions,
            skipped_empty,
            skipped_filtered: 0,
            skip_details,
        }
    }

    /// 从行内列表提取 (单行, 逗号/空格分隔)
    pub fn extract_from_inline_list(&self, text: &str) -> ExtractionReport {
        let line = text.trim().lines().next().unwrap_or("");
        let mentions: Vec<StationMention> = split_inline_tokens(line)
            .into_iter()
            .map(|token| StationMention::named(&token, 0))
            .collect();

        let included_rows = mentions.len();
        let mentions = dedup_mentions(mentions);
        ExtractionReport {
            included_rows,
            deduplicated: included_rows - mentions.len(),
            mentions,
            skipped_empty: 0,
            skipped_filtered: 0,
            skip_details: Vec::new(),
        }
    }

    // ==========================================
    // 描述捕获
    // ==========================================

    /// 同行非标识列中最长且超过阈值的单元格
    fn longest_description(&self, cells: &[String], station_col: usize) -> Option<String> {
        cells
            .iter()
            .enumerate()
            .filter(|(idx, cell)| {
                *idx != station_col && cell.chars().count() > self.config.description_min_len
            })
            .max_by_key(|(_, cell)| cell.chars().count())
            .map(|(_, cell)| cell.clone())
    }
}

// ==========================================
// 去重
// ==========================================

/// 按 (名称, 区段) 去重, 保留首次出现 (大小写不敏感)
fn dedup_mentions(mentions: Vec<StationMention>) -> Vec<StationMention> {
    let mut seen: Vec<(String, Option<String>)> = Vec::new();
    let mut result = Vec::new();

    for mention in mentions {
        let key = (
            mention.name.to_uppercase(),
            mention.section.as_ref().map(|s| s.to_uppercase()),
        );
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        result.push(mention);
    }
    result
}

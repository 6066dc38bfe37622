// ==========================================
// 制造工站报价匹配系统 - 表格解析器
// ==========================================
// 职责: 表格文本 → 规则化网格 (表头 + 等长数据行)
// 不变式: 每行单元格数恰好等于 column_count (短行补空串)
// ==========================================

use crate::domain::table::{ParsedTable, TableRow};
use crate::engine::pipeline::PipelineError;

/// 列分隔符
const DELIMITER: char = '\t';

// ==========================================
// TableParser - 表格解析器
// ==========================================
pub struct TableParser;

impl TableParser {
    /// 构造函数
    pub fn new() -> Self {
        Self
    }

    /// 解析表格文本 (默认启用续行表头合并)
    pub fn parse(&self, text: &str) -> Result<ParsedTable, PipelineError> {
        self.parse_with_options(text, true)
    }

    /// 解析表格文本
    ///
    /// # 参数
    /// - `merge_continuation_header`: 首个数据行若形似第二语言表头
    ///   (全部单元格非空、含字母、不含数字), 折叠进表头
    pub fn parse_with_options(
        &self,
        text: &str,
        merge_continuation_header: bool,
    ) -> Result<ParsedTable, PipelineError> {
        let mut warnings = Vec::new();

        // 按行切分, 保留原始行号; 丢弃完全空白的行
        let raw_rows: Vec<(usize, Vec<String>)> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                let cells: Vec<String> =
                    line.split(DELIMITER).map(|c| clean_cell(c)).collect();
                (idx, cells)
            })
            .collect();

        if raw_rows.is_empty() {
            return Err(PipelineError::InvalidInput("表格文本无有效行".to_string()));
        }

        // 列数 = 所有行的最大单元格数
        let column_count = raw_rows.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
        if column_count == 0 {
            return Err(PipelineError::InvalidInput("表格文本无有效列".to_string()));
        }

        // 补齐短行, 任何不够列数的行不得进入后续阶段
        let mut padded = 0usize;
        let mut rows: Vec<(usize, Vec<String>)> = raw_rows
            .into_iter()
            .map(|(idx, mut cells)| {
                if cells.len() < column_count {
                    cells.resize(column_count, String::new());
                    padded += 1;
                }
                (idx, cells)
            })
            .collect();

        if padded > 0 {
            warnings.push(format!("{} 行单元格数不足, 已补空串对齐", padded));
        }

        // 首行为表头
        let (_, mut headers) = rows.remove(0);

        // 可选: 续行表头合并 (常见于中英双语表头)
        if merge_continuation_header && !rows.is_empty() && column_count >= 2 {
            let first_data = &rows[0].1;
            if looks_like_continuation_header(first_data) {
                for (primary, secondary) in headers.iter_mut().zip(first_data.iter()) {
                    if !secondary.is_empty() {
                        *primary = format!("{} / {}", primary, secondary);
                    }
                }
                rows.remove(0);
                warnings.push("首个数据行形似第二语言表头, 已并入表头".to_string());
            }
        }

        let data_rows = rows
            .into_iter()
            .map(|(source_line, cells)| TableRow { source_line, cells })
            .collect();

        Ok(ParsedTable {
            headers,
            rows: data_rows,
            column_count,
            warnings,
        })
    }
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元格清洗
// ==========================================

/// 去首尾空白、去包裹引号、压缩连续空白
fn clean_cell(cell: &str) -> String {
    let mut s = cell.trim();
    // 去包裹引号 (CSV 粘贴残留)
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'')
        {
            s = &s[1..s.len() - 1];
        }
    }
    // 压缩连续空白为单个空格
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 是否形似"第二语言续行表头": 全部单元格非空、含字母且不含数字
fn looks_like_continuation_header(cells: &[String]) -> bool {
    cells.iter().all(|c| {
        !c.is_empty()
            && c.chars().any(|ch| ch.is_alphabetic())
            && !c.chars().any(|ch| ch.is_ascii_digit())
    })
}

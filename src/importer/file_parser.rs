// ==========================================
// 制造工站报价匹配系统 - 上传文件解析器
// ==========================================
// 职责: 将上传的 .csv/.xlsx/.xls/.txt 文件内容
//       统一转换为制表符分隔的文本块, 交给分类器
// 支持: Excel (calamine) / CSV (csv crate) / 纯文本
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

// ==========================================
// UploadParser - 上传文件解析
// ==========================================
pub struct UploadParser;

impl UploadParser {
    /// 按扩展名分派解析, 输出制表符分隔的文本块
    pub fn parse_file(path: &Path) -> ImportResult<String> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let text = match ext.as_str() {
            "csv" => Self::parse_csv(path)?,
            "xlsx" | "xls" => Self::parse_excel(path)?,
            "txt" => fs::read_to_string(path)
                .map_err(|e| ImportError::FileReadError(e.to_string()))?,
            other => return Err(ImportError::UnsupportedFormat(other.to_string())),
        };

        if text.trim().is_empty() {
            return Err(ImportError::EmptyFile);
        }
        Ok(text)
    }

    /// CSV → 制表符分隔文本
    fn parse_csv(path: &Path) -> ImportResult<String> {
        let file = fs::File::open(path).map_err(|e| ImportError::FileReadError(e.to_string()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致, 补齐交给表格解析器
            .from_reader(file);

        let mut lines = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ImportError::CsvParseError(e.to_string()))?;
            let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();

            // 跳过完全空白的行
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            lines.push(cells.join("\t"));
        }

        Ok(lines.join("\n"))
    }

    /// Excel (第一个工作表) → 制表符分隔文本
    fn parse_excel(path: &Path) -> ImportResult<String> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut lines = Vec::new();
        for row in range.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 跳过完全空白的行
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            lines.push(cells.join("\t"));
        }

        Ok(lines.join("\n"))
    }
}

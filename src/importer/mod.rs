// ==========================================
// 制造工站报价匹配系统 - 导入层
// ==========================================
// 职责: 上传文件内容转换为统一文本块
// ==========================================

pub mod error;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use file_parser::UploadParser;

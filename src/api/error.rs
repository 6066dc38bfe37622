// ==========================================
// 制造工站报价匹配系统 - API 层错误类型
// ==========================================
// 职责: 转换内层错误为用户可读的错误消息
// 红线: 所有错误必须包含显式原因 (可解释性)
// ==========================================

use crate::engine::pipeline::PipelineError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 输入错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("列角色不明确, 需人工修正: {0}")]
    AmbiguousColumns(String),

    // ===== 资源错误 =====
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("参考数据不可用: {0}")]
    ReferenceUnavailable(String),

    // ===== 文件错误 =====
    #[error("文件处理失败: {0}")]
    FileError(String),

    // ===== 内部错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            PipelineError::AmbiguousColumns(msg) => ApiError::AmbiguousColumns(msg),
            PipelineError::ReferenceUnavailable(msg) => ApiError::ReferenceUnavailable(msg),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::FileError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 制造工站报价匹配系统 - API 层
// ==========================================
// 职责: 对外业务接口 + 持久化编排
// ==========================================

pub mod error;
pub mod quote_service;

pub use error::{ApiError, ApiResult};
pub use quote_service::{MatchView, QuoteResponse, QuoteService, ResolveResponse};

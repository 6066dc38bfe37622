// ==========================================
// 制造工站报价匹配系统 - 仓储层
// ==========================================
// 职责: SQLite 数据访问, 不含业务规则
// ==========================================

pub mod candidate_repo;
pub mod error;
pub mod snapshot_repo;
pub mod station_repo;

pub use candidate_repo::CandidateConfigRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use snapshot_repo::SnapshotRepository;
pub use station_repo::StationMasterRepository;

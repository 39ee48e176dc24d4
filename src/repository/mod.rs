// ==========================================
// 列车上线排程决策系统 - 仓储层
// ==========================================
// 职责: 协作方接口的具体实现 (SQLite/内存)
// ==========================================

pub mod error;
pub mod memory;
pub mod result_repo;

// 重导出核心类型
pub use error::RepositoryError;
pub use memory::{InMemoryFleetReader, MemoryResultStore, StaticResourceCatalog};
pub use result_repo::SqliteResultStore;

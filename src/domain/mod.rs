// ==========================================
// 列车上线排程决策系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含业务规则实现
// ==========================================

pub mod decision;
pub mod resource;
pub mod result;
pub mod types;
pub mod vehicle;

// 重导出核心实体
pub use decision::{Conflict, Decision, ScoreBreakdown, ScoredVehicle};
pub use resource::{YardResource, YardSnapshot};
pub use result::{Alert, InductionResultSet, InductionSummary, ResultMetadata};
pub use vehicle::{BrandingContract, Certification, VehicleRecord, WorkOrder};

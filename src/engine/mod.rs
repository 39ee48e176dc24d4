// ==========================================
// 列车上线排程决策系统 - 引擎层
// ==========================================
// 职责: 实现排程决策规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有决策必须输出 reason
// ==========================================

pub mod advisory;
pub mod allocator;
pub mod conflicts;
pub mod error;
pub mod orchestrator;
pub mod repositories;
pub mod resources;
pub mod scoring;
pub mod service;
pub mod shunting;

// 重导出核心引擎
pub use advisory::AdvisoryEngine;
pub use allocator::DecisionAllocator;
pub use conflicts::ConflictDetector;
pub use error::InductionError;
pub use orchestrator::InductionOrchestrator;
pub use repositories::{
    FleetSnapshotReader, InductionRepositories, ResourceCatalog, ResultPersister,
};
pub use resources::ResourceAllocator;
pub use scoring::ScoreEngine;
pub use service::{InductionService, RunOutcome, ScenarioOverride};
pub use shunting::{LinearShuntingEstimator, ShuntingEstimator};

// ==========================================
// 列车上线排程决策系统 - 核心库
// ==========================================
// 系统定位: 决策支持系统 (人工最终控制权)
// 每晚对整个车队产出一套可解释的上线/检修/清洁/检查/备用决策
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 决策规则
pub mod engine;

// 配置层 - 优化参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertSeverity, CertStatus, ConflictCategory, DecisionPriority, OperationalState, ResourceKind,
    WorkOrderCategory, WorkOrderPriority,
};

// 领域实体
pub use domain::{
    Alert, BrandingContract, Certification, Conflict, Decision, InductionResultSet,
    InductionSummary, ResultMetadata, ScoreBreakdown, ScoredVehicle, VehicleRecord, WorkOrder,
    YardResource, YardSnapshot,
};

// 引擎
pub use engine::{
    AdvisoryEngine, ConflictDetector, DecisionAllocator, InductionError, InductionOrchestrator,
    InductionRepositories, InductionService, ResourceAllocator, RunOutcome, ScenarioOverride,
    ScoreEngine,
};

// 配置
pub use config::{CapacityConfig, OptimizationConfig, ScoringWeights};

// 仓储
pub use repository::RepositoryError;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "列车上线排程决策系统";

// ==========================================
// 预编译检查
// ==========================================

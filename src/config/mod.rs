// ==========================================
// 列车上线排程决策系统 - 配置层
// ==========================================
// 职责: 优化策略参数管理
// 红线: 权重/阈值可配置,引擎内不留业务魔数
// ==========================================

pub mod optimization;

// 重导出核心配置
pub use optimization::{CapacityConfig, OptimizationConfig, ScoringWeights};

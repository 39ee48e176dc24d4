// ==========================================
// 列车上线排程决策系统 - 引擎层错误类型
// ==========================================
// 红线: 只有输入校验失败才是错误,约束违规一律走冲突标注
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum InductionError {
    // ===== 输入校验错误 =====
    #[error("车队快照为空: snapshot for {snapshot_date} contains no vehicles")]
    EmptySnapshot { snapshot_date: String },

    #[error("车辆编号重复: vehicle_id={vehicle_id} appears more than once in snapshot")]
    DuplicateVehicle { vehicle_id: String },

    #[error("车辆记录非法 (vehicle_id={vehicle_id}): {message}")]
    InvalidRecord {
        vehicle_id: String,
        message: String,
    },

    // ===== 配置错误 =====
    #[error("优化配置非法: {0}")]
    InvalidConfig(String),

    // ===== 协作方错误 =====
    #[error("数据读取失败: {0}")]
    Repository(#[from] RepositoryError),
}

// ==========================================
// 列车上线排程决策系统 - 运行结果领域模型
// ==========================================
// 职责: 单次运行的不可变结果集与驾驶舱摘要
// 红线: 结果集只追加,新运行产生新记录,绝不更新旧记录
// ==========================================

use crate::domain::decision::Decision;
use crate::domain::types::{AlertSeverity, OperationalState};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// InductionSummary - 运行摘要
// ==========================================
// 用途: 驾驶舱指标,只读数据源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InductionSummary {
    pub total_vehicles: usize,      // 快照车辆数
    pub in_service_count: usize,    // 上线数
    pub maintenance_count: usize,   // 检修数
    pub cleaning_count: usize,      // 清洁数
    pub inspection_count: usize,    // 检查数
    pub standby_count: usize,       // 备用数
    pub average_score: f64,         // 平均评分
    pub compliance_rate: f64,       // 合规率 = 无冲突决策占比
    pub total_shunting_moves: i32,  // 调车次数合计
}

impl InductionSummary {
    /// 从决策集聚合摘要
    pub fn from_decisions(decisions: &[Decision]) -> Self {
        let count_state = |state: OperationalState| {
            decisions
                .iter()
                .filter(|d| d.operational_state == state)
                .count()
        };

        let total = decisions.len();
        let average_score = if total == 0 {
            0.0
        } else {
            decisions.iter().map(|d| d.score).sum::<f64>() / total as f64
        };
        let compliance_rate = if total == 0 {
            1.0
        } else {
            decisions.iter().filter(|d| d.is_conflict_free()).count() as f64 / total as f64
        };

        Self {
            total_vehicles: total,
            in_service_count: count_state(OperationalState::InService),
            maintenance_count: count_state(OperationalState::Maintenance),
            cleaning_count: count_state(OperationalState::Cleaning),
            inspection_count: count_state(OperationalState::Inspection),
            standby_count: count_state(OperationalState::Standby),
            average_score,
            compliance_rate,
            total_shunting_moves: decisions.iter().map(|d| d.shunting_moves).sum(),
        }
    }
}

// ==========================================
// Alert - 结构化告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,        // 等级
    pub category: String,               // 类别 (CERTIFICATION/MAINTENANCE/CAPACITY)
    pub vehicle_id: Option<String>,     // 涉及车辆 (容量类告警可无)
    pub message: String,                // 描述
    pub action: String,                 // 建议动作
    pub deadline: Option<NaiveDateTime>, // 处置期限
}

// ==========================================
// ResultMetadata - 运行元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub engine_version: String,  // 引擎版本
    pub snapshot_date: NaiveDate, // 快照日期
    pub fleet_size: usize,       // 车队规模
    pub simulated: bool,         // 是否为沙盘推演 (不持久化)
}

// ==========================================
// InductionResultSet - 运行结果集
// ==========================================
// 运行结束时一次性构建,之后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InductionResultSet {
    pub result_id: String,              // 结果ID (uuid)
    pub created_at: NaiveDateTime,      // 创建时间 (UTC)
    pub processing_duration_ms: i64,    // 计算耗时
    pub decisions: Vec<Decision>,       // 全部决策
    pub summary: InductionSummary,      // 摘要
    pub recommendations: Vec<String>,   // 建议清单
    pub alerts: Vec<Alert>,             // 告警清单
    pub metadata: ResultMetadata,       // 元数据
}

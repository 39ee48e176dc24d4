// ==========================================
// 列车上线排程决策系统 - 决策领域模型
// ==========================================
// 职责: 评分结果与单车决策的载体
// 红线: 所有规则必须输出 reason,冲突附着在决策上
// ==========================================

use crate::domain::types::{ConflictCategory, DecisionPriority, OperationalState};
use crate::domain::vehicle::VehicleRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ScoreBreakdown - 评分分量明细
// ==========================================
// 用途: 可解释性,五分量与总分一并保留
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub certification: f64,       // 证书分量
    pub mileage_balance: f64,     // 里程均衡分量
    pub maintenance_urgency: f64, // 检修紧迫度分量
    pub contract_compliance: f64, // 合同合规分量
    pub readiness: f64,           // 上线就绪分量 (哨兵承载位)
}

// ==========================================
// ScoredVehicle - 评分后的车辆
// ==========================================
// 每次运行派生一次,不独立持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredVehicle {
    pub record: VehicleRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

// ==========================================
// Conflict - 约束冲突
// ==========================================
// 红线: 冲突是建议性标注,运行永远完成并持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub category: ConflictCategory, // 冲突类别
    pub message: String,            // 冲突描述 (含数值)
}

impl Conflict {
    pub fn new(category: ConflictCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

// ==========================================
// Decision - 单车决策
// ==========================================
// 每车每次运行恰好一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub vehicle_id: String,                 // 车辆编号
    pub operational_state: OperationalState, // 运营状态 (互斥)
    pub score: f64,                         // 综合评分
    pub reasons: Vec<String>,               // 决策原因 (仅分配器生成)
    pub conflicts: Vec<Conflict>,           // 冲突标注
    pub recommendations: Vec<String>,       // 单车建议
    pub shunting_moves: i32,                // 调车次数估计 (>= 0)
    pub assigned_resource: Option<String>,  // 台位/股道分配
    pub priority: DecisionPriority,         // 优先级
    pub scheduled_time: NaiveDateTime,      // 计划执行时刻 (由快照日期推导,确定性)
}

impl Decision {
    /// 是否无任何冲突 (用于合规率统计)
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// 追加一条冲突标注
    pub fn push_conflict(&mut self, category: ConflictCategory, message: impl Into<String>) {
        self.conflicts.push(Conflict::new(category, message));
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_conflict_free_flag() {
        let mut decision = Decision {
            vehicle_id: "TS-01".to_string(),
            operational_state: OperationalState::Standby,
            score: 0.0,
            reasons: vec![],
            conflicts: vec![],
            recommendations: vec![],
            shunting_moves: 0,
            assigned_resource: None,
            priority: DecisionPriority::Low,
            scheduled_time: NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
        };
        assert!(decision.is_conflict_free());

        decision.push_conflict(ConflictCategory::Capacity, "MAINT_CAPACITY_OVERFLOW: 3 > 2");
        assert!(!decision.is_conflict_free());
        assert_eq!(decision.conflicts[0].category, ConflictCategory::Capacity);
    }
}

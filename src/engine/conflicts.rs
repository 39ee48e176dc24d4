// ==========================================
// 列车上线排程决策系统 - 冲突检测引擎
// ==========================================
// 职责: 对完整决策集做硬/软约束扫描,附着冲突标注
// 红线: 冲突绝不抛错,运行总是完成并持久化
// ==========================================

use crate::config::OptimizationConfig;
use crate::domain::decision::Decision;
use crate::domain::types::{ConflictCategory, OperationalState};
use std::collections::HashMap;
use tracing::{info, instrument};

// ==========================================
// ConflictDetector - 冲突检测引擎
// ==========================================
pub struct ConflictDetector {
    // 无状态引擎,不需要注入依赖
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 扫描决策集并附着冲突
    ///
    /// 检查项:
    /// 1) 检修数 > 台位容量 => 每条检修决策附 CAPACITY 冲突
    /// 2) 上线数 < 最低上线数 => 至少一条决策附 COMPLIANCE 冲突
    /// 3) 调车合计 > 上限 => 调车最多的决策附 SHUNTING 冲突
    /// 4) 两条决策共用同一资源 => 双方各附 RESOURCE 冲突
    ///
    /// # 参数
    /// - `decisions`: 资源分配后的决策列表
    /// - `config`: 优化配置
    ///
    /// # 返回
    /// 附着冲突后的决策列表,顺序不变
    #[instrument(skip(self, decisions, config), fields(decision_count = decisions.len()))]
    pub fn detect(&self, decisions: Vec<Decision>, config: &OptimizationConfig) -> Vec<Decision> {
        let mut decisions = decisions;

        self.check_maintenance_overflow(&mut decisions, config);
        self.check_service_shortfall(&mut decisions, config);
        self.check_shunting_total(&mut decisions, config);
        self.check_resource_collisions(&mut decisions);

        let conflicted = decisions.iter().filter(|d| !d.is_conflict_free()).count();
        info!(conflicted_count = conflicted, "冲突检测完成");
        decisions
    }

    // ==========================================
    // 检查项实现
    // ==========================================

    /// 检修台位超限: 冲突附到每条检修决策,标明溢出数
    fn check_maintenance_overflow(&self, decisions: &mut [Decision], config: &OptimizationConfig) {
        let maintenance_count = decisions
            .iter()
            .filter(|d| d.operational_state == OperationalState::Maintenance)
            .count();
        let max_bays = config.capacities.max_maintenance_bays;
        if maintenance_count <= max_bays {
            return;
        }

        let overflow = maintenance_count - max_bays;
        let message = format!(
            "MAINT_CAPACITY_OVERFLOW: {} maintenance decisions exceed {} bay(s), overflow {}",
            maintenance_count, max_bays, overflow
        );
        for decision in decisions
            .iter_mut()
            .filter(|d| d.operational_state == OperationalState::Maintenance)
        {
            decision.push_conflict(ConflictCategory::Capacity, message.clone());
        }
    }

    /// 最低上线数缺口: 软约束,至少附着到一条决策
    fn check_service_shortfall(&self, decisions: &mut [Decision], config: &OptimizationConfig) {
        let service_count = decisions
            .iter()
            .filter(|d| d.operational_state == OperationalState::InService)
            .count();
        let min_service = config.capacities.min_service;
        if service_count >= min_service {
            return;
        }

        if let Some(first) = decisions.first_mut() {
            first.push_conflict(
                ConflictCategory::Compliance,
                format!(
                    "SERVICE_SHORTFALL: only {} vehicle(s) in service, minimum is {}",
                    service_count, min_service
                ),
            );
        }
    }

    /// 调车合计超限: 附着到调车次数最多的决策
    fn check_shunting_total(&self, decisions: &mut [Decision], config: &OptimizationConfig) {
        let total: i32 = decisions.iter().map(|d| d.shunting_moves).sum();
        if total <= config.max_total_shunting_moves {
            return;
        }

        let message = format!(
            "SHUNTING_LIMIT_EXCEEDED: total {} move(s) exceed limit {}",
            total, config.max_total_shunting_moves
        );
        if let Some(worst) = decisions
            .iter_mut()
            .max_by_key(|d| d.shunting_moves)
        {
            worst.push_conflict(ConflictCategory::Shunting, message);
        }
    }

    /// 资源碰撞: 同一资源出现在两条决策上,双方各附冲突
    fn check_resource_collisions(&self, decisions: &mut [Decision]) {
        let mut usage: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, decision) in decisions.iter().enumerate() {
            if let Some(resource) = &decision.assigned_resource {
                usage.entry(resource.clone()).or_default().push(index);
            }
        }

        for (resource, indices) in usage {
            if indices.len() < 2 {
                continue;
            }
            let message = format!(
                "RESOURCE_COLLISION: resource {} assigned to {} vehicles",
                resource,
                indices.len()
            );
            for index in indices {
                decisions[index].push_conflict(ConflictCategory::Resource, message.clone());
            }
        }
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

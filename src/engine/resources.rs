// ==========================================
// 列车上线排程决策系统 - 资源分配引擎
// ==========================================
// 职责: 按状态组在评分序上分配台位/股道,估计调车次数
// 输入: 已排序的决策列表 + 场内资源快照
// 输出: 标注 assigned_resource 与 shunting_moves 的决策列表
// 红线: 资源耗尽时保持原状态,不自动降级,附着冲突
// ==========================================

use crate::domain::decision::Decision;
use crate::domain::resource::YardSnapshot;
use crate::domain::types::{ConflictCategory, OperationalState, ResourceKind};
use crate::engine::shunting::{LinearShuntingEstimator, ShuntingEstimator};
use tracing::{debug, instrument};

// ==========================================
// ResourceAllocator - 资源分配引擎
// ==========================================
pub struct ResourceAllocator {
    estimator: Box<dyn ShuntingEstimator>,
}

impl ResourceAllocator {
    /// 默认构造: 线性启发式调车估计
    pub fn new() -> Self {
        Self {
            estimator: Box::new(LinearShuntingEstimator),
        }
    }

    /// 注入自定义调车估计策略
    pub fn with_estimator(estimator: Box<dyn ShuntingEstimator>) -> Self {
        Self { estimator }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配物理资源
    ///
    /// 决策列表已按评分降序,组内分配顺序即列表顺序:
    /// 上线车辆依可达性拿存车股道 (减少出库调车),
    /// 检修/清洁/检查车辆拿对应类型的下一个空闲台位,
    /// 备用车辆不占资源、不动车。
    ///
    /// # 参数
    /// - `decisions`: 状态分配后的决策列表 (按评分降序)
    /// - `yard`: 场内资源快照 (已按可达性升序)
    ///
    /// # 返回
    /// 标注资源与调车次数后的决策列表,顺序不变
    #[instrument(skip(self, decisions, yard), fields(decision_count = decisions.len()))]
    pub fn allocate(&self, decisions: Vec<Decision>, yard: YardSnapshot) -> Vec<Decision> {
        let mut yard = yard;
        // 组内序号按出现顺序递增 (列表已是评分序)
        let mut group_index: [usize; 5] = [0; 5];
        let mut annotated = Vec::with_capacity(decisions.len());

        for mut decision in decisions {
            let state = decision.operational_state;
            let slot = Self::group_slot(state);
            let index_in_group = group_index[slot];
            group_index[slot] += 1;

            decision.shunting_moves = self.estimator.estimate(state, index_in_group);

            match Self::required_kind(state) {
                None => {
                    // 备用: 不占资源
                    decision.assigned_resource = None;
                }
                Some(kind) => {
                    let pool = yard.group_mut(kind);
                    if pool.is_empty() {
                        // 资源耗尽: 保持状态,无资源,附着冲突
                        decision.push_conflict(
                            ConflictCategory::Resource,
                            format!("RESOURCE_EXHAUSTED: no free {} available", kind),
                        );
                        debug!(
                            vehicle_id = %decision.vehicle_id,
                            kind = %kind,
                            "资源耗尽,保持状态并标注冲突"
                        );
                    } else {
                        let resource = pool.remove(0);
                        decision.assigned_resource = Some(resource.resource_id);
                    }
                }
            }

            annotated.push(decision);
        }

        annotated
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 状态所需的资源类型 (备用不需要)
    fn required_kind(state: OperationalState) -> Option<ResourceKind> {
        match state {
            OperationalState::InService => Some(ResourceKind::StablingPosition),
            OperationalState::Maintenance => Some(ResourceKind::MaintenanceBay),
            OperationalState::Cleaning => Some(ResourceKind::CleaningBay),
            OperationalState::Inspection => Some(ResourceKind::InspectionBay),
            OperationalState::Standby => None,
        }
    }

    fn group_slot(state: OperationalState) -> usize {
        match state {
            OperationalState::InService => 0,
            OperationalState::Maintenance => 1,
            OperationalState::Cleaning => 2,
            OperationalState::Inspection => 3,
            OperationalState::Standby => 4,
        }
    }
}

impl Default for ResourceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

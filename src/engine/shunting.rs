// ==========================================
// 列车上线排程决策系统 - 调车成本策略
// ==========================================
// 职责: 调车次数的启发式估计,可插拔策略
// 约定: 估计值 >= 0,且随组内分配序号单调不减
// 说明: 这是调车成本的代理模型,不是真实股道拓扑寻路;
//       基于轨道图最短路的模型留待后续版本
// ==========================================

use crate::domain::types::OperationalState;

// ==========================================
// ShuntingEstimator - 调车估计策略接口
// ==========================================
pub trait ShuntingEstimator: Send + Sync {
    /// 估计一次状态分配的调车次数
    ///
    /// # 参数
    /// - `state`: 运营状态
    /// - `index_in_group`: 该车在同状态组内的分配序号 (0 起)
    ///
    /// # 约定
    /// 返回值 >= 0,且对固定 state 随 index_in_group 单调不减
    fn estimate(&self, state: OperationalState, index_in_group: usize) -> i32;
}

// ==========================================
// LinearShuntingEstimator - 线性启发式估计
// ==========================================
// 上线: min(i+1, 2);检修: min(i+2, 4);清洁/检查: 固定小常数;备用: 0
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearShuntingEstimator;

impl ShuntingEstimator for LinearShuntingEstimator {
    fn estimate(&self, state: OperationalState, index_in_group: usize) -> i32 {
        let index = index_in_group as i32;
        match state {
            OperationalState::InService => (index + 1).min(2),
            OperationalState::Maintenance => (index + 2).min(4),
            OperationalState::Cleaning => 1,
            OperationalState::Inspection => 2,
            OperationalState::Standby => 0, // 备用不动车
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [OperationalState; 5] = [
        OperationalState::InService,
        OperationalState::Maintenance,
        OperationalState::Cleaning,
        OperationalState::Inspection,
        OperationalState::Standby,
    ];

    #[test]
    fn test_non_negative_and_monotonic() {
        // 约定: 非负,且随组内序号单调不减
        let estimator = LinearShuntingEstimator;
        for state in ALL_STATES {
            let mut previous = 0;
            for index in 0..16 {
                let moves = estimator.estimate(state, index);
                assert!(moves >= 0, "{state} index {index} produced negative moves");
                assert!(moves >= previous, "{state} not monotonic at index {index}");
                previous = moves;
            }
        }
    }

    #[test]
    fn test_linear_constants() {
        let estimator = LinearShuntingEstimator;
        assert_eq!(estimator.estimate(OperationalState::InService, 0), 1);
        assert_eq!(estimator.estimate(OperationalState::InService, 5), 2);
        assert_eq!(estimator.estimate(OperationalState::Maintenance, 0), 2);
        assert_eq!(estimator.estimate(OperationalState::Maintenance, 9), 4);
        assert_eq!(estimator.estimate(OperationalState::Cleaning, 3), 1);
        assert_eq!(estimator.estimate(OperationalState::Inspection, 3), 2);
        assert_eq!(estimator.estimate(OperationalState::Standby, 7), 0);
    }
}

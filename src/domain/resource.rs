// ==========================================
// 列车上线排程决策系统 - 场内资源领域模型
// ==========================================
// 职责: 台位/股道的只读目录模型
// ==========================================

use crate::domain::types::ResourceKind;
use serde::{Deserialize, Serialize};

// ==========================================
// YardResource - 场内物理资源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YardResource {
    pub resource_id: String,     // 资源编号 (如 "MB-01" / "SP-07")
    pub kind: ResourceKind,      // 资源类型
    pub accessibility_rank: i32, // 可达性序号,越小越易进出
}

// ==========================================
// YardSnapshot - 单次运行的资源快照
// ==========================================
// 由 ResourceCatalog 汇总而来,按可达性升序排好
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YardSnapshot {
    pub maintenance_bays: Vec<YardResource>,
    pub cleaning_bays: Vec<YardResource>,
    pub inspection_bays: Vec<YardResource>,
    pub stabling_positions: Vec<YardResource>,
}

impl YardSnapshot {
    /// 按可达性升序整理所有分组 (分配顺序即列表顺序)
    pub fn sorted_by_accessibility(mut self) -> Self {
        let rank = |r: &YardResource| (r.accessibility_rank, r.resource_id.clone());
        self.maintenance_bays.sort_by_key(rank);
        self.cleaning_bays.sort_by_key(rank);
        self.inspection_bays.sort_by_key(rank);
        self.stabling_positions.sort_by_key(rank);
        self
    }

    /// 指定类型的资源组 (可变引用,供分配器消费)
    pub fn group_mut(&mut self, kind: ResourceKind) -> &mut Vec<YardResource> {
        match kind {
            ResourceKind::MaintenanceBay => &mut self.maintenance_bays,
            ResourceKind::CleaningBay => &mut self.cleaning_bays,
            ResourceKind::InspectionBay => &mut self.inspection_bays,
            ResourceKind::StablingPosition => &mut self.stabling_positions,
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn res(id: &str, kind: ResourceKind, rank: i32) -> YardResource {
        YardResource {
            resource_id: id.to_string(),
            kind,
            accessibility_rank: rank,
        }
    }

    #[test]
    fn test_sorted_by_accessibility() {
        let yard = YardSnapshot {
            maintenance_bays: vec![
                res("MB-02", ResourceKind::MaintenanceBay, 2),
                res("MB-01", ResourceKind::MaintenanceBay, 1),
            ],
            stabling_positions: vec![
                res("SP-03", ResourceKind::StablingPosition, 3),
                res("SP-01", ResourceKind::StablingPosition, 1),
                res("SP-02", ResourceKind::StablingPosition, 2),
            ],
            ..Default::default()
        };

        let sorted = yard.sorted_by_accessibility();
        assert_eq!(sorted.maintenance_bays[0].resource_id, "MB-01");
        assert_eq!(
            sorted
                .stabling_positions
                .iter()
                .map(|r| r.resource_id.as_str())
                .collect::<Vec<_>>(),
            vec!["SP-01", "SP-02", "SP-03"]
        );
    }

    #[test]
    fn test_same_rank_tie_breaks_by_id() {
        let yard = YardSnapshot {
            cleaning_bays: vec![
                res("CB-B", ResourceKind::CleaningBay, 1),
                res("CB-A", ResourceKind::CleaningBay, 1),
            ],
            ..Default::default()
        };
        let sorted = yard.sorted_by_accessibility();
        assert_eq!(sorted.cleaning_bays[0].resource_id, "CB-A");
    }
}

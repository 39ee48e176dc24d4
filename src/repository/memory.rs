// ==========================================
// 列车上线排程决策系统 - 内存协作方实现
// ==========================================
// 职责: 演示二进制与测试用的内存版车队/资源/持久化实现
// 说明: 生产环境由维保系统网关等外部实现替换
// ==========================================

use crate::domain::resource::YardResource;
use crate::domain::result::InductionResultSet;
use crate::domain::types::ResourceKind;
use crate::domain::vehicle::VehicleRecord;
use crate::engine::repositories::{FleetSnapshotReader, ResourceCatalog, ResultPersister};
use crate::repository::error::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;
use tracing::debug;

// ==========================================
// InMemoryFleetReader - 内存车队快照
// ==========================================
pub struct InMemoryFleetReader {
    vehicles: Vec<VehicleRecord>,
}

impl InMemoryFleetReader {
    pub fn new(vehicles: Vec<VehicleRecord>) -> Self {
        Self { vehicles }
    }
}

#[async_trait]
impl FleetSnapshotReader for InMemoryFleetReader {
    async fn fetch_vehicles(&self, as_of: NaiveDate) -> Result<Vec<VehicleRecord>, RepositoryError> {
        // 内存实现不区分日期,整份快照原样返回
        debug!(%as_of, count = self.vehicles.len(), "内存车队快照读取");
        Ok(self.vehicles.clone())
    }
}

// ==========================================
// StaticResourceCatalog - 静态资源目录
// ==========================================
pub struct StaticResourceCatalog {
    resources: Vec<YardResource>,
}

impl StaticResourceCatalog {
    pub fn new(resources: Vec<YardResource>) -> Self {
        Self { resources }
    }

    /// 演示用车辆段: 4 检修 / 3 清洁 / 2 检查 / 24 股道
    pub fn demo_depot() -> Self {
        let mut resources = Vec::new();
        let mut push_group = |prefix: &str, kind: ResourceKind, count: i32| {
            for rank in 1..=count {
                resources.push(YardResource {
                    resource_id: format!("{}-{:02}", prefix, rank),
                    kind,
                    accessibility_rank: rank,
                });
            }
        };
        push_group("MB", ResourceKind::MaintenanceBay, 4);
        push_group("CB", ResourceKind::CleaningBay, 3);
        push_group("IB", ResourceKind::InspectionBay, 2);
        push_group("SP", ResourceKind::StablingPosition, 24);
        Self::new(resources)
    }
}

#[async_trait]
impl ResourceCatalog for StaticResourceCatalog {
    async fn list_bays(&self, kind: ResourceKind) -> Result<Vec<YardResource>, RepositoryError> {
        Ok(self
            .resources
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    async fn list_stabling_positions(&self) -> Result<Vec<YardResource>, RepositoryError> {
        self.list_bays(ResourceKind::StablingPosition).await
    }
}

// ==========================================
// MemoryResultStore - 内存结果存储
// ==========================================
// 只追加语义与 SQLite 实现一致,便于服务层测试
#[derive(Default)]
pub struct MemoryResultStore {
    saved: Mutex<Vec<InductionResultSet>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已保存的结果数
    pub fn count(&self) -> usize {
        self.saved.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// 取出最近一条结果的克隆
    pub fn last(&self) -> Option<InductionResultSet> {
        self.saved.lock().ok().and_then(|v| v.last().cloned())
    }
}

#[async_trait]
impl ResultPersister for MemoryResultStore {
    async fn save(&self, result: &InductionResultSet) -> Result<String, RepositoryError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;
        if saved.iter().any(|r| r.result_id == result.result_id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "result_id {} already stored",
                result.result_id
            )));
        }
        saved.push(result.clone());
        Ok(result.result_id.clone())
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::{InductionSummary, ResultMetadata};

    fn sample_result(id: &str) -> InductionResultSet {
        let snapshot_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        InductionResultSet {
            result_id: id.to_string(),
            created_at: snapshot_date.and_hms_opt(4, 0, 0).unwrap(),
            processing_duration_ms: 1,
            decisions: vec![],
            summary: InductionSummary::from_decisions(&[]),
            recommendations: vec![],
            alerts: vec![],
            metadata: ResultMetadata {
                engine_version: "0.1.0".to_string(),
                snapshot_date,
                fleet_size: 0,
                simulated: false,
            },
        }
    }

    #[tokio::test]
    async fn test_demo_depot_groups() {
        let catalog = StaticResourceCatalog::demo_depot();
        let bays = catalog.list_bays(ResourceKind::MaintenanceBay).await.unwrap();
        assert_eq!(bays.len(), 4);
        let positions = catalog.list_stabling_positions().await.unwrap();
        assert_eq!(positions.len(), 24);
        assert_eq!(positions[0].resource_id, "SP-01");
    }

    #[tokio::test]
    async fn test_memory_store_append_only() {
        let store = MemoryResultStore::new();
        store.save(&sample_result("r-1")).await.unwrap();
        assert_eq!(store.count(), 1);

        let err = store.save(&sample_result("r-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(store.count(), 1);
    }
}

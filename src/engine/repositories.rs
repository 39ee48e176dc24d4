// ==========================================
// 列车上线排程决策系统 - 引擎层协作方接口
// ==========================================
// 职责: 定义引擎消费的外部协作方 trait 并聚合注入
// 红线: 引擎不拼 SQL,数据访问全部经由协作方接口
// ==========================================

use crate::domain::resource::{YardResource, YardSnapshot};
use crate::domain::result::InductionResultSet;
use crate::domain::types::ResourceKind;
use crate::domain::vehicle::VehicleRecord;
use crate::repository::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

// ==========================================
// FleetSnapshotReader - 车队快照读取方
// ==========================================
// 约定: 返回已校验的完整记录;缺失证书用 NotOnFile 哨兵,不允许空洞
#[async_trait]
pub trait FleetSnapshotReader: Send + Sync {
    /// 读取指定日期的车队快照
    async fn fetch_vehicles(&self, as_of: NaiveDate) -> Result<Vec<VehicleRecord>, RepositoryError>;
}

// ==========================================
// ResourceCatalog - 场内资源目录
// ==========================================
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// 指定类型的台位列表
    async fn list_bays(&self, kind: ResourceKind) -> Result<Vec<YardResource>, RepositoryError>;

    /// 存车股道列表
    async fn list_stabling_positions(&self) -> Result<Vec<YardResource>, RepositoryError>;
}

// ==========================================
// ResultPersister - 结果持久化方
// ==========================================
// 约定: 只追加;每次成功运行恰好调用一次 save
#[async_trait]
pub trait ResultPersister: Send + Sync {
    /// 持久化运行结果,返回句柄
    async fn save(&self, result: &InductionResultSet) -> Result<String, RepositoryError>;
}

// ==========================================
// InductionRepositories - 协作方集合
// ==========================================
// 将 3 个协作方合并为 1 个结构体参数,简化依赖注入,
// 便于单元测试时整体替换为内存实现
#[derive(Clone)]
pub struct InductionRepositories {
    /// 车队快照读取方
    pub fleet_reader: Arc<dyn FleetSnapshotReader>,
    /// 场内资源目录
    pub catalog: Arc<dyn ResourceCatalog>,
    /// 结果持久化方
    pub persister: Arc<dyn ResultPersister>,
}

impl InductionRepositories {
    pub fn new(
        fleet_reader: Arc<dyn FleetSnapshotReader>,
        catalog: Arc<dyn ResourceCatalog>,
        persister: Arc<dyn ResultPersister>,
    ) -> Self {
        Self {
            fleet_reader,
            catalog,
            persister,
        }
    }

    /// 汇总一次运行所需的全部场内资源 (三类台位并发读取)
    pub async fn yard_snapshot(&self) -> Result<YardSnapshot, RepositoryError> {
        let (maintenance_bays, cleaning_bays, inspection_bays, stabling_positions) =
            futures::try_join!(
                self.catalog.list_bays(ResourceKind::MaintenanceBay),
                self.catalog.list_bays(ResourceKind::CleaningBay),
                self.catalog.list_bays(ResourceKind::InspectionBay),
                self.catalog.list_stabling_positions(),
            )?;

        Ok(YardSnapshot {
            maintenance_bays,
            cleaning_bays,
            inspection_bays,
            stabling_positions,
        }
        .sorted_by_accessibility())
    }
}

// 注: trait 的行为约定由内存实现 (repository::memory) 与
// SQLite 实现 (repository::result_repo) 的测试共同覆盖。

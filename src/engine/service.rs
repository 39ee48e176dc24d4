// ==========================================
// 列车上线排程决策系统 - 服务门面
// ==========================================
// 职责: 对外暴露正式运行与沙盘推演两个入口
// 红线: 正式运行恰好持久化一次;沙盘推演绝不落库;
//       持久化失败只降级为告警,不吞掉已算出的结果
// ==========================================

use crate::config::OptimizationConfig;
use crate::domain::result::InductionResultSet;
use crate::domain::types::{OperationalState, ResourceKind};
use crate::domain::vehicle::VehicleRecord;
use crate::engine::error::InductionError;
use crate::engine::orchestrator::InductionOrchestrator;
use crate::engine::repositories::InductionRepositories;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

// ==========================================
// ScenarioOverride - 沙盘覆盖项
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioOverride {
    /// 强制指定车辆的运用状态 (跳过该车的规则判定)
    ForceState {
        vehicle_id: String,
        state: OperationalState,
    },
    /// 覆盖某类台位的容量上限 (同时收缩场内资源快照)
    BayCapacity { kind: ResourceKind, capacity: usize },
}

// ==========================================
// RunOutcome - 正式运行结果
// ==========================================
/// 结果集加上持久化回执: persist_error 非空表示结果有效但未落库
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub result: InductionResultSet,
    pub persist_handle: Option<String>,
    pub persist_error: Option<String>,
}

// ==========================================
// InductionService - 服务门面
// ==========================================
pub struct InductionService {
    repos: InductionRepositories,
    config: OptimizationConfig,
}

impl InductionService {
    pub fn new(repos: InductionRepositories, config: OptimizationConfig) -> Self {
        Self { repos, config }
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    // ==========================================
    // 正式运行
    // ==========================================

    /// 读取车队快照并执行一次正式运行,结果落库
    #[instrument(skip(self))]
    pub async fn run_induction(&self, as_of: NaiveDate) -> Result<RunOutcome, InductionError> {
        let vehicles = self.repos.fleet_reader.fetch_vehicles(as_of).await?;
        self.run_with_vehicles(as_of, vehicles).await
    }

    /// 用调用方提供的车队快照执行正式运行 (快照已在别处取得时用)
    pub async fn run_with_vehicles(
        &self,
        as_of: NaiveDate,
        vehicles: Vec<VehicleRecord>,
    ) -> Result<RunOutcome, InductionError> {
        let yard = self.repos.yard_snapshot().await?;

        // 编排器按运行构造,配置快照随之冻结
        let orchestrator = InductionOrchestrator::new(self.config.clone());
        let result = orchestrator.run(as_of, vehicles, yard)?;

        // 持久化恰好一次;失败降级,结果照常返回
        match self.repos.persister.save(&result).await {
            Ok(handle) => {
                info!(result_id = %result.result_id, handle = %handle, "正式运行结果已持久化");
                Ok(RunOutcome {
                    result,
                    persist_handle: Some(handle),
                    persist_error: None,
                })
            }
            Err(err) => {
                warn!(result_id = %result.result_id, error = %err, "运行结果持久化失败,结果仍然返回");
                Ok(RunOutcome {
                    result,
                    persist_handle: None,
                    persist_error: Some(err.to_string()),
                })
            }
        }
    }

    // ==========================================
    // 沙盘推演
    // ==========================================

    /// 在覆盖项作用下重演一次排程,结果只读不落库
    #[instrument(skip(self, overrides), fields(override_count = overrides.len()))]
    pub async fn simulate_scenario(
        &self,
        as_of: NaiveDate,
        overrides: &[ScenarioOverride],
    ) -> Result<InductionResultSet, InductionError> {
        let vehicles = self.repos.fleet_reader.fetch_vehicles(as_of).await?;
        self.simulate_with_vehicles(as_of, vehicles, overrides).await
    }

    /// 沙盘推演 (调用方提供车队快照)
    pub async fn simulate_with_vehicles(
        &self,
        as_of: NaiveDate,
        vehicles: Vec<VehicleRecord>,
        overrides: &[ScenarioOverride],
    ) -> Result<InductionResultSet, InductionError> {
        let mut yard = self.repos.yard_snapshot().await?;
        let mut config = self.config.clone();
        let mut forced_states: HashMap<String, OperationalState> = HashMap::new();

        for item in overrides {
            match item {
                ScenarioOverride::ForceState { vehicle_id, state } => {
                    forced_states.insert(vehicle_id.clone(), *state);
                }
                ScenarioOverride::BayCapacity { kind, capacity } => {
                    match kind {
                        ResourceKind::MaintenanceBay => {
                            config.capacities.max_maintenance_bays = *capacity
                        }
                        ResourceKind::CleaningBay => config.capacities.max_cleaning_slots = *capacity,
                        ResourceKind::InspectionBay => {
                            config.capacities.max_inspection_bays = *capacity
                        }
                        ResourceKind::StablingPosition => {
                            config.capacities.max_service_slots = *capacity
                        }
                    }
                    // 容量缩小时同步收缩资源池,保持容量与实物一致
                    yard.group_mut(*kind).truncate(*capacity);
                }
            }
        }

        info!(
            %as_of,
            forced = forced_states.len(),
            "开始沙盘推演 (结果不落库)"
        );
        let orchestrator = InductionOrchestrator::new(config);
        orchestrator.run_scenario(as_of, vehicles, yard, &forced_states, true)
    }
}

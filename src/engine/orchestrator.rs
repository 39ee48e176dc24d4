// ==========================================
// 列车上线排程决策系统 - 引擎编排器
// ==========================================
// 用途: 协调评分/状态分配/资源分配/冲突检测/建议生成的执行顺序
// 红线: 阶段 2-6 严格顺序执行,各阶段消费上一阶段的完整输出;
//       编排器按运行显式构造,仅持有配置,无跨运行可变状态
// ==========================================

use crate::config::OptimizationConfig;
use crate::domain::resource::YardSnapshot;
use crate::domain::result::{InductionResultSet, InductionSummary, ResultMetadata};
use crate::domain::types::OperationalState;
use crate::domain::vehicle::VehicleRecord;
use crate::engine::advisory::AdvisoryEngine;
use crate::engine::allocator::DecisionAllocator;
use crate::engine::conflicts::ConflictDetector;
use crate::engine::error::InductionError;
use crate::engine::resources::ResourceAllocator;
use crate::engine::scoring::ScoreEngine;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// InductionOrchestrator - 引擎编排器
// ==========================================
pub struct InductionOrchestrator {
    config: OptimizationConfig,
    scoring: ScoreEngine,
    allocator: DecisionAllocator,
    resources: ResourceAllocator,
    conflicts: ConflictDetector,
    advisory: AdvisoryEngine,
}

impl InductionOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 优化配置 (运行期间不变)
    pub fn new(config: OptimizationConfig) -> Self {
        Self {
            config,
            scoring: ScoreEngine::new(),
            allocator: DecisionAllocator::new(),
            resources: ResourceAllocator::new(),
            conflicts: ConflictDetector::new(),
            advisory: AdvisoryEngine::new(),
        }
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// 执行一次完整的上线排程运行
    ///
    /// # 参数
    /// - `snapshot_date`: 快照日期
    /// - `vehicles`: 车队快照 (已校验记录,引擎再做输入自检)
    /// - `yard`: 场内资源快照
    ///
    /// # 返回
    /// 不可变结果集;仅输入校验失败时返回 Err,约束违规全部走冲突标注
    pub fn run(
        &self,
        snapshot_date: NaiveDate,
        vehicles: Vec<VehicleRecord>,
        yard: YardSnapshot,
    ) -> Result<InductionResultSet, InductionError> {
        self.run_scenario(snapshot_date, vehicles, yard, &HashMap::new(), false)
    }

    /// 执行一次运行,支持沙盘强制状态 (simulate_scenario 经由此入口)
    pub fn run_scenario(
        &self,
        snapshot_date: NaiveDate,
        vehicles: Vec<VehicleRecord>,
        yard: YardSnapshot,
        forced_states: &HashMap<String, OperationalState>,
        simulated: bool,
    ) -> Result<InductionResultSet, InductionError> {
        let started = Instant::now();

        // ==========================================
        // 步骤0: 输入自检 (唯一的错误出口)
        // ==========================================
        let mut config_violations = self.config.validate();
        if simulated {
            // 沙盘容量覆盖可以合法地把上线槽位压到最低上线数之下,
            // 缺口由 SERVICE_SHORTFALL 冲突呈现,不按配置错误拒绝
            config_violations.retain(|v| !v.starts_with("SERVICE_BOUNDS_INVERTED"));
        }
        if !config_violations.is_empty() {
            return Err(InductionError::InvalidConfig(config_violations.join("; ")));
        }
        Self::validate_snapshot(snapshot_date, &vehicles)?;

        info!(
            %snapshot_date,
            fleet_size = vehicles.len(),
            simulated,
            "开始执行上线排程运行"
        );

        // ==========================================
        // 步骤1: Score Engine - 五分量评分
        // ==========================================
        debug!("步骤1: 执行车队评分");
        let scored = self.scoring.score_fleet(&vehicles, &self.config);
        info!(scored_count = scored.len(), "车队评分完成");

        // ==========================================
        // 步骤2: Decision Allocator - 状态分配
        // ==========================================
        debug!("步骤2: 执行状态分配");
        let decisions = self
            .allocator
            .allocate(scored, &self.config, snapshot_date, forced_states);
        info!(decision_count = decisions.len(), "状态分配完成");

        // ==========================================
        // 步骤3: Resource Allocator - 资源分配
        // ==========================================
        debug!("步骤3: 执行资源分配");
        let decisions = self.resources.allocate(decisions, yard);
        info!("资源分配完成");

        // ==========================================
        // 步骤4: Conflict Detector - 冲突检测
        // ==========================================
        debug!("步骤4: 执行冲突检测");
        let decisions = self.conflicts.detect(decisions, &self.config);

        // ==========================================
        // 步骤5: Advisory Engine - 建议与告警
        // ==========================================
        debug!("步骤5: 生成建议与告警");
        let (recommendations, alerts) =
            self.advisory
                .generate(&decisions, &vehicles, snapshot_date, &self.config);

        // ==========================================
        // 组装结果集 (一次性构建,之后不可变)
        // ==========================================
        let summary = InductionSummary::from_decisions(&decisions);
        info!(
            in_service = summary.in_service_count,
            maintenance = summary.maintenance_count,
            compliance_rate = summary.compliance_rate,
            "上线排程运行完成"
        );

        Ok(InductionResultSet {
            result_id: Uuid::new_v4().to_string(),
            created_at: Utc::now().naive_utc(),
            processing_duration_ms: started.elapsed().as_millis() as i64,
            decisions,
            summary,
            recommendations,
            alerts,
            metadata: ResultMetadata {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                snapshot_date,
                fleet_size: vehicles.len(),
                simulated,
            },
        })
    }

    // ==========================================
    // 输入校验
    // ==========================================

    /// 快照自检: 空快照/重复编号/字段非法均在评分前拒绝,
    /// 不产出部分结果集
    fn validate_snapshot(
        snapshot_date: NaiveDate,
        vehicles: &[VehicleRecord],
    ) -> Result<(), InductionError> {
        if vehicles.is_empty() {
            return Err(InductionError::EmptySnapshot {
                snapshot_date: snapshot_date.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for vehicle in vehicles {
            if vehicle.vehicle_id.trim().is_empty() {
                return Err(InductionError::InvalidRecord {
                    vehicle_id: vehicle.vehicle_id.clone(),
                    message: "vehicle_id is blank".to_string(),
                });
            }
            if !seen.insert(vehicle.vehicle_id.clone()) {
                return Err(InductionError::DuplicateVehicle {
                    vehicle_id: vehicle.vehicle_id.clone(),
                });
            }
            if vehicle.current_mileage_km < 0.0 || vehicle.cumulative_mileage_km < 0.0 {
                return Err(InductionError::InvalidRecord {
                    vehicle_id: vehicle.vehicle_id.clone(),
                    message: "mileage must be non-negative".to_string(),
                });
            }
            if vehicle.seating_capacity < 0 {
                return Err(InductionError::InvalidRecord {
                    vehicle_id: vehicle.vehicle_id.clone(),
                    message: "seating_capacity must be non-negative".to_string(),
                });
            }
            if let Some(contract) = &vehicle.branding {
                if contract.target_exposure_hours <= 0.0 {
                    return Err(InductionError::InvalidRecord {
                        vehicle_id: vehicle.vehicle_id.clone(),
                        message: "contract target exposure must be positive".to_string(),
                    });
                }
                if contract.delivered_exposure_hours < 0.0 {
                    return Err(InductionError::InvalidRecord {
                        vehicle_id: vehicle.vehicle_id.clone(),
                        message: "delivered exposure must be non-negative".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
